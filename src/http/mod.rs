//! actix-web adapter over [`crate::node::AccessNode`].

pub mod access_routes;
pub mod audit_routes;
pub mod http_server;
pub mod recognition_routes;
pub mod reference_routes;
pub mod responses;

pub use http_server::{configure_routes, AccessLedgerHttpServer, AppState};
