// permissions module

pub mod access_decision;
pub mod permission_store;
pub use access_decision::AccessDecisionEngine;
pub use permission_store::PermissionStore;
