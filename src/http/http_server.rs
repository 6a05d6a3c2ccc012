use super::responses::{json_error_handler, query_error_handler};
use super::{access_routes, audit_routes, recognition_routes, reference_routes};
use crate::error::{AccessLedgerError, AccessLedgerResult};
use crate::node::AccessNode;
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer as ActixHttpServer};
use log::info;

/// Shared application state for the HTTP server.
pub struct AppState {
    pub node: AccessNode,
}

impl AppState {
    pub fn new(node: AccessNode) -> web::Data<Self> {
        web::Data::new(Self { node })
    }
}

/// HTTP front end for an [`AccessNode`].
///
/// Handlers are thin: they parse ids and bodies, call one node operation and
/// render the result as `{"success": true, "data": ...}` or
/// `{"success": false, "error": ...}`.
pub struct AccessLedgerHttpServer {
    node: AccessNode,
    bind_address: String,
    cors_allowed_origins: Vec<String>,
}

impl AccessLedgerHttpServer {
    pub fn new(node: AccessNode, bind_address: &str) -> Self {
        Self {
            node,
            bind_address: bind_address.to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }

    /// Restricts CORS to `origins`. An empty list allows any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_allowed_origins = origins;
        self
    }

    pub async fn run(&self) -> AccessLedgerResult<()> {
        info!("HTTP server running on {}", self.bind_address);

        let app_state = AppState::new(self.node.clone());
        let origins = self.cors_allowed_origins.clone();

        let server = ActixHttpServer::new(move || {
            App::new()
                .wrap(middleware::Logger::default())
                .wrap(build_cors(&origins))
                .app_data(app_state.clone())
                .configure(configure_routes)
        })
        .bind(&self.bind_address)
        .map_err(|e| AccessLedgerError::Config(format!("Failed to bind HTTP server: {}", e)))?
        .run();

        server
            .await
            .map_err(|e| AccessLedgerError::Config(format!("HTTP server error: {}", e)))?;

        self.node.close();
        info!("HTTP server stopped");
        Ok(())
    }
}

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if origins.is_empty() {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

/// Registers payload error handlers and every `/api` route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                // Recognition
                .route(
                    "/recognition/process",
                    web::post().to(recognition_routes::process_recognition),
                )
                .route(
                    "/recognition/employee/{employee_id}",
                    web::get().to(recognition_routes::evidence_for_employee),
                )
                // Grants
                .route("/access/grant", web::post().to(access_routes::grant_access))
                .route(
                    "/access/grantAllAreas",
                    web::post().to(access_routes::grant_all_areas),
                )
                .route(
                    "/access/revoke/{grant_id}",
                    web::delete().to(access_routes::revoke_access),
                )
                .route(
                    "/access/by-employee/{employee_id}",
                    web::get().to(access_routes::list_grants),
                )
                // Audit trail
                .route(
                    "/access-log/by-employee/{employee_id}",
                    web::get().to(audit_routes::access_log_by_employee),
                )
                .route(
                    "/access-log/{access_event_id}",
                    web::get().to(audit_routes::access_event),
                )
                // Must precede /employee/{id}
                .route(
                    "/employee/statistics",
                    web::get().to(audit_routes::employee_statistics),
                )
                // Reference data
                .route("/employee", web::get().to(reference_routes::list_employees))
                .route("/employee", web::post().to(reference_routes::upsert_employee))
                .route("/employee/{id}", web::get().to(reference_routes::get_employee))
                .route(
                    "/employee/{id}",
                    web::delete().to(reference_routes::delete_employee),
                )
                .route("/area", web::get().to(reference_routes::list_areas))
                .route("/area", web::post().to(reference_routes::upsert_area))
                .route("/area/{id}", web::get().to(reference_routes::get_area))
                .route("/models/{kind}", web::get().to(reference_routes::list_models))
                .route(
                    "/models/{kind}",
                    web::post().to(reference_routes::register_model),
                ),
        );
}
