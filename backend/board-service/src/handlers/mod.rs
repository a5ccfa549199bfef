pub mod boards;
pub mod health;

use actix_web::web;

/// Routes under `/api`, expected behind authentication and workspace middleware.
pub fn register_routes(cfg: &mut web::ServiceConfig) {
    boards::register_routes(cfg);
}
