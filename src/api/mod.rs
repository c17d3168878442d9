//! HTTP surface: the UI page plus data/log/clear, each reachable both at the
//! root and under `/api/v1`.

use actix_web::web;

mod handlers;

pub const API_PREFIX: &str = "/api/v1";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .service(web::scope(API_PREFIX).configure(routes))
        .configure(routes);
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/data", web::get().to(handlers::get_data))
        .route("/log", web::get().to(handlers::get_log))
        .route("/clear", web::post().to(handlers::clear_log));
}
