use actix_web::web;

pub mod game;
pub mod health;
pub mod videos;

/// Register every route. `main.rs` and the HTTP tests share this so both
/// serve the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root));

    // /health/health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // /api/game/**
    cfg.service(web::scope("/api/game").configure(game::configure_routes));

    // /api/videos
    cfg.service(web::scope("/api/videos").configure(videos::configure_routes));
}
