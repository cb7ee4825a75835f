use std::process::ExitCode;

use actix_web::{web, App, HttpServer};
use quipreel::config::db::RuntimeEnv;
use quipreel::config::game::GameConfig;
use quipreel::config::server::ServerConfig;
use quipreel::config::video::VideoGeneratorKind;
use quipreel::infra::state::build_state;
use quipreel::services::round_clock::spawn_round_clock;
use quipreel::{cors_middleware, routes, AppState, RequestTrace, StructuredLogger, TraceSpan};
use tracing::{error, info};

mod telemetry;

async fn build_app_state(server: &ServerConfig) -> Result<AppState, quipreel::AppError> {
    let game_config = GameConfig::from_env()?;
    let generator = VideoGeneratorKind::from_env()?.build()?;

    build_state()
        .with_env(RuntimeEnv::Prod)
        .with_db(server.db_kind)
        .with_game_config(game_config)
        .with_video_generator(generator)
        .build()
        .await
}

#[actix_web::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    // Configuration comes from the process environment only.
    let server = match ServerConfig::from_env() {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "invalid server configuration");
            return ExitCode::FAILURE;
        }
    };

    let app_state = match build_app_state(&server).await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            return ExitCode::FAILURE;
        }
    };

    let Some(db) = app_state.db.clone() else {
        error!("database connection missing after startup");
        return ExitCode::FAILURE;
    };
    let clock = spawn_round_clock(
        db,
        app_state.game_flow(),
        app_state.game_config.clock_interval,
    );

    info!(
        host = %server.host,
        port = server.port,
        db_kind = ?server.db_kind,
        video = ?app_state.video.as_ref().map(|v| v.name().to_string()),
        "starting quipreel backend"
    );

    let data = web::Data::new(app_state);

    let bound = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port));

    let result = match bound {
        Ok(http) => http.run().await,
        Err(e) => Err(e),
    };

    clock.abort();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "http server stopped with an error");
            ExitCode::FAILURE
        }
    }
}
