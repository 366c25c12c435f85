// Entrypoint for the completion service: parse flags, install logging,
// serve the completion api until ctrl-c.

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Extension;
use clap::Parser;
use ghostwriter::application::application::Application;
use ghostwriter::application::config::configuration::Configuration;
use ghostwriter::webserver;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};
use tracing::{debug, info};

pub type Router<S = Application> = axum::Router<S>;

#[tokio::main]
async fn main() -> Result<()> {
    info!("ghostwriter 🚀");
    let configuration = Configuration::parse();

    Application::install_logging(&configuration);

    let application = Application::initialize(configuration).await?;
    println!("initialized application");
    debug!("initialized application");

    tokio::select! {
        result = start(application) => result?,
        _ = signal::ctrl_c() => {
            debug!("signal received, shutting down");
        }
    }

    Ok(())
}

pub async fn start(app: Application) -> Result<()> {
    println!("Port: {}", app.config.port);
    let bind = SocketAddr::new(app.config.host.parse()?, app.config.port);

    // the editor posts to /complete directly, so the routes stay flat
    // without an /api nest
    let api = Router::new()
        .route("/complete", post(webserver::completion::complete))
        .route("/config", get(webserver::config::get))
        .route("/version", get(webserver::config::version))
        .route("/health", get(webserver::config::health));

    let api = api
        .layer(Extension(app.clone()))
        .with_state(app.clone())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
        // the context blob with merged context files can get big, leave room
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024));

    axum::Server::bind(&bind)
        .serve(api.into_make_service())
        .await?;

    Ok(())
}
