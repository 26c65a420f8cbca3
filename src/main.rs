//! # HTTP/1.1 Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada: inicializa el logging, lee la configuración y
//! arranca el loop de accept.

use http11_server::config::Config;
use http11_server::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Logs legibles en stdout; nivel controlable con RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "http11_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new();

    tracing::info!(
        address = %config.address(),
        directory = %config.directory,
        max_body_bytes = config.max_body_bytes,
        confine_files = config.confine_files,
        "configuración cargada"
    );

    let mut server = Server::new(config);

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        tracing::error!(error = %e, "error fatal");
        std::process::exit(1);
    }
}
