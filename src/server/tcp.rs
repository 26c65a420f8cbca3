//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Listener que acepta conexiones en un loop secuencial y entrega cada
//! socket a un thread nuevo. El accept nunca espera a que termine una
//! conexión; no hay límite de conexiones simultáneas.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use thiserror::Error;

use super::connection::{handle_stream, ConnectionId, ConnectionLimits};
use crate::config::Config;
use crate::handlers::FileStore;
use crate::router::Router;

/// Errores fatales del servidor (solo ocurren al arrancar)
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Servidor HTTP/1.1, un thread por conexión
pub struct Server {
    config: Config,
    router: Arc<Router>,
    limits: ConnectionLimits,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let files = FileStore::new(&config.directory).confined(config.confine_files);
        let limits = ConnectionLimits::from_config(&config);

        Self {
            config,
            router: Arc::new(Router::new(files)),
            limits,
            listener: None,
        }
    }

    /// Hace bind del puerto configurado y retorna la dirección real.
    ///
    /// Con `port = 0` el sistema elige un puerto libre.
    pub fn bind(&mut self) -> Result<SocketAddr, ServerError> {
        let listener = self.open_listener()?;
        let local_addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(local_addr)
    }

    fn open_listener(&self) -> Result<TcpListener, ServerError> {
        self.config.validate().map_err(ServerError::InvalidConfig)?;

        let address = self.config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address,
            source,
        })?;

        tracing::info!(
            address = %listener.local_addr()?,
            directory = %self.config.directory,
            "servidor escuchando"
        );
        Ok(listener)
    }

    /// Loop de accept. Solo retorna si falla el bind.
    pub fn run(&mut self) -> Result<(), ServerError> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => self.open_listener()?,
        };

        tracing::info!("modo concurrente: un thread por conexión");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => tracing::error!(error = %e, "error al aceptar conexión"),
            }
        }

        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream) {
        let id = ConnectionId::new();
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        tracing::info!(connection_id = %id, %peer, "nueva conexión");

        let router = Arc::clone(&self.router);
        let limits = self.limits;

        let spawned = thread::Builder::new()
            .name(id.to_string())
            .spawn(move || {
                let span = tracing::info_span!("connection", id = %id, peer = %peer);
                let _entered = span.enter();

                if let Err(e) = handle_stream(stream, router, limits) {
                    tracing::warn!(error = %e, "conexión terminada por error de transporte");
                }
            });

        if let Err(e) = spawned {
            tracing::error!(connection_id = %id, error = %e, "no se pudo crear el thread");
        }
    }
}
