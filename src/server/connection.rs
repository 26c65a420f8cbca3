//! # Loop de Conexión
//! src/server/connection.rs
//!
//! Cada socket aceptado vive en su propio thread y procesa requests de a
//! uno, en orden, hasta que ocurre alguna de estas condiciones:
//!
//! - El peer cierra la conexión (EOF esperando la request line)
//! - El request trae `Connection: close`
//! - Se pierde el framing del mensaje (`Content-Length` inválido, body
//!   truncado o demasiado grande)
//! - Falla una lectura o escritura del socket
//!
//! ```text
//! AwaitingRequest → ParsingHeaders → ReadingBody → Dispatching → Responding
//!        ↑                                                           │
//!        └───────────────────── keep-alive ──────────────────────────┘
//! ```
//!
//! Una request line o headers inválidos producen un 400 pero la conexión
//! sigue abierta.

use std::fmt;
use std::io::{self, BufReader, Read, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::http::{ParseError, Request, Response, StatusCode};
use crate::router::Router;

/// Contador global para IDs de conexión. Solo se necesita unicidad.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identificador único de una conexión, usado en los logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Límites aplicados a cada conexión (todos opcionales)
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionLimits {
    pub max_body: Option<usize>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl ConnectionLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_body: config.body_limit(),
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        }
    }
}

/// Atiende un socket aceptado hasta que termina.
///
/// El socket se cierra al retornar, sin importar el motivo.
pub fn handle_stream(stream: TcpStream, router: Arc<Router>, limits: ConnectionLimits) -> io::Result<()> {
    stream.set_read_timeout(limits.read_timeout)?;
    stream.set_write_timeout(limits.write_timeout)?;

    let writer = stream.try_clone()?;
    serve(stream, writer, &router, limits.max_body)
}

/// Loop request/response sobre cualquier par lector/escritor.
///
/// Retorna `Ok(())` en los cierres ordenados y `Err` cuando falla el
/// transporte. Ningún error sale de esta conexión.
pub fn serve<R: Read, W: Write>(
    reader: R,
    mut writer: W,
    router: &Router,
    max_body: Option<usize>,
) -> io::Result<()> {
    // Un único buffer por conexión: los bytes ya leídos del siguiente
    // request no se pierden entre iteraciones.
    let mut reader = BufReader::new(reader);

    loop {
        let request = match Request::read_from(&mut reader, max_body) {
            Ok(request) => request,
            Err(ParseError::PeerClosed) => {
                tracing::info!("cliente desconectado");
                return Ok(());
            }
            Err(ParseError::Transport(e)) => return Err(e),
            Err(e) if e.is_recoverable() => {
                tracing::warn!(error = %e, "request inválido");
                Response::new(StatusCode::BadRequest).write_to(&mut writer)?;
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "framing perdido, cerrando conexión");
                let status = match e {
                    ParseError::BodyTooLarge { .. } => StatusCode::PayloadTooLarge,
                    _ => StatusCode::BadRequest,
                };
                // Mejor esfuerzo: el peer puede haber cerrado ya
                if let Err(write_err) = Response::new(status)
                    .with_header("Connection", "close")
                    .write_to(&mut writer)
                {
                    tracing::debug!(error = %write_err, "no se pudo enviar el error");
                }
                return Ok(());
            }
        };

        tracing::info!(
            method = %request.method(),
            target = request.target(),
            version = request.version(),
            "request recibido"
        );

        let close = request.wants_close();
        let mut response = router.route(&request);
        if close {
            response.add_header("Connection", "close");
        }

        response.write_to(&mut writer)?;
        tracing::debug!(
            status = response.status().as_u16(),
            body_len = response.content_length(),
            "response enviada"
        );

        if close {
            tracing::info!("Connection: close recibido, cerrando conexión");
            return Ok(());
        }
    }
}
