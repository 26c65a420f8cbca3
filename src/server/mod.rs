//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! 1. `tcp`: escucha en un puerto y acepta conexiones (un thread por socket)
//! 2. `connection`: loop request/response con conexiones persistentes

pub mod connection;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::{ConnectionId, ConnectionLimits};
pub use tcp::{Server, ServerError};
