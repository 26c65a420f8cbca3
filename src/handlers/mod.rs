//! # Handlers
//! src/handlers/mod.rs
//!
//! Implementación de las rutas del servidor:
//! - `basic`: raíz, echo, user-agent, 404 y 405
//! - `files`: lectura y escritura bajo el directorio de archivos

pub mod basic;
pub mod files;

// Re-exportar todos los handlers para facilitar el registro en el router
pub use basic::*;
pub use files::{file_get_handler, file_post_handler, FileStore};
