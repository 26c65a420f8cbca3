//! # Módulo HTTP
//!
//! Implementa el protocolo HTTP/1.1 a mano, sin frameworks:
//!
//! - Parsing de requests desde un stream de bytes
//! - Construcción de responses con `Content-Length` exacto
//! - Códigos de estado
//! - Negociación de `Content-Encoding` (gzip)
//!
//! ### Formato de Request
//!
//! ```text
//! GET /echo/abc HTTP/1.1\r\n
//! Accept-Encoding: gzip\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Encoding: gzip\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 23\r\n
//! \r\n
//! <bytes gzip>
//! ```

pub mod encoding; // Negociación y compresión gzip
pub mod request; // Parsing de HTTP requests
pub mod response; // Construcción de HTTP responses
pub mod status; // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use encoding::{ContentEncoding, EncodingError};
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
