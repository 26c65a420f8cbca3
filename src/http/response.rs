//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas HTTP/1.1 y escribirlas en el socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```
//!
//! Toda respuesta lleva exactamente un `Content-Length` igual al largo del
//! body, incluso cuando el body está vacío. El valor se calcula al serializar,
//! por lo que no puede quedar desincronizado.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use http11_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body(b"abc".to_vec());
//!
//! let text = String::from_utf8(response.to_bytes()).unwrap();
//! assert!(text.contains("Content-Length: 3\r\n"));
//! ```

use super::StatusCode;
use std::io::{self, Write};

const CONTENT_LENGTH: &str = "Content-Length";

/// Representa una respuesta HTTP/1.1 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP
    status: StatusCode,

    /// Headers en orden de inserción, sin `Content-Length`
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers y con body vacío
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe (sin distinguir mayúsculas), se sobrescribe.
    /// `Content-Length` se ignora: siempre se deriva del body.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Response::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        if name.eq_ignore_ascii_case(CONTENT_LENGTH) {
            return;
        }

        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el cuerpo de la respuesta
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Respuesta `text/plain` con el texto dado
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain")
            .with_body(body.as_bytes().to_vec())
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n`
    /// - `Content-Length` calculado del body
    /// - Línea vacía y body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }
        result.extend_from_slice(format!("{}: {}\r\n", CONTENT_LENGTH, self.body.len()).as_bytes());

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Escribe la respuesta completa y hace flush.
    ///
    /// Un error aquí significa que la conexión ya no sirve.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Busca un header sin distinguir mayúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene una referencia a los headers (sin `Content-Length`)
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Valor que se enviará como `Content-Length`
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_with_header_replaces() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_header("content-type", "application/octet-stream");

        assert_eq!(response.headers().len(), 1);
        assert_eq!(response.header("Content-Type"), Some("application/octet-stream"));
    }

    #[test]
    fn test_text_response() {
        let response = Response::text(StatusCode::Ok, "curl/8.0");
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.body(), b"curl/8.0");
        assert_eq!(response.content_length(), 8);
    }

    #[test]
    fn test_to_bytes() {
        let response = Response::text(StatusCode::Ok, "abc");
        let text = String::from_utf8(response.to_bytes()).unwrap();

        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\n\r\nabc"
        );
    }

    #[test]
    fn test_empty_body_has_zero_length() {
        let text = String::from_utf8(Response::new(StatusCode::Created).to_bytes()).unwrap();
        assert_eq!(text, "HTTP/1.1 201 Created\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn test_content_length_cannot_be_overridden() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Length", "999")
            .with_body(vec![1, 2]);

        let text = String::from_utf8_lossy(&response.to_bytes()).into_owned();
        assert_eq!(text.matches("Content-Length").count(), 1);
        assert!(text.contains("Content-Length: 2\r\n"));
    }

    #[test]
    fn test_binary_body() {
        let binary_data = vec![0x00, 0x1f, 0x8b, 0xFF];
        let response = Response::new(StatusCode::Ok).with_body(binary_data.clone());

        let bytes = response.to_bytes();
        assert!(bytes.ends_with(&binary_data));
        assert_eq!(response.content_length(), 4);
    }

    #[test]
    fn test_write_to() {
        let mut sink = Vec::new();
        Response::new(StatusCode::NotFound).write_to(&mut sink).unwrap();
        assert_eq!(sink, b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
    }
}
