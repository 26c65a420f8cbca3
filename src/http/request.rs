//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser HTTP/1.1 escrito a mano que consume bytes directamente del socket.
//! No existe un prefijo de longitud: los límites del mensaje se deducen
//! solamente de las convenciones de texto y del header `Content-Length`.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/notes.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD TARGET VERSION` separados por un espacio
//! 2. **Headers**: Pares `Name: Value` hasta la primera línea vacía
//! 3. **Body**: Exactamente `Content-Length` bytes (vacío si no hay header)
//!
//! Al terminar, el reader queda posicionado en el primer byte del siguiente
//! mensaje, lo que permite conexiones persistentes.

use std::collections::HashMap;
use std::io::{self, BufRead, Read};

use thiserror::Error;

/// Método HTTP de la request line
///
/// Solo GET y POST tienen rutas; cualquier otro token se conserva tal cual
/// para poder responder 405.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// Cualquier otro método (DELETE, PUT, ...)
    Other(String),
}

impl Method {
    /// Interpreta el token del método. Nunca falla.
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Target crudo, sin URL-decode (ej: "/echo/abc")
    target: String,

    /// Versión declarada en la request line (no se valida)
    version: String,

    /// Headers con el nombre tal como llegó; el último duplicado gana
    headers: HashMap<String, String>,

    /// Body de exactamente `Content-Length` bytes
    body: Vec<u8>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Error)]
pub enum ParseError {
    /// El peer cerró la conexión antes de enviar un nuevo request.
    /// No es una falla: indica que la conexión terminó limpiamente.
    #[error("peer closed the connection")]
    PeerClosed,

    /// La request line no tiene exactamente tres campos
    #[error("malformed start line: {0:?}")]
    MalformedStartLine(String),

    /// Falló la lectura de los headers (incluye EOF antes de la línea vacía)
    #[error("error reading headers: {0}")]
    HeaderRead(#[source] io::Error),

    /// `Content-Length` no es un entero decimal no negativo
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// El body declarado supera el límite configurado
    #[error("body of {length} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { length: usize, limit: usize },

    /// El stream terminó o falló antes de completar el body
    #[error("error reading body: {0}")]
    BodyRead(#[source] io::Error),

    /// Falla de transporte esperando la request line (timeout, reset, ...)
    #[error("transport error: {0}")]
    Transport(#[source] io::Error),
}

impl ParseError {
    /// Indica si la conexión puede seguir usándose después de este error.
    ///
    /// Solo los errores de request line y headers dejan el stream en un
    /// punto conocido; el resto pierde el framing del mensaje.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ParseError::MalformedStartLine(_) | ParseError::HeaderRead(_)
        )
    }
}

impl Request {
    /// Lee un request completo desde un stream con buffer
    ///
    /// # Argumentos
    ///
    /// * `reader` - Stream posicionado al inicio de un request
    /// * `max_body` - Límite opcional para `Content-Length`
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - El reader queda justo después del body
    /// * `Err(ParseError)` - Ver [`ParseError::is_recoverable`]
    pub fn read_from<R: BufRead>(reader: &mut R, max_body: Option<usize>) -> Result<Self, ParseError> {
        // 1. Request line
        let (method, target, version) = Self::read_start_line(reader)?;

        // 2. Headers hasta la línea vacía
        let headers = Self::read_headers(reader)?;

        // 3. Body según Content-Length
        let body = Self::read_body(reader, &headers, max_body)?;

        Ok(Request {
            method,
            target,
            version,
            headers,
            body,
        })
    }

    /// Parsea un request desde un buffer en memoria
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use http11_server::http::Request;
    ///
    /// let raw = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.target(), "/echo/abc");
    /// assert_eq!(request.header("user-agent"), Some("curl/8.0"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let mut cursor = buffer;
        Self::read_from(&mut cursor, None)
    }

    /// Formato: `GET /path HTTP/1.1`, separado por espacios simples.
    ///
    /// Una línea vacía no tiene tres campos y cuenta como malformada.
    fn read_start_line<R: BufRead>(reader: &mut R) -> Result<(Method, String, String), ParseError> {
        let mut raw = Vec::new();
        let bytes_read = reader
            .read_until(b'\n', &mut raw)
            .map_err(ParseError::Transport)?;

        if bytes_read == 0 {
            return Err(ParseError::PeerClosed);
        }

        let line = String::from_utf8_lossy(&raw);
        let line = line.trim_end_matches(['\r', '\n']);

        let parts: Vec<&str> = line.split(' ').collect();
        if parts.len() != 3 {
            return Err(ParseError::MalformedStartLine(line.to_string()));
        }

        Ok((
            Method::from_token(parts[0]),
            parts[1].to_string(),
            parts[2].to_string(),
        ))
    }

    /// Lee headers hasta encontrar una línea vacía.
    ///
    /// Las líneas sin `:` se ignoran en silencio.
    fn read_headers<R: BufRead>(reader: &mut R) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let bytes_read = reader
                .read_until(b'\n', &mut raw)
                .map_err(ParseError::HeaderRead)?;

            if bytes_read == 0 {
                return Err(ParseError::HeaderRead(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended before the end of the headers",
                )));
            }

            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();

            if line.is_empty() {
                break;
            }

            if let Some((name, value)) = line.split_once(':') {
                let name = name.trim();
                if !name.is_empty() {
                    insert_header(&mut headers, name, value.trim());
                }
            }
        }

        Ok(headers)
    }

    /// Lee exactamente `Content-Length` bytes, aunque lleguen fragmentados
    fn read_body<R: BufRead>(
        reader: &mut R,
        headers: &HashMap<String, String>,
        max_body: Option<usize>,
    ) -> Result<Vec<u8>, ParseError> {
        let Some(raw_length) = find_header(headers, "Content-Length") else {
            return Ok(Vec::new());
        };

        let length: usize = raw_length
            .parse()
            .map_err(|_| ParseError::InvalidContentLength(raw_length.to_string()))?;

        if let Some(limit) = max_body {
            if length > limit {
                return Err(ParseError::BodyTooLarge { length, limit });
            }
        }

        // `take` evita reservar de golpe un Content-Length enorme
        let mut body = Vec::new();
        reader
            .by_ref()
            .take(length as u64)
            .read_to_end(&mut body)
            .map_err(ParseError::BodyRead)?;

        if body.len() != length {
            return Err(ParseError::BodyRead(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} body bytes, got {}", length, body.len()),
            )));
        }

        Ok(body)
    }

    /// Obtiene el método HTTP
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el target crudo
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Obtiene la versión HTTP declarada
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene un header sin distinguir mayúsculas en el nombre
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene el body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// `true` si el cliente pidió `Connection: close`
    pub fn wants_close(&self) -> bool {
        self.header("Connection")
            .is_some_and(|value| value.eq_ignore_ascii_case("close"))
    }
}

/// Inserta un header reemplazando cualquier variante con distinta capitalización
fn insert_header(headers: &mut HashMap<String, String>, name: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    /// Reader que entrega un byte por llamada, como un peer que fragmenta
    struct Trickle<'a> {
        data: &'a [u8],
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[0];
            self.data = &self.data[1..];
            Ok(1)
        }
    }

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET /echo/abc HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.target(), "/echo/abc");
        assert_eq!(request.version(), "HTTP/1.1");
        assert_eq!(request.header("Host"), Some("localhost"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_other_method_is_preserved() {
        let request = Request::parse(b"DELETE / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method(), &Method::Other("DELETE".to_string()));
        assert_eq!(request.method().as_str(), "DELETE");
    }

    #[test]
    fn test_bare_lf_line_endings() {
        let request = Request::parse(b"GET / HTTP/1.1\nUser-Agent: x\n\n").unwrap();
        assert_eq!(request.target(), "/");
        assert_eq!(request.header("User-Agent"), Some("x"));
    }

    #[test]
    fn test_header_values_are_trimmed() {
        let raw = b"GET / HTTP/1.1\r\nUser-Agent:    curl/8.0   \r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.header("User-Agent"), Some("curl/8.0"));
    }

    #[test]
    fn test_header_value_keeps_extra_colons() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost:4221\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.header("host"), Some("localhost:4221"));
    }

    #[test]
    fn test_header_without_colon_is_skipped() {
        let raw = b"GET / HTTP/1.1\r\nthis is not a header\r\nAccept: */*\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("Accept"), Some("*/*"));
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let raw = b"GET / HTTP/1.1\r\nX-Tag: one\r\nx-tag: two\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("X-Tag"), Some("two"));
        assert!(request.headers().contains_key("x-tag"));
    }

    #[test]
    fn test_body_uses_content_length() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.body(), b"hello");
    }

    #[test]
    fn test_body_ignored_without_content_length() {
        let raw = b"POST /files/a HTTP/1.1\r\n\r\nGET / HTTP/1.1\r\n\r\n";
        let mut cursor = &raw[..];

        let first = Request::read_from(&mut cursor, None).unwrap();
        assert!(first.body().is_empty());

        // El resto del stream se interpreta como el siguiente request
        let second = Request::read_from(&mut cursor, None).unwrap();
        assert_eq!(second.method(), &Method::GET);
        assert_eq!(second.target(), "/");
    }

    #[test]
    fn test_reader_positioned_after_body() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcGET /user-agent HTTP/1.1\r\n\r\n";
        let mut cursor = &raw[..];

        let first = Request::read_from(&mut cursor, None).unwrap();
        assert_eq!(first.body(), b"abc");

        let second = Request::read_from(&mut cursor, None).unwrap();
        assert_eq!(second.target(), "/user-agent");

        assert!(matches!(
            Request::read_from(&mut cursor, None),
            Err(ParseError::PeerClosed)
        ));
    }

    #[test]
    fn test_fragmented_body() {
        let payload = vec![b'z'; 3000];
        let mut raw = format!("POST /files/big HTTP/1.1\r\nContent-Length: {}\r\n\r\n", payload.len()).into_bytes();
        raw.extend_from_slice(&payload);

        let mut reader = BufReader::with_capacity(7, Trickle { data: &raw });
        let request = Request::read_from(&mut reader, None).unwrap();

        assert_eq!(request.body().len(), 3000);
        assert_eq!(request.body(), &payload[..]);
    }

    #[test]
    fn test_empty_stream_is_peer_closed() {
        let result = Request::parse(b"");
        assert!(matches!(result, Err(ParseError::PeerClosed)));
    }

    #[test]
    fn test_malformed_start_line() {
        let two_fields = Request::parse(b"GET /\r\n\r\n");
        assert!(matches!(two_fields, Err(ParseError::MalformedStartLine(_))));

        let four_fields = Request::parse(b"GET / HTTP/1.1 extra\r\n\r\n");
        assert!(matches!(four_fields, Err(ParseError::MalformedStartLine(_))));

        let double_space = Request::parse(b"GET  / HTTP/1.1\r\n\r\n");
        assert!(matches!(double_space, Err(ParseError::MalformedStartLine(_))));
    }

    #[test]
    fn test_blank_line_is_malformed_start_line() {
        let mut cursor: &[u8] = b"\r\nGET / HTTP/1.1\r\n\r\n";

        let error = Request::read_from(&mut cursor, None).unwrap_err();
        assert!(matches!(error, ParseError::MalformedStartLine(ref line) if line.is_empty()));
        assert!(error.is_recoverable());

        // El request siguiente queda intacto en el stream
        let request = Request::read_from(&mut cursor, None).unwrap();
        assert_eq!(request.target(), "/");
    }

    #[test]
    fn test_eof_inside_headers() {
        let result = Request::parse(b"GET / HTTP/1.1\r\nHost: x\r\n");
        let err = result.unwrap_err();
        assert!(matches!(err, ParseError::HeaderRead(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invalid_content_length() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: abc\r\n\r\n";
        let err = Request::parse(raw).unwrap_err();
        assert!(matches!(err, ParseError::InvalidContentLength(ref v) if v == "abc"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_negative_content_length() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: -5\r\n\r\n";
        assert!(matches!(
            Request::parse(raw),
            Err(ParseError::InvalidContentLength(_))
        ));
    }

    #[test]
    fn test_truncated_body() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 10\r\n\r\nshort";
        assert!(matches!(Request::parse(raw), Err(ParseError::BodyRead(_))));
    }

    #[test]
    fn test_body_limit() {
        let raw = b"POST /files/a HTTP/1.1\r\nContent-Length: 10\r\n\r\n0123456789";
        let mut cursor = &raw[..];
        let result = Request::read_from(&mut cursor, Some(4));
        assert!(matches!(
            result,
            Err(ParseError::BodyTooLarge { length: 10, limit: 4 })
        ));

        let mut cursor = &raw[..];
        let request = Request::read_from(&mut cursor, Some(10)).unwrap();
        assert_eq!(request.body().len(), 10);
    }

    #[test]
    fn test_wants_close() {
        let close = Request::parse(b"GET / HTTP/1.1\r\nConnection: Close\r\n\r\n").unwrap();
        assert!(close.wants_close());

        let keep = Request::parse(b"GET / HTTP/1.1\r\nConnection: keep-alive\r\n\r\n").unwrap();
        assert!(!keep.wants_close());

        let none = Request::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert!(!none.wants_close());
    }
}
