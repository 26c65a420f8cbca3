//! # Handlers Básicos
//! src/handlers/basic.rs
//!
//! Handlers sin estado: raíz, echo, user-agent y las respuestas de error
//! de enrutamiento (404 y 405).

use crate::http::{ContentEncoding, Request, Response, StatusCode};
use crate::router::ECHO_PREFIX;

/// Handler para `GET /`: 200 con body vacío
pub fn root_handler(_req: &Request) -> Response {
    Response::new(StatusCode::Ok)
}

/// Handler para `GET /echo/{msg}`
///
/// Devuelve el resto del target después de `/echo/` tal cual (sin
/// URL-decode), comprimido con gzip si el cliente lo acepta.
///
/// # Ejemplo de response
/// ```text
/// HTTP/1.1 200 OK
/// Content-Type: text/plain
/// Content-Length: 3
///
/// abc
/// ```
pub fn echo_handler(req: &Request) -> Response {
    let message = req
        .target()
        .strip_prefix(ECHO_PREFIX)
        .unwrap_or_default()
        .trim();

    let encoding = ContentEncoding::negotiate(req.header("Accept-Encoding"));

    let body = match encoding.encode(message.as_bytes()) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "no se pudo codificar el echo");
            return Response::new(StatusCode::InternalServerError);
        }
    };

    let mut response = Response::new(StatusCode::Ok);
    if let Some(value) = encoding.header_value() {
        response.add_header("Content-Encoding", value);
    }

    response
        .with_header("Content-Type", "text/plain")
        .with_body(body)
}

/// Handler para `GET /user-agent`
///
/// Sin header `User-Agent` responde 404 (no 400).
pub fn user_agent_handler(req: &Request) -> Response {
    match req.header("User-Agent") {
        Some(user_agent) => Response::text(StatusCode::Ok, user_agent.trim()),
        None => {
            tracing::debug!("request sin header User-Agent");
            Response::new(StatusCode::NotFound)
        }
    }
}

/// Ruta desconocida
pub fn not_found_handler(_req: &Request) -> Response {
    Response::new(StatusCode::NotFound)
}

/// Método distinto de GET/POST
pub fn method_not_allowed_handler(_req: &Request) -> Response {
    Response::new(StatusCode::MethodNotAllowed).with_header("Allow", "GET, POST")
}
