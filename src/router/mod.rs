//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea `(método, target)` a uno de los handlers fijos del servidor.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router::resolve → HandlerKind → handler → Response
//! ```
//!
//! La tabla de rutas es estática y de solo lectura; se comparte entre
//! todos los threads de conexión sin locks. Los prefijos se comparan como
//! strings literales, sin decodificar ni normalizar el path.

use crate::handlers::{self, FileStore};
use crate::http::{Method, Request, Response};

pub const ROOT_PATH: &str = "/";
pub const ECHO_PREFIX: &str = "/echo/";
pub const USER_AGENT_PATH: &str = "/user-agent";
pub const FILES_PREFIX: &str = "/files/";

/// Comportamiento elegido para un request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    RootOk,
    Echo,
    UserAgent,
    FileGet,
    FilePost,
    NotFound,
    MethodNotAllowed,
}

#[derive(Debug, Clone, Copy)]
enum PathPattern {
    Exact(&'static str),
    Prefix(&'static str),
}

impl PathPattern {
    fn matches(&self, target: &str) -> bool {
        match self {
            PathPattern::Exact(path) => target == *path,
            PathPattern::Prefix(prefix) => target.starts_with(prefix),
        }
    }
}

#[derive(Debug)]
struct Route {
    method: Method,
    pattern: PathPattern,
    kind: HandlerKind,
}

/// Tabla de rutas en orden de evaluación; gana la primera coincidencia
static ROUTES: [Route; 5] = [
    Route { method: Method::GET, pattern: PathPattern::Exact(ROOT_PATH), kind: HandlerKind::RootOk },
    Route { method: Method::GET, pattern: PathPattern::Prefix(ECHO_PREFIX), kind: HandlerKind::Echo },
    Route { method: Method::GET, pattern: PathPattern::Exact(USER_AGENT_PATH), kind: HandlerKind::UserAgent },
    Route { method: Method::GET, pattern: PathPattern::Prefix(FILES_PREFIX), kind: HandlerKind::FileGet },
    Route { method: Method::POST, pattern: PathPattern::Prefix(FILES_PREFIX), kind: HandlerKind::FilePost },
];

/// Función pura de enrutamiento
///
/// # Ejemplo
/// ```
/// use http11_server::http::Method;
/// use http11_server::router::{resolve, HandlerKind};
///
/// assert_eq!(resolve(&Method::GET, "/echo/hi"), HandlerKind::Echo);
/// assert_eq!(resolve(&Method::POST, "/"), HandlerKind::NotFound);
/// ```
pub fn resolve(method: &Method, target: &str) -> HandlerKind {
    if let Method::Other(_) = method {
        return HandlerKind::MethodNotAllowed;
    }

    ROUTES
        .iter()
        .find(|route| route.method == *method && route.pattern.matches(target))
        .map(|route| route.kind)
        .unwrap_or(HandlerKind::NotFound)
}

/// Router con la tabla estática y el store de archivos
#[derive(Debug, Clone)]
pub struct Router {
    files: FileStore,
}

impl Router {
    pub fn new(files: FileStore) -> Self {
        Self { files }
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request) -> Response {
        let kind = resolve(request.method(), request.target());
        tracing::debug!(?kind, "ruta resuelta");

        match kind {
            HandlerKind::RootOk => handlers::root_handler(request),
            HandlerKind::Echo => handlers::echo_handler(request),
            HandlerKind::UserAgent => handlers::user_agent_handler(request),
            HandlerKind::FileGet => handlers::file_get_handler(&self.files, request),
            HandlerKind::FilePost => handlers::file_post_handler(&self.files, request),
            HandlerKind::NotFound => handlers::not_found_handler(request),
            HandlerKind::MethodNotAllowed => handlers::method_not_allowed_handler(request),
        }
    }
}
