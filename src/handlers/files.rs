//! # Almacenamiento de Archivos
//! src/handlers/files.rs
//!
//! Handlers para `GET /files/{name}` y `POST /files/{name}`.
//!
//! El nombre se toma del target tal cual y se une al directorio raíz.
//! Por defecto NO hay protección contra path traversal (`..` se acepta):
//! solo es seguro cuando el servidor corre en un entorno controlado.
//! Con `confine = true` se rechazan nombres que escapan del directorio.
//!
//! No hay locking: dos POST concurrentes al mismo archivo compiten y gana
//! el último en escribir. Una escritura que falla a mitad puede dejar el
//! archivo truncado.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::http::{Request, Response, StatusCode};
use crate::router::FILES_PREFIX;

/// Directorio raíz compartido por los handlers de archivos
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    confine: bool,
}

impl FileStore {
    /// Crea un store sin confinamiento
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            confine: false,
        }
    }

    /// Activa o desactiva el rechazo de nombres fuera del directorio raíz
    pub fn confined(mut self, confine: bool) -> Self {
        self.confine = confine;
        self
    }

    /// Ruta final del archivo, o `None` si el confinamiento la rechaza
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        if self.confine && !stays_inside(name) {
            return None;
        }
        Some(self.root.join(name))
    }

    /// Lee un archivo. Cualquier error de lectura es 404.
    pub fn get(&self, name: &str) -> Response {
        let Some(path) = self.resolve(name) else {
            tracing::warn!(name, "nombre de archivo rechazado");
            return Response::new(StatusCode::NotFound);
        };

        match fs::read(&path) {
            Ok(data) => Response::new(StatusCode::Ok)
                .with_header("Content-Type", "application/octet-stream")
                .with_body(data),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no se pudo leer el archivo");
                Response::new(StatusCode::NotFound)
            }
        }
    }

    /// Crea o trunca el archivo y escribe el body completo
    pub fn post(&self, name: &str, body: &[u8]) -> Response {
        let Some(path) = self.resolve(name) else {
            tracing::warn!(name, "nombre de archivo rechazado");
            return Response::new(StatusCode::BadRequest);
        };

        // Crear el directorio raíz si no existe
        if let Err(e) = fs::create_dir_all(&self.root) {
            tracing::error!(root = %self.root.display(), error = %e, "no se pudo crear el directorio");
            return Response::new(StatusCode::InternalServerError);
        }

        let mut file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "no se pudo crear el archivo");
                return Response::new(StatusCode::InternalServerError);
            }
        };

        if let Err(e) = file.write_all(body) {
            tracing::error!(path = %path.display(), error = %e, "escritura incompleta");
            return Response::new(StatusCode::InternalServerError);
        }

        tracing::info!(path = %path.display(), bytes = body.len(), "archivo guardado");
        Response::new(StatusCode::Created)
    }
}

/// `true` si el nombre es relativo y no contiene componentes `..`
fn stays_inside(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

fn file_name(req: &Request) -> &str {
    req.target().strip_prefix(FILES_PREFIX).unwrap_or_default()
}

/// Handler para `GET /files/{name}`
pub fn file_get_handler(store: &FileStore, req: &Request) -> Response {
    store.get(file_name(req))
}

/// Handler para `POST /files/{name}`
///
/// Al nombre se le recortan los espacios en blanco de los extremos.
pub fn file_post_handler(store: &FileStore, req: &Request) -> Response {
    store.post(file_name(req).trim(), req.body())
}
