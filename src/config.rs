//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor HTTP/1.1 con soporte para argumentos CLI y
//! variables de entorno. Los valores por defecto reproducen el
//! comportamiento base: sin límite de body, sin timeouts y sin
//! confinamiento del directorio de archivos.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./http11_server --port 4221 --directory /tmp/files \
//!   --max-body-bytes 1048576 \
//!   --read-timeout-ms 30000 \
//!   --confine-files
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=4221 FILES_DIR=/tmp/files ./http11_server
//! ```

use std::time::Duration;

use clap::Parser;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "http11_server")]
#[command(about = "Servidor HTTP/1.1 minimalista con conexiones persistentes")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha (todas las interfaces por defecto)
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio donde se guardan/leen los archivos de /files/
    #[arg(short, long, default_value = "./files", env = "FILES_DIR")]
    pub directory: String,

    // === Hardening (desactivado por defecto) ===
    /// Tamaño máximo del body en bytes (0 = sin límite)
    #[arg(long = "max-body-bytes", default_value = "0", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Timeout de lectura por conexión en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "0", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Timeout de escritura por conexión en milisegundos (0 = sin timeout)
    #[arg(long = "write-timeout-ms", default_value = "0", env = "WRITE_TIMEOUT_MS")]
    pub write_timeout_ms: u64,

    /// Rechaza nombres de archivo que escapan del directorio (`..`, rutas absolutas)
    #[arg(long = "confine-files", env = "CONFINE_FILES")]
    pub confine_files: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI y entorno
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use http11_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Límite de body, `None` si está desactivado
    pub fn body_limit(&self) -> Option<usize> {
        (self.max_body_bytes > 0).then_some(self.max_body_bytes)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.directory.trim().is_empty() {
            return Err("Files directory must not be empty".to_string());
        }
        Ok(())
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 4221,
            host: "0.0.0.0".to_string(),
            directory: "./files".to_string(),
            max_body_bytes: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            confine_files: false,
        }
    }
}
