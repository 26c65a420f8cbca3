//! # HTTP/1.1 Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 minimalista implementado desde cero sobre TCP:
//! parsing manual de requests, conexiones persistentes, compresión gzip
//! negociada y un conjunto fijo de rutas.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing de requests, construcción de responses, gzip
//! - `router`: Tabla estática de rutas
//! - `handlers`: Raíz, echo, user-agent y archivos
//! - `server`: Listener TCP y loop por conexión
//! - `config`: Argumentos CLI y variables de entorno
//!
//! ```text
//! Acceptor → Connection Loop → Request Parser → Router → handler → socket
//!                  ↑                                                  │
//!                  └──────────────────── keep-alive ──────────────────┘
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use http11_server::config::Config;
//! use http11_server::server::Server;
//!
//! let mut server = Server::new(Config::default());
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod handlers;
pub mod http;
pub mod router;
pub mod server;
