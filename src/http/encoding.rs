//! # Negociación de Content-Encoding
//! src/http/encoding.rs
//!
//! Decide si el body de una respuesta se comprime con gzip según el header
//! `Accept-Encoding` del cliente, y realiza la compresión con `flate2`.
//!
//! La selección es permisiva: basta con que algún token de la lista
//! contenga la subcadena `gzip` (ej: `gzip;q=0.5` también cuenta).

use std::io::{self, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

/// Error al comprimir un payload
#[derive(Debug, Error)]
#[error("gzip encoding failed: {0}")]
pub struct EncodingError(#[from] io::Error);

/// Codificación elegida para el body de la respuesta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    /// Sin transformación, sin header `Content-Encoding`
    Identity,

    /// Body comprimido con gzip
    Gzip,
}

impl ContentEncoding {
    /// Elige la codificación a partir del valor de `Accept-Encoding`
    ///
    /// # Ejemplo
    /// ```
    /// use http11_server::http::encoding::ContentEncoding;
    ///
    /// assert_eq!(ContentEncoding::negotiate(Some("identity, gzip;q=0.5")), ContentEncoding::Gzip);
    /// assert_eq!(ContentEncoding::negotiate(Some("br, deflate")), ContentEncoding::Identity);
    /// assert_eq!(ContentEncoding::negotiate(None), ContentEncoding::Identity);
    /// ```
    pub fn negotiate(accept_encoding: Option<&str>) -> Self {
        let Some(value) = accept_encoding else {
            return ContentEncoding::Identity;
        };

        if value.split(',').any(|token| token.trim().contains("gzip")) {
            ContentEncoding::Gzip
        } else {
            ContentEncoding::Identity
        }
    }

    /// Valor para el header `Content-Encoding`, si corresponde enviarlo
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            ContentEncoding::Identity => None,
            ContentEncoding::Gzip => Some("gzip"),
        }
    }

    /// Aplica la codificación al payload
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, EncodingError> {
        match self {
            ContentEncoding::Identity => Ok(payload.to_vec()),
            ContentEncoding::Gzip => gzip(payload),
        }
    }
}

/// Comprime bytes en un contenedor gzip. Función pura, sin I/O externo.
pub fn gzip(data: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn gunzip(data: &[u8]) -> Vec<u8> {
        let mut decoder = GzDecoder::new(data);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_gzip_round_trip() {
        let payload = b"abc abc abc abc abc";
        let encoded = gzip(payload).unwrap();

        // Magic number de gzip
        assert_eq!(&encoded[..2], &[0x1f_u8, 0x8b]);
        assert_eq!(gunzip(&encoded), payload);
    }

    #[test]
    fn test_gzip_empty_payload() {
        let encoded = gzip(b"").unwrap();
        assert!(!encoded.is_empty());
        assert!(gunzip(&encoded).is_empty());
    }

    #[test]
    fn test_negotiate_substring_match() {
        assert_eq!(ContentEncoding::negotiate(Some("gzip")), ContentEncoding::Gzip);
        assert_eq!(ContentEncoding::negotiate(Some("deflate, x-gzip")), ContentEncoding::Gzip);
        assert_eq!(
            ContentEncoding::negotiate(Some("encoding-1, gzip, encoding-2")),
            ContentEncoding::Gzip
        );
    }

    #[test]
    fn test_negotiate_without_gzip() {
        assert_eq!(ContentEncoding::negotiate(Some("invalid-encoding")), ContentEncoding::Identity);
        assert_eq!(ContentEncoding::negotiate(Some("")), ContentEncoding::Identity);
    }

    #[test]
    fn test_header_value() {
        assert_eq!(ContentEncoding::Gzip.header_value(), Some("gzip"));
        assert_eq!(ContentEncoding::Identity.header_value(), None);
    }

    #[test]
    fn test_identity_encode_is_passthrough() {
        assert_eq!(ContentEncoding::Identity.encode(b"abc").unwrap(), b"abc");
    }
}
