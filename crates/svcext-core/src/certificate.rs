//! Service certificate material

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use camino::Utf8Path;
use sha2::{Digest, Sha256};
use tracing::debug;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";

/// An X.509 certificate carried opaquely to the management API.
///
/// The DER bytes ship unchanged; no parsing or chain validation happens
/// on this side. The locally computed thumbprint is for display and never
/// replaces a user-supplied one.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCertificate {
    der: Vec<u8>,
}

impl ServiceCertificate {
    /// Wrap raw DER bytes
    pub fn from_der(der: Vec<u8>) -> Result<Self> {
        if der.is_empty() {
            return Err(Error::invalid_certificate_reference(
                "certificate data is empty",
            ));
        }
        Ok(Self { der })
    }

    /// Extract the first certificate block from PEM text
    pub fn from_pem(text: &str) -> Result<Self> {
        let start = text.find(PEM_BEGIN).ok_or_else(|| {
            Error::invalid_certificate_reference("missing BEGIN CERTIFICATE marker")
        })?;
        let body = &text[start + PEM_BEGIN.len()..];
        let end = body.find(PEM_END).ok_or_else(|| {
            Error::invalid_certificate_reference("missing END CERTIFICATE marker")
        })?;
        let encoded: String = body[..end].chars().filter(|c| !c.is_whitespace()).collect();
        let der = BASE64.decode(encoded).map_err(|e| {
            Error::invalid_certificate_reference(format!("certificate is not valid base64: {e}"))
        })?;
        Self::from_der(der)
    }

    /// Load from a PEM or DER file; PEM is detected by the BEGIN marker
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        debug!("Loaded certificate file: {} ({} bytes)", path, bytes.len());
        if let Ok(text) = std::str::from_utf8(&bytes) {
            if text.contains(PEM_BEGIN) {
                return Self::from_pem(text);
            }
        }
        Self::from_der(bytes)
    }

    /// Raw DER bytes
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Uppercase hex SHA-256 digest of the DER bytes
    pub fn thumbprint(&self) -> String {
        hex::encode_upper(Sha256::digest(&self.der))
    }

    /// Base64 of the DER bytes, the wire form for inline upload
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.der)
    }
}

impl std::fmt::Debug for ServiceCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCertificate")
            .field("thumbprint", &self.thumbprint())
            .field("der_len", &self.der.len())
            .finish()
    }
}
