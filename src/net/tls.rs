//! TLS certificate loading for `https` listeners.

use axum_server::tls_rustls::RustlsConfig;

use crate::config::schema::TlsConfig;

/// Load the rustls configuration named by `tls`, relative paths already
/// resolved by the caller.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, std::io::Error> {
    for (what, path) in [("Certificate", &tls.cert_path), ("Private key", &tls.key_path)] {
        if !path.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} file not found: {}", what, path.display()),
            ));
        }
    }
    RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await
}
