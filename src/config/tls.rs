//! Trust settings for the REST transport.

use std::path::PathBuf;

use crate::{Error, Result};

/// Which certificates the REST transport trusts.
///
/// The default trusts the platform roots only. Extra roots are for
/// TLS-intercepting corporate proxies sitting in front of
/// `api.outreach.io`; a bundle may hold several PEM certificates.
///
/// ```rust
/// use outreach_sdk::TlsConfig;
///
/// let config = TlsConfig::builder()
///     .ca_bundle_path("/etc/ssl/corp-proxy.pem")
///     .build();
/// assert!(!config.uses_platform_roots_only());
/// ```
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct TlsConfig {
    /// PEM bundle read from disk when the transport is built.
    #[builder(into)]
    pub ca_bundle_path: Option<PathBuf>,

    /// PEM bundle held in memory.
    #[builder(into)]
    pub ca_bundle_pem: Option<String>,

    /// Accept any server certificate. Only for a local stand-in server.
    #[builder(default)]
    pub accept_invalid_certs: bool,
}

impl TlsConfig {
    /// Accepts any server certificate.
    pub fn insecure() -> Self {
        Self::builder().accept_invalid_certs(true).build()
    }

    /// Returns `true` if no extra roots are configured.
    pub fn uses_platform_roots_only(&self) -> bool {
        self.ca_bundle_path.is_none() && self.ca_bundle_pem.is_none()
    }

    /// Collects the extra root bundles, reading `ca_bundle_path` from disk.
    ///
    /// An unreadable file is a [`Configuration`](crate::ErrorKind::Configuration)
    /// error.
    pub fn extra_root_bundles(&self) -> Result<Vec<Vec<u8>>> {
        let mut bundles = Vec::with_capacity(2);
        if let Some(path) = &self.ca_bundle_path {
            let pem = std::fs::read(path).map_err(|e| {
                Error::configuration(format!("cannot read CA bundle {}: {e}", path.display()))
                    .with_source(e)
            })?;
            bundles.push(pem);
        }
        if let Some(pem) = &self.ca_bundle_pem {
            bundles.push(pem.as_bytes().to_vec());
        }
        Ok(bundles)
    }
}
