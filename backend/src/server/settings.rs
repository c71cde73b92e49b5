//! Server settings loaded via OrthoConfig.
//!
//! Values come from `THREAD_GATE_*` environment variables, configuration
//! files, and command-line flags, in OrthoConfig's usual precedence.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;

/// Settings controlling the HTTP listener, sessions, and the thread store.
///
/// The server only reads identity claims from the `session` cookie; it has no
/// sign-in route. Claims are written by a separate sign-in service, which must
/// encrypt its cookies with the same key material as `session_key_file`.
/// Without one, every thread request is answered with 401.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "THREAD_GATE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// File holding the session key material, shared with the sign-in
    /// service that issues session cookies. At least 32 bytes.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a per-process session key when the key file is missing.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Issue session cookies without the `Secure` flag (local HTTP only).
    #[ortho_config(default = false)]
    pub allow_insecure_cookie: bool,
    /// Base URL of the remote agent thread store; in-memory when unset.
    pub store_url: Option<String>,
    /// Timeout for each remote store request, in seconds.
    pub store_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Return the bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Return the session key path, falling back to the default.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Return the remote store URL when one is configured and non-blank.
    pub fn store_url(&self) -> Option<&str> {
        self.store_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the per-request store timeout.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(
            self.store_timeout_secs
                .unwrap_or(DEFAULT_STORE_TIMEOUT_SECS),
        )
    }
}
