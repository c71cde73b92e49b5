//! HTTP server configuration object and helpers.

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use url::Url;

use super::ServerSettings;

const SESSION_KEY_MIN_LEN: usize = 32;

/// Where thread commands send their store calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// Process-local store; contents vanish on restart.
    InMemory,
    /// Remote agent store reached over HTTP.
    Remote { base: Url, timeout: Duration },
}

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: StoreTarget,
}

impl ServerConfig {
    /// Construct a server configuration with an in-memory store.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            store: StoreTarget::InMemory,
        }
    }

    /// Route store calls to `store`.
    #[must_use]
    pub fn with_store(mut self, store: StoreTarget) -> Self {
        self.store = store;
        self
    }

    /// Resolve loaded settings into a server configuration.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::InvalidInput`] for an unparsable bind address
    /// or store URL, and propagates session key failures from
    /// [`load_session_key`].
    pub fn from_settings(settings: &ServerSettings) -> io::Result<Self> {
        let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|error| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid bind address {}: {error}", settings.bind_addr()),
            )
        })?;
        let allow_ephemeral = cfg!(debug_assertions) || settings.session_allow_ephemeral;
        let key = load_session_key(&settings.session_key_file(), allow_ephemeral)?;

        let store = match settings.store_url() {
            Some(raw) => {
                let base = Url::parse(raw).map_err(|error| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("invalid store URL {raw}: {error}"),
                    )
                })?;
                StoreTarget::Remote {
                    base,
                    timeout: settings.store_timeout(),
                }
            }
            None => StoreTarget::InMemory,
        };

        Ok(Self::new(
            key,
            !settings.allow_insecure_cookie,
            SameSite::Lax,
            bind_addr,
        )
        .with_store(store))
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// Read and derive the session key at `path`.
///
/// When the file cannot be read and `allow_ephemeral` is set, a random key is
/// generated; sessions then do not survive a restart.
///
/// # Errors
///
/// Fails when the file is unreadable and ephemeral keys are not allowed, or
/// when it holds fewer than 32 bytes.
pub fn load_session_key(path: &Path, allow_ephemeral: bool) -> io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() < SESSION_KEY_MIN_LEN => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "session key at {} is {} bytes; need at least {SESSION_KEY_MIN_LEN}",
                path.display(),
                bytes.len()
            ),
        )),
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) if allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(error) => Err(io::Error::new(
            error.kind(),
            format!("failed to read session key at {}: {error}", path.display()),
        )),
    }
}
