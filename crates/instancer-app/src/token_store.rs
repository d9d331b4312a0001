//! Durable session token storage
//!
//! The session token is the only client state that survives a restart. It
//! lives in a single file, written under an exclusive lock so two clients
//! started side by side cannot interleave their writes.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use instancer_core::prelude::*;

const APP_DIR: &str = "instancer";
const TOKEN_FILENAME: &str = "auth_token";

/// File-backed store for the session token
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_local_dir>/instancer/auth_token`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join(TOKEN_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token; a missing or blank file means no session
    pub fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::token_store(&self.path, e.to_string())),
        }
    }

    /// Replace the stored token
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::token_store(&self.path, format!("create dir: {}", e)))?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .map_err(|e| Error::token_store(&self.path, format!("open: {}", e)))?;

        // Truncate only once the lock is held
        file.lock_exclusive()
            .map_err(|e| Error::token_store(&self.path, format!("lock: {}", e)))?;
        file.set_len(0)
            .map_err(|e| Error::token_store(&self.path, format!("truncate: {}", e)))?;
        file.write_all(token.as_bytes())
            .map_err(|e| Error::token_store(&self.path, format!("write: {}", e)))?;
        file.flush()
            .map_err(|e| Error::token_store(&self.path, format!("flush: {}", e)))?;

        debug!("Session token saved to {:?}", self.path);
        Ok(())
    }

    /// Forget the stored token
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Session token removed from {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::token_store(&self.path, e.to_string())),
        }
    }
}
