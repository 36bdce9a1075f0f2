use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, warn};

use super::{YesCoinError, YesCoinResult};

/// Session tokens keyed by account id, mirrored to a JSON file
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    tokens: BTreeMap<String, String>,
}

impl SessionStore {
    /// Load the store from disk; a missing or unreadable file starts empty
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let tokens = match tokio::fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(tokens) => tokens,
                Err(error) => {
                    warn!(
                        "Ignoring unreadable token store {}: {}",
                        path.display(),
                        error
                    );
                    BTreeMap::new()
                }
            },
            Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => {
                warn!("Cannot read token store {}: {}", path.display(), error);
                BTreeMap::new()
            }
        };

        debug!("Loaded {} cached session tokens", tokens.len());

        Self { path, tokens }
    }

    pub fn get(&self, account_id: &str) -> Option<&str> {
        self.tokens.get(account_id).map(String::as_str)
    }

    /// Cache a token and rewrite the whole file
    pub async fn put(&mut self, account_id: &str, token: String) -> YesCoinResult<()> {
        self.tokens.insert(account_id.to_string(), token);

        let content =
            serde_json::to_string_pretty(&self.tokens).map_err(YesCoinError::SerdeError)?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(YesCoinError::IoError)?;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}
