use std::path::Path;

use super::{YesCoinError, YesCoinResult};

/// A login payload and its 1-based position in the accounts file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub index: usize,
    pub payload: String,
}

impl Account {
    /// Identifier used as the session store key
    pub fn id(&self) -> String {
        self.index.to_string()
    }
}

pub fn parse_accounts(content: &str) -> Vec<Account> {
    content
        .replace('\r', "")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(position, payload)| Account {
            index: position + 1,
            payload: payload.to_string(),
        })
        .collect()
}

/// Read the newline-delimited accounts file
pub async fn load_accounts(path: impl AsRef<Path>) -> YesCoinResult<Vec<Account>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(YesCoinError::IoError)?;

    Ok(parse_accounts(&content))
}
