use std::fmt;

mod accounts;
pub use accounts::{load_accounts, Account};

mod api;
pub use api::{ApiOutcome, GameApi};

mod client;
pub use client::{YesCoinClient, YESCOIN_API_URL};

mod cycle;
pub use cycle::{CycleReport, CycleRunner, RunTotals};

pub mod display;

mod pacing;
pub use pacing::{Pacer, SweepPolicy};

mod session;
pub use session::SessionStore;

pub mod types;

mod workflow;
pub use workflow::{AccountReport, AccountWorkflow, WorkflowOptions};

#[cfg(test)]
mod fake;

#[derive(Debug)]
pub enum YesCoinError {
    HttpError(reqwest::Error),
    IoError(std::io::Error),
    SerdeError(serde_json::Error),
    LoginRejected { code: i64, message: String },
    MissingData(&'static str),
    Config(String),
}

pub type YesCoinResult<T> = Result<T, YesCoinError>;

impl fmt::Display for YesCoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YesCoinError::HttpError(error) => write!(f, "http error: {}", error),
            YesCoinError::IoError(error) => write!(f, "io error: {}", error),
            YesCoinError::SerdeError(error) => write!(f, "json error: {}", error),
            YesCoinError::LoginRejected { code, message } => {
                write!(f, "login rejected with code {}: {}", code, message)
            }
            YesCoinError::MissingData(what) => write!(f, "response is missing {}", what),
            YesCoinError::Config(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for YesCoinError {}
