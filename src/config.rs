use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use crate::yescoin::{
    Pacer, SweepPolicy, WorkflowOptions, YesCoinError, YesCoinResult, YESCOIN_API_URL,
};

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub accounts_path: PathBuf,
    pub tokens_path: PathBuf,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub cycle_interval: Duration,
    pub workflow: WorkflowOptions,
}

impl Config {
    pub fn from_env() -> YesCoinResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> YesCoinResult<Self> {
        let defaults = WorkflowOptions::default();

        let workflow = WorkflowOptions {
            squad_link: lookup("SQUAD_LINK").unwrap_or(defaults.squad_link),
            max_level: parsed(&lookup, "MAX_LEVEL", defaults.max_level)?,
            tasks_enabled: flag(&lookup, "TASKS_ENABLED", defaults.tasks_enabled)?,
            upgrade_multi_enabled: flag(
                &lookup,
                "UPGRADE_MULTI_ENABLED",
                defaults.upgrade_multi_enabled,
            )?,
            upgrade_fill_enabled: flag(
                &lookup,
                "UPGRADE_FILL_ENABLED",
                defaults.upgrade_fill_enabled,
            )?,
            swipe_bot_enabled: flag(&lookup, "SWIPE_BOT_ENABLED", defaults.swipe_bot_enabled)?,
            chest_sweep: sweep(&lookup, "CHEST_SWEEP", defaults.chest_sweep)?,
            free_chest_sweep: sweep(&lookup, "FREE_CHEST_SWEEP", defaults.free_chest_sweep)?,
        };

        Ok(Self {
            api_url: lookup("YESCOIN_API_URL").unwrap_or_else(|| YESCOIN_API_URL.to_string()),
            accounts_path: lookup("ACCOUNTS_PATH")
                .unwrap_or_else(|| "token.txt".to_string())
                .into(),
            tokens_path: lookup("TOKENS_PATH")
                .unwrap_or_else(|| "token.json".to_string())
                .into(),
            min_delay: Duration::from_millis(parsed(&lookup, "DELAY_MIN_MS", 300)?),
            max_delay: Duration::from_millis(parsed(&lookup, "DELAY_MAX_MS", 600)?),
            cycle_interval: Duration::from_secs(parsed(&lookup, "CYCLE_INTERVAL_SECS", 120)?),
            workflow,
        })
    }

    pub fn pacer(&self) -> Pacer {
        Pacer::new(self.min_delay, self.max_delay)
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> YesCoinResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|error| YesCoinError::Config(format!("{}={:?}: {}", key, value, error))),
        None => Ok(default),
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> YesCoinResult<bool> {
    match lookup(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(YesCoinError::Config(format!(
                "{}={:?} is not a boolean",
                key, value
            ))),
        },
        None => Ok(default),
    }
}

fn sweep(
    lookup: &impl Fn(&str) -> Option<String>,
    prefix: &str,
    default: SweepPolicy,
) -> YesCoinResult<SweepPolicy> {
    let interval_ms = parsed(
        lookup,
        &format!("{}_INTERVAL_MS", prefix),
        default.interval.as_millis() as u64,
    )?;

    Ok(SweepPolicy {
        iterations: parsed(lookup, &format!("{}_ITERATIONS", prefix), default.iterations)?,
        interval: Duration::from_millis(interval_ms),
    })
}
