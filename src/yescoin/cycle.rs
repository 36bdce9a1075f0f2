use std::{collections::HashMap, panic::AssertUnwindSafe, time::Duration};

use futures::FutureExt;
use log::{error, info};

use super::display;
use super::{
    Account, AccountReport, AccountWorkflow, GameApi, Pacer, SessionStore, WorkflowOptions,
    YesCoinResult,
};

/// Tally of one pass over every account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub accounts_processed: usize,
    pub accounts_skipped: usize,
    pub coins_collected: u64,
    /// Sum of the balances seen this cycle, if any account reported one
    pub total_balance: Option<f64>,
    pub level_ups: usize,
}

impl CycleReport {
    fn record(&mut self, account: &AccountReport) {
        self.accounts_processed += 1;
        self.coins_collected += account.coins_collected;
        if let Some(balance) = account.balance {
            self.total_balance = Some(self.total_balance.unwrap_or(0.0) + balance);
        }
    }
}

/// Totals carried from one cycle to the next
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTotals {
    pub cycles: u64,
    pub coins_collected: u64,
    pub last_balance: Option<f64>,
}

impl RunTotals {
    pub fn record(self, report: &CycleReport) -> Self {
        Self {
            cycles: self.cycles + 1,
            coins_collected: self.coins_collected + report.coins_collected,
            last_balance: report.total_balance.or(self.last_balance),
        }
    }
}

/// Drives the account workflow over every account, forever
pub struct CycleRunner<A: GameApi> {
    api: A,
    sessions: SessionStore,
    options: WorkflowOptions,
    pacer: Pacer,
    cycle_interval: Duration,
    /// Last account level seen, by account id
    levels: HashMap<String, u64>,
}

impl<A: GameApi> CycleRunner<A> {
    /// Create new `CycleRunner` instance
    pub fn new(
        api: A,
        sessions: SessionStore,
        options: WorkflowOptions,
        pacer: Pacer,
        cycle_interval: Duration,
    ) -> Self {
        Self {
            api,
            sessions,
            options,
            pacer,
            cycle_interval,
            levels: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[cfg(test)]
    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    #[cfg(test)]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Remember the account's level, returning `(old, new)` when it went up
    fn track_level(&mut self, account_id: &str, level: u64) -> Option<(u64, u64)> {
        match self.levels.insert(account_id.to_string(), level) {
            Some(previous) if previous < level => Some((previous, level)),
            _ => None,
        }
    }

    /// Cached token for the account, logging in and persisting one if needed
    pub async fn session_token(&mut self, account: &Account) -> YesCoinResult<String> {
        let id = account.id();
        if let Some(token) = self.sessions.get(&id) {
            return Ok(token.to_string());
        }

        info!("[{}] No cached session, logging in...", id);
        let token = self.api.login(&account.payload).await?;
        self.sessions.put(&id, token.clone()).await?;
        info!("[{}] Session token saved", id);

        Ok(token)
    }

    async fn process_account(&mut self, account: &Account) -> YesCoinResult<AccountReport> {
        let token = self.session_token(account).await?;
        let id = account.id();

        self.pacer.pause().await;
        let report = AccountWorkflow::new(&self.api, &self.options, &self.pacer, &id, &token)
            .run()
            .await;

        Ok(report)
    }

    /// Process every account once; a failing account never stops the others
    pub async fn run_cycle(&mut self, accounts: &[Account]) -> CycleReport {
        let mut report = CycleReport::default();

        for account in accounts {
            display::account_header(account.index, accounts.len());

            let pass = AssertUnwindSafe(self.process_account(account))
                .catch_unwind()
                .await;

            match pass {
                Ok(Ok(account_report)) => {
                    if let Some(level) = account_report.level {
                        if let Some((old, new)) = self.track_level(&account.id(), level) {
                            info!("[{}] Level up: {} -> {}", account.id(), old, new);
                            display::level_up_panel(old, new);
                            report.level_ups += 1;
                        }
                    }
                    report.record(&account_report);
                }
                Ok(Err(error)) => {
                    error!("[{}] Skipping account this cycle: {}", account.id(), error);
                    report.accounts_skipped += 1;
                }
                Err(_) => {
                    error!(
                        "[{}] Account pass panicked, moving on to the next account",
                        account.id()
                    );
                    report.accounts_skipped += 1;
                }
            }
        }

        report
    }

    pub async fn run_forever(mut self, accounts: Vec<Account>) {
        let mut totals = RunTotals::default();

        loop {
            let report = self.run_cycle(&accounts).await;
            totals = totals.record(&report);
            display::cycle_summary(&report, &totals);

            info!(
                "Waiting for {} seconds before next cycle...",
                self.cycle_interval.as_secs()
            );
            tokio::time::sleep(self.cycle_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::yescoin::accounts::parse_accounts;
    use crate::yescoin::fake::{Call, FakeGameApi};
    use crate::yescoin::SweepPolicy;

    use super::*;

    fn options() -> WorkflowOptions {
        let quick = SweepPolicy {
            iterations: 1,
            interval: Duration::ZERO,
        };

        WorkflowOptions {
            max_level: 0,
            chest_sweep: quick,
            free_chest_sweep: quick,
            ..WorkflowOptions::default()
        }
    }

    async fn runner(dir: &TempDir, api: FakeGameApi) -> CycleRunner<FakeGameApi> {
        let sessions = SessionStore::load(dir.path().join("token.json")).await;
        CycleRunner::new(api, sessions, options(), Pacer::disabled(), Duration::ZERO)
    }

    #[tokio::test]
    async fn cached_token_skips_login() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("token.json"), r#"{"1": "cached"}"#).unwrap();

        let mut runner = runner(&dir, FakeGameApi::default()).await;
        let accounts = parse_accounts("payload-a");

        let token = runner.session_token(&accounts[0]).await.unwrap();
        let report = runner.run_cycle(&accounts).await;

        assert_eq!(token, "cached");
        assert_eq!(report.accounts_processed, 1);
        assert!(!runner
            .api()
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Login(_))));
    }

    #[tokio::test]
    async fn fresh_login_is_persisted_before_the_workflow() {
        let dir = TempDir::new().unwrap();
        let mut api = FakeGameApi::default();
        api.logins
            .insert("payload-a".to_string(), "fresh-token".to_string());

        let mut runner = runner(&dir, api).await;
        let report = runner.run_cycle(&parse_accounts("payload-a")).await;

        assert_eq!(report.accounts_processed, 1);
        assert_eq!(runner.sessions().get("1"), Some("fresh-token"));

        let on_disk = std::fs::read_to_string(dir.path().join("token.json")).unwrap();
        assert!(on_disk.contains("fresh-token"));

        let calls = runner.api().calls();
        assert_eq!(calls[0], Call::Login("payload-a".to_string()));
        assert_eq!(calls[1], Call::AccountInfo);
    }

    #[tokio::test]
    async fn failed_login_is_not_persisted_and_does_not_block_others() {
        let dir = TempDir::new().unwrap();
        let mut api = FakeGameApi::default();
        api.logins.insert("good".to_string(), "good-token".to_string());

        let mut runner = runner(&dir, api).await;
        let report = runner.run_cycle(&parse_accounts("bad\ngood")).await;

        assert_eq!(report.accounts_skipped, 1);
        assert_eq!(report.accounts_processed, 1);
        assert_eq!(runner.sessions().get("1"), None);
        assert_eq!(runner.sessions().get("2"), Some("good-token"));
        assert_eq!(runner.api().count(|call| *call == Call::AccountInfo), 1);
    }

    #[tokio::test]
    async fn second_cycle_reuses_the_token() {
        let dir = TempDir::new().unwrap();
        let mut api = FakeGameApi::default();
        api.logins.insert("only".to_string(), "t".to_string());

        let mut runner = runner(&dir, api).await;
        let accounts = parse_accounts("only");
        runner.run_cycle(&accounts).await;
        runner.run_cycle(&accounts).await;

        assert_eq!(
            runner
                .api()
                .count(|call| matches!(call, Call::Login(_))),
            1
        );
    }

    #[tokio::test]
    async fn panicking_account_is_contained() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("token.json"), r#"{"1": "a", "2": "b"}"#).unwrap();
        let api = FakeGameApi {
            panic_on_task_list: true,
            ..FakeGameApi::default()
        };

        let mut runner = runner(&dir, api).await;
        let report = runner.run_cycle(&parse_accounts("one\ntwo")).await;

        assert_eq!(report.accounts_skipped, 2);
        assert_eq!(runner.api().count(|call| *call == Call::TaskList), 2);
    }

    #[tokio::test]
    async fn level_up_is_reported_once_when_the_level_rises() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("token.json"), r#"{"1": "a"}"#).unwrap();

        let mut runner = runner(&dir, FakeGameApi::default()).await;
        let accounts = parse_accounts("one");

        // first sighting only sets the baseline
        assert_eq!(runner.run_cycle(&accounts).await.level_ups, 0);

        if let Some(info) = runner.api_mut().account_info.as_mut() {
            info.level = 2;
        }
        assert_eq!(runner.run_cycle(&accounts).await.level_ups, 1);
        assert_eq!(runner.run_cycle(&accounts).await.level_ups, 0);
    }

    #[tokio::test]
    async fn level_tracking_ignores_unchanged_and_lower_levels() {
        let dir = TempDir::new().unwrap();
        let mut runner = runner(&dir, FakeGameApi::default()).await;

        assert_eq!(runner.track_level("1", 3), None);
        assert_eq!(runner.track_level("1", 3), None);
        assert_eq!(runner.track_level("1", 5), Some((3, 5)));
        assert_eq!(runner.track_level("1", 4), None);
        assert_eq!(runner.track_level("2", 9), None);
    }

    #[tokio::test]
    async fn cycle_report_sums_coins_and_balances() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("token.json"), r#"{"1": "a", "2": "b"}"#).unwrap();

        let mut runner = runner(&dir, FakeGameApi::default()).await;
        let report = runner.run_cycle(&parse_accounts("one\ntwo")).await;

        // each account taps the free chest once
        assert_eq!(report.coins_collected, 2);
        assert_eq!(report.total_balance, Some(200.0));

        let totals = RunTotals::default().record(&report).record(&report);
        assert_eq!(totals.cycles, 2);
        assert_eq!(totals.coins_collected, 4);
        assert_eq!(totals.last_balance, Some(200.0));
    }
}
