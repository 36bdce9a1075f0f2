use chrono::Utc;
use log::{debug, error, info, warn};

use super::display;
use super::types::{ClaimRequest, GameInfo, UpgradeKind};
use super::{ApiOutcome, GameApi, Pacer, SweepPolicy};

/// Knobs for the per-account workflow
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    pub squad_link: String,
    pub max_level: u64,
    pub tasks_enabled: bool,
    pub upgrade_multi_enabled: bool,
    pub upgrade_fill_enabled: bool,
    pub swipe_bot_enabled: bool,
    pub chest_sweep: SweepPolicy,
    pub free_chest_sweep: SweepPolicy,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            squad_link: "t.me/wolvesbase".to_string(),
            max_level: 5,
            tasks_enabled: true,
            upgrade_multi_enabled: true,
            upgrade_fill_enabled: true,
            swipe_bot_enabled: true,
            chest_sweep: SweepPolicy::CHEST,
            free_chest_sweep: SweepPolicy::FREE_CHEST,
        }
    }
}

/// What a single account pass produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountReport {
    pub coins_collected: u64,
    pub balance: Option<f64>,
    pub level: Option<u64>,
    /// `false` when the pass stopped early because the game snapshot was unavailable
    pub completed: bool,
}

/// One pass of the game routine for an authenticated account.
///
/// Every step re-reads the state it depends on and logs its own failures, so
/// a broken step never stops the ones after it. The only early exit is a
/// missing game snapshot before the primary collection.
pub struct AccountWorkflow<'a, A: GameApi> {
    api: &'a A,
    options: &'a WorkflowOptions,
    pacer: &'a Pacer,
    account: &'a str,
    token: &'a str,
    report: AccountReport,
}

impl<'a, A: GameApi> AccountWorkflow<'a, A> {
    /// Create new `AccountWorkflow` instance
    pub fn new(
        api: &'a A,
        options: &'a WorkflowOptions,
        pacer: &'a Pacer,
        account: &'a str,
        token: &'a str,
    ) -> Self {
        Self {
            api,
            options,
            pacer,
            account,
            token,
            report: AccountReport::default(),
        }
    }

    pub async fn run(mut self) -> AccountReport {
        self.report_state().await;
        self.squad_membership().await;

        if self.options.swipe_bot_enabled {
            self.pacer.pause().await;
            info!("[{}] Checking and handling SwipeBot...", self.account);
            self.swipe_bot().await;
        }

        if self.options.tasks_enabled {
            self.task_sweep().await;
        }

        if self.options.upgrade_multi_enabled {
            self.upgrade(UpgradeKind::Multi).await;
        }
        if self.options.upgrade_fill_enabled {
            self.upgrade(UpgradeKind::FillRate).await;
        }

        self.pacer.pause().await;
        match self.api.game_info(self.token).await {
            ApiOutcome::Success(info) => self.collect_pool(&info).await,
            outcome => {
                error!(
                    "[{}] Unable to get game data, skipping the rest of this pass: {}",
                    self.account, outcome
                );
                return self.report;
            }
        }

        self.chests().await;
        self.pool_recovery().await;

        self.pacer.pause().await;
        info!("[{}] Checking for free chest...", self.account);
        self.sweep("Free chest", self.options.free_chest_sweep).await;

        self.report.completed = true;
        self.report
    }

    async fn report_state(&mut self) {
        self.pacer.pause().await;

        let spinner = display::spinner("Fetching account info...");
        match self.api.account_info(self.token).await {
            ApiOutcome::Success(info) => {
                spinner.finish_with_message("Account info fetched");
                display::account_panel(&info);
                self.report.balance = Some(info.balance);
                self.report.level = Some(info.level);
            }
            outcome => {
                spinner.abandon_with_message("Failed to fetch account info");
                warn!("[{}] Account info unavailable: {}", self.account, outcome);
            }
        }

        let spinner = display::spinner("Fetching game info...");
        match self.api.game_info(self.token).await {
            ApiOutcome::Success(info) => {
                spinner.finish_with_message("Game info fetched");
                display::game_panel(&info);
            }
            outcome => {
                spinner.abandon_with_message("Failed to fetch game info");
                warn!("[{}] Game info unavailable: {}", self.account, outcome);
            }
        }
    }

    async fn squad_membership(&mut self) {
        self.pacer.pause().await;

        match self.api.squad_info(self.token).await {
            ApiOutcome::Success(squad) if squad.is_join_squad => {
                let details = squad.squad_info.unwrap_or_default();
                info!(
                    "[{}] You have joined {} | {} Members",
                    self.account, details.squad_title, details.squad_members
                );
                return;
            }
            ApiOutcome::Success(_) => {}
            outcome => warn!("[{}] Squad info unavailable: {}", self.account, outcome),
        }

        info!(
            "[{}] Squad: You are not in a Squad, joining {}",
            self.account, self.options.squad_link
        );
        self.pacer.pause().await;

        match self
            .api
            .join_squad(self.token, &self.options.squad_link)
            .await
        {
            ApiOutcome::Success(()) => {
                info!("[{}] Squad: Joined Squad successfully!", self.account)
            }
            outcome => error!("[{}] Squad: Failed to join Squad: {}", self.account, outcome),
        }
    }

    async fn swipe_bot(&mut self) {
        let build = match self.api.build_info(self.token).await {
            ApiOutcome::Success(build) => build,
            outcome => {
                error!(
                    "[{}] Failed to retrieve SwipeBot information: {}",
                    self.account, outcome
                );
                return;
            }
        };

        if build.swipe_bot_level < 1 {
            match self
                .api
                .upgrade_level(self.token, UpgradeKind::SwipeBot)
                .await
            {
                ApiOutcome::Success(()) => {
                    info!("[{}] SwipeBot purchased successfully", self.account)
                }
                outcome => error!("[{}] Failed to purchase SwipeBot: {}", self.account, outcome),
            }
            return;
        }

        if !build.open_swipe_bot {
            match self.api.toggle_swipe_bot(self.token, true).await {
                ApiOutcome::Success(()) => {
                    info!("[{}] SwipeBot activated successfully", self.account)
                }
                outcome => error!("[{}] Failed to activate SwipeBot: {}", self.account, outcome),
            }
            return;
        }

        let bonuses = match self.api.offline_bonus_info(self.token).await {
            ApiOutcome::Success(bonuses) => bonuses,
            outcome => {
                error!(
                    "[{}] Failed to retrieve offline bonus information: {}",
                    self.account, outcome
                );
                return;
            }
        };

        let Some(bonus) = bonuses.first() else {
            debug!("[{}] No offline bonus waiting", self.account);
            return;
        };

        let claim = ClaimRequest::for_bonus(bonus, Utc::now().timestamp());
        match self.api.claim_offline_bonus(self.token, &claim).await {
            ApiOutcome::Success(result) => {
                info!(
                    "[{}] Claimed offline bonus successfully, received {} coins",
                    self.account, result.collect_amount
                );
                self.report.coins_collected += result.collect_amount;
            }
            outcome => error!(
                "[{}] Failed to claim offline bonus: {}",
                self.account, outcome
            ),
        }
    }

    async fn task_sweep(&mut self) {
        self.pacer.pause().await;
        info!("[{}] Starting tasks...", self.account);

        let tasks = match self.api.task_list(self.token).await {
            ApiOutcome::Success(tasks) => tasks,
            outcome => {
                warn!("[{}] Task list unavailable: {}", self.account, outcome);
                return;
            }
        };

        for task in tasks {
            if !task.is_pending() {
                debug!("[{}] Task {} already completed", self.account, task.task_id);
                continue;
            }

            self.pacer.pause().await;
            match self.api.finish_task(self.token, &task.task_id).await {
                ApiOutcome::Success(()) => {
                    info!("[{}] Task {} completed", self.account, task.task_id)
                }
                outcome => error!(
                    "[{}] Task {} could not be finished: {}",
                    self.account, task.task_id, outcome
                ),
            }
        }
    }

    /// Level a building up until `max_level`, stopping at the first refusal
    async fn upgrade(&mut self, kind: UpgradeKind) {
        self.pacer.pause().await;
        info!("[{}] Starting {} upgrade...", self.account, kind.label());

        // unreadable level: try from 0 and let the first refusal end the loop
        let mut level = match self.api.build_info(self.token).await {
            ApiOutcome::Success(build) => build.level_of(kind),
            outcome => {
                warn!(
                    "[{}] Cannot read {} level, upgrading from 0: {}",
                    self.account,
                    kind.label(),
                    outcome
                );
                0
            }
        };

        while level < self.options.max_level {
            self.pacer.pause().await;
            match self.api.upgrade_level(self.token, kind).await {
                ApiOutcome::Success(()) => {
                    level += 1;
                    info!(
                        "[{}] {} upgraded to level {}",
                        self.account,
                        kind.label(),
                        level
                    );
                }
                outcome => {
                    warn!(
                        "[{}] {} upgrade stopped at level {}: {}",
                        self.account,
                        kind.label(),
                        level,
                        outcome
                    );
                    return;
                }
            }
        }

        info!(
            "[{}] {} upgrade completed at level {}",
            self.account,
            kind.label(),
            level
        );
    }

    async fn collect_pool(&mut self, info: &GameInfo) {
        info!(
            "[{}] Energy left {}",
            self.account, info.coin_pool_left_count
        );

        let Some(amount) = info.collect_amount() else {
            return;
        };

        self.pacer.pause().await;
        match self.api.collect_coin(self.token, amount).await {
            ApiOutcome::Success(result) => {
                info!(
                    "[{}] Tap successful, received {} coins",
                    self.account, result.collect_amount
                );
                self.report.coins_collected += result.collect_amount;
            }
            outcome => error!("[{}] Tap unsuccessful: {}", self.account, outcome),
        }
    }

    async fn chests(&mut self) {
        self.pacer.pause().await;
        info!("[{}] Checking remaining chests...", self.account);

        let available = match self.api.build_info(self.token).await {
            ApiOutcome::Success(build) => build.special_box_left_recovery_count > 0,
            outcome => {
                warn!("[{}] Build info unavailable: {}", self.account, outcome);
                false
            }
        };
        if !available {
            info!("[{}] No chests available!", self.account);
            return;
        }

        match self.api.use_special_box(self.token).await {
            ApiOutcome::Success(()) => {
                self.pacer.pause().await;
                info!("[{}] Starting collection...", self.account);
                self.sweep("Chest", self.options.chest_sweep).await;
                info!("[{}] Collection completed", self.account);
            }
            outcome => error!("[{}] Failed to open chest: {}", self.account, outcome),
        }
    }

    async fn pool_recovery(&mut self) {
        self.pacer.pause().await;
        info!("[{}] Starting recovery...", self.account);

        let available = match self.api.build_info(self.token).await {
            ApiOutcome::Success(build) => build.coin_pool_left_recovery_count > 0,
            outcome => {
                warn!("[{}] Build info unavailable: {}", self.account, outcome);
                false
            }
        };
        if !available {
            info!("[{}] No more recovery available!", self.account);
            return;
        }

        let recovery = self.api.recover_coin_pool(self.token).await;
        if !recovery.is_success() {
            error!("[{}] Coin pool recovery failed: {}", self.account, recovery);
            return;
        }

        self.pacer.pause().await;
        match self.api.game_info(self.token).await {
            ApiOutcome::Success(info) => self.collect_pool(&info).await,
            outcome => warn!(
                "[{}] Game info unavailable after recovery: {}",
                self.account, outcome
            ),
        }
    }

    /// Tap one coin at a time until the source runs dry or the policy runs out
    async fn sweep(&mut self, label: &str, policy: SweepPolicy) {
        let spinner = display::spinner(&format!("{}: collecting...", label));
        let mut collected = 0;
        let mut taps = 0;

        for iteration in 0..policy.iterations {
            if iteration > 0 {
                self.pacer.wait(policy.interval).await;
            }

            match self.api.collect_coin(self.token, 1).await {
                ApiOutcome::Success(result) => {
                    collected += result.collect_amount;
                    taps += 1;
                    spinner.set_message(format!(
                        "{}: {}/{} taps",
                        label, taps, policy.iterations
                    ));
                }
                outcome => {
                    debug!(
                        "[{}] {} sweep stopped after {} taps: {}",
                        self.account, label, taps, outcome
                    );
                    break;
                }
            }
        }

        spinner.finish_with_message(format!(
            "{}: collected {} coins in {} taps",
            label, collected, taps
        ));
        self.report.coins_collected += collected;
    }
}
