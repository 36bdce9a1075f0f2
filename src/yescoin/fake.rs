//! In-memory `GameApi` that records every call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{
    AccountInfo, BuildInfo, ClaimRequest, CollectResult, GameInfo, OfflineBonus, SquadInfo, Task,
    UpgradeKind,
};
use super::{ApiOutcome, GameApi, YesCoinError, YesCoinResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login(String),
    AccountInfo,
    GameInfo,
    BuildInfo,
    SquadInfo,
    JoinSquad(String),
    CollectCoin(u64),
    UseSpecialBox,
    RecoverCoinPool,
    TaskList,
    FinishTask(String),
    UpgradeLevel(UpgradeKind),
    OfflineBonusInfo,
    ClaimOfflineBonus(ClaimRequest),
    ToggleSwipeBot(bool),
}

/// Canned responses; `None` answers with a vendor rejection
pub struct FakeGameApi {
    /// payload -> token, unknown payloads are rejected
    pub logins: HashMap<String, String>,
    pub account_info: Option<AccountInfo>,
    pub game_info: Option<GameInfo>,
    pub build_info: Option<BuildInfo>,
    pub squad_info: Option<SquadInfo>,
    pub tasks: Option<Vec<Task>>,
    pub offline_bonuses: Option<Vec<OfflineBonus>>,
    /// Answer for join, finish, upgrade, toggle and both recoveries
    pub accept_actions: bool,
    /// When set, collect calls echo the requested amount back
    pub collect_enabled: bool,
    pub claim_amount: u64,
    pub panic_on_task_list: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl Default for FakeGameApi {
    fn default() -> Self {
        Self {
            logins: HashMap::new(),
            account_info: Some(AccountInfo {
                balance: 100.0,
                level: 1,
                xp: 10,
                next_level_xp: 100,
            }),
            game_info: Some(GameInfo::default()),
            build_info: Some(BuildInfo::default()),
            squad_info: Some(SquadInfo::default()),
            tasks: Some(Vec::new()),
            offline_bonuses: Some(Vec::new()),
            accept_actions: true,
            collect_enabled: true,
            claim_amount: 0,
            panic_on_task_list: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeGameApi {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn canned<T: Clone>(value: &Option<T>) -> ApiOutcome<T> {
        match value {
            Some(value) => ApiOutcome::Success(value.clone()),
            None => rejected(),
        }
    }

    fn action(&self) -> ApiOutcome<()> {
        if self.accept_actions {
            ApiOutcome::Success(())
        } else {
            rejected()
        }
    }
}

fn rejected<T>() -> ApiOutcome<T> {
    ApiOutcome::Rejected {
        code: 1,
        message: "rejected by fake".to_string(),
    }
}

#[async_trait]
impl GameApi for FakeGameApi {
    async fn login(&self, payload: &str) -> YesCoinResult<String> {
        self.record(Call::Login(payload.to_string()));
        self.logins
            .get(payload)
            .cloned()
            .ok_or_else(|| YesCoinError::LoginRejected {
                code: 1,
                message: "unknown payload".to_string(),
            })
    }

    async fn account_info(&self, _token: &str) -> ApiOutcome<AccountInfo> {
        self.record(Call::AccountInfo);
        Self::canned(&self.account_info)
    }

    async fn game_info(&self, _token: &str) -> ApiOutcome<GameInfo> {
        self.record(Call::GameInfo);
        Self::canned(&self.game_info)
    }

    async fn build_info(&self, _token: &str) -> ApiOutcome<BuildInfo> {
        self.record(Call::BuildInfo);
        Self::canned(&self.build_info)
    }

    async fn squad_info(&self, _token: &str) -> ApiOutcome<SquadInfo> {
        self.record(Call::SquadInfo);
        Self::canned(&self.squad_info)
    }

    async fn join_squad(&self, _token: &str, squad_link: &str) -> ApiOutcome<()> {
        self.record(Call::JoinSquad(squad_link.to_string()));
        self.action()
    }

    async fn collect_coin(&self, _token: &str, amount: u64) -> ApiOutcome<CollectResult> {
        self.record(Call::CollectCoin(amount));
        if self.collect_enabled {
            ApiOutcome::Success(CollectResult {
                collect_amount: amount,
            })
        } else {
            rejected()
        }
    }

    async fn use_special_box(&self, _token: &str) -> ApiOutcome<()> {
        self.record(Call::UseSpecialBox);
        self.action()
    }

    async fn recover_coin_pool(&self, _token: &str) -> ApiOutcome<()> {
        self.record(Call::RecoverCoinPool);
        self.action()
    }

    async fn task_list(&self, _token: &str) -> ApiOutcome<Vec<Task>> {
        self.record(Call::TaskList);
        if self.panic_on_task_list {
            panic!("task list exploded");
        }
        Self::canned(&self.tasks)
    }

    async fn finish_task(&self, _token: &str, task_id: &str) -> ApiOutcome<()> {
        self.record(Call::FinishTask(task_id.to_string()));
        self.action()
    }

    async fn upgrade_level(&self, _token: &str, kind: UpgradeKind) -> ApiOutcome<()> {
        self.record(Call::UpgradeLevel(kind));
        self.action()
    }

    async fn offline_bonus_info(&self, _token: &str) -> ApiOutcome<Vec<OfflineBonus>> {
        self.record(Call::OfflineBonusInfo);
        Self::canned(&self.offline_bonuses)
    }

    async fn claim_offline_bonus(
        &self,
        _token: &str,
        claim: &ClaimRequest,
    ) -> ApiOutcome<CollectResult> {
        self.record(Call::ClaimOfflineBonus(claim.clone()));
        match self.action() {
            ApiOutcome::Success(()) => ApiOutcome::Success(CollectResult {
                collect_amount: self.claim_amount,
            }),
            _ => rejected(),
        }
    }

    async fn toggle_swipe_bot(&self, _token: &str, enabled: bool) -> ApiOutcome<()> {
        self.record(Call::ToggleSwipeBot(enabled));
        self.action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn struct_update_keeps_recording_calls() {
        let api = FakeGameApi {
            build_info: None,
            accept_actions: false,
            ..FakeGameApi::default()
        };

        assert!(!api.build_info("t").await.is_success());
        assert!(!api.upgrade_level("t", UpgradeKind::Multi).await.is_success());
        assert_eq!(
            api.calls(),
            vec![Call::BuildInfo, Call::UpgradeLevel(UpgradeKind::Multi)]
        );
    }
}
