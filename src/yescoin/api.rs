use std::fmt;

use async_trait::async_trait;

use super::types::{
    AccountInfo, BuildInfo, ClaimRequest, CollectResult, GameInfo, OfflineBonus, SquadInfo, Task,
    UpgradeKind,
};
use super::{YesCoinError, YesCoinResult};

/// Result of a single game call.
///
/// `Rejected` is a vendor-level refusal (non-zero `code` or no `data`), `Failed`
/// is anything that went wrong before a vendor answer could be read.
#[derive(Debug)]
pub enum ApiOutcome<T> {
    Success(T),
    Rejected { code: i64, message: String },
    Failed(YesCoinError),
}

impl<T> ApiOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }

    #[cfg(test)]
    pub fn success(self) -> Option<T> {
        match self {
            ApiOutcome::Success(data) => Some(data),
            _ => None,
        }
    }
}

impl<T> fmt::Display for ApiOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiOutcome::Success(_) => write!(f, "success"),
            ApiOutcome::Rejected { code, message } => {
                write!(f, "rejected with code {}: {}", code, message)
            }
            ApiOutcome::Failed(error) => write!(f, "failed: {}", error),
        }
    }
}

/// Every vendor operation the workflow drives
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn login(&self, payload: &str) -> YesCoinResult<String>;

    async fn account_info(&self, token: &str) -> ApiOutcome<AccountInfo>;

    async fn game_info(&self, token: &str) -> ApiOutcome<GameInfo>;

    async fn build_info(&self, token: &str) -> ApiOutcome<BuildInfo>;

    async fn squad_info(&self, token: &str) -> ApiOutcome<SquadInfo>;

    async fn join_squad(&self, token: &str, squad_link: &str) -> ApiOutcome<()>;

    async fn collect_coin(&self, token: &str, amount: u64) -> ApiOutcome<CollectResult>;

    async fn use_special_box(&self, token: &str) -> ApiOutcome<()>;

    async fn recover_coin_pool(&self, token: &str) -> ApiOutcome<()>;

    async fn task_list(&self, token: &str) -> ApiOutcome<Vec<Task>>;

    async fn finish_task(&self, token: &str, task_id: &str) -> ApiOutcome<()>;

    async fn upgrade_level(&self, token: &str, kind: UpgradeKind) -> ApiOutcome<()>;

    async fn offline_bonus_info(&self, token: &str) -> ApiOutcome<Vec<OfflineBonus>>;

    async fn claim_offline_bonus(
        &self,
        token: &str,
        claim: &ClaimRequest,
    ) -> ApiOutcome<CollectResult>;

    async fn toggle_swipe_bot(&self, token: &str, enabled: bool) -> ApiOutcome<()>;
}
