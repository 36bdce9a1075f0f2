use serde::{Deserialize, Deserializer, Serialize};

/// Response envelope shared by every vendor endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub code: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountInfo {
    #[serde(rename = "currentAmount")]
    pub balance: f64,
    pub level: u64,
    pub xp: u64,
    pub next_level_xp: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameInfo {
    pub coin_pool_left_count: u64,
    pub single_coin_value: u64,
}

impl GameInfo {
    /// Coins to submit in a single collect call, `None` when nothing can be collected
    pub fn collect_amount(&self) -> Option<u64> {
        if self.coin_pool_left_count == 0 || self.single_coin_value == 0 {
            return None;
        }

        match self.coin_pool_left_count / self.single_coin_value {
            0 => None,
            amount => Some(amount),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildInfo {
    pub swipe_bot_level: u64,
    pub open_swipe_bot: bool,
    pub special_box_left_recovery_count: u64,
    pub coin_pool_left_recovery_count: u64,
    pub single_coin_level: u64,
    pub coin_pool_recovery_level: u64,
}

impl BuildInfo {
    /// Current level of the building an upgrade selector refers to
    pub fn level_of(&self, kind: UpgradeKind) -> u64 {
        match kind {
            UpgradeKind::Multi => self.single_coin_level,
            UpgradeKind::FillRate => self.coin_pool_recovery_level,
            UpgradeKind::SwipeBot => self.swipe_bot_level,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SquadDetails {
    pub squad_title: String,
    pub squad_members: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SquadInfo {
    pub is_join_squad: bool,
    pub squad_info: Option<SquadDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSquadRequest<'a> {
    pub squad_tg_link: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(deserialize_with = "string_or_number")]
    pub task_id: String,
    #[serde(default)]
    pub task_status: i64,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.task_status == 0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectResult {
    pub collect_amount: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineBonus {
    #[serde(deserialize_with = "string_or_number")]
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub id: String,
    pub create_at: i64,
    pub claim_type: u8,
    pub destination: String,
}

impl ClaimRequest {
    /// Claim descriptor for a pending offline bonus, stamped with the given unix seconds
    pub fn for_bonus(bonus: &OfflineBonus, create_at: i64) -> Self {
        Self {
            id: bonus.transaction_id.clone(),
            create_at,
            claim_type: 1,
            destination: String::new(),
        }
    }
}

/// Selector sent to `/build/levelUp`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    Multi,
    FillRate,
    SwipeBot,
}

impl UpgradeKind {
    pub fn selector(self) -> &'static str {
        match self {
            UpgradeKind::Multi => "1",
            UpgradeKind::FillRate => "2",
            UpgradeKind::SwipeBot => "4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UpgradeKind::Multi => "Multi",
            UpgradeKind::FillRate => "Fill Rate",
            UpgradeKind::SwipeBot => "SwipeBot",
        }
    }
}

/// The vendor sends ids either as JSON numbers or strings
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
