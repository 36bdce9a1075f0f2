use async_trait::async_trait;
use log::trace;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER},
    Method, RequestBuilder,
};
use serde::de::DeserializeOwned;

use super::types::{
    AccountInfo, BuildInfo, ClaimRequest, CollectResult, Envelope, GameInfo, JoinSquadRequest,
    LoginData, LoginRequest, OfflineBonus, SquadInfo, Task, UpgradeKind,
};
use super::{ApiOutcome, GameApi, YesCoinError, YesCoinResult};

pub const YESCOIN_API_URL: &str = "https://api-backend.yescoin.gold";

const YESCOIN_WEB_ORIGIN: &str = "https://www.yescoin.gold";
const YESCOIN_WEB_REFERER: &str = "https://www.yescoin.gold/";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36 Edg/128.0.0.0";

/// Stateless HTTP client for the YesCoin backend
#[derive(Debug, Clone)]
pub struct YesCoinClient {
    http: reqwest::Client,
    base_url: String,
}

impl YesCoinClient {
    /// Create new `YesCoinClient` talking to `base_url`
    pub fn with_base_url(base_url: &str) -> YesCoinResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(ORIGIN, HeaderValue::from_static(YESCOIN_WEB_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(YESCOIN_WEB_REFERER));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(YesCoinError::HttpError)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        trace!("{} {}", method, path);
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    fn authed(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.request(method, path).header("token", token)
    }

    /// Send a request and decode the vendor envelope
    async fn envelope<T: DeserializeOwned>(request: RequestBuilder) -> YesCoinResult<Envelope<T>> {
        let response = request
            .send()
            .await
            .map_err(YesCoinError::HttpError)?
            .error_for_status()
            .map_err(YesCoinError::HttpError)?;

        let body = response.bytes().await.map_err(YesCoinError::HttpError)?;
        trace!("Response body: {}", String::from_utf8_lossy(&body));

        serde_json::from_slice(&body).map_err(YesCoinError::SerdeError)
    }

    /// Call an endpoint whose `data` is the payload we are after
    async fn data<T: DeserializeOwned>(request: RequestBuilder) -> ApiOutcome<T> {
        match Self::envelope::<T>(request).await {
            Ok(Envelope {
                code: 0,
                data: Some(data),
                ..
            }) => ApiOutcome::Success(data),
            Ok(Envelope { code: 0, .. }) => ApiOutcome::Rejected {
                code: 0,
                message: "response carried no data".to_string(),
            },
            Ok(envelope) => ApiOutcome::Rejected {
                code: envelope.code,
                message: envelope.message.unwrap_or_default(),
            },
            Err(error) => ApiOutcome::Failed(error),
        }
    }

    /// Call an endpoint where only the `code` matters
    async fn ack(request: RequestBuilder) -> ApiOutcome<()> {
        match Self::envelope::<serde_json::Value>(request).await {
            Ok(envelope) if envelope.code == 0 => ApiOutcome::Success(()),
            Ok(envelope) => ApiOutcome::Rejected {
                code: envelope.code,
                message: envelope.message.unwrap_or_default(),
            },
            Err(error) => ApiOutcome::Failed(error),
        }
    }
}

#[async_trait]
impl GameApi for YesCoinClient {
    async fn login(&self, payload: &str) -> YesCoinResult<String> {
        let request = self
            .request(Method::POST, "/user/login")
            .json(&LoginRequest { code: payload });

        let envelope = Self::envelope::<LoginData>(request).await?;
        if envelope.code != 0 {
            return Err(YesCoinError::LoginRejected {
                code: envelope.code,
                message: envelope.message.unwrap_or_default(),
            });
        }

        envelope
            .data
            .map(|data| data.token)
            .ok_or(YesCoinError::MissingData("token"))
    }

    async fn account_info(&self, token: &str) -> ApiOutcome<AccountInfo> {
        Self::data(self.authed(Method::GET, "/account/getAccountInfo", token)).await
    }

    async fn game_info(&self, token: &str) -> ApiOutcome<GameInfo> {
        Self::data(self.authed(Method::GET, "/game/getGameInfo", token)).await
    }

    async fn build_info(&self, token: &str) -> ApiOutcome<BuildInfo> {
        Self::data(self.authed(Method::GET, "/build/getAccountBuildInfo", token)).await
    }

    async fn squad_info(&self, token: &str) -> ApiOutcome<SquadInfo> {
        Self::data(self.authed(Method::GET, "/squad/mySquad", token)).await
    }

    async fn join_squad(&self, token: &str, squad_link: &str) -> ApiOutcome<()> {
        let request = self
            .authed(Method::POST, "/squad/joinSquad", token)
            .json(&JoinSquadRequest {
                squad_tg_link: squad_link,
            });
        Self::ack(request).await
    }

    async fn collect_coin(&self, token: &str, amount: u64) -> ApiOutcome<CollectResult> {
        let request = self
            .authed(Method::POST, "/game/collectCoin", token)
            .json(&amount);
        Self::data(request).await
    }

    async fn use_special_box(&self, token: &str) -> ApiOutcome<()> {
        Self::ack(self.authed(Method::POST, "/game/recoverSpecialBox", token)).await
    }

    async fn recover_coin_pool(&self, token: &str) -> ApiOutcome<()> {
        Self::ack(self.authed(Method::POST, "/game/recoverCoinPool", token)).await
    }

    async fn task_list(&self, token: &str) -> ApiOutcome<Vec<Task>> {
        Self::data(self.authed(Method::GET, "/task/getCommonTaskList", token)).await
    }

    async fn finish_task(&self, token: &str, task_id: &str) -> ApiOutcome<()> {
        let request = self
            .authed(Method::POST, "/task/finishTask", token)
            .json(task_id);
        Self::ack(request).await
    }

    async fn upgrade_level(&self, token: &str, kind: UpgradeKind) -> ApiOutcome<()> {
        let request = self
            .authed(Method::POST, "/build/levelUp", token)
            .json(kind.selector());
        Self::ack(request).await
    }

    async fn offline_bonus_info(&self, token: &str) -> ApiOutcome<Vec<OfflineBonus>> {
        Self::data(self.authed(Method::GET, "/game/getOfflineYesPacBonusInfo", token)).await
    }

    async fn claim_offline_bonus(
        &self,
        token: &str,
        claim: &ClaimRequest,
    ) -> ApiOutcome<CollectResult> {
        let request = self
            .authed(Method::POST, "/game/claimOfflineBonus", token)
            .json(claim);
        Self::data(request).await
    }

    async fn toggle_swipe_bot(&self, token: &str, enabled: bool) -> ApiOutcome<()> {
        let request = self
            .authed(Method::POST, "/build/toggleSwipeBotSwitch", token)
            .json(&enabled);
        Self::ack(request).await
    }
}
