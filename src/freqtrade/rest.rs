//! Freqtrade REST client (`/api/v1`, HTTP basic auth).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::{
    traits::{BotApi, BotResult},
    types::{ExitTarget, ForceEnterRequest, ForceExitRequest},
};

use crate::config::FreqtradeConfig;
use crate::error::FreqtradeError;

const API_PREFIX: &str = "api/v1/";

#[derive(Clone)]
pub struct FreqtradeClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl FreqtradeClient {
    pub fn new(config: &FreqtradeConfig) -> Result<Self, FreqtradeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: api_base(&config.api_url)?,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> BotResult<RequestBuilder> {
        let url = self.base_url.join(path)?;
        Ok(self
            .client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password)))
    }

    async fn send(&self, req: RequestBuilder) -> BotResult<Value> {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!("Freqtrade API responded {} ({} bytes)", status, text.len());

        if !status.is_success() {
            return Err(FreqtradeError::from_response(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| FreqtradeError::Decode(format!("{} (body: {})", e, text)))
    }

    async fn get(&self, path: &str) -> BotResult<Value> {
        let req = self.request(Method::GET, path)?;
        self.send(req).await
    }

    async fn get_with_query<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> BotResult<Value> {
        let req = self.request(Method::GET, path)?.query(query);
        self.send(req).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> BotResult<Value> {
        let mut req = self.request(Method::POST, path)?;
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(req).await
    }

    async fn post_empty(&self, path: &str) -> BotResult<Value> {
        self.post::<Value>(path, None).await
    }
}

/// Resolves the `/api/v1/` root from a user supplied bot url. Accepts the
/// bare host as well as a url that already carries the api prefix.
pub fn api_base(api_url: &str) -> Result<Url, FreqtradeError> {
    let mut url = Url::parse(api_url.trim())?;
    let path = url.path().trim_end_matches('/').to_string();
    if path.ends_with("api/v1") {
        url.set_path(&format!("{}/", path));
        return Ok(url);
    }
    url.set_path(&format!("{}/", path));
    Ok(url.join(API_PREFIX)?)
}

#[async_trait]
impl BotApi for FreqtradeClient {
    async fn ping(&self) -> BotResult<Value> {
        self.get("ping").await
    }

    async fn status(&self) -> BotResult<Value> {
        self.get("status").await
    }

    async fn balance(&self) -> BotResult<Value> {
        self.get("balance").await
    }

    async fn profit(&self) -> BotResult<Value> {
        self.get("profit").await
    }

    async fn performance(&self) -> BotResult<Value> {
        self.get("performance").await
    }

    async fn trades(&self, limit: Option<u32>, offset: Option<u32>) -> BotResult<Value> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }
        self.get_with_query("trades", &query).await
    }

    async fn show_config(&self) -> BotResult<Value> {
        self.get("show_config").await
    }

    async fn pair_candles(&self, pair: &str, timeframe: &str, limit: Option<u32>) -> BotResult<Value> {
        let mut query = vec![("pair", pair.to_string()), ("timeframe", timeframe.to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.get_with_query("pair_candles", &query).await
    }

    async fn whitelist(&self) -> BotResult<Value> {
        self.get("whitelist").await
    }

    async fn blacklist(&self) -> BotResult<Value> {
        self.get("blacklist").await
    }

    async fn add_blacklist(&self, pair: &str) -> BotResult<Value> {
        self.post("blacklist", Some(&json!({ "blacklist": [pair] }))).await
    }

    async fn delete_blacklist(&self, pair: &str) -> BotResult<Value> {
        let req = self
            .request(Method::DELETE, "blacklist")?
            .query(&[("pairs_to_delete", pair)]);
        self.send(req).await
    }

    async fn locks(&self) -> BotResult<Value> {
        self.get("locks").await
    }

    async fn delete_lock(&self, lock_id: i64) -> BotResult<Value> {
        let req = self.request(Method::DELETE, &format!("locks/{}", lock_id))?;
        self.send(req).await
    }

    async fn force_enter(&self, request: &ForceEnterRequest) -> BotResult<Value> {
        self.post("forceenter", Some(request)).await
    }

    async fn force_exit(&self, target: &ExitTarget) -> BotResult<Value> {
        let body = ForceExitRequest::from(target);
        self.post("forceexit", Some(&body)).await
    }

    async fn start(&self) -> BotResult<Value> {
        self.post_empty("start").await
    }

    async fn stop(&self) -> BotResult<Value> {
        self.post_empty("stop").await
    }

    async fn reload_config(&self) -> BotResult<Value> {
        self.post_empty("reload_config").await
    }
}
