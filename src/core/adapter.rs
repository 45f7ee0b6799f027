use crate::core::request::request_url;
use crate::core::{ConfigProvider, User, UserApi, UserData, UserStream, APP_USER_AGENT};
use crate::utils::error::{FetchError, Result};
use futures::executor::block_on;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use reqwest::header::ACCEPT;

/// Fetches users from `api_url`, either blocking or as a lazy stream.
///
/// The URL is not checked here; a malformed one fails on the first request.
#[derive(Debug, Clone)]
pub struct UserFetchAdapter {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl UserFetchAdapter {
    pub fn new(client: reqwest::blocking::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    pub fn from_config<C: ConfigProvider>(client: reqwest::blocking::Client, config: &C) -> Self {
        Self::new(client, config.api_url())
    }

    /// Uses a blocking client carrying this crate's user agent.
    ///
    /// Must not be called from inside an async runtime.
    pub fn with_default_client(api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()?;
        Ok(Self::new(client, api_url))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl UserApi for UserFetchAdapter {
    fn fetch_users_blocking(&self, limit: i32) -> Result<Vec<User>> {
        let url = request_url(&self.api_url, Some(limit))?;

        tracing::debug!("Making blocking API request to: {}", url);
        let response = self.client.get(url).send()?;
        tracing::debug!("API response status: {}", response.status());

        let body = response.error_for_status()?.bytes()?;
        let envelope: UserData = serde_json::from_slice(&body)?;

        tracing::info!("Fetched {} users", envelope.data.len());
        Ok(envelope.data)
    }

    fn fetch_users_reactive<S, E>(&self, limit: S) -> Result<UserStream>
    where
        S: Stream<Item = std::result::Result<i32, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        // limit 在這裡同步解析，之後才組 pipeline
        let limit = resolve_limit(limit)?;
        tracing::debug!("Resolved limit {:?}, building user stream", limit);

        let users = stream::once(fetch_envelope(self.api_url.clone(), limit))
            .map_ok(|envelope| stream::iter(envelope.data.into_iter().map(Ok::<User, FetchError>)))
            .try_flatten();

        Ok(users.boxed())
    }
}

/// Blocks the calling thread until `limit` emits or completes.
fn resolve_limit<S, E>(limit: S) -> Result<Option<i32>>
where
    S: Stream<Item = std::result::Result<i32, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut limit = std::pin::pin!(limit);
    block_on(limit.next())
        .transpose()
        .map_err(|e| FetchError::LimitSourceError(Box::new(e)))
}

async fn fetch_envelope(api_url: String, limit: Option<i32>) -> Result<UserData> {
    let url = request_url(&api_url, limit)?;
    let client = reqwest::Client::builder()
        .user_agent(APP_USER_AGENT)
        .build()?;

    tracing::debug!("Making API request to: {}", url);
    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await?;
    tracing::debug!("API response status: {}", response.status());

    let body = response.error_for_status()?.bytes().await?;
    let envelope: UserData = serde_json::from_slice(&body)?;

    tracing::info!("Fetched {} users", envelope.data.len());
    Ok(envelope)
}
