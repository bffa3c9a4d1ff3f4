use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
}

/// Result of a successful credential exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub user: UserProfile,
}

/// The remote side of authentication as seen by a client.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError>;

    async fn profile(&self, token: &str) -> Result<UserProfile, ClientError>;

    async fn sign_out(&self, token: &str) -> Result<(), ClientError>;
}

/// [`AuthApi`] over this service's `/auth` endpoints.
#[derive(Clone)]
pub struct HttpAuthApi {
    http: Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

async fn check(res: Response) -> Result<Response, ClientError> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);

    Err(ClientError::Status { status, message })
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let res = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        Ok(check(res).await?.json::<Session>().await?)
    }

    async fn profile(&self, token: &str) -> Result<UserProfile, ClientError> {
        let res = self
            .http
            .get(self.url("/auth/profile"))
            .bearer_auth(token)
            .send()
            .await?;

        Ok(check(res).await?.json::<UserProfile>().await?)
    }

    async fn sign_out(&self, token: &str) -> Result<(), ClientError> {
        let res = self
            .http
            .post(self.url("/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        check(res).await?;
        Ok(())
    }
}
