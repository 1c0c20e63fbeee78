use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::traits::{ContentApi, IssuedToken};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

/// `ContentApi` over HTTP.
pub struct NativeApi {
    client: Client,
    base_url: String,
}

impl NativeApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn read_error(response: Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

fn error_message(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error")
        .to_string()
}

fn error_details(body: &Value) -> Vec<String> {
    let details: Vec<String> = body
        .get("details")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if details.is_empty() {
        vec![error_message(body)]
    } else {
        details
    }
}

async fn server_error(response: Response) -> ClientError {
    let (status, body) = read_error(response).await;
    ClientError::Server {
        status,
        message: error_message(&body),
    }
}

#[async_trait]
impl ContentApi for NativeApi {
    async fn fetch_bundle(&self) -> Result<Option<Value>> {
        let url = self.url("/api/data");
        tracing::debug!("[VitaeHTTP-Out] GET {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(server_error(response).await);
        }

        let text = response.text().await?;
        let value: Value = serde_json::from_str(&text)?;
        Ok(match value {
            Value::Null => None,
            value => Some(value),
        })
    }

    async fn save_bundle(&self, token: &str, bundle: &Value) -> Result<()> {
        let url = self.url("/api/save");
        tracing::debug!("[VitaeHTTP-Out] POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(bundle)
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::BAD_REQUEST => {
                let (_, body) = read_error(response).await;
                Err(ClientError::Rejected(error_details(&body)))
            }
            _ => Err(server_error(response).await),
        }
    }

    async fn authenticate(&self, passkey: &str) -> Result<IssuedToken> {
        let url = self.url("/api/auth");
        tracing::debug!("[VitaeHTTP-Out] POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "passkey": passkey }))
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => {
                let text = response.text().await?;
                Ok(serde_json::from_str(&text)?)
            }
            StatusCode::BAD_REQUEST => Err(ClientError::MissingPasskey),
            StatusCode::UNAUTHORIZED => Err(ClientError::InvalidPasskey),
            StatusCode::SERVICE_UNAVAILABLE => Err(ClientError::Disabled),
            _ => Err(server_error(response).await),
        }
    }

    async fn verify(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .get(self.url("/api/auth/verify"))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            _ => Err(server_error(response).await),
        }
    }

    async fn logout(&self, token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("/api/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            _ => Err(server_error(response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let api = NativeApi::with_client(Client::new(), "http://localhost:3000/");
        assert_eq!(api.url("/api/data"), "http://localhost:3000/api/data");
    }

    #[test]
    fn test_error_details() {
        let body = json!({ "error": "Invalid data", "details": ["Invalid albums payload"] });
        assert_eq!(error_details(&body), vec!["Invalid albums payload"]);

        let body = json!({ "error": "Invalid data" });
        assert_eq!(error_details(&body), vec!["Invalid data"]);

        assert_eq!(error_details(&Value::Null), vec!["Unknown error"]);
    }
}
