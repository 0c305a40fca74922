use crate::config::toml_config::ApiConfig;
use crate::domain::ports::ApiClient;
use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

/// 以 reqwest 實作的 REST 用戶端
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        tracing::debug!("📡 {} {}", method, path);
        let mut request = self.request(method.clone(), path);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        tracing::debug!("📡 {} {} -> {}", method, path, response.status());
        Self::read_body(path, response).await
    }

    async fn read_body(path: &str, response: Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            Ok(body)
        } else {
            tracing::warn!("❌ API error {} on {}: {}", status, path, body);
            Err(ClientError::Api {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            })
        }
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, None).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ApiClientExt;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;

    #[tokio::test]
    async fn test_get_parses_json() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/contract/3/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"pk": 3, "serial_number": "A101-5"}));
        });

        let api = HttpApiClient::new(server.base_url());
        let value = api.get("/contract/3/").await.unwrap();

        mock.assert();
        assert_eq!(value["serial_number"], "A101-5");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/contract/");
            then.status(400)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"serial_number": ["중복"]}));
        });

        let api = HttpApiClient::new(server.base_url());
        let err = api
            .post("/contract/", &serde_json::json!({}))
            .await
            .unwrap_err();

        mock.assert();
        match err {
            ClientError::Api { status, path, body } => {
                assert_eq!(status, 400);
                assert_eq!(path, "/contract/");
                assert_eq!(body["serial_number"][0], "중복");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bearer_token_and_relative_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/key-unit/9/")
                .header("Authorization", "Bearer secret")
                .json_body(serde_json::json!({"contract": null}));
            then.status(200).json_body(serde_json::json!({"pk": 9}));
        });

        let api = HttpApiClient::new(format!("{}/", server.base_url())).with_token("secret");
        let value: serde_json::Value = api
            .modify("key-unit/9/", &serde_json::json!({"contract": null}))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(value["pk"], 9);
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/order-group/2/");
            then.status(204);
        });

        let api = HttpApiClient::new(server.base_url());
        api.delete("/order-group/2/").await.unwrap();
        mock.assert();
    }
}
