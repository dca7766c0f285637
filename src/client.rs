//! HTTP transport shared by the catalog query and the image download
use anyhow::Result;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Header name to value, attached to every outbound request.
pub type AuthHeaders = BTreeMap<String, String>;

pub fn api_key_headers(api_key: &str) -> AuthHeaders {
    let mut headers = AuthHeaders::new();
    headers.insert(API_KEY_HEADER.to_string(), api_key.to_string());
    headers
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn reason(&self) -> String {
        self.status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string()
    }
}

pub trait HttpGet {
    /// Issue a GET. `Err` means the request never produced a response; any
    /// status, including errors, comes back as `Ok`.
    async fn get(self: &Self, url: &Url, headers: &AuthHeaders) -> Result<Reply>;
}

pub struct SkyWatchClient {
    client: reqwest::Client,
}

impl SkyWatchClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl HttpGet for SkyWatchClient {
    async fn get(self: &Self, url: &Url, headers: &AuthHeaders) -> Result<Reply> {
        let mut request = self.client.get(url.clone());
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await?;
        let status = response.status();
        let body = if status == StatusCode::OK {
            response.bytes().await?.to_vec()
        } else {
            Vec::new()
        };
        Ok(Reply { status, body })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned replies keyed by full URL. Unknown URLs fail like a refused connection.
    #[derive(Default)]
    pub struct MockClient {
        replies: HashMap<String, Reply>,
        pub requests: Mutex<Vec<(String, AuthHeaders)>>,
    }

    impl MockClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(mut self, url: &str, status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
            let reply = Reply {
                status,
                body: body.into(),
            };
            self.replies.insert(url.to_string(), reply);
            self
        }

        pub fn requested_urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    impl HttpGet for MockClient {
        async fn get(self: &Self, url: &Url, headers: &AuthHeaders) -> Result<Reply> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), headers.clone()));
            self.replies
                .get(url.as_str())
                .cloned()
                .ok_or(anyhow!("Connection refused: {}", url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_headers() {
        let headers = api_key_headers("secret");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-api-key"), Some(&"secret".to_string()));
    }

    #[test]
    fn test_reply_reason() {
        let reply = Reply {
            status: StatusCode::FORBIDDEN,
            body: vec![],
        };
        assert_eq!(reply.reason(), "Forbidden");
    }

    #[test]
    fn test_client_builds_with_timeout() {
        assert!(SkyWatchClient::with_timeout(Some(Duration::from_secs(5))).is_ok());
        assert!(SkyWatchClient::with_timeout(None).is_ok());
    }
}
