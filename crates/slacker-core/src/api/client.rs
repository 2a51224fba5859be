//! Per-account client for the Slack Web API.
//!
//! `StatusClient` owns the connection pool and API root; `with_token` derives
//! an `AccountClient` bound to one account, the only type that issues calls.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ActionError;
use crate::error::ConfigError;
use crate::intent::Presence;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for Web API methods
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// HTTP request timeout in seconds, applied to every call.
const REQUEST_TIMEOUT_SECS: u64 = 60;

const USER_AGENT: &str = concat!("slacker/", env!("CARGO_PKG_VERSION"));

const SET_PRESENCE_METHOD: &str = "users.setPresence";
const SET_PROFILE_METHOD: &str = "users.profile.set";

/// Uniform response shape of every Web API method.
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Status fields of `users.profile.set`, sent as a JSON string form field.
#[derive(Debug, Serialize)]
struct StatusProfile<'a> {
    status_text: &'a str,
    status_emoji: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_expiration: Option<i64>,
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct StatusClient {
    client: Client,
    base_url: String,
}

/// Handle bound to exactly one account's token.
#[derive(Clone)]
pub struct AccountClient {
    client: Client,
    base_url: String,
    token: String,
}

impl StatusClient {
    /// Create a client with the standard 60 second per-call timeout
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base_url: DEFAULT_API_URL.to_string(),
        })
    }

    /// Point the client at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create a handle bound to one account, sharing the connection pool.
    pub fn with_token(&self, token: impl Into<String>) -> AccountClient {
        AccountClient {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: token.into(),
        }
    }
}

impl AccountClient {
    pub async fn set_presence(&self, presence: Presence) -> Result<(), ActionError> {
        self.call(
            SET_PRESENCE_METHOD,
            vec![("presence", presence.as_api_str().to_string())],
        )
        .await
    }

    /// Set the custom status. An expiration is only sent when positive.
    pub async fn set_status(
        &self,
        emoji: &str,
        text: &str,
        expiration: Option<i64>,
    ) -> Result<(), ActionError> {
        let profile = StatusProfile {
            status_text: text,
            status_emoji: emoji,
            status_expiration: expiration.filter(|at| *at > 0),
        };
        let profile = serde_json::to_string(&profile).map_err(ActionError::Encode)?;
        self.call(SET_PROFILE_METHOD, vec![("profile", profile)]).await
    }

    pub async fn clear_status(&self) -> Result<(), ActionError> {
        self.set_status("", "", None).await
    }

    async fn call(
        &self,
        method: &str,
        mut form: Vec<(&'static str, String)>,
    ) -> Result<(), ActionError> {
        form.push(("token", self.token.clone()));

        let url = format!("{}/{}", self.base_url, method);
        debug!(method, "Calling Web API");

        let response = self
            .client
            .post(&url)
            .header("Content-Charset", "utf-8")
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Self::check_envelope(status, &body)
    }

    fn check_envelope(status: StatusCode, body: &str) -> Result<(), ActionError> {
        let envelope: Envelope = serde_json::from_str(body)
            .map_err(|source| ActionError::decode(status, body, source))?;

        if envelope.ok {
            Ok(())
        } else {
            Err(ActionError::Remote(
                envelope.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ok() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"ok": true}))
    }

    fn client_for(server: &MockServer, token: &str) -> AccountClient {
        StatusClient::new()
            .unwrap()
            .with_base_url(server.uri())
            .with_token(token)
    }

    /// Decode the `profile` form field of every captured request.
    async fn sent_profiles(server: &MockServer) -> Vec<serde_json::Value> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|req| {
                url::form_urlencoded::parse(&req.body)
                    .find(|(k, _)| k == "profile")
                    .map(|(_, v)| serde_json::from_str(&v).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_check_envelope() {
        assert!(AccountClient::check_envelope(StatusCode::OK, r#"{"ok":true}"#).is_ok());

        let err = AccountClient::check_envelope(StatusCode::OK, r#"{"ok":false,"error":"not_authed"}"#)
            .unwrap_err();
        assert!(matches!(err, ActionError::Remote(ref m) if m == "not_authed"));

        let err = AccountClient::check_envelope(StatusCode::OK, r#"{"ok":false}"#).unwrap_err();
        assert_eq!(err.to_string(), "unknown error");

        let err = AccountClient::check_envelope(StatusCode::OK, r#"{"error":"x"}"#).unwrap_err();
        assert!(matches!(err, ActionError::Decode { status: 200, .. }));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = StatusClient::new().unwrap().with_base_url("http://localhost:1/api/");
        assert_eq!(client.base_url, "http://localhost:1/api");

        let account = client.with_token("xoxp-9");
        assert_eq!(account.base_url, "http://localhost:1/api");
        assert_eq!(account.token, "xoxp-9");
    }

    #[tokio::test]
    async fn test_set_presence_online_sends_auto() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users.setPresence"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("presence=auto"))
            .and(body_string_contains("token=xoxp-1"))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, "xoxp-1").set_presence(Presence::Online).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_set_presence_away() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users.setPresence"))
            .and(body_string_contains("presence=away"))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, "xoxp-1").set_presence(Presence::Away).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_payload_with_expiration() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users.profile.set"))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server, "xoxp-1")
            .set_status(":palm_tree:", "out \"of\" office", Some(1_700_000_000))
            .await?;

        let profiles = sent_profiles(&server).await;
        assert_eq!(
            profiles,
            vec![json!({
                "status_text": "out \"of\" office",
                "status_emoji": ":palm_tree:",
                "status_expiration": 1_700_000_000,
            })]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_omits_non_positive_expiration() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users.profile.set"))
            .respond_with(ok())
            .mount(&server)
            .await;

        let client = client_for(&server, "xoxp-1");
        client.set_status(":x:", "busy", None).await?;
        client.set_status(":x:", "busy", Some(0)).await?;

        for profile in sent_profiles(&server).await {
            assert!(profile.get("status_expiration").is_none());
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_status_twice() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users.profile.set"))
            .respond_with(ok())
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server, "xoxp-1");
        client.clear_status().await?;
        client.clear_status().await?;

        let profiles = sent_profiles(&server).await;
        assert_eq!(profiles.len(), 2);
        for profile in profiles {
            assert_eq!(profile, json!({"status_text": "", "status_emoji": ""}));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "invalid_auth"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server, "bad").clear_status().await.unwrap_err();
        assert!(matches!(err, ActionError::Remote(ref m) if m == "invalid_auth"));
    }

    #[tokio::test]
    async fn test_malformed_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, "tok")
            .set_presence(Presence::Away)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Decode { status: 502, .. }));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ok().set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = StatusClient::with_timeout(Duration::from_millis(100))
            .unwrap()
            .with_base_url(server.uri())
            .with_token("tok");
        let err = client.clear_status().await.unwrap_err();
        assert!(matches!(err, ActionError::Transport(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = StatusClient::new()
            .unwrap()
            .with_base_url("http://127.0.0.1:1")
            .with_token("tok");
        let err = client.set_presence(Presence::Online).await.unwrap_err();
        assert!(matches!(err, ActionError::Transport(_)));
    }
}
