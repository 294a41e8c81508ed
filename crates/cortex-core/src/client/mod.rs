//! API client for the Cortex backend.
//!
//! One wrapper per backend operation over a shared transport helper. The
//! helper attaches the JSON content type and the bearer credential when one
//! is stored, and folds every non-success response into [`Error::Api`] so
//! callers have a single failure path.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cortex_core::{ApiClient, Config, FileCredentialStore};
//!
//! #[tokio::main]
//! async fn main() -> cortex_core::Result<()> {
//!     let config = Config::load()?;
//!     let store = Arc::new(FileCredentialStore::new(config.token_path()));
//!     let client = ApiClient::new(&config, store)?;
//!     let profiles = client.list_profiles().await?;
//!     println!("{} profiles", profiles.len());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::CredentialStore;
use crate::types::{
    AiProfile, ApiKeyBundle, AssistantConfig, Credential, NewUser, Preferences, ProfileId,
};

/// API client for the Cortex backend
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client
    client: reqwest::Client,
    /// Base URL, no trailing slash
    base_url: String,
    /// Credential store consulted on every request
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Create a new API client from config and a credential store.
    pub fn new(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api.url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Assistant Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Submit a full assistant configuration for profile generation.
    pub async fn generate_profile(&self, config: &AssistantConfig) -> Result<AiProfile> {
        self.post("/ai-profile", config).await
    }

    /// List assistant profiles stored on the backend.
    pub async fn list_profiles(&self) -> Result<Vec<AiProfile>> {
        self.get("/ai_profiles").await
    }

    /// Fine-tune a model. `fine_tune_params` is caller data forwarded
    /// verbatim inside the `{model_id, fine_tune_params}` wrapper.
    pub async fn fine_tune_model(&self, model_id: &str, fine_tune_params: &Value) -> Result<Value> {
        let body = FineTuneRequest {
            model_id: model_id.to_string(),
            fine_tune_params: fine_tune_params.clone(),
        };
        self.post("/fine_tune_model", &body).await
    }

    /// Deploy an assistant built from an existing profile.
    pub async fn deploy_assistant(
        &self,
        profile_id: &ProfileId,
        deployment_params: &Value,
    ) -> Result<Value> {
        let body = DeployRequest {
            profile_id: profile_id.clone(),
            deployment_params: deployment_params.clone(),
        };
        self.post("/deploy_ai_assistant", &body).await
    }

    /// Train the backend PPO agent.
    pub async fn train_ppo(&self, total_timesteps: u64) -> Result<Value> {
        let body = TrainPpoRequest { total_timesteps };
        self.post("/train_ppo", &body).await
    }

    /// Initialize the backend GNN model with arbitrary parameters.
    pub async fn init_gnn(&self, params: &Value) -> Result<Value> {
        self.post("/init_gnn", params).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Account Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a new account. Returns the credential the caller should hand
    /// to the session gate.
    pub async fn register(&self, new_user: &NewUser) -> Result<Credential> {
        self.post("/register", new_user).await
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/login", &body).await
    }

    /// Create a user record (admin operation).
    pub async fn create_user(&self, new_user: &NewUser) -> Result<Value> {
        self.post("/users", new_user).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preferences & API Keys
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the stored preferences of the current user.
    pub async fn get_preferences(&self) -> Result<Preferences> {
        self.get("/users/me/preferences").await
    }

    /// Replace the stored preferences wholesale.
    pub async fn set_preferences(&self, preferences: &Preferences) -> Result<Preferences> {
        self.put("/users/me/preferences", preferences).await
    }

    /// Fetch the stored API key bundle of the current user.
    pub async fn get_api_keys(&self) -> Result<ApiKeyBundle> {
        self.get("/users/me/api_keys").await
    }

    /// Replace the stored API key bundle wholesale.
    pub async fn update_api_keys(&self, keys: &ApiKeyBundle) -> Result<ApiKeyBundle> {
        self.put("/users/me/api_keys", keys).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // HTTP Helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::GET, path, Option::<&()>::None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// Perform a request and normalize the outcome: success statuses yield
    /// the parsed JSON body unchanged, everything else becomes [`Error::Api`]
    /// carrying the server-supplied message.
    async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("API request: {} {}", method, url);

        let mut req = self.client.request(method.clone(), &url);

        if let Some(token) = self.credentials.get() {
            req = req.bearer_auth(token);
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            resp.json()
                .await
                .map_err(|e| Error::Deserialize(e.to_string()))
        } else {
            let text = resp.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            warn!(
                "API request failed: {} {} -> {}: {}",
                method,
                path,
                status.as_u16(),
                message
            );
            Err(Error::api(status.as_u16(), message))
        }
    }
}

/// Extract the server-supplied error message from a failure body.
///
/// The backend answers with `{"error": ...}` on most routes and
/// `{"detail": ...}` on a few; anything else falls back to the raw status
/// and text. The result is never empty.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "detail"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                if !message.is_empty() {
                    return message.to_string();
                }
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        format!("API error {status}")
    } else {
        format!("API error {status}: {body}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

/// Fine-tune request wrapper
#[derive(Debug, Serialize)]
pub struct FineTuneRequest {
    pub model_id: String,
    pub fine_tune_params: Value,
}

/// Deploy request wrapper
#[derive(Debug, Serialize)]
pub struct DeployRequest {
    pub profile_id: ProfileId,
    pub deployment_params: Value,
}

/// PPO training request
#[derive(Debug, Serialize)]
pub struct TrainPpoRequest {
    pub total_timesteps: u64,
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryCredentialStore, SessionGate};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on an ephemeral port and hand back the
    /// raw bytes of the request that was received.
    async fn one_shot_server(
        response: String,
    ) -> (std::net::SocketAddr, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = sock.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            sock.write_all(response.as_bytes()).await.expect("write");
            let _ = sock.shutdown().await;
            request
        });

        (addr, handle)
    }

    /// Headers received in full, plus content-length bytes of body.
    fn request_complete(raw: &[u8]) -> bool {
        let Some(header_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&raw[..header_end]);
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        raw.len() >= header_end + 4 + content_length
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn test_client(addr: std::net::SocketAddr) -> (ApiClient, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::default());
        let mut config = Config::default();
        config.api.url = format!("http://{addr}");
        let client = ApiClient::new(&config, store.clone()).expect("client");
        (client, store)
    }

    fn request_body(raw: &[u8]) -> Value {
        let text = String::from_utf8_lossy(raw);
        let body = text.split("\r\n\r\n").nth(1).expect("request body");
        serde_json::from_str(body).expect("request body is JSON")
    }

    // ─── Transport ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_success_body_round_trips_unmodified() {
        let body = json!({
            "id": 1,
            "base_model": "gpt4mini",
            "always_on": false,
            "communication_style": 50,
            "memory_modules": ["regular", "legal"],
        });
        let (addr, _handle) =
            one_shot_server(http_response("201 Created", &body.to_string())).await;
        let (client, _) = test_client(addr);

        let profile = client
            .generate_profile(&AssistantConfig::default())
            .await
            .expect("profile");

        assert_eq!(serde_json::to_value(&profile).unwrap(), body);
    }

    #[tokio::test]
    async fn test_structured_error_payload_surfaces_server_message() {
        let (addr, _handle) = one_shot_server(http_response(
            "500 Internal Server Error",
            r#"{"error":"db down"}"#,
        ))
        .await;
        let (client, _) = test_client(addr);

        let err = client.get_preferences().await.expect_err("should fail");
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "db down");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_detail_error_payload_surfaces_server_message() {
        let (addr, _handle) = one_shot_server(http_response(
            "500 Internal Server Error",
            r#"{"detail":"model not loaded"}"#,
        ))
        .await;
        let (client, _) = test_client(addr);

        let err = client.get_preferences().await.expect_err("should fail");
        assert_eq!(err.to_string(), "model not loaded");
    }

    #[tokio::test]
    async fn test_unparseable_error_body_falls_back_nonempty() {
        let (addr, _handle) =
            one_shot_server(http_response("502 Bad Gateway", "<html>bad gateway</html>")).await;
        let (client, _) = test_client(addr);

        let err = client.list_profiles().await.expect_err("should fail");
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 502);
                assert!(!message.is_empty());
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_network_failure_is_not_an_api_error() {
        // Nothing listens on this socket; bind-then-drop reserves a dead port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (client, _) = test_client(addr);
        let err = client.list_profiles().await.expect_err("should fail");
        assert!(matches!(err, Error::Network(_)));
    }

    // ─── Wire contract ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_fine_tune_wraps_model_and_params() {
        let (addr, handle) =
            one_shot_server(http_response("200 OK", r#"{"status":"success"}"#)).await;
        let (client, _) = test_client(addr);

        let params = json!({"learningRate": 0.0003});
        client
            .fine_tune_model("m1", &params)
            .await
            .expect("fine-tune");

        let raw = handle.await.unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(text.starts_with("POST /fine_tune_model HTTP/1.1"));
        assert_eq!(
            request_body(&raw),
            json!({"model_id": "m1", "fine_tune_params": {"learningRate": 0.0003}})
        );
    }

    #[tokio::test]
    async fn test_deploy_wraps_profile_and_params() {
        let (addr, handle) =
            one_shot_server(http_response("201 Created", r#"{"status":"deployed"}"#)).await;
        let (client, _) = test_client(addr);

        let params = json!({"environment": "production"});
        client
            .deploy_assistant(&ProfileId::Int(1), &params)
            .await
            .expect("deploy");

        let raw = handle.await.unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(text.starts_with("POST /deploy_ai_assistant HTTP/1.1"));
        assert_eq!(
            request_body(&raw),
            json!({"profile_id": 1, "deployment_params": {"environment": "production"}})
        );
    }

    #[tokio::test]
    async fn test_train_ppo_body_shape() {
        let (addr, handle) =
            one_shot_server(http_response("200 OK", r#"{"status":"training"}"#)).await;
        let (client, _) = test_client(addr);

        client.train_ppo(10000).await.expect("train");

        let raw = handle.await.unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(text.starts_with("POST /train_ppo HTTP/1.1"));
        assert_eq!(request_body(&raw), json!({"total_timesteps": 10000}));
    }

    #[tokio::test]
    async fn test_preferences_put_sends_record_wholesale() {
        let prefs_body = r#"{"personality":"friendly","tasks":["task1"],"useCases":["useCase1"]}"#;
        let (addr, handle) = one_shot_server(http_response("200 OK", prefs_body)).await;
        let (client, store) = test_client(addr);
        store.set("tok").unwrap();

        let mut prefs = Preferences {
            personality: "friendly".to_string(),
            ..Preferences::default()
        };
        prefs.toggle_task("task1");
        prefs.toggle_use_case("useCase1");

        let saved = client.set_preferences(&prefs).await.expect("save");
        assert_eq!(saved, prefs);

        let raw = handle.await.unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(text.starts_with("PUT /users/me/preferences HTTP/1.1"));
        assert_eq!(
            request_body(&raw),
            json!({"personality": "friendly", "tasks": ["task1"], "useCases": ["useCase1"]})
        );
    }

    // ─── Auth ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_login_scenario_establishes_session() {
        let (addr, handle) = one_shot_server(http_response("200 OK", r#"{"token":"t1"}"#)).await;
        let (client, store) = test_client(addr);
        let gate = SessionGate::new(store.clone());
        assert!(!gate.is_authenticated());

        let credential = client.login("a@b.com", "x").await.expect("login");
        assert_eq!(credential.token, "t1");

        // The caller hands the credential to the gate
        gate.establish(&credential.token).unwrap();
        assert!(gate.is_authenticated());
        assert_eq!(store.get().as_deref(), Some("t1"));

        let raw = handle.await.unwrap();
        assert_eq!(
            request_body(&raw),
            json!({"email": "a@b.com", "password": "x"})
        );
    }

    #[tokio::test]
    async fn test_bearer_credential_attached_when_present() {
        let (addr, handle) = one_shot_server(http_response("200 OK", "[]")).await;
        let (client, store) = test_client(addr);
        store.set("tok-123").unwrap();

        client.list_profiles().await.expect("list");

        let raw = handle.await.unwrap();
        let text = String::from_utf8_lossy(&raw).to_lowercase();
        assert!(text.contains("authorization: bearer tok-123"));
    }

    #[tokio::test]
    async fn test_no_credential_no_auth_header() {
        let (addr, handle) = one_shot_server(http_response("200 OK", "[]")).await;
        let (client, _) = test_client(addr);

        client.list_profiles().await.expect("list");

        let raw = handle.await.unwrap();
        let text = String::from_utf8_lossy(&raw).to_lowercase();
        assert!(!text.contains("authorization:"));
    }

    // ─── Error message extraction ───────────────────────────────────────────

    #[test]
    fn test_error_message_prefers_error_key() {
        let message = error_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"db down","detail":"ignored"}"#,
        );
        assert_eq!(message, "db down");
    }

    #[test]
    fn test_error_message_falls_back_to_detail_key() {
        let message = error_message(StatusCode::NOT_FOUND, r#"{"detail":"No preferences found"}"#);
        assert_eq!(message, "No preferences found");
    }

    #[test]
    fn test_error_message_nonempty_for_garbage() {
        let message = error_message(StatusCode::BAD_GATEWAY, "<html></html>");
        assert!(!message.is_empty());
        assert!(message.contains("502"));
    }

    #[test]
    fn test_error_message_nonempty_for_empty_body() {
        let message = error_message(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(!message.is_empty());
    }

    #[test]
    fn test_error_message_ignores_non_string_error_field() {
        let message = error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":{"code":1}}"#);
        assert!(!message.is_empty());
        assert!(message.contains("500"));
    }
}
