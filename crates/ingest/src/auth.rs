use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chronicle_core::config::Config;
use chronicle_core::error::{ChronicleError, Result};
use chronicle_core::transport::{HttpResponse, Method, Transport};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const INGESTION_SCOPE: &str = "https://www.googleapis.com/auth/malachite-ingestion";
pub const BACKSTORY_SCOPE: &str = "https://www.googleapis.com/auth/chronicle-backstory";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(raw).map_err(|e| {
            ChronicleError::Auth(format!("invalid Chronicle service account JSON: {e}"))
        })?;
        if key.client_email.trim().is_empty() {
            return Err(ChronicleError::Auth(
                "service account is missing client_email".to_string(),
            ));
        }
        key.encoding_key()?;
        Ok(key)
    }

    fn encoding_key(&self) -> Result<EncodingKey> {
        EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| ChronicleError::Auth(format!("invalid service account private key: {e}")))
    }
}

#[derive(Debug, Clone)]
pub enum Credentials {
    ServiceAccount(Box<ServiceAccountKey>),
    AccessToken(String),
}

impl Credentials {
    /// A configured access token wins over service account material.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        if let Some(token) = cfg.effective_access_token() {
            return Ok(Self::AccessToken(token.to_string()));
        }
        let raw = cfg.service_account_json()?;
        Ok(Self::ServiceAccount(Box::new(ServiceAccountKey::from_json(
            &raw,
        )?)))
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct Signer {
    key: EncodingKey,
    header: Header,
    client_email: String,
    token_uri: String,
    scope: String,
}

enum TokenSource {
    Static(String),
    ServiceAccount(Box<Signer>),
}

#[derive(Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(EXPIRY_SKEW_SECS) < self.expires_at
    }
}

/// reqwest client that attaches a bearer token for one set of scopes.
pub struct AuthorizedSession {
    client: Client,
    source: TokenSource,
    cache: Mutex<Option<CachedToken>>,
}

impl AuthorizedSession {
    pub fn new(credentials: Credentials, scopes: &[&str], timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChronicleError::Transport(format!("failed to build http client: {e}")))?;

        let source = match credentials {
            Credentials::AccessToken(token) => TokenSource::Static(token),
            Credentials::ServiceAccount(key) => {
                let mut header = Header::new(Algorithm::RS256);
                header.kid = key.private_key_id.clone();
                TokenSource::ServiceAccount(Box::new(Signer {
                    key: key.encoding_key()?,
                    header,
                    client_email: key.client_email.clone(),
                    token_uri: key.token_uri.clone(),
                    scope: scopes.join(" "),
                }))
            }
        };

        Ok(Self {
            client,
            source,
            cache: Mutex::new(None),
        })
    }

    pub fn from_config(cfg: &Config, scopes: &[&str]) -> Result<Self> {
        Self::new(Credentials::from_config(cfg)?, scopes, cfg.request_timeout)
    }

    pub async fn bearer_token(&self) -> Result<String> {
        let signer = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::ServiceAccount(signer) => signer,
        };

        let mut cache = self.cache.lock().await;
        let now = Utc::now();
        if let Some(token) = cache.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let token = self.exchange_assertion(signer, now).await?;
        let value = token.value.clone();
        *cache = Some(token);
        Ok(value)
    }

    async fn exchange_assertion(&self, signer: &Signer, now: DateTime<Utc>) -> Result<CachedToken> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &signer.client_email,
            scope: &signer.scope,
            aud: &signer.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let assertion = jsonwebtoken::encode(&signer.header, &claims, &signer.key)
            .map_err(|e| ChronicleError::Auth(format!("failed to sign token assertion: {e}")))?;

        tracing::debug!(token_uri = %signer.token_uri, "requesting access token");
        let resp = self
            .client
            .post(&signer.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| ChronicleError::Auth(format!("token request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChronicleError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let parsed: TokenResponse = resp
            .json()
            .await
            .map_err(|e| ChronicleError::Auth(format!("invalid token response: {e}")))?;
        let lifetime = parsed.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        Ok(CachedToken {
            value: parsed.access_token,
            expires_at: now + chrono::Duration::seconds(lifetime),
        })
    }
}

impl Transport for AuthorizedSession {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let token = self.bearer_token().await?;

        let mut req = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        req = req.bearer_auth(token);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        if let Some(body) = body {
            req = req.body(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ChronicleError::Transport(format!("{method} {url} failed: {e}")))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| {
            ChronicleError::Transport(format!("failed reading response from {url}: {e}"))
        })?;
        Ok(HttpResponse { status, body })
    }
}
