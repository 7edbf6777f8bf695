//! # Google Sheets
//!
//! Spreadsheet backing both catalogs and the order log.
//!
//! ## Sheets
//! - `Recipes`: description, price, name, then up to 24 ingredient columns
//! - `Packages`: type, container size, discount (`"10%"`)
//! - `Orders`: date, phone, name, email, address, recipe, pounds, packaging, coupon, total
//!
//! ## Auth
//! - Service account key, either inline JSON or a key file, see [`CredentialSource`]
//! - Signed RS256 assertion exchanged for a bearer token (OAuth2 JWT bearer grant)
//! - Token is cached and refreshed a minute before it expires
//!
//! ## Commands
//!
//! Read a range by hand.
//! ```sh
//! curl -H "Authorization: Bearer $TOKEN" \
//!   "https://sheets.googleapis.com/v4/spreadsheets/$SPREADSHEET_ID/values/Packages!A2:C"
//! ```
use std::{
    fs::read_to_string,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    config::{Config, CredentialSource},
    store::{CatalogStore, OrderStore, Row, StoreError},
};

pub const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60);
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Clone, Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

impl ServiceAccountKey {
    pub fn load(source: &CredentialSource) -> Result<Self, StoreError> {
        let raw = match source {
            CredentialSource::Inline(json) => json.clone(),
            CredentialSource::File(path) => read_to_string(path).map_err(|e| {
                StoreError::Credentials(format!("cannot read {}: {e}", path.display()))
            })?,
        };

        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Credentials(format!("malformed service account key: {e}")))
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

pub struct TokenProvider {
    key: ServiceAccountKey,
    token_url: String,
    http: Client,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(key: ServiceAccountKey, token_url: Option<String>, http: Client) -> Self {
        let token_url = token_url.unwrap_or_else(|| key.token_uri.clone());

        Self {
            key,
            token_url,
            http,
            cached: Mutex::new(None),
        }
    }

    pub async fn token(&self) -> Result<String, StoreError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + REFRESH_MARGIN {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch().await?;
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }

    async fn fetch(&self) -> Result<AccessToken, StoreError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| StoreError::Credentials(e.to_string()))?
            .as_secs();

        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPE,
            aud: &self.token_url,
            iat: now,
            exp: now + TOKEN_LIFETIME.as_secs(),
        };

        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?;

        let response = self
            .http
            .post(&self.token_url)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let body: TokenResponse = check(response).await?.json().await?;
        let lifetime = body
            .expires_in
            .map_or(TOKEN_LIFETIME, Duration::from_secs);

        info!("Fetched access token for {}", self.key.client_email);

        Ok(AccessToken {
            value: body.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

pub struct SheetsStore {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    tokens: TokenProvider,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetsStore {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let key = ServiceAccountKey::load(&config.credentials)?;
        let http = Client::new();

        Ok(Self {
            tokens: TokenProvider::new(key, config.token_url.clone(), http.clone()),
            http,
            base_url: config.sheets_api_url.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            encode_range(range)
        )
    }
}

#[async_trait]
impl CatalogStore for SheetsStore {
    async fn read(&self, range: &str) -> Result<Vec<Row>, StoreError> {
        let token = self.tokens.token().await?;

        let response = self
            .http
            .get(self.values_url(range))
            .bearer_auth(token)
            .send()
            .await?;

        let body: ValueRange = check(response).await?.json().await?;

        #[cfg(feature = "verbose")]
        debug!("Read {} rows from {range}", body.values.len());

        Ok(body.values.into_iter().map(into_row).collect())
    }
}

#[async_trait]
impl OrderStore for SheetsStore {
    async fn append(&self, range: &str, row: Row) -> Result<(), StoreError> {
        let token = self.tokens.token().await?;
        let url = format!("{}:append", self.values_url(range));

        let response = self
            .http
            .post(url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;

        check(response).await?;
        debug!("Appended row to {range}");

        Ok(())
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

fn into_row(cells: Vec<Value>) -> Row {
    cells
        .into_iter()
        .map(|cell| match cell {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect()
}

/// Sheet names may contain spaces, the rest of A1 notation is path safe.
fn encode_range(range: &str) -> String {
    range.replace('%', "%25").replace(' ', "%20")
}
