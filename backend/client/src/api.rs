use anyhow::{Context, Error, bail};
use kitchen::models::{Message, OrderSubmission, PackagingOption, Recipe};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

pub struct Api {
    http: Client,
    base_url: String,
}

impl Api {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET /api/{path}"))?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn recipes(&self) -> Result<Vec<Recipe>, Error> {
        self.get("recipes").await
    }

    pub async fn packages(&self) -> Result<Vec<PackagingOption>, Error> {
        self.get("packages").await
    }

    pub async fn orders(&self) -> Result<Vec<Vec<String>>, Error> {
        self.get("orders").await
    }

    pub async fn submit(&self, submission: &OrderSubmission) -> Result<Message, Error> {
        let response = self
            .http
            .post(self.url("order"))
            .json(submission)
            .send()
            .await
            .context("POST /api/order")?;

        Ok(check(response).await?.json().await?)
    }
}

async fn check(response: Response) -> Result<Response, Error> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Message>(&body).map_or(body, |m| m.message);

    bail!("{status}: {message}")
}
