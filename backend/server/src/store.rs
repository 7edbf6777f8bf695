//! # Store
//!
//! Tabular storage behind the catalogs and the order log.
//!
//! Ranges use spreadsheet A1 notation, e.g. `Orders!A2:J`. Reads return rows
//! of cell strings with trailing empty cells omitted. Appends are a single
//! atomic call, so a failed append leaves nothing behind.
//!
//! - [`SheetsStore`](crate::sheets::SheetsStore): Google Sheets, used in production
//! - [`MemoryStore`]: in-process rows for local runs and tests
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::RwLock;

pub type Row = Vec<String>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store responded {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Credentials unavailable: {0}")]
    Credentials(String),

    #[error("Failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Store offline")]
    Offline,
}

#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    async fn read(&self, range: &str) -> Result<Vec<Row>, StoreError>;
}

#[async_trait]
pub trait OrderStore: CatalogStore {
    async fn append(&self, range: &str, row: Row) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    ranges: RwLock<HashMap<String, Vec<Row>>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows<I, R, C>(mut self, range: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        self.ranges.get_mut().insert(range.to_string(), rows);
        self
    }

    /// Every call fails with [`StoreError::Offline`] while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(StoreError::Offline);
        }

        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn read(&self, range: &str) -> Result<Vec<Row>, StoreError> {
        self.check()?;

        Ok(self.ranges.read().await.get(range).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn append(&self, range: &str, row: Row) -> Result<(), StoreError> {
        self.check()?;

        self.ranges
            .write()
            .await
            .entry(range.to_string())
            .or_default()
            .push(row);

        Ok(())
    }
}
