use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MAX_INGREDIENTS: usize = 24;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub unit_price: Decimal,
    pub description: String,
    pub ingredients: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingOption {
    #[serde(rename = "type")]
    pub kind: String,
    pub container_size: Decimal,
    pub discount_percent: Decimal,
}

impl PackagingOption {
    /// Human readable label stored with the order, e.g. `Tubs - 2.5 lb per container`.
    pub fn label(&self) -> String {
        format!(
            "{} - {} lb per container",
            self.kind,
            self.container_size.normalize()
        )
    }
}

/// Body of `POST /api/order`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSubmission {
    pub phone: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub recipe: String,
    pub pounds: u32,
    pub packaging: String,
    pub coupon: String,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// One persisted order row. Column order matches the `Orders` sheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub date: String,
    pub phone: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub recipe: String,
    pub pounds: u32,
    pub packaging: String,
    pub coupon: String,
    pub total: Decimal,
}

impl OrderRecord {
    pub fn from_submission(date: impl Into<String>, submission: OrderSubmission) -> Self {
        Self {
            date: date.into(),
            phone: submission.phone,
            name: submission.name,
            email: submission.email,
            address: submission.address,
            recipe: submission.recipe,
            pounds: submission.pounds,
            packaging: submission.packaging,
            coupon: submission.coupon,
            total: submission.total,
        }
    }

    pub fn into_row(self) -> Vec<String> {
        vec![
            self.date,
            self.phone,
            self.name,
            self.email,
            self.address,
            self.recipe,
            self.pounds.to_string(),
            self.packaging,
            self.coupon,
            self.total.to_string(),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
