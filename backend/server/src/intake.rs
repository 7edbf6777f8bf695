use chrono::Local;
use kitchen::models::{OrderRecord, OrderSubmission};
use tracing::info;

use crate::store::{OrderStore, Row, StoreError};

pub const ORDERS_RANGE: &str = "Orders!A2:J";

/// Order date as the shop reads it, e.g. `3/14/2026`.
pub fn today() -> String {
    Local::now().date_naive().format("%-m/%-d/%Y").to_string()
}

pub async fn submit_order(
    store: &dyn OrderStore,
    submission: OrderSubmission,
) -> Result<OrderRecord, StoreError> {
    let record = OrderRecord::from_submission(today(), submission);

    store.append(ORDERS_RANGE, record.clone().into_row()).await?;
    info!(
        "Order added: {} lb of {} for {}, total {}",
        record.pounds, record.recipe, record.name, record.total
    );

    Ok(record)
}

pub async fn list_orders(store: &dyn OrderStore) -> Result<Vec<Row>, StoreError> {
    store.read(ORDERS_RANGE).await
}
