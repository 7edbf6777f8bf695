use std::sync::Arc;

use axum::{Json, extract, extract::rejection::JsonRejection};
use kitchen::models::{Message, OrderSubmission, PackagingOption, Recipe};

use crate::{
    catalog::{list_packaging_options, list_recipes},
    error::AppError,
    intake::{list_orders, submit_order},
    state::State,
    store::Row,
};

pub async fn recipes_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<Vec<Recipe>>, AppError> {
    let recipes = list_recipes(state.catalog.as_ref())
        .await
        .map_err(|source| AppError::StoreUnavailable {
            sheet: "Recipes",
            source,
        })?;

    Ok(Json(recipes))
}

pub async fn packages_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<Vec<PackagingOption>>, AppError> {
    let packages = list_packaging_options(state.catalog.as_ref())
        .await
        .map_err(|source| AppError::StoreUnavailable {
            sheet: "Packages",
            source,
        })?;

    Ok(Json(packages))
}

pub async fn order_handler(
    extract::State(state): extract::State<Arc<State>>,
    payload: Result<Json<OrderSubmission>, JsonRejection>,
) -> Result<Json<Message>, AppError> {
    let Json(submission) = payload?;

    let missing = submission.validate();
    if !missing.is_empty() {
        return Err(AppError::InvalidOrder(missing));
    }

    submit_order(state.orders.as_ref(), submission)
        .await
        .map_err(AppError::IntakeFailure)?;

    Ok(Json(Message::new("Order added successfully!")))
}

pub async fn orders_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Result<Json<Vec<Row>>, AppError> {
    let orders = list_orders(state.orders.as_ref())
        .await
        .map_err(|source| AppError::StoreUnavailable {
            sheet: "Orders",
            source,
        })?;

    Ok(Json(orders))
}
