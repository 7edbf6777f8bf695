use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{
    app,
    catalog::{PACKAGES_RANGE, RECIPES_RANGE},
    config::Config,
    intake::ORDERS_RANGE,
    state::State,
    store::{CatalogStore, MemoryStore},
};
use tower::ServiceExt;

fn store() -> Arc<MemoryStore> {
    Arc::new(
        MemoryStore::new()
            .with_rows(
                RECIPES_RANGE,
                [
                    vec!["Grass fed beef", "10", "Beef", "beef", "liver"],
                    vec!["Lean turkey", "8.50", "Turkey"],
                ],
            )
            .with_rows(PACKAGES_RANGE, [vec!["Tubs", "1", "10%"], vec!["Bulk", "5"]]),
    )
}

fn router(store: Arc<MemoryStore>) -> Router {
    app(State::with_store(Config::default(), store))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_order(body: Value) -> Request<Body> {
    Request::post("/api/order")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn order() -> Value {
    json!({
        "phone": "5551234567",
        "name": "Rex Owner",
        "email": "rex@example.com",
        "address": "1 Bark Ln",
        "recipe": "Beef",
        "pounds": 3,
        "packaging": "Tubs - 1 lb per container",
        "coupon": "",
        "subtotal": "30.00",
        "discount": "3.00",
        "tax": "1.79",
        "total": "28.79"
    })
}

#[tokio::test]
async fn test_recipes() {
    let (status, body) = send(router(store()), get("/api/recipes")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "name": "Beef",
                "unitPrice": "10",
                "description": "Grass fed beef",
                "ingredients": ["beef", "liver"]
            },
            {
                "name": "Turkey",
                "unitPrice": "8.50",
                "description": "Lean turkey",
                "ingredients": []
            }
        ])
    );
}

#[tokio::test]
async fn test_packages_default_discount() {
    let (status, body) = send(router(store()), get("/api/packages")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["type"], "Tubs");
    assert_eq!(body[0]["discountPercent"], "10");
    assert_eq!(body[1]["containerSize"], "5");
    assert_eq!(body[1]["discountPercent"], "0");
}

#[tokio::test]
async fn test_catalog_store_down() {
    let store = store();
    store.set_offline(true);

    let (status, body) = send(router(store.clone()), get("/api/recipes")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "Error fetching Recipes sheet");

    let (status, _) = send(router(store), get("/api/packages")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_order_appends_row() {
    let store = store();

    let (status, body) = send(router(store.clone()), post_order(order())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Order added successfully!" }));

    let rows = store.read(ORDERS_RANGE).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0][1..],
        [
            "5551234567",
            "Rex Owner",
            "rex@example.com",
            "1 Bark Ln",
            "Beef",
            "3",
            "Tubs - 1 lb per container",
            "",
            "28.79",
        ]
    );
}

#[tokio::test]
async fn test_order_missing_fields() {
    let store = store();
    let mut payload = order();
    payload["email"] = json!("");

    let (status, body) = send(router(store.clone()), post_order(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([{ "field": "email", "message": "Email is required" }])
    );
    assert!(store.read(ORDERS_RANGE).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_order_malformed() {
    let request = Request::post("/api/order")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(router(store()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Malformed payload");
}

#[tokio::test]
async fn test_order_store_down() {
    let store = store();
    store.set_offline(true);

    let (status, body) = send(router(store), post_order(order())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Failed to add order" }));
}

#[tokio::test]
async fn test_orders_listing() {
    let store = store();
    let router = router(store);

    let (status, _) = send(router.clone(), post_order(order())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(router, get("/api/orders")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0][9], "28.79");
}
