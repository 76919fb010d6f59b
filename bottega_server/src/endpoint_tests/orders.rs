use actix_web::{http::StatusCode, web, web::ServiceConfig};
use anyhow::anyhow;
use bottega_common::Money;
use bottega_engine::{
    db_types::{FullOrder, NewOrder, Order, OrderItem, OrderLine, OrderStatus, ShippingMethod, StatusUpdate},
    traits::OrderFlowError,
    OrderFlowApi,
    OrderQueryApi,
};
use chrono::{TimeZone, Utc};

use super::helpers::{get_request, post_request, put_request};
use crate::{
    endpoint_tests::mocks::MockMarketDb,
    routes::{CreateOrderRoute, GetOrderRoute, ListOrdersRoute, UpdateOrderStatusRoute},
};

#[actix_web::test]
async fn requests_without_identity_headers_are_unauthorized() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(None, "/orders/42", configure_fetch).await.expect("Request failed");
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"No user identity was supplied with the request"}"#);
}

#[actix_web::test]
async fn a_garbled_role_header_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(Some((1, "overlord")), "/orders/42", configure_fetch).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Could not read the user identity headers. x-user-role is not a known role"}"#);
}

#[actix_web::test]
async fn place_an_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request(Some((1, "customer")), "/orders", &order_request(), configure_create).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, FULL_ORDER_JSON);
}

#[actix_web::test]
async fn only_customers_place_orders() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request(Some((3, "artisan")), "/orders", &order_request(), configure_create).await.expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Only customers can place orders, not artisan"}"#);
}

#[actix_web::test]
async fn fetch_an_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(Some((1, "customer")), "/orders/42", configure_fetch).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, FULL_ORDER_JSON);
}

#[actix_web::test]
async fn other_customers_orders_stay_hidden() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(Some((2, "customer")), "/orders/42", configure_fetch).await.expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"user 2 (customer) may not view order 42"}"#);
}

#[actix_web::test]
async fn a_missing_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(Some((1, "customer")), "/orders/99", configure_missing).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The requested order (id 99) does not exist"}"#);
}

#[actix_web::test]
async fn list_my_orders() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request(Some((1, "customer")), "/orders?status=paid,cancelled", configure_list).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ORDER_LIST_JSON);
}

#[actix_web::test]
async fn an_unknown_status_filter_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request(Some((1, "customer")), "/orders?status=pending,unknowable", configure_list).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Could not read request query: unknowable is not an order status"}"#);
}

#[actix_web::test]
async fn pagination_metadata_rides_along() -> anyhow::Result<()> {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request(Some((1, "customer")), "/orders?page=2&limit=1", configure_second_page)
        .await
        .map_err(|e| anyhow!(e))?;
    assert_eq!(status, StatusCode::OK);
    let list: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(list["total_items"], 2);
    assert_eq!(list["total_pages"], 2);
    assert_eq!(list["current_page"], 2);
    Ok(())
}

#[actix_web::test]
async fn ship_an_order() {
    let _ = env_logger::try_init().ok();
    let update = StatusUpdate::new(OrderStatus::Shipped).with_tracking_number("TRK-99");
    let (status, body) =
        put_request(Some((3, "artisan")), "/orders/42/status", &update, configure_ship).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SHIPPED_ORDER_JSON);
}

#[actix_web::test]
async fn an_illegal_move_is_refused() {
    let _ = env_logger::try_init().ok();
    let update = StatusUpdate::new(OrderStatus::Pending);
    let (status, body) =
        put_request(Some((1, "admin")), "/orders/42/status", &update, configure_stuck).await.expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Order 42 cannot move from delivered to pending. Allowed: delivered -> refunded"}"#);
}

fn order_request() -> NewOrder {
    NewOrder::new(vec![OrderLine::new(10, 1)], "12 Rue des Artisans, Lyon").with_shipping_method("standard")
}

fn stored_order() -> FullOrder {
    let placed = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
    let order = Order {
        id: 42,
        customer_id: 1,
        status: OrderStatus::Pending,
        total_amount: Money::from(4499),
        shipping_address: "12 Rue des Artisans, Lyon".to_string(),
        billing_address: None,
        shipping_method: Some(ShippingMethod::Standard),
        tracking_number: None,
        notes: None,
        created_at: placed,
        updated_at: placed,
    };
    let items = vec![OrderItem {
        id: 7,
        order_id: 42,
        product_id: 10,
        artisan_id: 3,
        quantity: 1,
        price_per_unit: Money::from(4000),
        created_at: placed,
    }];
    FullOrder { order, items }
}

fn shipped_order() -> FullOrder {
    let mut full_order = stored_order();
    full_order.order.status = OrderStatus::Shipped;
    full_order.order.tracking_number = Some("TRK-99".to_string());
    full_order
}

// Mock response to `search_orders` calls
fn orders_response() -> Vec<Order> {
    let base = stored_order().order;
    let paid = Order { status: OrderStatus::Paid, ..base.clone() };
    let cancelled = Order {
        id: 43,
        status: OrderStatus::Cancelled,
        total_amount: Money::from(12998),
        shipping_method: Some(ShippingMethod::Express),
        created_at: Utc.with_ymd_and_hms(2025, 4, 2, 18, 5, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2025, 4, 3, 8, 0, 0).unwrap(),
        ..base
    };
    vec![paid, cancelled]
}

fn configure_create(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_place_order().returning(|_, _| Ok(stored_order()));
    let api = OrderFlowApi::new(db);
    cfg.service(CreateOrderRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_fetch(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_fetch_order().returning(|_| Ok(Some(stored_order())));
    let api = OrderQueryApi::new(db);
    cfg.service(GetOrderRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_missing(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_fetch_order().returning(|_| Ok(None));
    let api = OrderQueryApi::new(db);
    cfg.service(GetOrderRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

// The filter reaching the backend must carry the caller's scope and the parsed status list
fn configure_list(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_search_orders()
        .withf(|query| {
            query.customer_id == Some(1) && query.status == Some(vec![OrderStatus::Paid, OrderStatus::Cancelled])
        })
        .returning(|_| Ok((orders_response(), 2)));
    let api = OrderQueryApi::new(db);
    cfg.service(ListOrdersRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_second_page(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_search_orders()
        .withf(|query| query.customer_id == Some(1) && query.page == Some(2) && query.limit == Some(1))
        .returning(|_| {
            let mut orders = orders_response();
            Ok((orders.split_off(1), 2))
        });
    let api = OrderQueryApi::new(db);
    cfg.service(ListOrdersRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_ship(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_update_order_status().returning(|_, _, _| Ok(shipped_order()));
    let api = OrderFlowApi::new(db);
    cfg.service(UpdateOrderStatusRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_stuck(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_update_order_status().returning(|order_id, _, update| {
        Err(OrderFlowError::InvalidTransition {
            order_id,
            from: OrderStatus::Delivered,
            to: update.status,
            explanation: "Allowed: delivered -> refunded".to_string(),
        })
    });
    let api = OrderFlowApi::new(db);
    cfg.service(UpdateOrderStatusRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

const FULL_ORDER_JSON: &str = r#"{"id":42,"customer_id":1,"status":"pending","total_amount":"44.99","shipping_address":"12 Rue des Artisans, Lyon","billing_address":null,"shipping_method":"standard","tracking_number":null,"notes":null,"created_at":"2025-03-14T09:30:00Z","updated_at":"2025-03-14T09:30:00Z","items":[{"id":7,"order_id":42,"product_id":10,"artisan_id":3,"quantity":1,"price_per_unit":"40.00","created_at":"2025-03-14T09:30:00Z"}]}"#;

const SHIPPED_ORDER_JSON: &str = r#"{"id":42,"customer_id":1,"status":"shipped","total_amount":"44.99","shipping_address":"12 Rue des Artisans, Lyon","billing_address":null,"shipping_method":"standard","tracking_number":"TRK-99","notes":null,"created_at":"2025-03-14T09:30:00Z","updated_at":"2025-03-14T09:30:00Z","items":[{"id":7,"order_id":42,"product_id":10,"artisan_id":3,"quantity":1,"price_per_unit":"40.00","created_at":"2025-03-14T09:30:00Z"}]}"#;

const ORDER_LIST_JSON: &str = r#"{"total_items":2,"total_pages":1,"current_page":1,"orders":[{"id":42,"customer_id":1,"status":"paid","total_amount":"44.99","shipping_address":"12 Rue des Artisans, Lyon","billing_address":null,"shipping_method":"standard","tracking_number":null,"notes":null,"created_at":"2025-03-14T09:30:00Z","updated_at":"2025-03-14T09:30:00Z"},{"id":43,"customer_id":1,"status":"cancelled","total_amount":"129.98","shipping_address":"12 Rue des Artisans, Lyon","billing_address":null,"shipping_method":"express","tracking_number":null,"notes":null,"created_at":"2025-04-02T18:05:00Z","updated_at":"2025-04-03T08:00:00Z"}]}"#;
