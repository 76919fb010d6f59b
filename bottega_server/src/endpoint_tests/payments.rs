use actix_web::{http::StatusCode, web, web::ServiceConfig};
use bottega_common::Money;
use bottega_engine::{
    db_types::{FullOrder, NewPayment, Order, OrderStatus, Payment, PaymentMethod, PaymentStatus, ShippingMethod},
    traits::OrderFlowError,
    OrderFlowApi,
    OrderQueryApi,
};
use chrono::{TimeZone, Utc};

use super::helpers::{get_request, post_request};
use crate::{
    endpoint_tests::mocks::MockMarketDb,
    routes::{PaymentForOrderRoute, RecordPaymentRoute},
};

#[actix_web::test]
async fn record_a_payment() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request(Some((1, "customer")), "/payments", &payment_request(), configure_record).await.expect("Request failed");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, PAYMENT_RESULT_JSON);
}

#[actix_web::test]
async fn the_amount_must_match_exactly() {
    let _ = env_logger::try_init().ok();
    let mut payment = payment_request();
    payment.amount = Money::from(4500);
    let (status, body) =
        post_request(Some((1, "customer")), "/payments", &payment, configure_mismatch).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Payment amount €45.00 does not match the order total €44.99"}"#);
}

#[actix_web::test]
async fn duplicate_payments_are_a_conflict() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request(Some((1, "customer")), "/payments", &payment_request(), configure_duplicate).await.expect("Request failed");
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, r#"{"error":"Order 42 already has a payment recorded against it"}"#);
}

#[actix_web::test]
async fn completed_payments_need_a_pending_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        post_request(Some((1, "customer")), "/payments", &payment_request(), configure_wrong_state).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"A completed payment requires a pending order, but order 42 is paid"}"#);
}

#[actix_web::test]
async fn fetch_the_payment_for_an_order() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request(Some((1, "customer")), "/payments/order/42", configure_lookup).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, PAYMENT_JSON);
}

#[actix_web::test]
async fn strangers_may_not_see_payments() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request(Some((5, "customer")), "/payments/order/42", configure_lookup).await.expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"user 5 (customer) may not view payments for order 42"}"#);
}

#[actix_web::test]
async fn an_unpaid_order_has_no_payment() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request(Some((1, "customer")), "/payments/order/42", configure_unpaid).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"No payment has been recorded against order 42"}"#);
}

fn payment_request() -> NewPayment {
    NewPayment::new(42, Money::from(4499), PaymentMethod::CreditCard, PaymentStatus::Completed)
        .with_transaction_id("txn-2042")
}

fn stored_payment() -> Payment {
    let paid_at = Utc.with_ymd_and_hms(2025, 3, 15, 11, 0, 0).unwrap();
    Payment {
        id: 1,
        order_id: 42,
        amount: Money::from(4499),
        payment_method: PaymentMethod::CreditCard,
        transaction_id: Some("txn-2042".to_string()),
        status: PaymentStatus::Completed,
        created_at: paid_at,
        updated_at: paid_at,
    }
}

// The order the payment lookups resolve against. Owned by customer 1.
fn paid_order() -> FullOrder {
    let placed = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
    let order = Order {
        id: 42,
        customer_id: 1,
        status: OrderStatus::Paid,
        total_amount: Money::from(4499),
        shipping_address: "12 Rue des Artisans, Lyon".to_string(),
        billing_address: None,
        shipping_method: Some(ShippingMethod::Standard),
        tracking_number: None,
        notes: None,
        created_at: placed,
        updated_at: placed,
    };
    FullOrder { order, items: vec![] }
}

fn configure_record(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_record_payment().returning(|_, _| Ok((stored_payment(), OrderStatus::Paid)));
    let api = OrderFlowApi::new(db);
    cfg.service(RecordPaymentRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_mismatch(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_record_payment().returning(|_, payment| {
        Err(OrderFlowError::AmountMismatch { expected: Money::from(4499), received: payment.amount })
    });
    let api = OrderFlowApi::new(db);
    cfg.service(RecordPaymentRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_duplicate(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_record_payment().returning(|_, payment| Err(OrderFlowError::DuplicatePayment(payment.order_id)));
    let api = OrderFlowApi::new(db);
    cfg.service(RecordPaymentRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_wrong_state(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_record_payment().returning(|_, payment| {
        Err(OrderFlowError::InvalidOrderState { order_id: payment.order_id, status: OrderStatus::Paid })
    });
    let api = OrderFlowApi::new(db);
    cfg.service(RecordPaymentRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_lookup(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_fetch_order().returning(|_| Ok(Some(paid_order())));
    db.expect_payment_for_order().returning(|_| Ok(Some(stored_payment())));
    let api = OrderQueryApi::new(db);
    cfg.service(PaymentForOrderRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_unpaid(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_fetch_order().returning(|_| Ok(Some(paid_order())));
    db.expect_payment_for_order().returning(|_| Ok(None));
    let api = OrderQueryApi::new(db);
    cfg.service(PaymentForOrderRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

const PAYMENT_JSON: &str = r#"{"id":1,"order_id":42,"amount":"44.99","payment_method":"credit_card","transaction_id":"txn-2042","status":"completed","created_at":"2025-03-15T11:00:00Z","updated_at":"2025-03-15T11:00:00Z"}"#;

const PAYMENT_RESULT_JSON: &str = r#"{"payment":{"id":1,"order_id":42,"amount":"44.99","payment_method":"credit_card","transaction_id":"txn-2042","status":"completed","created_at":"2025-03-15T11:00:00Z","updated_at":"2025-03-15T11:00:00Z"},"order_status":"paid"}"#;
