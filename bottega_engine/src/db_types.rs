use std::{fmt::Display, str::FromStr};

use bottega_common::Money;
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------        Role          ---------------------------------------------------------
/// The capability a caller holds on the marketplace. Every engine operation receives the caller's role and acts on
/// it; credential verification happens upstream of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    /// Places orders and may cancel their own, early in the lifecycle.
    Customer,
    /// Fulfils orders that contain their products.
    Artisan,
    /// May drive the full order lifecycle.
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Artisan => write!(f, "artisan"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "artisan" => Ok(Self::Artisan),
            "admin" => Ok(Self::Admin),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------    UserIdentity      ---------------------------------------------------------
/// The authenticated caller of an engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: i64,
    pub role: Role,
}

impl UserIdentity {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl Display for UserIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user {} ({})", self.user_id, self.role)
    }
}

//--------------------------------------     OrderStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    /// The order exists but no payment has been recorded against it.
    Pending,
    /// A completed payment covering the full order total has been recorded.
    Paid,
    /// An artisan or admin is preparing the order.
    Processing,
    Shipped,
    Delivered,
    /// Terminal. The order was called off before delivery.
    Cancelled,
    /// Terminal.
    Refunded,
}

impl OrderStatus {
    /// Terminal states have no outgoing transitions for any role.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
            OrderStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to pending");
            OrderStatus::Pending
        })
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------   ShippingMethod     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ShippingMethod {
    Standard,
    Express,
    /// Only available once the order subtotal reaches the free-shipping threshold.
    Free,
}

impl ShippingMethod {
    /// The flat surcharge added to the order subtotal for this method.
    pub fn surcharge(&self) -> Money {
        match self {
            ShippingMethod::Standard => Money::from(499),
            ShippingMethod::Express => Money::from(999),
            ShippingMethod::Free => Money::default(),
        }
    }
}

impl Display for ShippingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShippingMethod::Standard => write!(f, "standard"),
            ShippingMethod::Express => write!(f, "express"),
            ShippingMethod::Free => write!(f, "free"),
        }
    }
}

impl FromStr for ShippingMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "free" => Ok(Self::Free),
            s => Err(ConversionError(format!("Invalid shipping method: {s}"))),
        }
    }
}

//--------------------------------------   PaymentMethod      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
    Other,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::CreditCard => write!(f, "credit_card"),
            PaymentMethod::Paypal => write!(f, "paypal"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Other => write!(f, "other"),
        }
    }
}

//--------------------------------------   PaymentStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    /// The funds cleared. Recording a completed payment moves a pending order to paid.
    Completed,
    Failed,
    Refunded,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

//--------------------------------------      Product         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub artisan_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock_quantity: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       Order          ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub shipping_address: String,
    pub billing_address: Option<String>,
    pub shipping_method: Option<ShippingMethod>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     OrderItem        ---------------------------------------------------------
/// A single line of an order. The unit price and the product's artisan are snapshotted at placement time, so later
/// edits to the product never change what was sold.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub artisan_id: i64,
    pub quantity: i64,
    pub price_per_unit: Money,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      Payment         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     NewProduct       ---------------------------------------------------------
/// A product record for provisioning. The engine never creates products as part of the order flow; this exists for
/// seeding and tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub artisan_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock_quantity: i64,
    pub is_active: bool,
}

impl NewProduct {
    pub fn new<S: Into<String>>(artisan_id: i64, name: S, price: Money, stock_quantity: i64) -> Self {
        Self { artisan_id, name: name.into(), description: None, price, stock_quantity, is_active: true }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

//--------------------------------------      NewOrder        ---------------------------------------------------------
/// A customer's request to place an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub items: Vec<OrderLine>,
    pub shipping_address: String,
    #[serde(default)]
    pub billing_address: Option<String>,
    /// The shipping method keyword as supplied by the client. It is validated during pricing rather than during
    /// deserialization, so an unknown keyword is a business-rule rejection and not a parse failure.
    #[serde(default)]
    pub shipping_method: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewOrder {
    pub fn new<S: Into<String>>(items: Vec<OrderLine>, shipping_address: S) -> Self {
        Self {
            items,
            shipping_address: shipping_address.into(),
            billing_address: None,
            shipping_method: None,
            notes: None,
        }
    }

    pub fn with_shipping_method<S: Into<String>>(mut self, method: S) -> Self {
        self.shipping_method = Some(method.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i64,
}

impl OrderLine {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

//--------------------------------------    StatusUpdate      ---------------------------------------------------------
/// A request to move an order to a new status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    /// Only applied when the order is moving to `shipped`.
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StatusUpdate {
    pub fn new(status: OrderStatus) -> Self {
        Self { status, tracking_number: None, notes: None }
    }

    pub fn with_tracking_number<S: Into<String>>(mut self, tracking_number: S) -> Self {
        self.tracking_number = Some(tracking_number.into());
        self
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

//--------------------------------------     NewPayment       ---------------------------------------------------------
/// A request to record a payment against an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub order_id: i64,
    pub amount: Money,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
}

impl NewPayment {
    pub fn new(order_id: i64, amount: Money, payment_method: PaymentMethod, status: PaymentStatus) -> Self {
        Self { order_id, amount, payment_method, transaction_id: None, status }
    }

    pub fn with_transaction_id<S: Into<String>>(mut self, transaction_id: S) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }
}

//--------------------------------------     FullOrder        ---------------------------------------------------------
/// An order together with its lines. This is what placement, status changes and single-order reads hand back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullOrder {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
