use bottega_engine::{
    db_types::{FullOrder, NewOrder, NewPayment, Order, OrderStatus, Payment, StatusUpdate, UserIdentity},
    order_objects::OrderQueryFilter,
    traits::{MarketplaceDatabase, OrderFlowError, OrderHistory, OrderQueryError},
};
use mockall::mock;

mock! {
    pub MarketDb {}
    impl Clone for MarketDb {
        fn clone(&self) -> Self;
    }
    impl OrderHistory for MarketDb {
        async fn fetch_order(&self, order_id: i64) -> Result<Option<FullOrder>, OrderQueryError>;
        async fn search_orders(&self, query: OrderQueryFilter) -> Result<(Vec<Order>, i64), OrderQueryError>;
        async fn payment_for_order(&self, order_id: i64) -> Result<Option<Payment>, OrderQueryError>;
    }
    impl MarketplaceDatabase for MarketDb {
        fn url(&self) -> &str;
        async fn place_order(&self, customer_id: i64, order: NewOrder) -> Result<FullOrder, OrderFlowError>;
        async fn update_order_status(&self, order_id: i64, requester: &UserIdentity, update: StatusUpdate) -> Result<FullOrder, OrderFlowError>;
        async fn record_payment(&self, requester: &UserIdentity, payment: NewPayment) -> Result<(Payment, OrderStatus), OrderFlowError>;
    }
}
