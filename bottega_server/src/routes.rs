//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers run concurrently on the worker threads, so anything slow in a handler must be expressed as a future
//! rather than a blocking call. All database work goes through the engine APIs, which are async end to end.

use actix_web::{get, web, HttpResponse, Responder};
use bottega_engine::{
    db_types::{NewOrder, NewPayment, StatusUpdate},
    traits::{MarketplaceDatabase, OrderHistory},
    OrderFlowApi,
    OrderQueryApi,
};
use log::*;

use crate::{
    auth::AuthenticatedUser,
    data_objects::{ListOrdersQuery, PaymentResult},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(create_order => Post "/orders" impl MarketplaceDatabase);
/// Route handler for placing a new order.
///
/// The authenticated caller must be a customer; the engine refuses anyone else. On success the stored order is
/// returned with its items, priced and with stock already taken.
pub async fn create_order<B: MarketplaceDatabase>(
    user: AuthenticatedUser,
    body: web::Json<NewOrder>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order = body.into_inner();
    debug!("💻️ POST new order with {} lines for {user}", order.items.len());
    let full_order = api.place_order(&user.identity, order).await?;
    Ok(HttpResponse::Created().json(full_order))
}

route!(list_orders => Get "/orders" impl OrderHistory);
/// Route handler for searching orders.
///
/// The query string carries the filter (status list, date range, pagination). Results are always scoped to the
/// caller: customers get their own orders, artisans get orders carrying their items, admins get everything.
pub async fn list_orders<B: OrderHistory>(
    user: AuthenticatedUser,
    query: web::Query<ListOrdersQuery>,
    api: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET orders for {user}");
    let filter = query.into_inner().into_filter()?;
    let orders = api.search_orders(&user.identity, filter).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(get_order => Get "/orders/{id}" impl OrderHistory);
pub async fn get_order<B: OrderHistory>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET order {order_id} for {user}");
    let order = api.fetch_order(&user.identity, order_id).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(update_order_status => Put "/orders/{id}/status" impl MarketplaceDatabase);
/// Route handler for moving an order through its lifecycle.
///
/// The engine decides whether the caller's role allows the requested edge. Tracking numbers only stick when the
/// order is moving to `shipped`; notes stick on any edge.
pub async fn update_order_status<B: MarketplaceDatabase>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<StatusUpdate>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let update = body.into_inner();
    debug!("💻️ PUT order {order_id} status to {} for {user}", update.status);
    let full_order = api.update_status(order_id, &user.identity, update).await?;
    Ok(HttpResponse::Ok().json(full_order))
}

//----------------------------------------------   Payments  ----------------------------------------------------
route!(record_payment => Post "/payments" impl MarketplaceDatabase);
/// Route handler for recording a payment against an order.
///
/// Admins and the order's customer may record payments. A `completed` payment promotes a pending order to `paid` in
/// the same transaction, so the response carries the order's status after the call alongside the stored payment.
pub async fn record_payment<B: MarketplaceDatabase>(
    user: AuthenticatedUser,
    body: web::Json<NewPayment>,
    api: web::Data<OrderFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let payment = body.into_inner();
    debug!("💻️ POST payment of {} against order {} for {user}", payment.amount, payment.order_id);
    let (payment, order_status) = api.record_payment(&user.identity, payment).await?;
    Ok(HttpResponse::Created().json(PaymentResult { payment, order_status }))
}

route!(payment_for_order => Get "/payments/order/{order_id}" impl OrderHistory);
pub async fn payment_for_order<B: OrderHistory>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<OrderQueryApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET payment for order {order_id} for {user}");
    let payment = api.payment_for_order(&user.identity, order_id).await?;
    Ok(HttpResponse::Ok().json(payment))
}
