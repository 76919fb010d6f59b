use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use bottega_engine::{OrderFlowApi, OrderQueryApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        CreateOrderRoute,
        GetOrderRoute,
        ListOrdersRoute,
        PaymentForOrderRoute,
        RecordPaymentRoute,
        UpdateOrderStatusRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let order_flow_api = OrderFlowApi::new(db.clone());
        let order_query_api = OrderQueryApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("bts::access_log"))
            .app_data(web::Data::new(order_flow_api))
            .app_data(web::Data::new(order_query_api));
        // Every route under /api requires the identity headers from the fronting proxy
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(ListOrdersRoute::<SqliteDatabase>::new())
            .service(GetOrderRoute::<SqliteDatabase>::new())
            .service(UpdateOrderStatusRoute::<SqliteDatabase>::new())
            .service(RecordPaymentRoute::<SqliteDatabase>::new())
            .service(PaymentForOrderRoute::<SqliteDatabase>::new());
        app.service(api_scope).service(health)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .shutdown_timeout(config.shutdown_timeout)
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
