use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use log::debug;
use serde::Serialize;

use crate::auth::{USER_ID_HEADER, USER_ROLE_HEADER};

/// Runs a GET request against an app configured by `configure`, carrying the given identity headers. `None` sends
/// the request anonymously.
pub async fn get_request(
    identity: Option<(i64, &str)>,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = with_identity(TestRequest::get().uri(path), identity);
    send_request(req, configure).await
}

pub async fn post_request<T: Serialize>(
    identity: Option<(i64, &str)>,
    path: &str,
    body: &T,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = with_identity(TestRequest::post().uri(path).set_json(body), identity);
    send_request(req, configure).await
}

pub async fn put_request<T: Serialize>(
    identity: Option<(i64, &str)>,
    path: &str,
    body: &T,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = with_identity(TestRequest::put().uri(path).set_json(body), identity);
    send_request(req, configure).await
}

fn with_identity(req: TestRequest, identity: Option<(i64, &str)>) -> TestRequest {
    match identity {
        Some((user_id, role)) => {
            req.insert_header((USER_ID_HEADER, user_id.to_string())).insert_header((USER_ROLE_HEADER, role))
        },
        None => req,
    }
}

async fn send_request(req: TestRequest, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    let req = req.to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
