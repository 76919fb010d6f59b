//! Identity extraction for request handlers.
//!
//! Credential checking happens upstream: the fronting proxy authenticates the caller and installs the trusted
//! `x-user-id` and `x-user-role` headers before the request reaches this server. This module only reads those headers
//! back into a [`UserIdentity`]. Nothing here must ever be exposed directly to the open internet.

use std::{
    fmt::Display,
    future::{ready, Ready},
};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use bottega_engine::db_types::{Role, UserIdentity};
use log::debug;

use crate::errors::ServerError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The caller, as vouched for by the fronting proxy. Handlers take this as an extractor argument; requests without
/// the identity headers are rejected before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub identity: UserIdentity,
}

impl Display for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identity)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_identity(req))
    }
}

fn extract_identity(req: &HttpRequest) -> Result<AuthenticatedUser, ServerError> {
    let user_id = header_value(req, USER_ID_HEADER)?;
    let user_id = user_id.parse::<i64>().map_err(|e| {
        debug!("💻️ Rejecting request with a garbled {USER_ID_HEADER} header ({user_id}). {e}");
        ServerError::MalformedIdentityHeader(format!("{USER_ID_HEADER} is not an integer id"))
    })?;
    let role = header_value(req, USER_ROLE_HEADER)?;
    let role = role.parse::<Role>().map_err(|e| {
        debug!("💻️ Rejecting request with a garbled {USER_ROLE_HEADER} header ({role}). {e}");
        ServerError::MalformedIdentityHeader(format!("{USER_ROLE_HEADER} is not a known role"))
    })?;
    Ok(AuthenticatedUser { identity: UserIdentity::new(user_id, role) })
}

fn header_value(req: &HttpRequest, name: &str) -> Result<String, ServerError> {
    let value = req.headers().get(name).ok_or(ServerError::MissingIdentityHeader)?;
    let value = value
        .to_str()
        .map_err(|_| ServerError::MalformedIdentityHeader(format!("{name} contains non-ASCII characters")))?;
    Ok(value.to_string())
}
