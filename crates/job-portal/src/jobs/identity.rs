//! Consumes the caller identity attached by the upstream authentication component.
//!
//! Credentials are never checked here. The identity header is trusted as forwarded; the
//! middleware copies it into request extensions and handlers read it via [`CurrentUser`].

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::domain::UserId;
use crate::config::IdentityConfig;

/// Wrap the routes of `router` so each must carry the configured identity header.
///
/// Unmatched paths still fall through to the plain 404.
pub fn with_identity(router: Router, config: IdentityConfig) -> Router {
    router.route_layer(middleware::from_fn_with_state(
        Arc::new(config),
        attach_identity,
    ))
}

pub async fn attach_identity(
    State(config): State<Arc<IdentityConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = request
        .headers()
        .get(&config.header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()));

    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            warn!(
                header = %config.header,
                path = %request.uri().path(),
                "request without caller identity rejected"
            );
            IdentityRejection.into_response()
        }
    }
}

/// Authenticated caller extracted from request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserId>()
            .cloned()
            .map(CurrentUser)
            .ok_or(IdentityRejection)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityRejection;

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let payload = json!({ "error": "authentication required" });
        (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
    }
}
