//! Authentication extractor
//!
//! Resolves the `Authorization: Bearer` header into an [`AuthContext`] before
//! a handler runs.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use std::sync::Arc;
use tracing::Span;

use crate::app::AppState;
use crate::services::AuthContext;
use crate::utils::errors::SecretSantaError;

pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = SecretSantaError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| {
                value
                    .to_str()
                    .map_err(|_| SecretSantaError::Authentication("Malformed authorization header".to_string()))
            })
            .transpose()?;

        let context = app_state.services.auth_service.authenticate_header(header)?;
        Span::current().record("user_id", tracing::field::display(context.user_id));

        Ok(AuthUser(context))
    }
}
