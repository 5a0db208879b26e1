//! Actor Extractor
//!
//! Identity reaches this service pre-authenticated by the gateway in
//! front of it, as `x-actor-id` / `x-actor-role` headers. The extractor
//! turns them into an [`Actor`] and rejects requests that lack them.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::core::ServerState;
use crate::utils::AppError;
use shared::types::{Actor, Role};

const ACTOR_ID_HEADER: &str = "x-actor-id";
const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// The authenticated caller of the current request
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl CurrentActor {
    pub fn actor(&self) -> &Actor {
        &self.0
    }
}

impl FromRequestParts<ServerState> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(actor) = parts.extensions.get::<CurrentActor>() {
            return Ok(actor.clone());
        }

        let id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok());

        let role = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.parse::<Role>().ok());

        let (Some(id), Some(role)) = (id, role) else {
            tracing::warn!(uri = %parts.uri, "Request without valid actor headers");
            return Err(AppError::Unauthorized);
        };

        let actor = CurrentActor(Actor { id, role });
        parts.extensions.insert(actor.clone());
        Ok(actor)
    }
}
