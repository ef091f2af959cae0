//! Actor identity extraction.
//! Authentication happens upstream; every mutating request arrives with the
//! already-authenticated actor id in the `X-Actor-Id` header. Handlers take
//! an explicit [`ActorId`] parameter instead of reading ambient session
//! state.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

pub const ACTOR_HEADER: &str = "X-Actor-Id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ActorId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(format!("missing {} header", ACTOR_HEADER))
            })?;

        let id = Uuid::parse_str(raw).map_err(|_| {
            AppError::Unauthorized(format!("{} is not a valid actor id", ACTOR_HEADER))
        })?;

        Ok(ActorId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<ActorId, AppError> {
        let (mut parts, _) = req.into_parts();
        ActorId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_valid_actor_id() {
        let id = Uuid::new_v4();
        let req = Request::builder()
            .header(ACTOR_HEADER, id.to_string())
            .body(())
            .unwrap();

        let actor = extract(req).await.unwrap();
        assert_eq!(actor, ActorId(id));
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let req = Request::builder().body(()).unwrap();
        assert!(extract(req).await.is_err());
    }

    #[tokio::test]
    async fn rejects_malformed_id() {
        let req = Request::builder()
            .header(ACTOR_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        assert!(extract(req).await.is_err());
    }
}
