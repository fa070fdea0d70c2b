//! Request extractors shared by the book and relation handlers

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::domain::DomainError;

/// Primary key taken from the URL path.
///
/// A segment that is not an integer, or does not fit one, cannot name a
/// stored record, so it is reported as not found.
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i32>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(RecordId(id)),
            Err(rejection) => {
                tracing::debug!("Unresolvable record id in {}: {}", parts.uri, rejection);
                Err(DomainError::NotFound)
            }
        }
    }
}
