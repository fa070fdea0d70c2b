//! Per-user like / bookmark / rate endpoint
//!
//! The relation is created lazily: the first PATCH from a user on a book
//! inserts a blank row, then applies the requested changes.

use axum::{Json, extract::State};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use utoipa::ToSchema;

use crate::api::extract::RecordId;
use crate::auth::CurrentUser;
use crate::domain::{DomainError, RelationPatch};
use crate::infrastructure::AppState;
use crate::models::UserBookRelation;
use crate::models::user_book_relation::RATE_CHOICES;

/// Request DTO for updating the caller's relation with a book
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RelationRequest {
    pub like: Option<bool>,
    pub in_bookmarks: Option<bool>,
    /// 1 to 5, `null` clears the rate
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>, minimum = 1, maximum = 5)]
    pub rate: Option<Option<Value>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`)
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer).map(Some)
}

impl RelationRequest {
    pub fn validate(self) -> Result<RelationPatch, DomainError> {
        let rate = match self.rate {
            Some(Some(raw)) => Some(Some(parse_rate(&raw)?)),
            Some(None) => Some(None),
            None => None,
        };

        Ok(RelationPatch {
            like: self.like,
            in_bookmarks: self.in_bookmarks,
            rate,
        })
    }
}

/// Accepts an integer choice, given as a number or a string
fn parse_rate(raw: &Value) -> Result<i32, DomainError> {
    let choice = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match choice.and_then(|c| i32::try_from(c).ok()) {
        Some(rate) if RATE_CHOICES.contains(&rate) => Ok(rate),
        _ => {
            let shown = match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Err(DomainError::field(
                "rate",
                format!("\"{}\" is not a valid choice.", shown),
            ))
        }
    }
}

#[utoipa::path(
    patch,
    path = "/relations/{book_id}/",
    params(("book_id" = i32, Path, description = "Book id")),
    request_body = RelationRequest,
    responses(
        (status = 200, description = "Caller's relation after the update", body = UserBookRelation),
        (status = 400, description = "Invalid rate choice"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_relation(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(book_id): RecordId,
    Json(payload): Json<RelationRequest>,
) -> Result<Json<UserBookRelation>, DomainError> {
    if state.book_repo.find_record(book_id).await?.is_none() {
        return Err(DomainError::NotFound);
    }

    let patch = payload.validate()?;

    let user_id = user.0.id;
    state.relation_repo.get_or_create(user_id, book_id).await?;
    let relation = state.relation_repo.update(user_id, book_id, patch).await?;

    Ok(Json(UserBookRelation::from(relation)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> RelationRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn absent_and_null_rate_differ() {
        assert_eq!(request(json!({ "like": true })).validate().unwrap().rate, None);
        assert_eq!(
            request(json!({ "rate": null })).validate().unwrap().rate,
            Some(None)
        );
    }

    #[test]
    fn accepts_choices_as_numbers_or_strings() {
        assert_eq!(
            request(json!({ "rate": 3 })).validate().unwrap().rate,
            Some(Some(3))
        );
        assert_eq!(
            request(json!({ "rate": "5" })).validate().unwrap().rate,
            Some(Some(5))
        );
    }

    #[test]
    fn out_of_range_rate_is_a_field_error() {
        match request(json!({ "rate": 6 })).validate() {
            Err(DomainError::InvalidFields(errors)) => {
                assert_eq!(
                    errors["rate"],
                    vec!["\"6\" is not a valid choice.".to_string()]
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(request(json!({ "rate": 0 })).validate().is_err());
        assert!(request(json!({ "rate": 2.5 })).validate().is_err());
        assert!(request(json!({ "rate": "abc" })).validate().is_err());
    }
}
