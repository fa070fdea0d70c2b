//! Book API handlers using repository pattern

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::api::extract::RecordId;
use crate::auth::CurrentUser;
use crate::domain::permissions::{check_modify, check_read};
use crate::domain::{BookFilter, BookInput, DomainError, FieldErrors, OrderKey};
use crate::infrastructure::AppState;
use crate::models::Book;
use crate::utils::decimal::parse_price;

const MAX_TEXT_LEN: usize = 255;

/// Listing criteria taken from the query string
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Exact price
    pub price: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
    /// Terms matched against name and author_name
    pub search: Option<String>,
    /// `price`, `author_name`, comma separated, `-` prefix for descending
    pub ordering: Option<String>,
}

impl BookQuery {
    pub fn into_filter(self) -> Result<BookFilter, DomainError> {
        let mut errors = FieldErrors::new();

        let mut number = |field: &str, raw: Option<String>| -> Option<f64> {
            let raw = raw.filter(|s| !s.trim().is_empty())?;
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    errors.insert(field.to_string(), vec!["Enter a number.".to_string()]);
                    None
                }
            }
        };

        let price = number("price", self.price);
        let min_price = number("min_price", self.min_price);
        let max_price = number("max_price", self.max_price);

        if !errors.is_empty() {
            return Err(DomainError::InvalidFields(errors));
        }

        Ok(BookFilter {
            price,
            min_price,
            max_price,
            search: self.search.filter(|s| !s.trim().is_empty()),
            ordering: self
                .ordering
                .as_deref()
                .map(OrderKey::parse_list)
                .unwrap_or_default(),
        })
    }
}

/// Request DTO for creating or updating a book
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BookRequest {
    pub name: Option<String>,
    /// Number or numeric string, two decimals at most
    #[schema(value_type = Option<String>, example = "25.00")]
    pub price: Option<Value>,
    pub author_name: Option<String>,
}

impl BookRequest {
    /// Check every field. With `partial` set, absent fields are allowed.
    pub fn validate(self, partial: bool) -> Result<BookInput, DomainError> {
        let mut errors = FieldErrors::new();

        let name = text_field(&mut errors, "name", self.name, partial);
        let author_name = text_field(&mut errors, "author_name", self.author_name, partial);

        let price = match self.price {
            Some(raw) => match parse_price(&raw) {
                Ok(price) => Some(price),
                Err(msg) => {
                    errors.insert("price".to_string(), vec![msg]);
                    None
                }
            },
            None => {
                if !partial {
                    errors.insert("price".to_string(), vec![REQUIRED.to_string()]);
                }
                None
            }
        };

        if !errors.is_empty() {
            return Err(DomainError::InvalidFields(errors));
        }

        Ok(BookInput {
            name,
            price,
            author_name,
        })
    }
}

const REQUIRED: &str = "This field is required.";

fn text_field(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    partial: bool,
) -> Option<String> {
    match value {
        Some(v) if v.trim().is_empty() => {
            errors.insert(field.to_string(), vec!["This field may not be blank.".to_string()]);
            None
        }
        Some(v) if v.chars().count() > MAX_TEXT_LEN => {
            errors.insert(
                field.to_string(),
                vec![format!(
                    "Ensure this field has no more than {} characters.",
                    MAX_TEXT_LEN
                )],
            );
            None
        }
        Some(v) => Some(v),
        None => {
            if !partial {
                errors.insert(field.to_string(), vec![REQUIRED.to_string()]);
            }
            None
        }
    }
}

#[utoipa::path(
    get,
    path = "/books/",
    params(BookQuery),
    responses(
        (status = 200, description = "Filtered, annotated books", body = [Book]),
        (status = 400, description = "Malformed numeric filter")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    caller: Result<CurrentUser, DomainError>,
    Query(query): Query<BookQuery>,
) -> Result<Json<Vec<Book>>, DomainError> {
    check_read(state.read_access, caller.map(|c| c.actor()))?;

    let filter = query.into_filter()?;
    let books = state.book_repo.find_all(filter).await?;

    Ok(Json(books))
}

#[utoipa::path(
    post,
    path = "/books/",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created, caller is the owner", body = Book),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<BookRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let input = payload.validate(false)?;
    let book = state.book_repo.create(input, user.0.id).await?;

    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    get,
    path = "/books/{id}/",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    caller: Result<CurrentUser, DomainError>,
    RecordId(id): RecordId,
) -> Result<Json<Book>, DomainError> {
    check_read(state.read_access, caller.map(|c| c.actor()))?;

    let book = state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    Ok(Json(book))
}

#[utoipa::path(
    put,
    path = "/books/{id}/",
    params(("id" = i32, Path, description = "Book id")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book replaced", body = Book),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Caller is neither owner nor staff"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
    Json(payload): Json<BookRequest>,
) -> Result<Json<Book>, DomainError> {
    save_book(&state, &user, id, payload, false).await
}

#[utoipa::path(
    patch,
    path = "/books/{id}/",
    params(("id" = i32, Path, description = "Book id")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Caller is neither owner nor staff"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn partial_update_book(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
    Json(payload): Json<BookRequest>,
) -> Result<Json<Book>, DomainError> {
    save_book(&state, &user, id, payload, true).await
}

async fn save_book(
    state: &AppState,
    user: &CurrentUser,
    id: i32,
    payload: BookRequest,
    partial: bool,
) -> Result<Json<Book>, DomainError> {
    let record = state
        .book_repo
        .find_record(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    if let Err(e) = check_modify(&user.actor(), record.owner_id) {
        tracing::warn!("User {} may not modify book {}", user.0.username, id);
        return Err(e);
    }

    let input = payload.validate(partial)?;
    let book = state.book_repo.update(id, input).await?;

    Ok(Json(book))
}

#[utoipa::path(
    delete,
    path = "/books/{id}/",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Caller is neither owner nor staff"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    user: CurrentUser,
    RecordId(id): RecordId,
) -> Result<StatusCode, DomainError> {
    let record = state
        .book_repo
        .find_record(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    if let Err(e) = check_modify(&user.actor(), record.owner_id) {
        tracing::warn!("User {} may not delete book {}", user.0.username, id);
        return Err(e);
    }

    state.book_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_update_requires_every_field() {
        let err = BookRequest::default().validate(false).unwrap_err();
        match err {
            DomainError::InvalidFields(errors) => {
                assert_eq!(
                    errors.keys().collect::<Vec<_>>(),
                    vec!["author_name", "name", "price"]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn partial_update_accepts_subset() {
        let request = BookRequest {
            price: Some(json!("500")),
            ..Default::default()
        };
        let input = request.validate(true).unwrap();
        assert_eq!(input.price, Some(500.0));
        assert_eq!(input.name, None);
    }

    #[test]
    fn blank_name_is_rejected() {
        let request = BookRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            request.validate(true),
            Err(DomainError::InvalidFields(_))
        ));
    }

    #[test]
    fn query_builds_filter() {
        let query = BookQuery {
            price: Some("55".to_string()),
            search: Some("Author 1".to_string()),
            ordering: Some("-author_name".to_string()),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.price, Some(55.0));
        assert_eq!(filter.search_terms(), vec!["Author", "1"]);
        assert_eq!(filter.ordering.len(), 1);
        assert!(filter.ordering[0].descending);
    }

    #[test]
    fn query_rejects_non_numeric_price() {
        let query = BookQuery {
            max_price: Some("cheap".to_string()),
            ..Default::default()
        };
        match query.into_filter() {
            Err(DomainError::InvalidFields(errors)) => {
                assert_eq!(errors["max_price"], vec!["Enter a number.".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
