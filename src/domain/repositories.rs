//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::book::{self, Book};
use crate::models::{user, user_book_relation};

/// Columns a book listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Price,
    AuthorName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub field: OrderField,
    pub descending: bool,
}

impl OrderKey {
    /// Parse `price,-author_name` style ordering. Unknown keys are skipped.
    pub fn parse_list(raw: &str) -> Vec<OrderKey> {
        raw.split(',')
            .map(str::trim)
            .filter_map(|key| {
                let (descending, name) = match key.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, key),
                };
                let field = match name {
                    "price" => OrderField::Price,
                    "author_name" => OrderField::AuthorName,
                    _ => return None,
                };
                Some(OrderKey { field, descending })
            })
            .collect()
    }
}

/// Filter criteria for book queries
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookFilter {
    pub price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub ordering: Vec<OrderKey>,
}

impl BookFilter {
    /// Search terms; every one must match `name` or `author_name`
    pub fn search_terms(&self) -> Vec<&str> {
        self.search
            .as_deref()
            .map(|s| {
                s.split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Validated book fields. `None` leaves the stored value untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookInput {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub author_name: Option<String>,
}

/// Validated changes to a user/book relation
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RelationPatch {
    pub like: Option<bool>,
    pub in_bookmarks: Option<bool>,
    /// `Some(None)` clears the rate
    pub rate: Option<Option<i32>>,
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books matching the filter, annotated with likes, owner name and readers
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError>;

    /// Find a single annotated book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Find the stored row, used for permission checks
    async fn find_record(&self, id: i32) -> Result<Option<book::Model>, DomainError>;

    /// Create a new book owned by `owner_id`
    async fn create(&self, input: BookInput, owner_id: i32) -> Result<Book, DomainError>;

    /// Update an existing book
    async fn update(&self, id: i32, input: BookInput) -> Result<Book, DomainError>;

    /// Delete a book by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for UserBookRelation entity
#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Fetch the relation for `(user_id, book_id)`, inserting a blank one first if needed
    async fn get_or_create(
        &self,
        user_id: i32,
        book_id: i32,
    ) -> Result<user_book_relation::Model, DomainError>;

    /// Apply a patch and refresh the book's cached rating
    async fn update(
        &self,
        user_id: i32,
        book_id: i32,
        patch: RelationPatch,
    ) -> Result<user_book_relation::Model, DomainError>;
}

/// Read-only access to externally managed users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, DomainError>;
}
