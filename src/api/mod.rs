pub mod auth;
pub mod books;
pub mod error;
pub mod extract;
pub mod health;
pub mod relations;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_me))
        // Books
        .route("/books/", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id/",
            get(books::get_book)
                .put(books::update_book)
                .patch(books::partial_update_book)
                .delete(books::delete_book),
        )
        // User/book relations (get-or-create on first access)
        .route(
            "/relations/:book_id/",
            put(relations::update_relation).patch(relations::update_relation),
        )
        .with_state(state)
}
