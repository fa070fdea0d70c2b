//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BookRepository, ReadAccess, RelationRepository, UserRepository};
use crate::infrastructure::{
    SeaOrmBookRepository, SeaOrmRelationRepository, SeaOrmUserRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Who may read the catalog
    pub read_access: ReadAccess,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// User/book relation repository
    pub relation_repo: Arc<dyn RelationRepository>,
    /// User repository
    pub user_repo: Arc<dyn UserRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, read_access: ReadAccess) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let relation_repo = Arc::new(SeaOrmRelationRepository::new(db.clone()));
        let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));

        Self {
            db,
            read_access,
            book_repo,
            relation_repo,
            user_repo,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

