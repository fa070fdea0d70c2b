//! Repository implementations using SeaORM

pub mod book_repository;
pub mod relation_repository;
pub mod user_repository;

pub use book_repository::SeaOrmBookRepository;
pub use relation_repository::SeaOrmRelationRepository;
pub use user_repository::SeaOrmUserRepository;
