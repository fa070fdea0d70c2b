pub mod book;
pub mod user;
pub mod user_book_relation;

pub use book::Book;
pub use user_book_relation::UserBookRelation;
