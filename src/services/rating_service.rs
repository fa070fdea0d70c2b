//! Rating aggregation
//!
//! A book's `rating` caches the mean of every non-null `rate` given to it.
//! Callers refresh it whenever one of the book's relations is saved.

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
};

use crate::domain::DomainError;
use crate::models::book::{self, Entity as BookEntity};
use crate::models::user_book_relation::{self, Entity as RelationEntity};
use crate::utils::decimal::round_2dp;

/// Mean of all rates given to `book_id`, or `None` when nobody rated it
pub async fn average_rate<C: ConnectionTrait>(
    db: &C,
    book_id: i32,
) -> Result<Option<f64>, DomainError> {
    let average = RelationEntity::find()
        .select_only()
        .column_as(
            SimpleExpr::from(Func::avg(Expr::col((
                RelationEntity,
                user_book_relation::Column::Rate,
            )))),
            "rating",
        )
        .filter(user_book_relation::Column::BookId.eq(book_id))
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?;

    Ok(average.flatten().map(round_2dp))
}

/// Recompute and persist the cached rating of `book_id`
pub async fn set_rating<C: ConnectionTrait>(
    db: &C,
    book_id: i32,
) -> Result<Option<f64>, DomainError> {
    let book = BookEntity::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)?;

    let rating = average_rate(db, book_id).await?;

    if book.rating != rating {
        let mut active: book::ActiveModel = book.into();
        active.rating = Set(rating);
        active.update(db).await?;
    }

    tracing::debug!("Book {} rating set to {:?}", book_id, rating);
    Ok(rating)
}
