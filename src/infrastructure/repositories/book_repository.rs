//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use std::collections::HashMap;

use crate::domain::{BookFilter, BookInput, BookRepository, DomainError, OrderField};
use crate::models::book::{
    self, ActiveModel, AnnotatedModel, Book, Column, Entity as BookEntity, Reader,
};
use crate::models::{user, user_book_relation};

/// Number of relations flagged as liked, per book
const ANNOTATED_LIKES: &str = r#"COUNT(CASE WHEN "user_book_relations"."like" THEN 1 END)"#;

const LIKE_ESCAPE: char = '!';

/// `%term%` with the term's own `%`, `_` and escape characters matched literally
fn contains_pattern(term: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Books joined with their relations and owner, one row per book
    fn annotated_query() -> Select<BookEntity> {
        BookEntity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::Name)
            .column(Column::Price)
            .column(Column::AuthorName)
            .column(Column::OwnerId)
            .column(Column::Rating)
            .column_as(Expr::cust(ANNOTATED_LIKES), "annotated_likes")
            .column_as(user::Column::Username, "owner_name")
            .left_join(user_book_relation::Entity)
            .left_join(user::Entity)
            .group_by(Column::Id)
            .group_by(user::Column::Username)
    }

    /// Readers of each listed book, keyed by book id and ordered by user id
    async fn readers_for(&self, book_ids: &[i32]) -> Result<HashMap<i32, Vec<Reader>>, DomainError> {
        let mut readers: HashMap<i32, Vec<Reader>> = HashMap::new();
        if book_ids.is_empty() {
            return Ok(readers);
        }

        let rows = user_book_relation::Entity::find()
            .filter(user_book_relation::Column::BookId.is_in(book_ids.iter().copied()))
            .find_also_related(user::Entity)
            .order_by_asc(user_book_relation::Column::UserId)
            .all(&self.db)
            .await?;

        for (relation, reader) in rows {
            if let Some(reader) = reader {
                readers.entry(relation.book_id).or_default().push(Reader {
                    first_name: reader.first_name,
                    last_name: reader.last_name,
                });
            }
        }

        Ok(readers)
    }

    async fn attach_readers(&self, rows: Vec<AnnotatedModel>) -> Result<Vec<Book>, DomainError> {
        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let mut readers = self.readers_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let book_readers = readers.remove(&row.id).unwrap_or_default();
                Book::from_annotated(row, book_readers)
            })
            .collect())
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
        let mut query = Self::annotated_query();

        // Apply filters
        if let Some(price) = filter.price {
            query = query.filter(Column::Price.eq(price));
        }

        if let Some(min_price) = filter.min_price {
            query = query.filter(Column::Price.gte(min_price));
        }

        if let Some(max_price) = filter.max_price {
            query = query.filter(Column::Price.lte(max_price));
        }

        for term in filter.search_terms() {
            let cond = Condition::any()
                .add(Expr::col((BookEntity, Column::Name)).like(contains_pattern(term)))
                .add(Expr::col((BookEntity, Column::AuthorName)).like(contains_pattern(term)));
            query = query.filter(cond);
        }

        // Apply ordering, ties fall back to insertion order
        for key in &filter.ordering {
            let order = if key.descending { Order::Desc } else { Order::Asc };
            query = match key.field {
                OrderField::Price => query.order_by(Column::Price, order),
                OrderField::AuthorName => query.order_by(Column::AuthorName, order),
            };
        }
        query = query.order_by_asc(Column::Id);

        let rows = query.into_model::<AnnotatedModel>().all(&self.db).await?;
        tracing::debug!("Book query returned {} rows for {:?}", rows.len(), filter);

        self.attach_readers(rows).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let row = Self::annotated_query()
            .filter(Column::Id.eq(id))
            .into_model::<AnnotatedModel>()
            .one(&self.db)
            .await?;

        match row {
            Some(row) => Ok(self.attach_readers(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_record(&self, id: i32) -> Result<Option<book::Model>, DomainError> {
        Ok(BookEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, input: BookInput, owner_id: i32) -> Result<Book, DomainError> {
        let (Some(name), Some(price), Some(author_name)) =
            (input.name, input.price, input.author_name)
        else {
            return Err(DomainError::Validation(
                "name, price and author_name are required".to_string(),
            ));
        };

        let now = chrono::Utc::now().to_rfc3339();

        let new_book = ActiveModel {
            name: Set(name),
            price: Set(price),
            author_name: Set(author_name),
            owner_id: Set(Some(owner_id)),
            rating: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = new_book.insert(&self.db).await?;
        tracing::info!("Created book {} owned by user {}", result.id, owner_id);

        self.find_by_id(result.id).await?.ok_or(DomainError::NotFound)
    }

    async fn update(&self, id: i32, input: BookInput) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(author_name) = input.author_name {
            active.author_name = Set(author_name);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active.update(&self.db).await?;
        tracing::info!("Updated book {}", id);

        self.find_by_id(id).await?.ok_or(DomainError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{Query, SqliteQueryBuilder};

    fn rendered(term: &str) -> String {
        Query::select()
            .column(Column::Name)
            .from(BookEntity)
            .and_where(Expr::col((BookEntity, Column::Name)).like(contains_pattern(term)))
            .to_string(SqliteQueryBuilder)
    }

    #[test]
    fn wildcards_are_escaped() {
        assert!(rendered("50%").contains("LIKE '%50!%%' ESCAPE '!'"));
        assert!(rendered("a_b").contains("LIKE '%a!_b%' ESCAPE '!'"));
        assert!(rendered("wow!").contains("LIKE '%wow!!%' ESCAPE '!'"));
    }

    #[test]
    fn plain_terms_are_wrapped() {
        assert!(rendered("Author").contains("LIKE '%Author%'"));
    }
}
