//! SeaORM implementation of RelationRepository

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set, TransactionTrait,
};

use crate::domain::{DomainError, RelationPatch, RelationRepository};
use crate::models::user_book_relation::{ActiveModel, Column, Entity as RelationEntity, Model};
use crate::services::rating_service;

pub struct SeaOrmRelationRepository {
    db: DatabaseConnection,
}

impl SeaOrmRelationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RelationRepository for SeaOrmRelationRepository {
    async fn get_or_create(&self, user_id: i32, book_id: i32) -> Result<Model, DomainError> {
        let blank = ActiveModel {
            user_id: Set(user_id),
            book_id: Set(book_id),
            like: Set(false),
            in_bookmarks: Set(false),
            rate: Set(None),
        };

        // Concurrent first interactions race on the primary key; the loser keeps the winner's row
        let inserted = RelationEntity::insert(blank)
            .on_conflict(
                OnConflict::columns([Column::UserId, Column::BookId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;

        match inserted {
            Ok(_) => tracing::debug!("Created relation user={} book={}", user_id, book_id),
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        RelationEntity::find_by_id((user_id, book_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::Internal("relation vanished after insert".to_string()))
    }

    async fn update(
        &self,
        user_id: i32,
        book_id: i32,
        patch: RelationPatch,
    ) -> Result<Model, DomainError> {
        let txn = self.db.begin().await?;

        let existing = RelationEntity::find_by_id((user_id, book_id))
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.clone().into();
        if let Some(like) = patch.like {
            active.like = Set(like);
        }
        if let Some(in_bookmarks) = patch.in_bookmarks {
            active.in_bookmarks = Set(in_bookmarks);
        }
        if let Some(rate) = patch.rate {
            active.rate = Set(rate);
        }

        let updated = if active.is_changed() {
            active.update(&txn).await?
        } else {
            existing
        };

        let rating = rating_service::set_rating(&txn, book_id).await?;
        txn.commit().await?;

        tracing::info!(
            "Relation user={} book={} saved (like={}, in_bookmarks={}, rate={:?}), book rating now {:?}",
            user_id,
            book_id,
            updated.like,
            updated.in_bookmarks,
            updated.rate,
            rating
        );

        Ok(updated)
    }
}
