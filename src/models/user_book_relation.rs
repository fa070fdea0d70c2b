use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Allowed values for `rate`
pub const RATE_CHOICES: std::ops::RangeInclusive<i32> = 1..=5;

/// Per-user state for one book: like, bookmark and rating.
/// Identified by the `(user_id, book_id)` pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_book_relations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub book_id: i32,
    pub like: bool,
    pub in_bookmarks: bool,
    /// 1..=5, NULL = not rated
    pub rate: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserBookRelation {
    pub book: i32,
    pub like: bool,
    pub in_bookmarks: bool,
    pub rate: Option<i32>,
}

impl From<Model> for UserBookRelation {
    fn from(model: Model) -> Self {
        Self {
            book: model.book_id,
            like: model.like,
            in_bookmarks: model.in_bookmarks,
            rate: model.rate,
        }
    }
}
