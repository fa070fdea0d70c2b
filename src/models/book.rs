use sea_orm::FromQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::decimal;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub author_name: String,
    pub owner_id: Option<i32>,
    /// Cached mean of all relation rates, two decimals. NULL until someone rates.
    pub rating: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Owner,
    #[sea_orm(has_many = "super::user_book_relation::Entity")]
    UserRelations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::user_book_relation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRelations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Row produced by the annotated listing query: book columns plus
/// `annotated_likes` and `owner_name` computed in SQL.
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct AnnotatedModel {
    pub id: i32,
    pub name: String,
    pub price: f64,
    pub author_name: String,
    pub owner_id: Option<i32>,
    pub rating: Option<f64>,
    pub annotated_likes: i64,
    pub owner_name: Option<String>,
}

/// A user holding a relation with a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Reader {
    pub first_name: String,
    pub last_name: String,
}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Book {
    pub id: i32,
    pub name: String,
    #[serde(serialize_with = "decimal::serialize")]
    #[schema(value_type = String, example = "25.00")]
    pub price: f64,
    pub author_name: String,
    pub owner: Option<i32>,
    pub owner_name: Option<String>,
    pub annotated_likes: i64,
    #[serde(serialize_with = "decimal::serialize_option")]
    #[schema(value_type = Option<String>, example = "4.67")]
    pub rating: Option<f64>,
    pub readers: Vec<Reader>,
}

impl Book {
    pub fn from_annotated(row: AnnotatedModel, readers: Vec<Reader>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            author_name: row.author_name,
            owner: row.owner_id,
            owner_name: row.owner_name,
            annotated_likes: row.annotated_likes,
            rating: row.rating,
            readers,
        }
    }
}
