use crate::auth::hash_password;
use crate::models::{book, user};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

struct DemoUser {
    username: &'static str,
    password: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    is_staff: bool,
}

const DEMO_USERS: [DemoUser; 2] = [
    DemoUser {
        username: "admin",
        password: "admin",
        first_name: "Ada",
        last_name: "Admin",
        is_staff: true,
    },
    DemoUser {
        username: "reader",
        password: "reader",
        first_name: "Rita",
        last_name: "Reader",
        is_staff: false,
    },
];

const DEMO_BOOKS: [(&str, f64, &str); 3] = [
    ("Programming in Python 3", 150.0, "Mark Summerfield"),
    ("The Rust Programming Language", 39.95, "Steve Klabnik"),
    ("Dune", 9.99, "Frank Herbert"),
];

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    // 1. Users
    for demo in &DEMO_USERS {
        let password_hash = hash_password(demo.password).map_err(DbErr::Custom)?;
        let user = user::ActiveModel {
            username: Set(demo.username.to_owned()),
            password_hash: Set(password_hash),
            first_name: Set(demo.first_name.to_owned()),
            last_name: Set(demo.last_name.to_owned()),
            is_staff: Set(demo.is_staff),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };

        let inserted = user::Entity::insert(user)
            .on_conflict(
                OnConflict::column(user::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(db)
            .await;

        match inserted {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    // 2. Books, owned by the non-staff demo user
    let owner = user::Entity::find()
        .filter(user::Column::Username.eq("reader"))
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("demo user 'reader'".to_owned()))?;

    if book::Entity::find().count(db).await? > 0 {
        tracing::info!("Books already present, skipping demo books");
        return Ok(());
    }

    for (name, price, author_name) in DEMO_BOOKS {
        let book = book::ActiveModel {
            name: Set(name.to_owned()),
            price: Set(price),
            author_name: Set(author_name.to_owned()),
            owner_id: Set(Some(owner.id)),
            rating: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        book.insert(db).await?;
    }

    Ok(())
}
