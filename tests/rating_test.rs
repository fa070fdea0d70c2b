use bookstore::db;
use bookstore::domain::{BookFilter, BookRepository};
use bookstore::infrastructure::SeaOrmBookRepository;
use bookstore::models::{book, user, user_book_relation};
use bookstore::services::rating_service::{average_rate, set_rating};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_user(db: &DatabaseConnection, username: &str, first: &str, last: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set("hash".to_string()),
        first_name: Set(first.to_string()),
        last_name: Set(last.to_string()),
        is_staff: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user")
    .id
}

async fn create_book(db: &DatabaseConnection, name: &str, price: f64, owner: i32) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    book::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        author_name: Set("Author 1".to_string()),
        owner_id: Set(Some(owner)),
        rating: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create book")
    .id
}

async fn relate(db: &DatabaseConnection, user_id: i32, book_id: i32, like: bool, rate: Option<i32>) {
    user_book_relation::ActiveModel {
        user_id: Set(user_id),
        book_id: Set(book_id),
        like: Set(like),
        in_bookmarks: Set(false),
        rate: Set(rate),
    }
    .insert(db)
    .await
    .expect("Failed to create relation");
}

#[tokio::test]
async fn test_set_rating() {
    let db = setup_test_db().await;
    let user_1 = create_user(&db, "test_user", "Sergey", "Ivanov").await;
    let user_2 = create_user(&db, "test_user2", "Petr", "Sidorov").await;
    let user_3 = create_user(&db, "test_user3", "Anton", "Gudimov").await;
    let book_id = create_book(&db, "Test book 1", 25.0, user_1).await;

    relate(&db, user_1, book_id, true, Some(5)).await;
    relate(&db, user_2, book_id, true, Some(4)).await;
    relate(&db, user_3, book_id, true, Some(5)).await;

    let rating = set_rating(&db, book_id).await.unwrap();
    assert_eq!(rating, Some(4.67));

    let stored = book::Entity::find_by_id(book_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.rating, Some(4.67));
}

#[tokio::test]
async fn test_no_rates_means_no_rating() {
    let db = setup_test_db().await;
    let user_1 = create_user(&db, "test_user", "A", "B").await;
    let book_id = create_book(&db, "Unrated", 10.0, user_1).await;

    assert_eq!(average_rate(&db, book_id).await.unwrap(), None);

    relate(&db, user_1, book_id, true, None).await;
    assert_eq!(set_rating(&db, book_id).await.unwrap(), None);
}

#[tokio::test]
async fn test_set_rating_missing_book() {
    let db = setup_test_db().await;
    assert!(set_rating(&db, 42).await.is_err());
}

#[tokio::test]
async fn test_serialized_listing() {
    let db = setup_test_db().await;
    let user_1 = create_user(&db, "test_user", "Sergey", "Ivanov").await;
    let user_2 = create_user(&db, "test_user2", "Petr", "Sidorov").await;
    let user_3 = create_user(&db, "test_user3", "Anton", "Gudimov").await;

    let book_1 = create_book(&db, "Test book 1", 25.0, user_1).await;
    let book_2 = create_book(&db, "Test book 2", 55.0, user_1).await;

    relate(&db, user_1, book_1, true, Some(5)).await;
    relate(&db, user_2, book_1, true, Some(4)).await;
    relate(&db, user_3, book_1, true, Some(5)).await;

    relate(&db, user_1, book_2, true, Some(2)).await;
    relate(&db, user_2, book_2, true, Some(3)).await;
    relate(&db, user_3, book_2, false, None).await;

    set_rating(&db, book_1).await.unwrap();
    set_rating(&db, book_2).await.unwrap();

    let repo = SeaOrmBookRepository::new(db.clone());
    let books = repo.find_all(BookFilter::default()).await.unwrap();
    let data = serde_json::to_value(&books).unwrap();

    let readers = serde_json::json!([
        { "first_name": "Sergey", "last_name": "Ivanov" },
        { "first_name": "Petr", "last_name": "Sidorov" },
        { "first_name": "Anton", "last_name": "Gudimov" }
    ]);
    let expected = serde_json::json!([
        {
            "id": book_1,
            "name": "Test book 1",
            "price": "25.00",
            "author_name": "Author 1",
            "owner": user_1,
            "owner_name": "test_user",
            "annotated_likes": 3,
            "rating": "4.67",
            "readers": readers
        },
        {
            "id": book_2,
            "name": "Test book 2",
            "price": "55.00",
            "author_name": "Author 1",
            "owner": user_1,
            "owner_name": "test_user",
            "annotated_likes": 2,
            "rating": "2.50",
            "readers": readers
        }
    ]);

    assert_eq!(data, expected);
}
