use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::login,
        api::auth::get_me,
        api::books::list_books,
        api::books::create_book,
        api::books::get_book,
        api::books::update_book,
        api::books::partial_update_book,
        api::books::delete_book,
        api::relations::update_relation,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::Reader,
            crate::models::UserBookRelation,
            api::books::BookRequest,
            api::relations::RelationRequest,
            api::auth::LoginRequest,
        )
    ),
    tags(
        (name = "bookstore", description = "Book store API")
    )
)]
pub struct ApiDoc;
