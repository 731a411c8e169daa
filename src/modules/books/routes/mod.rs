//! HTTP handlers for the books module.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use owl_http::error::AppError;

use super::models::{Book, BookId, CreateBook, ListParams, MessageResponse, Page, UpdateBook};
use super::store::BookStore;

/// Routes relative to the module mount path.
pub fn router(store: BookStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(store)
}

async fn health_check(State(store): State<BookStore>) -> String {
    let books = store.len().await;
    format!("books module is healthy ({books} books)")
}

async fn create_book(
    State(store): State<BookStore>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(request) = payload?;
    let new_book = request.validate()?;
    let book = store.create(new_book).await;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(
    State(store): State<BookStore>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(params) = params?;
    let page = Page::from(params);
    tracing::debug!(skip = page.skip, limit = page.limit, "listing books");
    Ok(Json(store.page(page).await))
}

async fn get_book(
    State(store): State<BookStore>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id?;
    Ok(Json(store.get(id).await?))
}

async fn update_book(
    State(store): State<BookStore>,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let patch = request.validate()?;
    Ok(Json(store.update(id, patch).await?))
}

async fn delete_book(
    State(store): State<BookStore>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    store.delete(id).await?;
    Ok(Json(MessageResponse {
        message: format!("book with id {id} removed successfully"),
    }))
}
