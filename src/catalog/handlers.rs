use super::engine::list_books;
use super::types::{BookListParams, BooksResponse, ErrorResponse, HealthResponse};
use crate::store::{count_books, CatalogStore};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};

pub fn router(store: CatalogStore) -> Router {
    Router::new()
        .route("/v1/books", get(handle_list_books))
        .route("/health", get(handle_health))
        .layer(Extension(store))
}

/// `GET /v1/books`.
///
/// The query string is decoded as plain pairs so one bad or repeated parameter never
/// discards the others; an undecodable query string is served as if it were empty.
pub async fn handle_list_books(
    Extension(store): Extension<CatalogStore>,
    query: Option<Query<Vec<(String, String)>>>,
) -> Result<Json<BooksResponse>, (StatusCode, Json<ErrorResponse>)> {
    let params = query
        .map(|Query(pairs)| BookListParams::from_pairs(pairs))
        .unwrap_or_default();

    match store.run(move |conn| list_books(conn, &params)).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to list books: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

pub async fn handle_health(
    Extension(store): Extension<CatalogStore>,
) -> (StatusCode, Json<HealthResponse>) {
    match store.run(count_books).await {
        Ok(books) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                books: Some(books),
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                    books: None,
                }),
            )
        }
    }
}
