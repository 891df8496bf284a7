//! The 404 page shown for unknown routes and missing resources.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The page displayed when a route or resource does not exist.
pub struct NotFoundPage;

impl IntoResponse for NotFoundPage {
    fn into_response(self) -> Response {
        let markup = error_view(
            "Not Found",
            "404",
            "Something's missing.",
            "Sorry, we can't find that page. You'll find lots to explore on the home page.",
        );

        (StatusCode::NOT_FOUND, Html(markup.into_string())).into_response()
    }
}

/// Fallback route handler for any path that does not match a route.
pub async fn get_404_not_found() -> Response {
    NotFoundPage.into_response()
}
