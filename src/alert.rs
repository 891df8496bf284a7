//! Alert fragments for displaying success and error messages to users.
//!
//! htmx endpoints return these as the response body. Error responses are
//! swapped into `#alert-container` via the `hx-target-error` attribute.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A dismissable message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message without any further details.
    SuccessSimple { message: String },
    /// An error message with a description of how to fix the problem.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::SuccessSimple { message } => (
                "flex items-start gap-3 p-4 rounded border text-green-800 \
                bg-green-50 border-green-300 dark:bg-gray-800 dark:text-green-400 \
                dark:border-green-800",
                message,
                None,
            ),
            Alert::Error { message, details } => (
                "flex items-start gap-3 p-4 rounded border text-red-800 \
                bg-red-50 border-red-300 dark:bg-gray-800 dark:text-red-400 \
                dark:border-red-800",
                message,
                Some(details),
            ),
        };

        html!(
            div role="alert" class=(container_style) data-alert="true"
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if let Some(details) = details {
                        @if !details.is_empty() {
                            p class="text-sm" { (details) }
                        }
                    }
                }

                button
                    type="button"
                    class="text-sm underline"
                    aria-label="Dismiss"
                    data-dismiss-alert="true"
                {
                    "Dismiss"
                }
            }
        )
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn error_alert_shows_message_and_details() {
        let markup = Alert::Error {
            message: "Could not delete account".to_owned(),
            details: "Cannot delete the last account".to_owned(),
        }
        .into_html()
        .into_string();

        let html = Html::parse_fragment(&markup);
        let paragraphs = html
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>();

        assert_eq!(
            paragraphs,
            vec!["Could not delete account", "Cannot delete the last account"]
        );
    }

    #[test]
    fn success_alert_has_ok_status() {
        let response = Alert::SuccessSimple {
            message: "Deleted".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
