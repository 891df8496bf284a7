//! The endpoint for saving the order of the navigation links.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::{
    Error,
    auth::UserID,
    settings::{SettingsState, save_nav_order},
};

/// The navigation item keys in their new order, e.g. `key=goals&key=budget`.
#[derive(Debug, Default, Deserialize)]
pub struct NavOrderForm {
    #[serde(default)]
    pub key: Vec<String>,
}

pub async fn save_nav_order_endpoint(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<NavOrderForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match save_nav_order(user_id, &form.key, &connection) {
        Ok(_) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("could not save nav order for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod save_nav_order_endpoint_tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;

    use crate::{
        settings::{SettingsState, get_nav_order},
        test_utils::get_test_db_with_account,
    };

    use super::{NavOrderForm, save_nav_order_endpoint};

    #[tokio::test]
    async fn saves_order() {
        let (db_connection, user_id, _) = get_test_db_with_account();
        let state = SettingsState { db_connection };
        let form = NavOrderForm {
            key: vec!["settings".to_owned(), "dashboard".to_owned()],
        };

        let response =
            save_nav_order_endpoint(State(state.clone()), Extension(user_id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let saved = get_nav_order(user_id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(saved[..2], ["settings", "dashboard"]);
    }
}
