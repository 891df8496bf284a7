//! The "active account" that scopes every page, stored in a plain cookie.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use time::Duration;
use uuid::Uuid;

use crate::{
    AppState, Error,
    account::{Account, create_default_account, get_account, get_accounts},
    auth::UserID,
};

/// The name of the cookie holding the ID of the active account.
pub const ACTIVE_ACCOUNT_COOKIE: &str = "active_account_id";
const ACTIVE_ACCOUNT_COOKIE_DURATION: Duration = Duration::days(365);

/// Remember `account_id` as the active account.
pub fn set_active_account_cookie(jar: CookieJar, account_id: Uuid) -> CookieJar {
    jar.add(
        Cookie::build((ACTIVE_ACCOUNT_COOKIE, account_id.to_string()))
            .path("/")
            .max_age(ACTIVE_ACCOUNT_COOKIE_DURATION)
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Get the account the user is currently working in.
///
/// The account named by the cookie is used if the user owns it. Otherwise
/// the user's first account is used and the cookie is updated to point at it.
/// A user without any accounts gets a new default account.
pub fn active_account(
    jar: CookieJar,
    user_id: UserID,
    connection: &Connection,
) -> Result<(CookieJar, Account), Error> {
    let cookie_account_id = jar
        .get(ACTIVE_ACCOUNT_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value_trimmed()).ok());

    if let Some(account_id) = cookie_account_id {
        match get_account(user_id, account_id, connection) {
            Ok(account) => return Ok((jar, account)),
            Err(Error::NotFound) => {
                tracing::debug!("active account {account_id} not found for user {user_id}");
            }
            Err(error) => return Err(error),
        }
    }

    let account = match get_accounts(user_id, connection)?.into_iter().next() {
        Some(account) => account,
        None => {
            tracing::info!("user {user_id} has no accounts, creating the default account");
            create_default_account(user_id, connection)?
        }
    };

    Ok((set_active_account_cookie(jar, account.id), account))
}

/// The state needed to switch the active account.
#[derive(Debug, Clone)]
pub struct ActiveAccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ActiveAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for switching accounts.
#[derive(Debug, Deserialize)]
pub struct SwitchAccountRequest {
    pub account_id: String,
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// A JSON route handler that makes another of the user's accounts the active one.
///
/// Responds with `{"success": true}` and a new cookie, or `{"error": "..."}`
/// with status 400 if the body is not valid or the account is not the user's.
pub async fn switch_active_account_endpoint(
    State(state): State<ActiveAccountState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
    payload: Result<Json<SwitchAccountRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!("invalid account switch request: {rejection}");
            return json_error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let raw_account_id = request.account_id.trim();
    if raw_account_id.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Invalid account ID");
    }

    let Ok(account_id) = Uuid::parse_str(raw_account_id) else {
        return json_error(StatusCode::BAD_REQUEST, "Invalid account ID");
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong");
        }
    };

    match get_account(user_id, account_id, &connection) {
        Ok(account) => (
            set_active_account_cookie(jar, account.id),
            Json(json!({ "success": true })),
        )
            .into_response(),
        Err(Error::NotFound) => json_error(StatusCode::BAD_REQUEST, "Unknown account"),
        Err(error) => {
            tracing::error!("could not switch to account {account_id}: {error}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
        }
    }
}
