//! The dashboard: an overview of the active account.

mod page;
mod stats;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use page::get_dashboard_page;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Paris".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[cfg(test)]
impl DashboardState {
    pub fn new(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }
}
