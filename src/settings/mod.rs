//! User settings and the settings page.

mod core;
mod initial_balance;
mod nav_order;
mod page;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use core::{create_setting_table, get_nav_order, save_nav_order};
pub use initial_balance::update_initial_balance_endpoint;
pub use nav_order::save_nav_order_endpoint;
pub use page::get_settings_page;

/// The state needed for the settings page and endpoints.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
