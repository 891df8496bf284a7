//! The monthly summary of an account and the sums it shares with the dashboard.

mod aggregation;
mod page;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use aggregation::{CategoryExpense, expenses_by_category, first_of_month, monthly_figures};
pub use page::get_summary_page;

/// The state needed for the summary page.
#[derive(Debug, Clone)]
pub struct SummaryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
