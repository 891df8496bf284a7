//! Savings goals and their progress.

mod core;
mod create;
mod delete;
mod edit;
mod figures;
mod form;
mod page;
mod progress;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use core::{
    Goal, GoalData, GoalPeriod, adjust_goal_amount, create_goal, create_goal_table, delete_goal,
    ensure_goal_in_account, get_goal, get_goals, update_goal, update_goal_progress,
};
pub use create::{create_goal_endpoint, get_new_goal_page};
pub use delete::delete_goal_endpoint;
pub use edit::{get_edit_goal_page, update_goal_endpoint};
pub use form::period_select;
pub use page::get_goals_page;
pub use progress::update_goal_progress_endpoint;

/// The state needed for the goal pages and endpoints.
#[derive(Debug, Clone)]
pub struct GoalState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Paris".
    pub local_timezone: String,
}

impl FromRef<AppState> for GoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[cfg(test)]
impl GoalState {
    pub fn new(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            db_connection,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }
}
