//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/accounts/{account_id}', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying the active account's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for listing the active account's budget items.
pub const BUDGET_VIEW: &str = "/budget";
/// The page for creating a new budget item.
pub const NEW_BUDGET_ITEM_VIEW: &str = "/budget/new";
/// The page for editing an existing budget item.
pub const EDIT_BUDGET_ITEM_VIEW: &str = "/budget/{budget_item_id}/edit";
/// The page for listing the active account's savings goals.
pub const GOALS_VIEW: &str = "/goals";
/// The page for creating a new goal.
pub const NEW_GOAL_VIEW: &str = "/goals/new";
/// The page for editing an existing goal.
pub const EDIT_GOAL_VIEW: &str = "/goals/{goal_id}/edit";
/// The page with the monthly income and expense summary.
pub const SUMMARY_VIEW: &str = "/summary";
/// The page for user settings, accounts and categories.
pub const SETTINGS_VIEW: &str = "/settings";
/// The page for creating a new account.
pub const NEW_ACCOUNT_VIEW: &str = "/accounts/new";
/// The page for editing an existing account.
pub const EDIT_ACCOUNT_VIEW: &str = "/accounts/{account_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register users.
pub const USERS: &str = "/api/users";
/// The JSON route to switch the active account.
pub const ACTIVE_ACCOUNT: &str = "/api/active_account";
/// The route to create an account.
pub const ACCOUNTS_API: &str = "/api/accounts";
/// The route to update or delete an account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to reorder accounts.
pub const REORDER_ACCOUNTS: &str = "/api/accounts/reorder";
/// The route to reorder categories.
pub const REORDER_CATEGORIES: &str = "/api/categories/reorder";
/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create a budget item.
pub const BUDGET_ITEMS_API: &str = "/api/budget_items";
/// The route to update or delete a budget item.
pub const BUDGET_ITEM: &str = "/api/budget_items/{budget_item_id}";
/// The route to flip a budget item between active and inactive.
pub const TOGGLE_BUDGET_ITEM: &str = "/api/budget_items/{budget_item_id}/toggle";
/// The route to reorder budget items.
pub const REORDER_BUDGET_ITEMS: &str = "/api/budget_items/reorder";
/// The route to create a goal.
pub const GOALS_API: &str = "/api/goals";
/// The route to update or delete a goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route to set the current amount saved towards a goal.
pub const GOAL_PROGRESS: &str = "/api/goals/{goal_id}/progress";
/// The route to reorder goals.
pub const REORDER_GOALS: &str = "/api/goals/reorder";
/// The route to set the active account's initial balance.
pub const INITIAL_BALANCE: &str = "/api/settings/initial_balance";
/// The route to save the order of the navigation links.
pub const NAV_ORDER: &str = "/api/settings/nav_order";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/goals/{goal_id}', '{goal_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;
    use uuid::Uuid;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::EDIT_TRANSACTION_VIEW,
            endpoints::BUDGET_VIEW,
            endpoints::NEW_BUDGET_ITEM_VIEW,
            endpoints::EDIT_BUDGET_ITEM_VIEW,
            endpoints::GOALS_VIEW,
            endpoints::NEW_GOAL_VIEW,
            endpoints::EDIT_GOAL_VIEW,
            endpoints::SUMMARY_VIEW,
            endpoints::SETTINGS_VIEW,
            endpoints::NEW_ACCOUNT_VIEW,
            endpoints::EDIT_ACCOUNT_VIEW,
            endpoints::REGISTER_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::COFFEE,
            endpoints::LOG_IN_API,
            endpoints::LOG_OUT,
            endpoints::USERS,
            endpoints::ACTIVE_ACCOUNT,
            endpoints::ACCOUNTS_API,
            endpoints::ACCOUNT,
            endpoints::REORDER_ACCOUNTS,
            endpoints::REORDER_CATEGORIES,
            endpoints::TRANSACTIONS_API,
            endpoints::TRANSACTION,
            endpoints::BUDGET_ITEMS_API,
            endpoints::BUDGET_ITEM,
            endpoints::TOGGLE_BUDGET_ITEM,
            endpoints::REORDER_BUDGET_ITEMS,
            endpoints::GOALS_API,
            endpoints::GOAL,
            endpoints::GOAL_PROGRESS,
            endpoints::REORDER_GOALS,
            endpoints::INITIAL_BALANCE,
            endpoints::NAV_ORDER,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn formats_uuid() {
        let id = Uuid::nil();

        let formatted_path = format_endpoint(endpoints::GOAL_PROGRESS, id);

        assert_eq!(
            formatted_path,
            "/api/goals/00000000-0000-0000-0000-000000000000/progress"
        );
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
