//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, get_edit_account_page,
        get_new_account_page, switch_active_account_endpoint, update_account_endpoint,
    },
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    budget::{
        create_budget_item_endpoint, delete_budget_item_endpoint, get_budget_page,
        get_edit_budget_item_page, get_new_budget_item_page, toggle_budget_item_endpoint,
        update_budget_item_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    goal::{
        create_goal_endpoint, delete_goal_endpoint, get_edit_goal_page, get_goals_page,
        get_new_goal_page, update_goal_endpoint, update_goal_progress_endpoint,
    },
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    reorder::{
        reorder_accounts_endpoint, reorder_budget_items_endpoint, reorder_categories_endpoint,
        reorder_goals_endpoint,
    },
    settings::{get_settings_page, save_nav_order_endpoint, update_initial_balance_endpoint},
    summary::get_summary_page,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        get_new_transaction_page, get_transactions_page, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::BUDGET_VIEW, get(get_budget_page))
        .route(endpoints::NEW_BUDGET_ITEM_VIEW, get(get_new_budget_item_page))
        .route(
            endpoints::EDIT_BUDGET_ITEM_VIEW,
            get(get_edit_budget_item_page),
        )
        .route(endpoints::GOALS_VIEW, get(get_goals_page))
        .route(endpoints::NEW_GOAL_VIEW, get(get_new_goal_page))
        .route(endpoints::EDIT_GOAL_VIEW, get(get_edit_goal_page))
        .route(endpoints::SUMMARY_VIEW, get(get_summary_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .route(endpoints::NEW_ACCOUNT_VIEW, get(get_new_account_page))
        .route(endpoints::EDIT_ACCOUNT_VIEW, get(get_edit_account_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(update_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(
                endpoints::BUDGET_ITEMS_API,
                post(create_budget_item_endpoint),
            )
            .route(
                endpoints::BUDGET_ITEM,
                put(update_budget_item_endpoint).delete(delete_budget_item_endpoint),
            )
            .route(
                endpoints::TOGGLE_BUDGET_ITEM,
                post(toggle_budget_item_endpoint),
            )
            .route(
                endpoints::REORDER_BUDGET_ITEMS,
                post(reorder_budget_items_endpoint),
            )
            .route(endpoints::GOALS_API, post(create_goal_endpoint))
            .route(
                endpoints::GOAL,
                put(update_goal_endpoint).delete(delete_goal_endpoint),
            )
            .route(
                endpoints::GOAL_PROGRESS,
                put(update_goal_progress_endpoint),
            )
            .route(endpoints::REORDER_GOALS, post(reorder_goals_endpoint))
            .route(endpoints::ACCOUNTS_API, post(create_account_endpoint))
            .route(
                endpoints::ACCOUNT,
                put(update_account_endpoint).delete(delete_account_endpoint),
            )
            .route(
                endpoints::REORDER_ACCOUNTS,
                post(reorder_accounts_endpoint),
            )
            .route(
                endpoints::REORDER_CATEGORIES,
                post(reorder_categories_endpoint),
            )
            .route(
                endpoints::ACTIVE_ACCOUNT,
                post(switch_active_account_endpoint),
            )
            .route(
                endpoints::INITIAL_BALANCE,
                post(update_initial_balance_endpoint),
            )
            .route(endpoints::NAV_ORDER, post(save_nav_order_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    use super::get_coffee;

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let response = get_coffee().await;

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
