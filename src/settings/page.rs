//! The settings page: accounts, the active account's initial balance, and the
//! order of categories and navigation links.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::{Markup, html};
use uuid::Uuid;

use crate::{
    Error,
    account::{Account, account_icon_glyph, get_accounts},
    auth::UserID,
    category::{Category, get_categories},
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base, color_dot,
        currency_rounded_with_tooltip, drag_handle, edit_delete_action_links, reorder_list,
    },
    navigation::{NavItem, load_page_context, ordered_nav_items},
    settings::{SettingsState, get_nav_order, initial_balance::initial_balance_form_view},
};

const LIST_STYLE: &str = "flex flex-col gap-2";
const ITEM_STYLE: &str = "flex items-center gap-3 rounded border border-gray-200 bg-white \
    px-4 py-3 dark:border-gray-700 dark:bg-gray-800";
const SECTION_HEADING_STYLE: &str = "mb-3 text-lg font-semibold";

/// Render the settings page.
pub async fn get_settings_page(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) =
        load_page_context(jar, user_id, endpoints::SETTINGS_VIEW, &connection)?;
    let accounts = get_accounts(user_id, &connection)?;
    let categories = get_categories(&connection)?;
    let nav_items = ordered_nav_items(&get_nav_order(user_id, &connection)?);

    let content = html! {
        (context.nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl space-y-8"
            {
                h1 class="text-2xl font-bold" { "Settings" }
                (accounts_section(&accounts, context.account.id))
                section class=(CARD_STYLE)
                {
                    h2 class=(SECTION_HEADING_STYLE)
                    {
                        "Initial balance of " (context.account.name)
                    }
                    (initial_balance_form_view(context.account.initial_balance, ""))
                }
                (categories_section(&categories))
                (nav_order_section(&nav_items))
            }
        }
    };

    Ok((jar, base("Settings", &[], &content)).into_response())
}

fn accounts_section(accounts: &[Account], active_account_id: Uuid) -> Markup {
    let items = html! {
        @for account in accounts {
            @let edit_url = endpoints::format_endpoint(endpoints::EDIT_ACCOUNT_VIEW, account.id);
            @let delete_url = endpoints::format_endpoint(endpoints::ACCOUNT, account.id);
            li class=(ITEM_STYLE) data-reorder-item=(account.id) draggable="true"
            {
                (drag_handle())
                (color_dot(&account.color))
                span aria-hidden="true" { (account_icon_glyph(&account.icon)) }
                span class="grow font-medium"
                {
                    (account.name)
                    @if account.id == active_account_id {
                        span class="ml-2 text-xs text-gray-500" { "(active)" }
                    }
                }
                span class="text-sm" { (currency_rounded_with_tooltip(account.initial_balance)) }
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &format!(
                        "Delete the account \"{}\" along with all of its transactions, \
                        budget items and goals?",
                        account.name
                    ),
                    "closest li",
                    "delete",
                ))
            }
        }
    };

    html! {
        section
        {
            div class="mb-3 flex items-center justify-between"
            {
                h2 class="text-lg font-semibold" { "Accounts" }
                a href=(endpoints::NEW_ACCOUNT_VIEW) class=(BUTTON_SECONDARY_STYLE) { "New account" }
            }
            (reorder_list(endpoints::REORDER_ACCOUNTS, "id", LIST_STYLE, &items))
        }
    }
}

fn categories_section(categories: &[Category]) -> Markup {
    let items = html! {
        @for category in categories {
            li class=(ITEM_STYLE) data-reorder-item=(category.id) draggable="true"
            {
                (drag_handle())
                (color_dot(&category.color))
                span aria-hidden="true" { (category.icon) }
                span class="grow" { (category.name) }
            }
        }
    };

    html! {
        section
        {
            h2 class=(SECTION_HEADING_STYLE) { "Categories" }
            (reorder_list(endpoints::REORDER_CATEGORIES, "id", LIST_STYLE, &items))
        }
    }
}

fn nav_order_section(nav_items: &[NavItem]) -> Markup {
    let items = html! {
        @for item in nav_items {
            li class=(ITEM_STYLE) data-reorder-item=(item.key()) draggable="true"
            {
                (drag_handle())
                span class="grow" { (item.title()) }
            }
        }
    };

    html! {
        section
        {
            h2 class=(SECTION_HEADING_STYLE) { "Navigation order" }
            (reorder_list(endpoints::NAV_ORDER, "key", LIST_STYLE, &items))
        }
    }
}
