//! The budget page: the active account's recurring charges and their totals.

use std::collections::HashMap;

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
    auth::UserID,
    budget::{
        BudgetItem, BudgetState,
        figures::{BudgetFigures, budget_figures},
        get_budget_items,
    },
    category::{Category, UNCATEGORIZED_COLOR, get_categories},
    endpoints,
    goal::{Goal, get_goals},
    html::{
        BADGE_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base, color_dot,
        drag_handle, edit_delete_action_links, format_currency, reorder_list,
    },
    navigation::load_page_context,
};

/// Render the budget items of the active account with the budget totals.
pub async fn get_budget_page(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) = load_page_context(jar, user_id, endpoints::BUDGET_VIEW, &connection)?;
    let budget_items = get_budget_items(user_id, context.account.id, &connection)?;
    let categories: HashMap<Uuid, Category> = get_categories(&connection)?
        .into_iter()
        .map(|category| (category.id, category))
        .collect();
    let goals: HashMap<Uuid, Goal> = get_goals(user_id, context.account.id, &connection)?
        .into_iter()
        .map(|goal| (goal.id, goal))
        .collect();
    let figures = budget_figures(&budget_items);

    let items = html! {
        @for item in &budget_items {
            (budget_item_row(
                item,
                item.category_id.and_then(|id| categories.get(&id)),
                item.goal_id.and_then(|id| goals.get(&id)),
            ))
        }
    };

    let content = html! {
        (context.nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-3xl space-y-6"
            {
                div class="flex items-center justify-between"
                {
                    div
                    {
                        h1 class="text-2xl font-bold" { "Budget" }
                        p class="text-sm text-gray-500"
                        {
                            (item_count_text(budget_items.len(), figures.active_count))
                        }
                    }
                    a href=(endpoints::NEW_BUDGET_ITEM_VIEW) class=(BUTTON_SECONDARY_STYLE)
                    {
                        "New budget item"
                    }
                }

                (figures_view(&figures))

                @if budget_items.is_empty() {
                    p class="text-gray-500" { "No budget items yet for " (context.account.name) "." }
                } @else {
                    (reorder_list(endpoints::REORDER_BUDGET_ITEMS, "id", "flex flex-col gap-2", &items))
                }
            }
        }
    };

    Ok((jar, base("Budget", &[], &content)).into_response())
}

fn item_count_text(total: usize, active: usize) -> String {
    let plural = if total == 1 { "" } else { "s" };
    let mut text = format!("{total} planned charge{plural}");

    if active != total {
        text.push_str(&format!(" · {active} active"));
    }

    text
}

fn figures_view(figures: &BudgetFigures) -> Markup {
    let cards = [
        ("Monthly budget", format_currency(figures.monthly_budget), "Yearly items spread over 12 months"),
        ("Annual budget", format_currency(figures.annual_budget), "Everything over a year"),
        ("Monthly items", format_currency(figures.monthly_items_total), "Paid every month"),
        ("Yearly items", format_currency(figures.yearly_items_total), "Paid once a year"),
        ("Linked goals", figures.linked_goal_count.to_string(), "Goals funded by this budget"),
    ];

    html! {
        div class="grid grid-cols-2 gap-3 md:grid-cols-5"
        {
            @for (label, value, hint) in cards {
                div class=(CARD_STYLE) data-figure=(label)
                {
                    p class="text-xs uppercase tracking-wide text-gray-500" { (label) }
                    p class="text-xl font-bold tabular-nums" { (value) }
                    p class="text-xs text-gray-400" { (hint) }
                }
            }
        }
    }
}

fn budget_item_row(item: &BudgetItem, category: Option<&Category>, goal: Option<&Goal>) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_BUDGET_ITEM_VIEW, item.id);
    let delete_url = endpoints::format_endpoint(endpoints::BUDGET_ITEM, item.id);
    let toggle_url = endpoints::format_endpoint(endpoints::TOGGLE_BUDGET_ITEM, item.id);
    let color = category.map_or(UNCATEGORIZED_COLOR, |category| category.color.as_str());
    let row_style = if item.active {
        CARD_STYLE.to_owned()
    } else {
        format!("{CARD_STYLE} opacity-50")
    };

    html! {
        li
            class=(row_style)
            data-reorder-item=(item.id)
            data-active=(item.active)
            draggable="true"
        {
            div class="flex items-center gap-3"
            {
                (drag_handle())
                (color_dot(color))

                div class="min-w-0 grow"
                {
                    p class="truncate font-medium" { (item.name) }
                    div class="mt-1 flex flex-wrap gap-2"
                    {
                        @if let Some(category) = category {
                            span class=(BADGE_STYLE) { (category.icon) " " (category.name) }
                        }
                        @if let Some(goal) = goal {
                            span class=(BADGE_STYLE) { "🔗 " (goal.name) }
                        }
                    }
                }

                div class="shrink-0 text-right"
                {
                    p class="font-semibold tabular-nums" { (format_currency(item.amount)) }
                    p class="text-xs text-gray-500" { (item.frequency.per()) }
                }

                button
                    type="button"
                    role="switch"
                    aria-checked=(item.active)
                    title=(if item.active { "Deactivate" } else { "Activate" })
                    hx-post=(toggle_url)
                    hx-target-error="#alert-container"
                    class="rounded border border-gray-300 px-2 py-1 text-xs dark:border-gray-600"
                {
                    @if item.active { "On" } @else { "Off" }
                }

                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &format!("Delete the budget item \"{}\"?", item.name),
                    "closest li",
                    "delete",
                ))
            }
        }
    }
}

#[cfg(test)]
mod budget_page_tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::CookieJar;
    use scraper::Selector;

    use crate::{
        budget::{BudgetItemData, BudgetState, Frequency, create_budget_item, toggle_budget_item},
        endpoints,
        test_utils::{assert_valid_html, get_test_db_with_account, parse_html_document},
    };

    use super::{get_budget_page, item_count_text};

    #[tokio::test]
    async fn render_items_and_figures() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        {
            let connection = db_connection.lock().unwrap();
            for (name, amount, frequency) in [
                ("Rent", 900.5, Frequency::Monthly),
                ("Insurance", 480.0, Frequency::Yearly),
                ("Gym", 30.0, Frequency::Monthly),
            ] {
                let item = create_budget_item(
                    user_id,
                    account.id,
                    &BudgetItemData {
                        name: name.to_owned(),
                        amount,
                        frequency,
                        category_id: None,
                        goal_id: None,
                    },
                    &connection,
                )
                .unwrap();

                if name == "Gym" {
                    toggle_budget_item(user_id, item.id, &connection).unwrap();
                }
            }
        }

        let response = get_budget_page(
            State(BudgetState { db_connection }),
            Extension(user_id),
            CookieJar::new(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let items = Selector::parse(&format!(
            "ul[data-reorder-endpoint=\"{}\"] > li",
            endpoints::REORDER_BUDGET_ITEMS
        ))
        .unwrap();
        let active: Vec<&str> = html
            .select(&items)
            .map(|item| item.value().attr("data-active").unwrap_or_default())
            .collect();
        assert_eq!(active, ["true", "true", "false"]);

        let monthly_budget = html
            .select(&Selector::parse("[data-figure=\"Monthly budget\"] p:nth-child(2)").unwrap())
            .next()
            .expect("No monthly budget figure")
            .text()
            .collect::<String>();
        assert_eq!(monthly_budget, "€940.50");
    }

    #[test]
    fn item_count_mentions_inactive_items() {
        assert_eq!(item_count_text(1, 1), "1 planned charge");
        assert_eq!(item_count_text(3, 2), "3 planned charges · 2 active");
    }
}
