//! The transactions page: a filterable list of the active account's transactions.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, Query};
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    category::{Category, UNCATEGORIZED_COLOR, get_categories},
    endpoints,
    html::{
        BADGE_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, color_dot, edit_delete_action_links, format_currency,
    },
    navigation::load_page_context,
    transaction::{
        TransactionState,
        core::TransactionKind,
        query::{
            TransactionFilters, TransactionRow, TransactionTotals, get_transactions,
            transaction_totals,
        },
    },
};

/// Render the transactions of the active account that match the query filters.
pub async fn get_transactions_page(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
    Query(filters): Query<TransactionFilters>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) =
        load_page_context(jar, user_id, endpoints::TRANSACTIONS_VIEW, &connection)?;
    let rows = get_transactions(user_id, context.account.id, &filters, &connection)?;
    let totals = transaction_totals(rows.iter().map(|row| &row.transaction));
    let categories = get_categories(&connection)?;

    let content = html! {
        (context.nav_bar)
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-5xl space-y-4"
            {
                header class="flex flex-wrap items-end justify-between gap-2"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Transactions" }
                        p class="text-sm text-gray-500" { (context.account.name) }
                    }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(BUTTON_SECONDARY_STYLE)
                    {
                        "New transaction"
                    }
                }

                @if filters.goal_updated {
                    p
                        role="status"
                        data-goal-updated="true"
                        class="rounded border border-green-300 bg-green-50 px-4 py-2 text-sm
                            text-green-800 dark:border-green-700 dark:bg-green-900 dark:text-green-200"
                    {
                        "The linked goal was updated."
                    }
                }

                (filter_form(&filters, &categories))
                (totals_view(&totals))
                (transactions_table(&rows, filters.is_active()))
            }
        }
    };

    Ok((jar, base("Transactions", &[], &content)).into_response())
}

fn filter_form(filters: &TransactionFilters, categories: &[Category]) -> Markup {
    let amount_min = filters.amount_min.map(|amount| amount.to_string());
    let amount_max = filters.amount_max.map(|amount| amount.to_string());

    html! {
        details class=(CARD_STYLE) open[filters.is_active()]
        {
            summary class="cursor-pointer font-medium" { "Filters" }

            form
                method="get"
                action=(endpoints::TRANSACTIONS_VIEW)
                class="mt-4 grid grid-cols-1 gap-4 md:grid-cols-3"
            {
                div
                {
                    label for="date_from" class=(FORM_LABEL_STYLE) { "From" }
                    input
                        type="date"
                        name="date_from"
                        id="date_from"
                        value=[filters.date_from]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date_to" class=(FORM_LABEL_STYLE) { "To" }
                    input
                        type="date"
                        name="date_to"
                        id="date_to"
                        value=[filters.date_to]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="type" class=(FORM_LABEL_STYLE) { "Type" }
                    select name="type" id="type" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[filters.kind.is_none()] { "All" }
                        @for kind in TransactionKind::ALL {
                            option value=(kind.as_str()) selected[filters.kind == Some(kind)]
                            {
                                (kind.label())
                            }
                        }
                    }
                }

                div
                {
                    label for="amount_min" class=(FORM_LABEL_STYLE) { "Minimum amount" }
                    input
                        type="number"
                        step="0.01"
                        name="amount_min"
                        id="amount_min"
                        value=[amount_min]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="amount_max" class=(FORM_LABEL_STYLE) { "Maximum amount" }
                    input
                        type="number"
                        step="0.01"
                        name="amount_max"
                        id="amount_max"
                        value=[amount_max]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                fieldset class="md:col-span-3"
                {
                    legend class=(FORM_LABEL_STYLE) { "Categories" }
                    div class="flex flex-wrap gap-3"
                    {
                        @for category in categories {
                            @let id = format!("category-{}", category.id);
                            label for=(id) class="flex items-center gap-1 text-sm"
                            {
                                input
                                    type="checkbox"
                                    name="category_id"
                                    id=(id)
                                    value=(category.id)
                                    checked[filters.category_ids.contains(&category.id)];
                                (category.icon) " " (category.name)
                            }
                        }
                    }
                }

                div class="flex items-center gap-4 md:col-span-3"
                {
                    button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply" }
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear filters" }
                }
            }
        }
    }
}

fn totals_view(totals: &TransactionTotals) -> Markup {
    let net_class = if totals.net < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };

    html! {
        div class="grid grid-cols-3 gap-3"
        {
            div class=(CARD_STYLE) data-total="income"
            {
                p class="text-xs uppercase tracking-wide text-gray-500" { "Income" }
                p class="text-lg font-bold tabular-nums" { (format_currency(totals.income)) }
            }
            div class=(CARD_STYLE) data-total="expenses"
            {
                p class="text-xs uppercase tracking-wide text-gray-500" { "Expenses" }
                p class="text-lg font-bold tabular-nums" { (format_currency(totals.expenses)) }
            }
            div class=(CARD_STYLE) data-total="net"
            {
                p class="text-xs uppercase tracking-wide text-gray-500" { "Net" }
                p class={ "text-lg font-bold tabular-nums " (net_class) }
                {
                    (format_currency(totals.net))
                }
            }
        }
    }
}

fn transactions_table(rows: &[TransactionRow], is_filtered: bool) -> Markup {
    let empty_message = if is_filtered {
        "No transactions match these filters."
    } else {
        "No transactions yet. Record one to get started."
    };

    html! {
        div class="overflow-x-auto rounded bg-gray-50 dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for row in rows {
                        (transaction_row_view(row))
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td colspan="5" data-empty-state="true" class="px-6 py-4 text-center"
                            {
                                (empty_message)
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row_view(row: &TransactionRow) -> Markup {
    let transaction = &row.transaction;
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id);
    let description = transaction.description.as_deref().unwrap_or("-");
    let (sign, amount_class) = match transaction.kind {
        TransactionKind::Income => ("+", "text-green-600 dark:text-green-400"),
        TransactionKind::Expense => ("-", "text-red-600 dark:text-red-400"),
    };
    let confirm_message = format!(
        "Are you sure you want to delete the transaction '{description}'? This cannot be undone."
    );

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }
            td class=(TABLE_CELL_STYLE) { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(name) = &row.category_name {
                    span class=(BADGE_STYLE)
                    {
                        (color_dot(row.category_color.as_deref().unwrap_or(UNCATEGORIZED_COLOR)))
                        (row.category_icon.as_deref().unwrap_or_default()) " " (name)
                    }
                } @else {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                }
            }
            td class={ "px-6 py-4 text-right tabular-nums " (amount_class) }
            {
                (sign) (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &confirm_message,
                        "closest tr",
                        "delete",
                    ))
                }
            }
        }
    }
}
