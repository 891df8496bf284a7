//! The summary page: monthly income and expenses, and where the money went.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use charming::{
    Chart,
    component::{Axis, Legend, Title},
    element::{AxisLabel, AxisType, Emphasis, EmphasisFocus, ItemStyle},
    series::{Line, bar::Bar},
};
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    charts::{
        ChartView, category_chart, chart_grid, charts_head_elements, charts_view,
        currency_formatter, currency_tooltip,
    },
    endpoints,
    html::{
        CARD_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, color_dot, format_currency, format_percentage, link,
    },
    navigation::load_page_context,
    summary::{
        SummaryState,
        aggregation::{
            CategoryExpense, MonthFigures, SUMMARY_MONTH_COUNT, SummaryTotals,
            expenses_by_category, latest_months, monthly_figures, summary_totals,
        },
    },
    transaction::{TransactionFilters, get_transactions},
};

const AMOUNT_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const AMOUNT_RED_STYLE: &str = "text-red-600 dark:text-red-400";

fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        AMOUNT_GREEN_STYLE
    } else {
        AMOUNT_RED_STYLE
    }
}

/// Render the summary of every transaction in the active account.
pub async fn get_summary_page(
    State(state): State<SummaryState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) = load_page_context(jar, user_id, endpoints::SUMMARY_VIEW, &connection)?;
    let rows = get_transactions(
        user_id,
        context.account.id,
        &TransactionFilters::default(),
        &connection,
    )?;

    if rows.is_empty() {
        let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "record a transaction");
        let content = html! {
            (context.nav_bar)
            div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
            {
                h2 class="text-xl font-bold" { "Nothing here yet..." }
                p
                {
                    "The summary for " (context.account.name) " shows up once you "
                    (new_transaction_link) "."
                }
            }
        };

        return Ok((jar, base("Summary", &[], &content)).into_response());
    }

    let months = latest_months(
        monthly_figures(rows.iter().map(|row| &row.transaction)),
        SUMMARY_MONTH_COUNT,
    );
    let categories = expenses_by_category(&rows);
    let totals = summary_totals(rows.iter().map(|row| &row.transaction));

    let charts = [
        ChartView {
            id: "income-expenses-chart",
            options: income_expenses_chart(&months).to_string(),
        },
        ChartView {
            id: "category-chart",
            options: category_chart("Expenses by category", &categories).to_string(),
        },
    ];

    let content = html! {
        (context.nav_bar)
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-screen-xl space-y-6"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Summary" }
                    p class="text-sm text-gray-500" { (context.account.name) }
                }

                (totals_view(&totals))
                (charts_view(&charts))

                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    (monthly_table(&months))
                    (category_table(&categories))
                }
            }
        }
    };

    Ok((jar, base("Summary", &charts_head_elements(&charts), &content)).into_response())
}

fn totals_view(totals: &SummaryTotals) -> Markup {
    let cards = [
        ("Income", format_currency(totals.income), ""),
        ("Expenses", format_currency(totals.expenses), ""),
        (
            "Savings",
            format_currency(totals.savings),
            amount_color_class(totals.savings),
        ),
        (
            "Savings rate",
            format_percentage(totals.savings_rate),
            amount_color_class(totals.savings_rate),
        ),
    ];

    html! {
        div class="grid grid-cols-2 gap-3 md:grid-cols-4"
        {
            @for (label, value, color_class) in cards {
                div class=(CARD_STYLE) data-summary-total=(label)
                {
                    p class="text-xs uppercase tracking-wide text-gray-500" { (label) }
                    p class={ "text-xl font-bold tabular-nums " (color_class) } { (value) }
                }
            }
        }
    }
}

fn monthly_table(months: &[MonthFigures]) -> Markup {
    html! {
        div
        {
            h3 class="text-xl font-semibold mb-4" { "By month" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table id="monthly-summary" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            th scope="col" class="px-6 py-3 text-right" { "Income" }
                            th scope="col" class="px-6 py-3 text-right" { "Expenses" }
                            th scope="col" class="px-6 py-3 text-right" { "Savings" }
                        }
                    }

                    tbody
                    {
                        @for month in months.iter().rev() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class=(TABLE_CELL_STYLE) { (month.label) }
                                td class="px-6 py-4 text-right tabular-nums"
                                {
                                    (format_currency(month.income))
                                }
                                td class="px-6 py-4 text-right tabular-nums"
                                {
                                    (format_currency(month.expenses))
                                }
                                td class={ "px-6 py-4 text-right tabular-nums " (amount_color_class(month.savings)) }
                                {
                                    (format_currency(month.savings))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn category_table(categories: &[CategoryExpense]) -> Markup {
    html! {
        div
        {
            h3 class="text-xl font-semibold mb-4" { "Expenses by category" }

            @if categories.is_empty() {
                p class="text-gray-500" { "No expenses yet." }
            } @else {
                div class="overflow-x-auto rounded-lg shadow"
                {
                    table id="category-summary" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class="px-6 py-3 text-right" { "Total" }
                                th scope="col" class="px-6 py-3 text-right" { "Share" }
                            }
                        }

                        tbody
                        {
                            @for category in categories {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    th scope="row" class=(TABLE_CELL_STYLE)
                                    {
                                        span class="inline-flex items-center gap-2"
                                        {
                                            (color_dot(&category.color))
                                            (category.name)
                                        }
                                    }
                                    td class="px-6 py-4 text-right tabular-nums"
                                    {
                                        (format_currency(category.total))
                                    }
                                    td class="px-6 py-4 text-right tabular-nums"
                                    {
                                        (format_percentage(category.percentage))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn income_expenses_chart(months: &[MonthFigures]) -> Chart {
    let labels: Vec<String> = months.iter().map(|month| month.label.clone()).collect();
    let income: Vec<f64> = months.iter().map(|month| month.income).collect();
    let expenses: Vec<f64> = months.iter().map(|month| month.expenses).collect();
    let savings: Vec<f64> = months.iter().map(|month| month.savings).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Income and expenses")
                .subtext("Last twelve months with activity"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(chart_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color("#10b981"))
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(income),
        )
        .series(
            Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color("#ef4444"))
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(expenses),
        )
        .series(Line::new().name("Savings").data(savings))
}

#[cfg(test)]
mod summary_page_tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::CookieJar;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        category::get_categories,
        test_utils::{assert_valid_html, get_test_db_with_account, parse_html_document},
        transaction::{TransactionData, TransactionKind, TransactionLinks, create_transaction},
    };

    use super::{SummaryState, get_summary_page};

    fn cell_texts(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn renders_tables_and_charts() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        {
            let connection = db_connection.lock().unwrap();
            let food = get_categories(&connection).unwrap()[0].clone();
            for (amount, kind, date, category_id) in [
                (800.75, TransactionKind::Income, date!(2025 - 01 - 03), None),
                (120.25, TransactionKind::Expense, date!(2025 - 01 - 10), Some(food.id)),
                (40.25, TransactionKind::Expense, date!(2025 - 02 - 10), None),
            ] {
                create_transaction(
                    user_id,
                    account.id,
                    &TransactionData {
                        amount,
                        kind,
                        date,
                        category_id,
                        description: None,
                    },
                    &TransactionLinks::default(),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_summary_page(
            State(SummaryState { db_connection }),
            Extension(user_id),
            CookieJar::new(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_eq!(
            cell_texts(&html, "#monthly-summary tbody th"),
            ["Feb 25", "Jan 25"]
        );
        let categories = cell_texts(&html, "#category-summary tbody th");
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1], "Other");
        assert_eq!(
            cell_texts(&html, "[data-summary-total=\"Savings\"] p:nth-child(2)"),
            ["€640.25"]
        );
        assert_eq!(
            html.select(&Selector::parse("[data-chart]").unwrap()).count(),
            2
        );
    }

    #[tokio::test]
    async fn empty_account_shows_hint() {
        let (db_connection, user_id, _) = get_test_db_with_account();

        let response = get_summary_page(
            State(SummaryState { db_connection }),
            Extension(user_id),
            CookieJar::new(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            html.select(&Selector::parse("[data-chart]").unwrap()).count(),
            0
        );
    }
}
