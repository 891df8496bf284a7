//! The dashboard page: this month at a glance and the balance over time.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use charming::{
    Chart,
    component::{Axis, Legend, Title},
    element::{AxisLabel, AxisType, ItemStyle},
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
    dashboard::{
        DashboardState,
        stats::{
            BalancePoint, DashboardStats, RECENT_TRANSACTION_COUNT, balance_history,
            current_month_rows, dashboard_stats,
        },
    },
    endpoints,
    html::{
        CARD_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base, color_dot,
        format_currency, link,
    },
    navigation::load_page_context,
    summary::{CategoryExpense, expenses_by_category},
    timezone::local_today,
    transaction::{TransactionFilters, TransactionKind, TransactionRow, get_transactions},
};

/// Display a page with an overview of the active account.
///
/// The current month is taken in the local timezone.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) = load_page_context(jar, user_id, endpoints::DASHBOARD_VIEW, &connection)?;
    let rows = get_transactions(
        user_id,
        context.account.id,
        &TransactionFilters::default(),
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not get transactions for the dashboard: {error}"))?;

    let stats = dashboard_stats(&rows, context.account.initial_balance, today);
    let month_categories = expenses_by_category(current_month_rows(&rows, today));
    let history = balance_history(&rows);
    let recent = &rows[..rows.len().min(RECENT_TRANSACTION_COUNT)];

    let charts = if rows.is_empty() {
        Vec::new()
    } else {
        vec![
            ChartView {
                id: "balance-chart",
                options: balance_chart(&history).to_string(),
            },
            ChartView {
                id: "month-category-chart",
                options: category_chart("Expenses this month", &month_categories).to_string(),
            },
        ]
    };

    let content = html! {
        (context.nav_bar)
        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            main class=(PAGE_CONTAINER_STYLE)
            {
                section class="w-full space-y-6"
                {
                    header
                    {
                        h1 class="text-xl font-bold" { "Dashboard" }
                        p class="text-sm text-gray-500" { (context.account.name) }
                    }

                    (stats_view(&stats))

                    @if rows.is_empty() {
                        (no_data_view())
                    } @else {
                        (charts_view(&charts))

                        div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                        {
                            (recent_transactions_view(recent))
                            (month_categories_view(&month_categories))
                        }
                    }
                }
            }
        }
    };

    let head_elements: Vec<HeadElement> = if charts.is_empty() {
        Vec::new()
    } else {
        charts_head_elements(&charts).into()
    };

    Ok((jar, base("Dashboard", &head_elements, &content)).into_response())
}

fn stats_view(stats: &DashboardStats) -> Markup {
    let cards = [
        ("Total balance", stats.total_balance),
        ("Income this month", stats.month_income),
        ("Expenses this month", stats.month_expenses),
        ("Savings this month", stats.month_savings),
        ("Initial balance", stats.initial_balance),
    ];

    html! {
        div class="grid grid-cols-2 gap-3 md:grid-cols-5"
        {
            @for (label, amount) in cards {
                div class=(CARD_STYLE) data-stat=(label)
                {
                    p class="text-xs uppercase tracking-wide text-gray-500" { (label) }
                    p class="text-xl font-bold tabular-nums" { (format_currency(amount)) }
                }
            }
        }
    }
}

fn no_data_view() -> Markup {
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    html! {
        div class="flex flex-col items-center py-8"
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }
            p
            {
                "Charts will show up here once you add some transactions. Start by "
                (new_transaction_link) "."
            }
        }
    }
}

fn recent_transactions_view(rows: &[TransactionRow]) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            div class="flex items-baseline justify-between mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent transactions" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "See all" }
            }

            ul id="recent-transactions" class="divide-y divide-gray-200 dark:divide-gray-700"
            {
                @for row in rows {
                    @let transaction = &row.transaction;
                    @let (sign, amount_class) = match transaction.kind {
                        TransactionKind::Income => ("+", "text-green-600 dark:text-green-400"),
                        TransactionKind::Expense => ("-", "text-red-600 dark:text-red-400"),
                    };
                    li class="flex items-center justify-between gap-3 py-2"
                    {
                        div class="min-w-0"
                        {
                            p class="truncate font-medium"
                            {
                                (row.category_icon.as_deref().unwrap_or_default()) " "
                                (transaction.description.as_deref()
                                    .or(row.category_name.as_deref())
                                    .unwrap_or(transaction.kind.label()))
                            }
                            p class="text-xs text-gray-500"
                            {
                                time datetime=(transaction.date) { (transaction.date) }
                            }
                        }
                        span class={ "shrink-0 tabular-nums " (amount_class) }
                        {
                            (sign) (format_currency(transaction.amount))
                        }
                    }
                }
            }
        }
    }
}

fn month_categories_view(categories: &[CategoryExpense]) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-xl font-semibold mb-4" { "Expenses this month" }

            @if categories.is_empty() {
                p class="text-gray-500" { "No expenses this month." }
            } @else {
                ul id="month-categories" class="space-y-2"
                {
                    @for category in categories {
                        li class="flex items-center justify-between gap-3"
                        {
                            span class="inline-flex items-center gap-2"
                            {
                                (color_dot(&category.color))
                                (category.name)
                            }
                            span class="tabular-nums" { (format_currency(category.total)) }
                        }
                    }
                }
            }
        }
    }
}

fn balance_chart(history: &[BalancePoint]) -> Chart {
    let labels: Vec<String> = history.iter().map(|point| point.label.clone()).collect();
    let balances: Vec<f64> = history.iter().map(|point| point.balance).collect();
    let expenses: Vec<f64> = history.iter().map(|point| point.expenses).collect();

    Chart::new()
        .title(Title::new().text("Balance").subtext("Net income of each month"))
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
                .name("Expenses")
                .item_style(ItemStyle::new().color("#ef4444"))
                .data(expenses),
        )
        .series(Line::new().name("Balance").data(balances))
}

#[cfg(test)]
mod dashboard_page_tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::CookieJar;
    use scraper::{Html, Selector};
    use time::{Duration, OffsetDateTime};

    use crate::{
        account::set_initial_balance,
        dashboard::DashboardState,
        test_utils::{assert_valid_html, get_test_db_with_account, parse_html_document},
        transaction::{TransactionData, TransactionKind, TransactionLinks, create_transaction},
    };

    use super::get_dashboard_page;

    fn stat_text(html: &Html, label: &str) -> String {
        let selector = Selector::parse(&format!("[data-stat=\"{label}\"] p:nth-child(2)")).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("No stat {label}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    #[tokio::test]
    async fn shows_stats_and_recent_transactions() {
        let (db_connection, user_id, account) = get_test_db_with_account();
        let today = OffsetDateTime::now_utc().date();
        {
            let connection = db_connection.lock().unwrap();
            set_initial_balance(user_id, account.id, 100.5, &connection).unwrap();
            create_transaction(
                user_id,
                account.id,
                &TransactionData {
                    amount: 50.25,
                    kind: TransactionKind::Income,
                    date: today,
                    category_id: None,
                    description: None,
                },
                &TransactionLinks::default(),
                &connection,
            )
            .unwrap();
            for days_ago in 1..=6 {
                create_transaction(
                    user_id,
                    account.id,
                    &TransactionData {
                        amount: 10.25,
                        kind: TransactionKind::Expense,
                        date: today - Duration::days(days_ago * 40),
                        category_id: None,
                        description: Some(format!("Old expense {days_ago}")),
                    },
                    &TransactionLinks::default(),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_dashboard_page(
            State(DashboardState::new(db_connection)),
            Extension(user_id),
            CookieJar::new(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(stat_text(&html, "Income this month"), "€50.25");
        assert_eq!(stat_text(&html, "Initial balance"), "€100.50");
        // 100.5 + 50.25 - 6 * 10.25
        assert_eq!(stat_text(&html, "Total balance"), "€89.25");
        let recent = Selector::parse("#recent-transactions li").unwrap();
        assert_eq!(html.select(&recent).count(), 5);
        assert_eq!(
            html.select(&Selector::parse("[data-chart]").unwrap()).count(),
            2
        );
    }

    #[tokio::test]
    async fn empty_account_has_no_charts() {
        let (db_connection, user_id, _) = get_test_db_with_account();

        let response = get_dashboard_page(
            State(DashboardState::new(db_connection)),
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
        assert_eq!(stat_text(&html, "Total balance"), "€0.00");
    }
}
