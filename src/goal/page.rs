//! The goals page.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    endpoints,
    goal::{
        Goal, GoalState,
        figures::{BudgetLineProgress, GoalProgress, get_linked_budget_lines, goal_progress},
        get_goals,
        progress::progress_form_view,
    },
    html::{
        BADGE_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base,
        currency_input_styles, drag_handle, edit_delete_action_links, format_currency,
        format_percentage, reorder_list,
    },
    navigation::load_page_context,
    timezone::local_today,
};

/// Render the goals of the active account with their progress.
pub async fn get_goals_page(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    jar: CookieJar,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (jar, context) = load_page_context(jar, user_id, endpoints::GOALS_VIEW, &connection)?;
    let goals = get_goals(user_id, context.account.id, &connection)?;
    let mut lines_by_goal = get_linked_budget_lines(user_id, context.account.id, &connection)?;

    let items = html! {
        @for goal in &goals {
            (goal_card(
                goal,
                &goal_progress(goal, today),
                &lines_by_goal.remove(&goal.id).unwrap_or_default(),
            ))
        }
    };

    let content = html! {
        (context.nav_bar)
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-3xl space-y-4"
            {
                div class="flex items-center justify-between"
                {
                    h1 class="text-2xl font-bold" { "Goals" }
                    a href=(endpoints::NEW_GOAL_VIEW) class=(BUTTON_SECONDARY_STYLE) { "New goal" }
                }

                @if goals.is_empty() {
                    p class="text-gray-500" { "No goals yet for " (context.account.name) "." }
                } @else {
                    (reorder_list(endpoints::REORDER_GOALS, "id", "flex flex-col gap-4", &items))
                }
            }
        }
    };

    Ok((jar, base("Goals", &[currency_input_styles()], &content)).into_response())
}

fn goal_card(goal: &Goal, progress: &GoalProgress, lines: &[BudgetLineProgress]) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_GOAL_VIEW, goal.id);
    let delete_url = endpoints::format_endpoint(endpoints::GOAL, goal.id);
    let bar_color = if progress.reached { "bg-green-500" } else { "bg-blue-600" };

    html! {
        li class=(CARD_STYLE) data-reorder-item=(goal.id) draggable="true"
        {
            div class="flex items-center gap-3"
            {
                (drag_handle())
                h2 class="grow text-lg font-semibold" { (goal.name) }
                span class=(BADGE_STYLE) { (goal.period.label()) }
                @if progress.reached {
                    span class=(BADGE_STYLE) { "✓ Reached" }
                }
            }

            div class="mt-3 h-2 w-full rounded-full bg-gray-200 dark:bg-gray-700"
            {
                div
                    class=(format!("h-2 rounded-full {bar_color}"))
                    style=(format!("width: {:.1}%", progress.percentage))
                    role="progressbar"
                    aria-valuenow=(format!("{:.0}", progress.percentage))
                    aria-valuemin="0"
                    aria-valuemax="100"
                {}
            }

            div class="mt-2 flex flex-wrap justify-between gap-2 text-sm"
            {
                span { (format_currency(goal.current_amount)) " of " (format_currency(goal.target_amount)) }
                span { (format_percentage(progress.percentage)) }
                span { (format_currency(progress.remaining)) " to go" }
                @if let Some(days_left) = progress.days_left {
                    span data-days-left=(days_left) { (days_left_text(days_left)) }
                }
            }

            @if !lines.is_empty() {
                (budget_lines_view(lines))
            }

            div class="mt-3 flex flex-wrap items-center justify-between gap-3"
            {
                (progress_form_view(goal.id, &goal.current_amount.to_string(), ""))
                div class="flex gap-3"
                {
                    (edit_delete_action_links(
                        &edit_url,
                        &delete_url,
                        &format!("Delete the goal \"{}\"?", goal.name),
                        "closest li",
                        "delete",
                    ))
                }
            }
        }
    }
}

fn days_left_text(days_left: i64) -> String {
    match days_left {
        _ if days_left < 0 => format!("{} days overdue", -days_left),
        0 => "Due today".to_owned(),
        1 => "1 day left".to_owned(),
        _ => format!("{days_left} days left"),
    }
}

fn budget_lines_view(lines: &[BudgetLineProgress]) -> Markup {
    html! {
        table class="mt-3 w-full text-sm"
        {
            thead
            {
                tr class="text-left text-gray-500"
                {
                    th { "Budget line" }
                    th { "Planned" }
                    th { "Spent" }
                    th { "Left" }
                }
            }
            tbody
            {
                @for line in lines {
                    tr
                    {
                        td { (line.name) " (" (line.frequency.label()) ")" }
                        td { (format_currency(line.amount)) }
                        td { (format_currency(line.consumed)) }
                        td { (format_currency(line.remaining)) }
                    }
                }
            }
        }
    }
}
