//! The form shared by the create and edit budget item pages.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    Error,
    auth::UserID,
    budget::{BudgetItem, BudgetItemData, Frequency},
    category::{Category, get_categories},
    goal::{Goal, GoalData, GoalPeriod, get_goals, period_select},
    html::{BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The form data for creating or editing a budget item.
///
/// The `goal_*` fields describe a goal to create alongside a new item and
/// are only read when `create_goal` is set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetItemForm {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub goal_id: Option<Uuid>,
    #[serde(default)]
    pub create_goal: bool,
    #[serde(default)]
    pub goal_name: String,
    #[serde(default)]
    pub goal_target: Option<f64>,
    #[serde(default)]
    pub goal_period: GoalPeriod,
}

impl BudgetItemForm {
    pub fn item_data(&self) -> BudgetItemData {
        BudgetItemData {
            name: self.name.clone(),
            amount: self.amount,
            frequency: self.frequency,
            category_id: self.category_id,
            goal_id: self.goal_id,
        }
    }

    /// The goal to create with the item, if the user asked for one.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyField] if the goal has no name and
    /// [Error::NonPositiveAmount] if its target is missing or not above zero.
    pub fn inline_goal(&self) -> Result<Option<GoalData>, Error> {
        if !self.create_goal {
            return Ok(None);
        }

        if self.goal_name.trim().is_empty() {
            return Err(Error::EmptyField("Goal name"));
        }
        let target_amount = match self.goal_target {
            Some(target) if !target.is_finite() => {
                return Err(Error::NonFiniteAmount("Goal target"));
            }
            Some(target) if target > 0.0 => target,
            _ => return Err(Error::NonPositiveAmount("Goal target")),
        };

        GoalData {
            name: self.goal_name.clone(),
            target_amount,
            current_amount: 0.0,
            period: self.goal_period,
            deadline: None,
        }
        .validate()
        .map(Some)
    }
}

impl From<&BudgetItem> for BudgetItemForm {
    fn from(item: &BudgetItem) -> Self {
        Self {
            name: item.name.clone(),
            amount: item.amount,
            frequency: item.frequency,
            category_id: item.category_id,
            goal_id: item.goal_id,
            ..Self::default()
        }
    }
}

/// Where the form sends its data. New items are POSTed, existing ones PUT.
pub enum BudgetItemFormTarget<'a> {
    Create(&'a str),
    Update(&'a str),
}

/// The choices for the category and goal selects.
pub struct BudgetItemFormOptions<'a> {
    pub categories: &'a [Category],
    /// The goals of the item's account.
    pub goals: &'a [Goal],
}

pub fn budget_item_form_view(
    target: BudgetItemFormTarget<'_>,
    values: &BudgetItemForm,
    options: &BudgetItemFormOptions<'_>,
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put, submit_text, is_new) = match target {
        BudgetItemFormTarget::Create(endpoint) => (Some(endpoint), None, "Create Budget Item", true),
        BudgetItemFormTarget::Update(endpoint) => (None, Some(endpoint), "Save Budget Item", false),
    };
    let amount = (values.amount > 0.0).then_some(values.amount);

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Rent"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        id="amount"
                        type="number"
                        name="amount"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        value=[amount]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="frequency" class=(FORM_LABEL_STYLE) { "Frequency" }

                select id="frequency" name="frequency" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for frequency in Frequency::ALL {
                        option
                            value=(frequency.as_str())
                            selected[frequency == values.frequency]
                        { (frequency.label()) }
                    }
                }
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select id="category_id" name="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[values.category_id.is_none()] { "None" }
                    @for category in options.categories {
                        option
                            value=(category.id)
                            selected[values.category_id == Some(category.id)]
                        { (category.icon) " " (category.name) }
                    }
                }
            }

            div
            {
                label for="goal_id" class=(FORM_LABEL_STYLE) { "Saves towards" }

                select id="goal_id" name="goal_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[values.goal_id.is_none()] { "No goal" }
                    @for goal in options.goals {
                        option
                            value=(goal.id)
                            selected[values.goal_id == Some(goal.id)]
                        { (goal.name) }
                    }
                }
            }

            @if is_new {
                (inline_goal_fields(values))
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}

/// Re-render the form with `error` shown under the fields.
///
/// The category and goal choices are loaded for `account_id`.
pub fn form_error_response(
    target: BudgetItemFormTarget<'_>,
    values: &BudgetItemForm,
    error: &Error,
    user_id: UserID,
    account_id: Uuid,
    connection: &Connection,
) -> Response {
    let choices = get_categories(connection)
        .and_then(|categories| Ok((categories, get_goals(user_id, account_id, connection)?)));

    match choices {
        Ok((categories, goals)) => budget_item_form_view(
            target,
            values,
            &BudgetItemFormOptions {
                categories: &categories,
                goals: &goals,
            },
            &format!("Error: {error}"),
        )
        .into_response(),
        Err(error) => {
            tracing::error!("could not load budget item form choices: {error}");
            error.into_alert_response()
        }
    }
}

fn inline_goal_fields(values: &BudgetItemForm) -> Markup {
    html! {
        details open[values.create_goal] class="rounded border border-gray-300 p-3 dark:border-gray-600"
        {
            summary class="cursor-pointer text-sm font-medium" { "Create a new goal" }

            div class="mt-3 space-y-4"
            {
                div class="flex items-center gap-2"
                {
                    input
                        id="create_goal"
                        type="checkbox"
                        name="create_goal"
                        value="true"
                        checked[values.create_goal];
                    label for="create_goal" class="text-sm" { "Save towards a new goal instead" }
                }

                div
                {
                    label for="goal_name" class=(FORM_LABEL_STYLE) { "Goal name" }

                    input
                        id="goal_name"
                        type="text"
                        name="goal_name"
                        value=(values.goal_name)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="goal_target" class=(FORM_LABEL_STYLE) { "Goal target" }

                    div class="input-wrapper w-full"
                    {
                        input
                            id="goal_target"
                            type="number"
                            name="goal_target"
                            step="0.01"
                            min="0.01"
                            value=[values.goal_target]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="goal_period" class=(FORM_LABEL_STYLE) { "Goal period" }
                    (period_select("goal_period", "goal_period", values.goal_period))
                }
            }
        }
    }
}
