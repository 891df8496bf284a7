//! The form shared by the create and edit goal pages.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    goal::{Goal, GoalData, GoalPeriod},
    html::{BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The form data for creating or editing a goal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalForm {
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub period: GoalPeriod,
    #[serde(default)]
    pub deadline: Option<Date>,
}

impl GoalForm {
    pub fn into_data(self) -> GoalData {
        GoalData {
            name: self.name,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            period: self.period,
            deadline: self.deadline,
        }
    }
}

impl From<&Goal> for GoalForm {
    fn from(goal: &Goal) -> Self {
        Self {
            name: goal.name.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            period: goal.period,
            deadline: goal.deadline,
        }
    }
}

/// A select for [GoalPeriod] named `name`.
pub fn period_select(id: &str, name: &str, selected: GoalPeriod) -> Markup {
    html! {
        select id=(id) name=(name) class=(FORM_TEXT_INPUT_STYLE)
        {
            @for period in GoalPeriod::ALL {
                option value=(period.as_str()) selected[period == selected] { (period.label()) }
            }
        }
    }
}

/// Where the form sends its data. New goals are POSTed, existing ones PUT.
pub enum GoalFormTarget<'a> {
    Create(&'a str),
    Update(&'a str),
}

pub fn goal_form_view(target: GoalFormTarget<'_>, values: &GoalForm, error_message: &str) -> Markup {
    let (hx_post, hx_put, submit_text) = match target {
        GoalFormTarget::Create(endpoint) => (Some(endpoint), None, "Create Goal"),
        GoalFormTarget::Update(endpoint) => (None, Some(endpoint), "Save Goal"),
    };
    let target_amount = (values.target_amount > 0.0).then_some(values.target_amount);

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
                    placeholder="Emergency fund"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="target_amount" class=(FORM_LABEL_STYLE) { "Target amount" }

                div class="input-wrapper w-full"
                {
                    input
                        id="target_amount"
                        type="number"
                        name="target_amount"
                        step="0.01"
                        min="0.01"
                        placeholder="1000.00"
                        value=[target_amount]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="current_amount" class=(FORM_LABEL_STYLE) { "Saved so far" }

                div class="input-wrapper w-full"
                {
                    input
                        id="current_amount"
                        type="number"
                        name="current_amount"
                        step="0.01"
                        min="0"
                        value=(values.current_amount)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="period" class=(FORM_LABEL_STYLE) { "Period" }
                (period_select("period", "period", values.period))
            }

            div
            {
                label for="deadline" class=(FORM_LABEL_STYLE) { "Deadline (optional)" }

                input
                    id="deadline"
                    type="date"
                    name="deadline"
                    value=[values.deadline]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
