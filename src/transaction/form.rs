//! The form shared by the create and edit transaction pages.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;
use uuid::Uuid;

use crate::{
    Error,
    auth::UserID,
    budget::{BudgetItem, get_budget_items},
    category::{Category, get_categories},
    goal::{Goal, get_goals},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
    transaction::core::{Transaction, TransactionData, TransactionKind, TransactionLinks},
};

/// The form data for creating or editing a transaction.
///
/// `budget_item_id` and `goal_id` are only read when creating a transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionForm {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: Date,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub budget_item_id: Option<Uuid>,
    #[serde(default)]
    pub goal_id: Option<Uuid>,
}

impl TransactionForm {
    /// An empty expense dated `date`.
    pub fn new(date: Date) -> Self {
        Self {
            amount: 0.0,
            kind: TransactionKind::Expense,
            date,
            category_id: None,
            description: String::new(),
            budget_item_id: None,
            goal_id: None,
        }
    }

    pub fn data(&self) -> TransactionData {
        TransactionData {
            amount: self.amount,
            kind: self.kind,
            date: self.date,
            category_id: self.category_id,
            description: Some(self.description.clone()),
        }
    }

    pub fn links(&self) -> TransactionLinks {
        TransactionLinks {
            budget_item_id: self.budget_item_id,
            goal_id: self.goal_id,
        }
    }
}

impl From<&Transaction> for TransactionForm {
    fn from(transaction: &Transaction) -> Self {
        Self {
            amount: transaction.amount,
            kind: transaction.kind,
            date: transaction.date,
            category_id: transaction.category_id,
            description: transaction.description.clone().unwrap_or_default(),
            budget_item_id: transaction.budget_item_id,
            goal_id: None,
        }
    }
}

/// Where the form sends its data. New transactions are POSTed, existing ones PUT.
pub enum TransactionFormTarget<'a> {
    Create(&'a str),
    Update(&'a str),
}

/// The choices for the selects in the form.
#[derive(Debug, Default)]
pub struct TransactionFormOptions {
    pub categories: Vec<Category>,
    /// The active budget items of the account.
    pub budget_items: Vec<BudgetItem>,
    /// The goals of the account.
    pub goals: Vec<Goal>,
}

impl TransactionFormOptions {
    /// Load the choices for a transaction in `account_id`.
    pub fn load(user_id: UserID, account_id: Uuid, connection: &Connection) -> Result<Self, Error> {
        let mut budget_items = get_budget_items(user_id, account_id, connection)?;
        budget_items.retain(|item| item.active);

        Ok(Self {
            categories: get_categories(connection)?,
            budget_items,
            goals: get_goals(user_id, account_id, connection)?,
        })
    }
}

pub fn transaction_form_view(
    target: TransactionFormTarget<'_>,
    values: &TransactionForm,
    options: &TransactionFormOptions,
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put, submit_text, is_new) = match target {
        TransactionFormTarget::Create(endpoint) => {
            (Some(endpoint), None, "Create Transaction", true)
        }
        TransactionFormTarget::Update(endpoint) => (None, Some(endpoint), "Save Transaction", false),
    };
    let amount = (values.amount > 0.0).then(|| format!("{:.2}", values.amount));

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Transaction type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for kind in TransactionKind::ALL {
                        @let id = format!("transaction-type-{}", kind.as_str());
                        div class="flex items-center gap-3"
                        {
                            input
                                name="type"
                                id=(id)
                                type="radio"
                                value=(kind.as_str())
                                checked[kind == values.kind]
                                required
                                tabindex="0"
                                class=(FORM_RADIO_INPUT_STYLE);

                            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind.label()) }
                        }
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        placeholder="0.01"
                        min="0.01"
                        required
                        value=[amount]
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(values.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Description"
                    value=(values.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category_id" id="category_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[values.category_id.is_none()] { "No category" }

                    @for category in &options.categories {
                        option
                            value=(category.id)
                            selected[values.category_id == Some(category.id)]
                        { (category.icon) " " (category.name) }
                    }
                }
            }

            @if is_new && !options.budget_items.is_empty() {
                div
                {
                    label for="budget_item_id" class=(FORM_LABEL_STYLE) { "Budget line" }

                    select name="budget_item_id" id="budget_item_id" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[values.budget_item_id.is_none()] { "None" }

                        @for item in &options.budget_items {
                            option
                                value=(item.id)
                                selected[values.budget_item_id == Some(item.id)]
                            { (item.name) }
                        }
                    }
                }
            }

            @if is_new && !options.goals.is_empty() {
                div
                {
                    label for="goal_id" class=(FORM_LABEL_STYLE) { "Count towards goal" }

                    select name="goal_id" id="goal_id" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[values.goal_id.is_none()] { "None" }

                        @for goal in &options.goals {
                            option
                                value=(goal.id)
                                selected[values.goal_id == Some(goal.id)]
                            { (goal.name) }
                        }
                    }

                    span class="text-xs text-gray-500"
                    {
                        "Income adds to the goal, expenses take away from it."
                    }
                }
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}

/// Re-render the form with `error` shown under the fields.
pub fn form_error_response(
    target: TransactionFormTarget<'_>,
    values: &TransactionForm,
    error: &Error,
    user_id: UserID,
    account_id: Uuid,
    connection: &Connection,
) -> Response {
    match TransactionFormOptions::load(user_id, account_id, connection) {
        Ok(options) => {
            transaction_form_view(target, values, &options, &format!("Error: {error}"))
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not load transaction form choices: {error}");
            error.into_alert_response()
        }
    }
}
