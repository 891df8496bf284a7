//! The form shared by the create and edit account pages.

use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    account::{ACCOUNT_ICONS, Account, AccountData, DEFAULT_ACCOUNT_COLOR, DEFAULT_ACCOUNT_ICON},
    html::{BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The form data for creating or editing an account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountForm {
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub initial_balance: f64,
}

impl AccountForm {
    pub fn into_data(self) -> AccountData {
        AccountData {
            name: self.name,
            color: self.color,
            icon: self.icon,
            initial_balance: self.initial_balance,
        }
    }
}

impl Default for AccountForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: DEFAULT_ACCOUNT_COLOR.to_owned(),
            icon: DEFAULT_ACCOUNT_ICON.to_owned(),
            initial_balance: 0.0,
        }
    }
}

impl From<&Account> for AccountForm {
    fn from(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            color: account.color.clone(),
            icon: account.icon.clone(),
            initial_balance: account.initial_balance,
        }
    }
}

/// Where the form sends its data. New accounts are POSTed, existing ones PUT.
pub enum AccountFormTarget<'a> {
    Create(&'a str),
    Update(&'a str),
}

pub fn account_form_view(
    target: AccountFormTarget<'_>,
    values: &AccountForm,
    error_message: &str,
) -> Markup {
    let (hx_post, hx_put, submit_text) = match target {
        AccountFormTarget::Create(endpoint) => (Some(endpoint), None, "Create Account"),
        AccountFormTarget::Update(endpoint) => (None, Some(endpoint), "Save Account"),
    };

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
                    placeholder="Main account"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex gap-4"
            {
                div
                {
                    label for="color" class=(FORM_LABEL_STYLE) { "Color" }

                    input
                        id="color"
                        type="color"
                        name="color"
                        value=(values.color)
                        required
                        class="h-10 w-16 cursor-pointer rounded border border-gray-300 dark:border-gray-600";
                }

                div class="grow"
                {
                    label for="icon" class=(FORM_LABEL_STYLE) { "Icon" }

                    select id="icon" name="icon" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for (icon, glyph) in ACCOUNT_ICONS {
                            option value=(icon) selected[icon == values.icon] { (glyph) " " (icon) }
                        }
                    }
                }
            }

            div
            {
                label for="initial_balance" class=(FORM_LABEL_STYLE) { "Initial balance" }

                div class="input-wrapper w-full"
                {
                    input
                        id="initial_balance"
                        type="number"
                        name="initial_balance"
                        step="0.01"
                        value=(values.initial_balance)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_text) }
        }
    }
}
