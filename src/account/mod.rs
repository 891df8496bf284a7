//! Accounts: the pots of money every transaction, budget item and goal belongs to.

mod active;
mod core;
mod create;
mod delete;
mod edit;
mod form;

pub use active::{active_account, switch_active_account_endpoint};
#[cfg(test)]
pub(crate) use active::ACTIVE_ACCOUNT_COOKIE;
pub use core::{
    ACCOUNT_ICONS, Account, AccountData, DEFAULT_ACCOUNT_COLOR, DEFAULT_ACCOUNT_ICON,
    account_icon_glyph, create_account, create_account_table,
    create_default_account, delete_account, get_account, get_accounts, set_initial_balance,
    update_account,
};
pub use create::{create_account_endpoint, get_new_account_page};
pub use delete::delete_account_endpoint;
pub use edit::{get_edit_account_page, update_account_endpoint};
