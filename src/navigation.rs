//! The navigation bar shown at the top of every page, and the account switcher inside it.

use axum_extra::extract::CookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use uuid::Uuid;

use crate::{
    Error,
    account::{Account, account_icon_glyph, active_account, get_accounts},
    auth::UserID,
    endpoints,
    settings::get_nav_order,
};

/// A page that can be reached from the navigation bar.
///
/// Users can change the order of these from the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Dashboard,
    Transactions,
    Budget,
    Summary,
    Goals,
    Settings,
}

impl NavItem {
    /// All items in their default order.
    pub const ALL: [NavItem; 6] = [
        NavItem::Dashboard,
        NavItem::Transactions,
        NavItem::Budget,
        NavItem::Summary,
        NavItem::Goals,
        NavItem::Settings,
    ];

    /// The key stored in the saved navigation order.
    pub fn key(self) -> &'static str {
        match self {
            NavItem::Dashboard => "dashboard",
            NavItem::Transactions => "transactions",
            NavItem::Budget => "budget",
            NavItem::Summary => "summary",
            NavItem::Goals => "goals",
            NavItem::Settings => "settings",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.key() == key)
    }

    pub fn url(self) -> &'static str {
        match self {
            NavItem::Dashboard => endpoints::DASHBOARD_VIEW,
            NavItem::Transactions => endpoints::TRANSACTIONS_VIEW,
            NavItem::Budget => endpoints::BUDGET_VIEW,
            NavItem::Summary => endpoints::SUMMARY_VIEW,
            NavItem::Goals => endpoints::GOALS_VIEW,
            NavItem::Settings => endpoints::SETTINGS_VIEW,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            NavItem::Dashboard => "Dashboard",
            NavItem::Transactions => "Transactions",
            NavItem::Budget => "Budget",
            NavItem::Summary => "Summary",
            NavItem::Goals => "Goals",
            NavItem::Settings => "Settings",
        }
    }
}

/// Put the items named in `saved_keys` first, then the rest in default order.
///
/// Unknown and repeated keys are skipped.
pub fn ordered_nav_items(saved_keys: &[String]) -> Vec<NavItem> {
    let mut items = Vec::with_capacity(NavItem::ALL.len());

    for item in saved_keys.iter().filter_map(|key| NavItem::from_key(key)) {
        if !items.contains(&item) {
            items.push(item);
        }
    }

    for item in NavItem::ALL {
        if !items.contains(&item) {
            items.push(item);
        }
    }

    items
}

/// Template for a link in the navigation bar.
///
/// Only one link should be current at any one time.
#[derive(Clone)]
struct Link {
    url: &'static str,
    title: &'static str,
    is_current: bool,
}

impl Link {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }
}

/// The accounts to list in the switcher and which one is selected.
struct AccountSwitcher<'a> {
    accounts: &'a [Account],
    active_account_id: Uuid,
}

impl AccountSwitcher<'_> {
    fn into_html(self) -> Markup {
        html!(
            label for="account-switcher" class="sr-only" { "Active account" }
            select
                id="account-switcher"
                name="account_id"
                data-switch-endpoint=(endpoints::ACTIVE_ACCOUNT)
                class="rounded border border-gray-300 bg-gray-50 px-2 py-1 text-sm
                    text-gray-900 dark:border-gray-600 dark:bg-gray-700 dark:text-white"
            {
                @for account in self.accounts {
                    option
                        value=(account.id)
                        selected[account.id == self.active_account_id]
                    {
                        (account_icon_glyph(&account.icon)) " " (account.name)
                    }
                }
            }
        )
    }
}

/// The number of links that fit in the bottom bar on small screens.
/// The rest go in the "More" menu.
const BOTTOM_BAR_LINK_COUNT: usize = 3;

pub struct NavBar<'a> {
    links: Vec<Link>,
    account_switcher: Option<AccountSwitcher<'a>>,
}

impl<'a> NavBar<'a> {
    /// Get the navigation bar with the links in `order`.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str, order: &[NavItem]) -> Self {
        let links = order
            .iter()
            .map(|item| Link {
                url: item.url(),
                title: item.title(),
                is_current: active_endpoint == item.url(),
            })
            .collect();

        NavBar {
            links,
            account_switcher: None,
        }
    }

    /// Show a drop down for switching between `accounts`.
    pub fn with_account_switcher(
        mut self,
        accounts: &'a [Account],
        active_account_id: Uuid,
    ) -> Self {
        self.account_switcher = Some(AccountSwitcher {
            accounts,
            active_account_id,
        });
        self
    }

    pub fn into_html(self) -> Markup {
        let links = self.links;
        let (bottom_links, more_links) = links.split_at(BOTTOM_BAR_LINK_COUNT.min(links.len()));
        let more_is_active = more_links.iter().any(|link| link.is_current);
        let account_switcher = self.account_switcher.map(AccountSwitcher::into_html);
        let log_out_link = Link {
            url: endpoints::LOG_OUT,
            title: "Log out",
            is_current: false,
        };

        let bottom_link_class = |is_current: bool| -> &'static str {
            if is_current {
                "flex w-full min-w-0 items-center justify-center rounded-lg \
                bg-blue-50 px-2.5 py-2 text-xs font-semibold leading-tight \
                text-blue-700 shadow-sm sm:px-4 sm:text-sm \
                dark:bg-blue-900/30 dark:text-blue-200"
            } else {
                "flex w-full min-w-0 items-center justify-center rounded-lg \
                px-2.5 py-2 text-xs font-semibold leading-tight text-gray-600 \
                sm:px-4 sm:text-sm \
                hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
                dark:hover:bg-blue-900/20 dark:hover:text-blue-200"
            }
        };
        let more_summary_class = |is_active: bool| -> &'static str {
            if is_active {
                "list-none [&::-webkit-details-marker]:hidden flex w-full min-w-0 \
                items-center justify-center rounded-lg bg-blue-50 px-2.5 py-2 \
                text-xs font-semibold leading-tight sm:px-4 sm:text-sm \
                text-blue-700 shadow-sm cursor-pointer \
                dark:bg-blue-900/30 dark:text-blue-200"
            } else {
                "list-none [&::-webkit-details-marker]:hidden flex w-full min-w-0 \
                items-center justify-center rounded-lg px-2.5 py-2 text-xs \
                font-semibold leading-tight sm:px-4 sm:text-sm \
                text-gray-600 cursor-pointer hover:bg-blue-50/70 hover:text-blue-700 \
                dark:text-gray-300 dark:hover:bg-blue-900/20 \
                dark:hover:text-blue-200"
            }
        };
        let more_item_class = |is_current: bool| -> &'static str {
            if is_current {
                "block rounded-lg bg-blue-50 px-3 py-2 text-blue-700 \
                dark:bg-blue-900/30 dark:text-blue-200"
            } else {
                "block rounded-lg px-3 py-2 text-gray-700 hover:bg-gray-100 \
                hover:text-blue-700 dark:text-gray-200 dark:hover:bg-gray-800/80 \
                dark:hover:text-blue-200"
            }
        };

        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between gap-4 mx-auto p-4"
                {
                    a
                        href="/"
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        img
                            src="/static/favicon-128x128.png"
                            alt="FinaTrak Logo"
                            class="h-8"
                        ;

                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "FinaTrak"
                        }
                    }

                    @if let Some(account_switcher) = &account_switcher {
                        div class="flex items-center gap-2" { (account_switcher) }
                    }

                    div class="hidden w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in links.iter().cloned() {
                                li { (link.into_desktop_html()) }
                            }

                            li { (log_out_link.into_desktop_html()) }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    div
                        class="rounded-xl border border-gray-200 bg-white/95
                        shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                    {
                        ul
                            class="grid grid-cols-4 gap-2 px-4 py-3 text-xs font-semibold
                            text-gray-600 dark:text-gray-300"
                            aria-label="Primary"
                        {
                            @for link in bottom_links {
                                li class="min-w-0" {
                                    a
                                        href=(link.url)
                                        class=(bottom_link_class(link.is_current))
                                        aria-current=[link.is_current.then_some("page")]
                                    {
                                        span class="truncate" { (link.title) }
                                    }
                                }
                            }

                            li class="min-w-0" {
                                details class="group relative"
                                {
                                    summary
                                        class=(more_summary_class(more_is_active))
                                        aria-current=[more_is_active.then_some("page")]
                                    {
                                        span class="truncate" { "More" }
                                    }

                                    div
                                        class="absolute bottom-full right-0 mb-3 w-40 rounded-xl
                                        border border-gray-200 bg-white/95 p-2 shadow-xl
                                        backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                                    {
                                        ul class="flex flex-col gap-1 text-sm font-medium"
                                        {
                                            @for link in more_links {
                                                li {
                                                    a
                                                        href=(link.url)
                                                        class=(more_item_class(link.is_current))
                                                        aria-current=[link.is_current.then_some("page")]
                                                    {
                                                        (link.title)
                                                    }
                                                }
                                            }

                                            li {
                                                a href=(endpoints::LOG_OUT) class=(more_item_class(false))
                                                {
                                                    "Log out"
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
        )
    }
}

/// What every signed-in page needs: the active account and a rendered navigation bar.
pub struct PageContext {
    pub account: Account,
    pub nav_bar: Markup,
}

/// Resolve the active account and render the navigation bar for `active_endpoint`.
///
/// Returns the cookie jar that must be sent back with the response, since
/// resolving the active account may update its cookie.
pub fn load_page_context(
    jar: CookieJar,
    user_id: UserID,
    active_endpoint: &str,
    connection: &Connection,
) -> Result<(CookieJar, PageContext), Error> {
    let (jar, account) = active_account(jar, user_id, connection)?;
    let accounts = get_accounts(user_id, connection)?;
    let nav_order = ordered_nav_items(&get_nav_order(user_id, connection)?);

    let nav_bar = NavBar::new(active_endpoint, &nav_order)
        .with_account_switcher(&accounts, account.id)
        .into_html();

    Ok((jar, PageContext { account, nav_bar }))
}
