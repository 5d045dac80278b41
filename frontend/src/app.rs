use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{use_request_scope, ApiClient};
use crate::components::icons::{
    icon_chevron_left, icon_chevron_right, icon_dollar, icon_droplets, icon_file_text,
    icon_history, icon_layout_grid, icon_list_checks, icon_log_out, icon_user_plus, icon_users,
};
use crate::config::API_BASE_URL;
use crate::models::{Currency, Role, UserProfile};
use crate::pages::admin::{AdminDashboardPage, CreateUserPage};
use crate::pages::dashboard::DashboardPage;
use crate::pages::forecast::ForecastPage;
use crate::pages::history::HistoryPage;
use crate::pages::liquidity::LiquidityPage;
use crate::pages::login::LoginPage;
use crate::pages::report::ReportPage;
use crate::pages::usd_exposure::UsdExposurePage;
use crate::pages::usd_summary::UsdSummaryPage;
use crate::session::{BrowserStorage, SessionContext};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthStatus {
    Checking,
    SignedIn,
    SignedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    History,
    Forecast(Currency),
    Liquidity,
    UsdExposure,
    UsdSummary,
    Report,
    AdminDashboard,
    AdminCreateUser,
}

impl Page {
    fn requires_admin(&self) -> bool {
        matches!(self, Page::AdminDashboard | Page::AdminCreateUser)
    }
}

/// Where a user lands right after signing in.
pub fn landing_page(user: Option<&UserProfile>) -> Page {
    match user.map(UserProfile::role) {
        Some(Role::Admin) => Page::AdminDashboard,
        _ => Page::Dashboard,
    }
}

/// Admin pages are only shown to admins; everybody else gets the dashboard.
/// An unknown profile counts as a standard user.
pub fn resolve_page(requested: Page, user: Option<&UserProfile>) -> Page {
    let is_admin = user.map(UserProfile::role) == Some(Role::Admin);
    if requested.requires_admin() && !is_admin {
        Page::Dashboard
    } else {
        requested
    }
}

/// What every page gets from the shell.
#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub client: ApiClient,
    pub user: Option<UserProfile>,
    pub navigate: Callback<Page>,
}

impl AppContext {
    pub fn session(&self) -> &SessionContext {
        self.client.session()
    }
}

#[derive(Properties, PartialEq)]
pub struct PageProps {
    pub app: AppContext,
}

#[function_component(App)]
pub fn app() -> Html {
    let auth_status = use_state(|| AuthStatus::Checking);
    let user = use_state(|| None::<UserProfile>);
    let active_page = use_state(|| Page::Dashboard);
    let scope = use_request_scope();

    let client = {
        let auth_status = auth_status.clone();
        let user = user.clone();
        use_memo(
            move |_| {
                let on_expired = Callback::from(move |_| {
                    user.set(None);
                    auth_status.set(AuthStatus::SignedOut);
                });
                let session = SessionContext::restore(Rc::new(BrowserStorage), on_expired);
                ApiClient::new(API_BASE_URL, session)
            },
            (),
        )
    };

    {
        let client = client.clone();
        let auth_status = auth_status.clone();
        let user = user.clone();
        let active_page = active_page.clone();
        use_effect_with_deps(
            move |_| {
                if !client.session().is_active() {
                    auth_status.set(AuthStatus::SignedOut);
                } else {
                    let api = client.scoped(&scope);
                    spawn_local(async move {
                        let Some(result) = scope.settle(api.current_user().await) else {
                            return;
                        };
                        match result {
                            Ok(profile) => {
                                api.session().set_user(profile.clone());
                                active_page.set(landing_page(Some(&profile)));
                                user.set(Some(profile));
                            }
                            Err(err) => {
                                log::warn!("could not load profile for stored session: {}", err);
                            }
                        }
                        auth_status.set(AuthStatus::SignedIn);
                    });
                }
                || ()
            },
            (),
        );
    }

    let on_signed_in = {
        let auth_status = auth_status.clone();
        let user = user.clone();
        let active_page = active_page.clone();
        Callback::from(move |profile: Option<UserProfile>| {
            active_page.set(landing_page(profile.as_ref()));
            user.set(profile);
            auth_status.set(AuthStatus::SignedIn);
        })
    };

    let on_logout = {
        let client = client.clone();
        Callback::from(move |_: ()| {
            log::info!("user signed out");
            client.session().invalidate();
        })
    };

    let navigate = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };

    match *auth_status {
        AuthStatus::Checking => {
            return html! {
                <div class="min-h-screen flex items-center justify-center bg-background text-muted-foreground">
                    {"Checking session..."}
                </div>
            };
        }
        AuthStatus::SignedOut => {
            return html! { <LoginPage client={(*client).clone()} {on_signed_in} /> };
        }
        AuthStatus::SignedIn => {}
    }

    let app = AppContext {
        client: (*client).clone(),
        user: (*user).clone(),
        navigate: navigate.clone(),
    };
    let page = resolve_page(*active_page, (*user).as_ref());
    let content = match page {
        Page::Dashboard => html! { <DashboardPage {app} /> },
        Page::History => html! { <HistoryPage {app} /> },
        Page::Forecast(currency) => html! { <ForecastPage {app} {currency} /> },
        Page::Liquidity => html! { <LiquidityPage {app} /> },
        Page::UsdExposure => html! { <UsdExposurePage {app} /> },
        Page::UsdSummary => html! { <UsdSummaryPage {app} /> },
        Page::Report => html! { <ReportPage {app} /> },
        Page::AdminDashboard => html! { <AdminDashboardPage {app} /> },
        Page::AdminCreateUser => html! { <CreateUserPage {app} /> },
    };

    html! {
        <Layout
            active_page={page}
            email={(*user).as_ref().map(|u| u.email.clone())}
            is_admin={(*user).as_ref().map(UserProfile::role) == Some(Role::Admin)}
            on_select={navigate}
            {on_logout}
        >
            { content }
        </Layout>
    }
}

#[derive(Properties, PartialEq)]
struct LayoutProps {
    children: Children,
    active_page: Page,
    email: Option<String>,
    is_admin: bool,
    on_select: Callback<Page>,
    on_logout: Callback<()>,
}

#[function_component(Layout)]
fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <Sidebar
                active_page={props.active_page}
                is_admin={props.is_admin}
                on_select={props.on_select.clone()}
            />
            <div class="flex-1 flex flex-col overflow-hidden">
                <Header email={props.email.clone()} on_logout={props.on_logout.clone()} />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    email: Option<String>,
    on_logout: Callback<()>,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };

    html! {
        <header class="bg-slate-100 border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1"></div>
            <div class="flex items-center gap-4">
                if let Some(email) = &props.email {
                    <span class="text-sm text-muted-foreground">{ email.clone() }</span>
                }
                <button
                    onclick={on_logout}
                    class="flex items-center gap-2 px-3 py-2 rounded-lg bg-red-600 text-white text-sm font-medium hover:bg-red-700 transition-colors"
                >
                    { icon_log_out() }
                    <span>{"Logout"}</span>
                </button>
            </div>
        </header>
    }
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

fn nav_items(is_admin: bool) -> Vec<NavItem> {
    let mut items = vec![
        NavItem {
            label: "Forecast",
            page: Page::Dashboard,
            icon: icon_layout_grid,
        },
        NavItem {
            label: "Upload History",
            page: Page::History,
            icon: icon_history,
        },
        NavItem {
            label: "Liquidity Ratio",
            page: Page::Liquidity,
            icon: icon_droplets,
        },
        NavItem {
            label: "USD Exposure",
            page: Page::UsdExposure,
            icon: icon_dollar,
        },
        NavItem {
            label: "USD Summary",
            page: Page::UsdSummary,
            icon: icon_list_checks,
        },
        NavItem {
            label: "Report",
            page: Page::Report,
            icon: icon_file_text,
        },
    ];
    if is_admin {
        items.push(NavItem {
            label: "Users",
            page: Page::AdminDashboard,
            icon: icon_users,
        });
        items.push(NavItem {
            label: "Create User",
            page: Page::AdminCreateUser,
            icon: icon_user_plus,
        });
    }
    items
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    is_admin: bool,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let is_open = use_state(|| true);
    let toggle = {
        let is_open = is_open.clone();
        Callback::from(move |_| is_open.set(!*is_open))
    };

    let width = if *is_open { "w-56" } else { "w-20" };

    html! {
        <aside class={classes!("h-screen", "bg-slate-800", "text-white", "flex", "flex-col", "shadow-lg", "transition-all", width)}>
            <div class="flex h-16 items-center justify-between border-b border-slate-700 px-4">
                if *is_open {
                    <span class="text-xl font-semibold">{"BCP App"}</span>
                }
                <button
                    onclick={toggle}
                    class="p-2 text-slate-300 hover:bg-slate-700 hover:text-white rounded-md"
                    title={if *is_open { "Collapse Sidebar" } else { "Expand Sidebar" }}
                >
                    { if *is_open { icon_chevron_left() } else { icon_chevron_right() } }
                </button>
            </div>

            <nav class="flex-1 space-y-2 py-4 px-3">
                { for nav_items(props.is_admin).into_iter().map(|item| {
                    let is_active = match (item.page, props.active_page) {
                        (Page::Dashboard, Page::Forecast(_)) => true,
                        (a, b) => a == b,
                    };
                    let class_name = if is_active {
                        "flex items-center gap-3 px-4 py-3 rounded-xl text-[13px] font-medium bg-sky-600 text-white w-full"
                    } else {
                        "flex items-center gap-3 px-4 py-3 rounded-xl text-[13px] font-medium text-slate-300 hover:bg-slate-700 hover:text-white w-full"
                    };
                    let on_select = props.on_select.clone();
                    let page = item.page;

                    html! {
                        <button type="button" class={class_name} title={item.label} onclick={Callback::from(move |_| on_select.emit(page))}>
                            <span class="shrink-0">{ (item.icon)() }</span>
                            if *is_open {
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            }
                        </button>
                    }
                }) }
            </nav>
        </aside>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserMetadata;

    fn user(role: Option<&str>) -> UserProfile {
        UserProfile {
            id: "u-7".to_string(),
            email: "analyst@example.com".to_string(),
            user_metadata: Some(UserMetadata {
                role: role.map(str::to_string),
            }),
        }
    }

    #[test]
    fn admins_land_on_admin_dashboard() {
        assert_eq!(landing_page(Some(&user(Some("admin")))), Page::AdminDashboard);
    }

    #[test]
    fn everybody_else_lands_on_dashboard() {
        assert_eq!(landing_page(Some(&user(Some("user")))), Page::Dashboard);
        assert_eq!(landing_page(Some(&user(None))), Page::Dashboard);
        assert_eq!(landing_page(None), Page::Dashboard);
    }

    #[test]
    fn admin_pages_are_gated() {
        let standard = user(Some("user"));
        assert_eq!(resolve_page(Page::AdminDashboard, Some(&standard)), Page::Dashboard);
        assert_eq!(resolve_page(Page::AdminCreateUser, None), Page::Dashboard);
        assert_eq!(
            resolve_page(Page::AdminCreateUser, Some(&user(Some("admin")))),
            Page::AdminCreateUser
        );
        assert_eq!(
            resolve_page(Page::Forecast(Currency::Usd), Some(&standard)),
            Page::Forecast(Currency::Usd)
        );
    }

    #[test]
    fn only_admins_see_user_management() {
        assert_eq!(nav_items(false).len(), 6);
        let admin_pages: Vec<Page> = nav_items(true).iter().map(|i| i.page).collect();
        assert!(admin_pages.contains(&Page::AdminDashboard));
        assert!(admin_pages.contains(&Page::AdminCreateUser));
    }
}
