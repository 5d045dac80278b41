//! User management screens, reachable only with the admin role.

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bind_input, BUTTON_CLASS, INPUT_CLASS, SECONDARY_BUTTON_CLASS};
use crate::api::use_request_scope;
use crate::app::{Page, PageProps};
use crate::components::{error_banner, loading_row, page_shell, section, success_banner};
use crate::error::ValidationError;
use crate::format::format_timestamp;
use crate::models::{AdminUser, NewUser, Role, UserMetadata, UserProfile};

fn is_admin(user: Option<&UserProfile>) -> bool {
    user.map(UserProfile::role) == Some(Role::Admin)
}

fn optional_timestamp(raw: Option<&str>) -> String {
    raw.map(format_timestamp).unwrap_or_else(|| "Never".to_string())
}

/// Accounts created here always get the standard role.
fn new_standard_user(email: &str, password: &str) -> Result<NewUser, ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(NewUser {
        email: email.to_string(),
        password: password.to_string(),
        user_metadata: UserMetadata {
            role: Some(Role::User.as_str().to_string()),
        },
    })
}

#[function_component(AdminDashboardPage)]
pub fn admin_dashboard_page(props: &PageProps) -> Html {
    let scope = use_request_scope();
    let users = use_state(Vec::<AdminUser>::new);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let reload = use_state(|| 0u32);
    let profile = props.app.user.clone().or_else(|| props.app.session().user());
    let allowed = is_admin(profile.as_ref());

    {
        let navigate = props.app.navigate.clone();
        use_effect_with_deps(
            move |allowed| {
                if !*allowed {
                    log::warn!("admin dashboard opened without the admin role");
                    navigate.emit(Page::Dashboard);
                }
                || ()
            },
            allowed,
        );
    }

    {
        let api = props.app.client.scoped(&scope);
        let users = users.clone();
        let loading = loading.clone();
        let error = error.clone();
        use_effect_with_deps(
            move |(reload, allowed): &(u32, bool)| {
                if *allowed {
                    log::debug!("loading users (reload {})", reload);
                    loading.set(true);
                    error.set(None);
                    spawn_local(async move {
                        let Some(result) = scope.settle(api.list_users().await) else {
                            return;
                        };
                        match result {
                            Ok(list) => users.set(list),
                            Err(err) => error.set(Some(err.user_message())),
                        }
                        loading.set(false);
                    });
                }
                || ()
            },
            (*reload, allowed),
        );
    }

    if !allowed {
        return html! {};
    }

    let on_refresh = {
        let reload = reload.clone();
        Callback::from(move |_| reload.set(*reload + 1))
    };

    let on_create = {
        let navigate = props.app.navigate.clone();
        Callback::from(move |_| navigate.emit(Page::AdminCreateUser))
    };

    let rows = users.iter().map(|user| {
        html! {
            <tr key={user.id.clone()} class="text-sm hover:bg-muted/30 transition-colors">
                <td class="px-6 py-3 text-foreground">{ user.email.clone() }</td>
                <td class="px-6 py-3 text-muted-foreground">{ user.role().as_str() }</td>
                <td class="px-6 py-3 text-muted-foreground">{ optional_timestamp(user.created_at.as_deref()) }</td>
                <td class="px-6 py-3 text-muted-foreground">{ optional_timestamp(user.last_sign_in_at.as_deref()) }</td>
            </tr>
        }
    });

    page_shell(
        "Admin Dashboard",
        html! {
            <div class="flex gap-2">
                <button class={SECONDARY_BUTTON_CLASS} onclick={on_refresh} disabled={*loading}>
                    { if *loading { "Refreshing..." } else { "Refresh" } }
                </button>
                <button class={BUTTON_CLASS} onclick={on_create}>{"Create User"}</button>
            </div>
        },
        html! {
            <>
                { error_banner((*error).as_ref()) }
                <div class="bg-card rounded-lg border border-border overflow-x-auto">
                    <table class="w-full text-left border-collapse">
                        <thead class="bg-secondary border-b border-border">
                            <tr>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Email"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Role"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Created"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Last Sign In"}</th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            { if *loading && users.is_empty() {
                                loading_row(4, "Loading users...")
                            } else if users.is_empty() {
                                loading_row(4, "No users found.")
                            } else {
                                html! { <>{ for rows }</> }
                            }}
                        </tbody>
                    </table>
                </div>
            </>
        },
    )
}

#[function_component(CreateUserPage)]
pub fn create_user_page(props: &PageProps) -> Html {
    let scope = use_request_scope();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let submitting = use_state(|| false);
    let error = use_state(|| None::<String>);
    let success = use_state(|| None::<String>);

    let on_submit = {
        let api = props.app.client.scoped(&scope);
        let email = email.clone();
        let password = password.clone();
        let submitting = submitting.clone();
        let error = error.clone();
        let success = success.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            success.set(None);
            let new_user = match new_standard_user(&email, &password) {
                Ok(user) => user,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };

            submitting.set(true);
            error.set(None);

            let api = api.clone();
            let scope = scope.clone();
            let email = email.clone();
            let password = password.clone();
            let submitting = submitting.clone();
            let error = error.clone();
            let success = success.clone();
            spawn_local(async move {
                let Some(result) = scope.settle(api.create_user(&new_user).await) else {
                    return;
                };
                match result {
                    Ok(created) => {
                        log::info!("created user {}", created.email);
                        success.set(Some(format!("User {} created successfully.", new_user.email)));
                        email.set(String::new());
                        password.set(String::new());
                    }
                    Err(err) => error.set(Some(err.user_message())),
                }
                submitting.set(false);
            });
        })
    };

    let form = html! {
        <form class="space-y-4 max-w-md" onsubmit={on_submit}>
            <div class="space-y-1">
                <label class="text-sm font-medium text-foreground">{"Email"}</label>
                <input type="email" class={INPUT_CLASS} value={(*email).clone()} oninput={bind_input(&email)} />
            </div>
            <div class="space-y-1">
                <label class="text-sm font-medium text-foreground">{"Password"}</label>
                <input type="password" class={INPUT_CLASS} value={(*password).clone()} oninput={bind_input(&password)} />
            </div>
            <button type="submit" class={BUTTON_CLASS} disabled={*submitting}>
                { if *submitting { "Creating..." } else { "Create User" } }
            </button>
        </form>
    };

    page_shell(
        "Create User",
        html! {},
        html! {
            <>
                { error_banner((*error).as_ref()) }
                { success_banner((*success).as_ref()) }
                { section("New standard user", form) }
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Option<&str>) -> UserProfile {
        UserProfile {
            id: "u-1".to_string(),
            email: "ops@example.com".to_string(),
            user_metadata: Some(UserMetadata {
                role: role.map(str::to_string),
            }),
        }
    }

    #[test]
    fn only_admin_role_passes() {
        assert!(is_admin(Some(&profile(Some("admin")))));
        assert!(!is_admin(Some(&profile(Some("user")))));
        assert!(!is_admin(Some(&profile(None))));
        assert!(!is_admin(None));
    }

    #[test]
    fn new_users_get_the_standard_role() {
        let user = new_standard_user("  analyst@example.com ", "s3cret").unwrap();
        assert_eq!(user.email, "analyst@example.com");
        assert_eq!(user.user_metadata.role.as_deref(), Some("user"));
    }

    #[test]
    fn credentials_are_required() {
        assert_eq!(
            new_standard_user("", "s3cret"),
            Err(ValidationError::MissingCredentials)
        );
        assert_eq!(
            new_standard_user("analyst@example.com", ""),
            Err(ValidationError::MissingCredentials)
        );
    }

    #[test]
    fn missing_timestamps_read_never() {
        assert_eq!(optional_timestamp(None), "Never");
        assert_eq!(
            optional_timestamp(Some("2024-03-15T14:02:26Z")),
            "2024-03-15 14:02"
        );
    }
}
