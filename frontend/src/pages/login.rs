use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bind_input, INPUT_CLASS};
use crate::api::{use_request_scope, ApiClient};
use crate::error::{ApiError, ValidationError};
use crate::models::UserProfile;

fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        Err(ValidationError::MissingCredentials)
    } else {
        Ok(())
    }
}

/// Any failure to load the profile after a successful login signs the user
/// in without one, which means the standard role.
fn profile_or_standard(result: Result<UserProfile, ApiError>) -> Option<UserProfile> {
    match result {
        Ok(profile) => Some(profile),
        Err(err) => {
            log::error!(
                "failed to fetch user details after login, proceeding as standard user: {}",
                err
            );
            None
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct LoginPageProps {
    pub client: ApiClient,
    /// Fired once a session exists; carries the profile when it could be
    /// loaded.
    pub on_signed_in: Callback<Option<UserProfile>>,
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let scope = use_request_scope();

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let loading = loading.clone();
        let client = props.client.clone();
        let on_signed_in = props.on_signed_in.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let email_val = email.trim().to_string();
            let password_val = (*password).clone();

            if let Err(err) = validate_credentials(&email_val, &password_val) {
                error.set(Some(err.to_string()));
                return;
            }

            loading.set(true);
            error.set(None);

            let api = client.scoped(&scope);
            let scope = scope.clone();
            let error = error.clone();
            let loading = loading.clone();
            let on_signed_in = on_signed_in.clone();
            spawn_local(async move {
                let token = match scope.settle(api.login(&email_val, &password_val).await) {
                    None => return,
                    Some(Ok(token)) => token,
                    Some(Err(err)) => {
                        log::warn!("login failed for {}: {}", email_val, err);
                        api.session().discard();
                        error.set(Some(err.user_message()));
                        loading.set(false);
                        return;
                    }
                };

                api.session().begin(token);
                let result = api.profile_after_login().await;
                if !scope.is_alive() {
                    return;
                }
                let profile = profile_or_standard(result);
                if let Some(profile) = &profile {
                    api.session().set_user(profile.clone());
                }
                log::info!("signed in as {}", email_val);
                loading.set(false);
                on_signed_in.emit(profile);
            });
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{"Cash Flow Forecasting"}</h1>
                    <p class="text-sm text-muted-foreground mt-2">{"Sign in to continue."}</p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Email"}</label>
                        <input
                            type="email"
                            class={INPUT_CLASS}
                            value={(*email).clone()}
                            oninput={bind_input(&email)}
                        />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Password"}</label>
                        <input
                            type="password"
                            class={INPUT_CLASS}
                            value={(*password).clone()}
                            oninput={bind_input(&password)}
                        />
                    </div>

                    if let Some(msg) = &*error {
                        <div class="text-sm text-red-500">{ msg.clone() }</div>
                    }

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Signing in..." } else { "Login" } }
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_credentials_are_required() {
        assert_eq!(
            validate_credentials("  ", "secret"),
            Err(ValidationError::MissingCredentials)
        );
        assert_eq!(
            validate_credentials("treasurer@example.com", ""),
            Err(ValidationError::MissingCredentials)
        );
        assert_eq!(validate_credentials("treasurer@example.com", "secret"), Ok(()));
    }

    #[test]
    fn profile_failure_still_signs_in() {
        assert_eq!(profile_or_standard(Err(ApiError::AuthExpired)), None);
        assert_eq!(
            profile_or_standard(Err(ApiError::Rejected("Not authenticated".to_string()))),
            None
        );

        let profile = UserProfile {
            id: "u-1".to_string(),
            email: "treasurer@example.com".to_string(),
            user_metadata: None,
        };
        assert_eq!(profile_or_standard(Ok(profile.clone())), Some(profile));
    }
}
