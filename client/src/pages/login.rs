//! Email + password sign-in.

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use crate::state::notifications::NotificationState;
use crate::state::session::SessionState;
use crate::util::validation::{FieldErrors, LoginForm};

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let notifications = expect_context::<RwSignal<NotificationState>>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::default());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = LoginForm { email: email.get().trim().to_owned(), password: password.get() };
        let found = form.validate();
        let invalid = !found.is_empty();
        errors.set(found);
        if invalid {
            return;
        }
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            use crate::state::notifications::{NotificationKind, notify};

            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let request = crate::net::types::LoginRequest { email: form.email, password: form.password };
                match crate::net::api::login(&request).await {
                    Ok(()) => {
                        notify(notifications, NotificationKind::Success, "Logged in successfully!");
                        crate::state::session::refresh_session(session);
                        navigate("/", NavigateOptions::default());
                    }
                    Err(message) => notify(notifications, NotificationKind::Error, message),
                }
                busy.set(false);
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (form, session, notifications);
        }
    };

    view! {
        <div class="auth-page">
            <h1>"Log in"</h1>
            <form class="auth-form" on:submit=on_submit novalidate=true>
                <label class="auth-form__label">
                    "Email"
                    <input
                        class="auth-form__input"
                        type="email"
                        autocomplete="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <FieldError message=Signal::derive(move || errors.get().email)/>
                <label class="auth-form__label">
                    "Password"
                    <input
                        class="auth-form__input"
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <FieldError message=Signal::derive(move || errors.get().password)/>
                <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Log in" }}
                </button>
            </form>
            <p class="auth-page__switch">
                "New here? " <a href="/register">"Create an account"</a>
            </p>
        </div>
    }
}

/// Inline message under a form field; renders nothing when the field is valid.
#[component]
pub fn FieldError(#[prop(into)] message: Signal<Option<&'static str>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <p class="auth-form__error">{move || message.get().unwrap_or_default()}</p>
        </Show>
    }
}
