//! Account creation.

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use super::login::FieldError;
use crate::state::notifications::NotificationState;
use crate::util::validation::{FieldErrors, RegisterForm};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let notifications = expect_context::<RwSignal<NotificationState>>();
    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::default());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = RegisterForm {
            full_name: full_name.get().trim().to_owned(),
            email: email.get().trim().to_owned(),
            password: password.get(),
            confirm_password: confirm_password.get(),
        };
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
                let request = crate::net::types::RegisterRequest {
                    full_name: form.full_name,
                    email: form.email,
                    password: form.password,
                    role_id: crate::consts::DEFAULT_ROLE_ID.to_owned(),
                };
                match crate::net::api::register(&request).await {
                    Ok(()) => {
                        notify(notifications, NotificationKind::Success, "Account created successfully!");
                        navigate("/login", NavigateOptions::default());
                    }
                    Err(message) => notify(notifications, NotificationKind::Error, message),
                }
                busy.set(false);
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (form, notifications);
        }
    };

    view! {
        <div class="auth-page">
            <h1>"Create your account"</h1>
            <form class="auth-form" on:submit=on_submit novalidate=true>
                <label class="auth-form__label">
                    "Full name"
                    <input
                        class="auth-form__input"
                        type="text"
                        autocomplete="name"
                        prop:value=move || full_name.get()
                        on:input=move |ev| full_name.set(event_target_value(&ev))
                    />
                </label>
                <FieldError message=Signal::derive(move || errors.get().full_name)/>
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
                        autocomplete="new-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <FieldError message=Signal::derive(move || errors.get().password)/>
                <label class="auth-form__label">
                    "Confirm password"
                    <input
                        class="auth-form__input"
                        type="password"
                        autocomplete="new-password"
                        prop:value=move || confirm_password.get()
                        on:input=move |ev| confirm_password.set(event_target_value(&ev))
                    />
                </label>
                <FieldError message=Signal::derive(move || errors.get().confirm_password)/>
                <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Creating account..." } else { "Join for Free" }}
                </button>
            </form>
            <p class="auth-page__switch">
                "Already have an account? " <a href="/login">"Log in"</a>
            </p>
        </div>
    }
}
