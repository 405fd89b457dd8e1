//! Top navigation bar that follows the session context.
//!
//! Renders nothing while the session is loading so the server-rendered
//! markup and the first browser render agree.

#[cfg(test)]
#[path = "nav_header_test.rs"]
mod nav_header_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use crate::consts::PRODUCT_NAME;
use crate::state::notifications::NotificationState;
use crate::state::session::SessionState;

/// Avatar fallback: first character of the name, upper-cased, or `U`.
pub fn initials(full_name: &str) -> String {
    full_name
        .trim()
        .chars()
        .next()
        .map_or_else(|| "U".to_owned(), |c| c.to_uppercase().collect())
}

/// What the header shows for a given session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavView {
    Hidden,
    Anonymous,
    Member {
        name: String,
        email: String,
        initials: String,
        avatar_url: Option<String>,
    },
}

pub fn nav_view(session: &SessionState) -> NavView {
    match session {
        SessionState::Loading => NavView::Hidden,
        SessionState::Anonymous => NavView::Anonymous,
        SessionState::Authenticated(user) => NavView::Member {
            name: user.full_name.clone(),
            email: user.email.clone(),
            initials: initials(&user.full_name),
            avatar_url: user.avatar_url.clone().filter(|url| !url.is_empty()),
        },
    }
}

#[component]
pub fn NavHeader() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let notifications = expect_context::<RwSignal<NotificationState>>();
    let menu_open = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let sign_out = Callback::new(move |()| {
        menu_open.set(false);

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let outcome = crate::net::api::logout().await;
                session.set(SessionState::Anonymous);
                match outcome {
                    Ok(()) => crate::state::notifications::notify(
                        notifications,
                        crate::state::notifications::NotificationKind::Success,
                        "Logged out successfully",
                    ),
                    Err(message) => {
                        log::warn!("logout failed: {message}");
                        crate::state::notifications::notify(
                            notifications,
                            crate::state::notifications::NotificationKind::Error,
                            message,
                        );
                    }
                }
                navigate("/login", NavigateOptions::default());
            });
        }

        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (session, notifications);
        }
    });

    let links = move || match nav_view(&session.get()) {
        NavView::Hidden => ().into_any(),
        NavView::Anonymous => view! {
            <nav class="nav-header__links">
                <a href="/login" class="nav-header__link">"Log in"</a>
                <a href="/register" class="btn btn--primary">"Join for Free"</a>
            </nav>
        }
        .into_any(),
        NavView::Member { name, email, initials, avatar_url } => {
            let avatar = match avatar_url {
                Some(url) => view! { <img src=url alt=name.clone()/> }.into_any(),
                None => view! { <span>{initials}</span> }.into_any(),
            };
            let title = name.clone();
            view! {
                <div class="nav-header__member">
                    <button
                        class="nav-header__avatar"
                        title=title
                        on:click=move |_| menu_open.update(|open| *open = !*open)
                    >
                        {avatar}
                    </button>
                    <Show when=move || menu_open.get()>
                        <div class="nav-header__menu">
                            <div class="nav-header__identity">
                                <span class="nav-header__name">{name.clone()}</span>
                                <span class="nav-header__email">{email.clone()}</span>
                            </div>
                            <a href="/profile" class="nav-header__menu-item">"Profile"</a>
                            <a href="/dashboard" class="nav-header__menu-item">"Dashboard"</a>
                            <button class="nav-header__menu-item" on:click=move |_| sign_out.run(())>
                                "Sign out"
                            </button>
                        </div>
                    </Show>
                </div>
            }
            .into_any()
        }
    };

    view! {
        <header class="nav-header">
            <a href="/" class="nav-header__brand">{PRODUCT_NAME}</a>
            <span class="nav-header__spacer"></span>
            {links}
        </header>
    }
}
