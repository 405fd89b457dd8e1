//! Landing page.

use leptos::prelude::*;

use crate::consts::PRODUCT_NAME;
use crate::state::session::SessionState;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let greeting = move || match session.get().user() {
        Some(user) if !user.full_name.is_empty() => format!("Hello, {}!", user.full_name),
        _ => "Hello!".to_owned(),
    };

    view! {
        <section class="home-page">
            <h1>{greeting}</h1>
            <p>{format!("Welcome to {PRODUCT_NAME}. Learn at your own pace, from anywhere.")}</p>
        </section>
    }
}
