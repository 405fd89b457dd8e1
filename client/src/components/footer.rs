use leptos::prelude::*;

use crate::consts::PRODUCT_NAME;

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="site-footer">
            <span>{PRODUCT_NAME}</span>
            <nav class="site-footer__links">
                <a href="/">"Home"</a>
                <a href="/register">"Join for Free"</a>
            </nav>
        </footer>
    }
}
