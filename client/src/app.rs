//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::{footer::Footer, nav_header::NavHeader, toaster::Toaster};
use crate::consts::PRODUCT_NAME;
use crate::pages::{home::HomePage, login::LoginPage, register::RegisterPage};
use crate::state::notifications::NotificationState;
use crate::state::session::{SessionState, refresh_session};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session and notification contexts, resolves the session
/// once in the browser, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    let notifications = RwSignal::new(NotificationState::default());

    provide_context(session);
    provide_context(notifications);

    // Effects only run in the browser, so SSR stays in `Loading`.
    Effect::new(move |_| refresh_session(session));

    view! {
        <Title text=PRODUCT_NAME/>

        <Router>
            <NavHeader/>
            <main class="page">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                </Routes>
            </main>
            <Footer/>
            <Toaster/>
        </Router>
    }
}
