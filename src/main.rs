use dioxus::prelude::*;
use tracing_subscriber::EnvFilter;

mod api;
mod components;
mod config;
mod error;
mod playback;

use components::AppShell;
use config::AppConfig;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    let config = AppConfig::load();
    init_tracing(&config.log_filter);
    tracing::info!(
        comment_api = %config.comment_api_base_url,
        tracks = config.library.len(),
        "starting playscreen"
    );

    dioxus::LaunchBuilder::new().with_context(config).launch(App);
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // The renderer may install its own subscriber first; keep whichever won.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[component]
fn App() -> Element {
    rsx! {
        // Theme color for mobile browsers
        document::Meta { name: "theme-color", content: "#001d23" }
        document::Meta { name: "mobile-web-app-capable", content: "yes" }
        document::Meta { name: "apple-mobile-web-app-title", content: "PlayScreen" }

        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}
