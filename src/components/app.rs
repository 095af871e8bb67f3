use crate::components::views::{LibraryView, PlayScreen};
use crate::components::{initial_view, view_label, AppView, Navigation, PlayerHandle};
use crate::config::AppConfig;
use crate::playback::{delay_ms, BridgePlayer};
use dioxus::prelude::*;
use std::rc::Rc;

#[component]
pub fn AppShell() -> Element {
    let config = use_context::<AppConfig>();
    let current_view = use_signal(|| initial_view(&config));
    let navigation_stack = use_signal(Vec::<AppView>::new);
    let navigation = Navigation::new(current_view, navigation_stack);

    // Provide state via context
    use_context_provider(|| navigation);
    let player = use_context_provider(|| PlayerHandle(Rc::new(BridgePlayer::new())));

    // Bridge poll loop: turns element events (ended, media keys) into queue moves.
    {
        let player = player.0.clone();
        let poll_ms = config.progress_poll_ms;
        use_hook(move || {
            spawn(async move {
                loop {
                    delay_ms(poll_ms).await;
                    if let Err(error) = player.poll().await {
                        tracing::trace!(%error, "audio bridge poll failed");
                    }
                }
            })
        });
    }

    let view = current_view();
    let title = view_label(&view);

    rsx! {
        document::Title { "{title} · PlayScreen" }
        main { class: "app-shell",
            {
                match view {
                    AppView::Library => rsx! {
                        LibraryView {}
                    },
                    AppView::NowPlaying(params) => rsx! {
                        PlayScreen { key: "{params.initial_track().id}", params }
                    },
                }
            }
        }
    }
}
