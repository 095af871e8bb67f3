use crate::components::{Icon, PlayerHandle};
use crate::config::AppConfig;
use crate::playback::{delay_ms, PlaybackStatus, Player};
use dioxus::prelude::*;

/// Transport row: previous, play/pause, next.
#[component]
pub fn ControlCenter() -> Element {
    let config = use_context::<AppConfig>();
    let player = use_context::<PlayerHandle>().0;
    let status = use_signal(PlaybackStatus::default);

    {
        let player = player.clone();
        let mut status = status;
        let poll_ms = config.progress_poll_ms;
        use_hook(move || {
            spawn(async move {
                loop {
                    if let Ok(latest) = player.status().await {
                        if *status.peek() != latest {
                            status.set(latest);
                        }
                    }
                    delay_ms(poll_ms).await;
                }
            })
        });
    }

    rsx! {
        div { class: "control-center",
            PrevButton {}
            PlayPauseButton { status }
            NextButton {}
        }
    }
}

#[component]
fn PrevButton() -> Element {
    let player = use_context::<PlayerHandle>().0;

    rsx! {
        button {
            id: "prev-btn",
            r#type: "button",
            class: "control-center__button",
            onclick: move |_| {
                let player = player.clone();
                spawn(async move {
                    if let Err(error) = player.skip_to_previous().await {
                        tracing::warn!(%error, "skip to previous failed");
                    }
                });
            },
            Icon { name: "prev".to_string(), class: "icon icon--md".to_string() }
        }
    }
}

/// Play/Pause button - flips the shown state before the player confirms
#[component]
fn PlayPauseButton(status: Signal<PlaybackStatus>) -> Element {
    let player = use_context::<PlayerHandle>().0;
    let playing = status() == PlaybackStatus::Playing;

    rsx! {
        button {
            id: "play-pause-btn",
            r#type: "button",
            class: "control-center__button control-center__button--primary",
            onclick: move |_| {
                let player = player.clone();
                let mut status = status;
                let was_playing = *status.peek() == PlaybackStatus::Playing;
                status.set(if was_playing { PlaybackStatus::Paused } else { PlaybackStatus::Playing });
                spawn(async move {
                    let result = if was_playing {
                        player.pause().await
                    } else {
                        player.play().await
                    };
                    if let Err(error) = result {
                        tracing::warn!(%error, "toggling playback failed");
                    }
                });
            },
            if playing {
                Icon { name: "pause".to_string(), class: "icon icon--lg".to_string() }
            } else {
                Icon { name: "play".to_string(), class: "icon icon--lg".to_string() }
            }
        }
    }
}

#[component]
fn NextButton() -> Element {
    let player = use_context::<PlayerHandle>().0;

    rsx! {
        button {
            id: "next-btn",
            r#type: "button",
            class: "control-center__button",
            onclick: move |_| {
                let player = player.clone();
                spawn(async move {
                    if let Err(error) = player.skip_to_next().await {
                        tracing::warn!(%error, "skip to next failed");
                    }
                });
            },
            Icon { name: "next".to_string(), class: "icon icon--md".to_string() }
        }
    }
}
