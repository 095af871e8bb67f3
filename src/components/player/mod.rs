use crate::api::{format_position, Track};
use crate::config::AppConfig;
use crate::playback::{delay_ms, BridgePlayer, Player, Progress};
use dioxus::prelude::*;
use std::rc::Rc;

mod controls;

pub use controls::ControlCenter;

/// Shared handle to the app's player, provided through context.
#[derive(Clone)]
pub struct PlayerHandle(pub Rc<BridgePlayer>);

#[component]
pub fn SongInfo(track: Track) -> Element {
    rsx! {
        div { class: "song-info",
            h2 { class: "song-info__title", "{track.title}" }
            p { class: "song-info__artist", "{track.display_artist()}" }
        }
    }
}

/// Seek bar polling the player for position and duration.
#[component]
pub fn SongSlider() -> Element {
    let config = use_context::<AppConfig>();
    let player = use_context::<PlayerHandle>().0;
    let mut progress = use_signal(Progress::default);

    {
        let player = player.clone();
        let poll_ms = config.progress_poll_ms;
        use_hook(move || {
            spawn(async move {
                loop {
                    match player.progress().await {
                        Ok(latest) => progress.set(latest),
                        Err(error) => tracing::trace!(%error, "progress poll failed"),
                    }
                    delay_ms(poll_ms).await;
                }
            })
        });
    }

    let current = progress();
    let percent = current.percent();
    let elapsed = format_position(current.position);
    let total = format_position(current.duration);

    let on_seek = move |e: Event<FormData>| {
        let Ok(percent) = e.value().parse::<f64>() else {
            return;
        };
        let duration = progress.peek().duration;
        if duration <= 0.0 {
            return;
        }
        let position = (percent.clamp(0.0, 100.0) / 100.0) * duration;
        progress.write().position = position;
        let player = player.clone();
        spawn(async move {
            if let Err(error) = player.seek_to(position).await {
                tracing::warn!(%error, position, "seek failed");
            }
        });
    };

    rsx! {
        div { class: "song-slider",
            input {
                r#type: "range",
                class: "song-slider__range",
                min: "0",
                max: "100",
                step: "0.1",
                value: "{percent}",
                disabled: current.duration <= 0.0,
                oninput: on_seek,
            }
            div { class: "song-slider__times",
                span { "{elapsed}" }
                span { "{total}" }
            }
        }
    }
}
