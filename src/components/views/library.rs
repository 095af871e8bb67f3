use crate::api::Track;
use crate::components::{AppView, Icon, Navigation};
use crate::config::AppConfig;
use crate::playback::PlaybackParams;
use dioxus::prelude::*;

#[component]
pub fn LibraryView() -> Element {
    let config = use_context::<AppConfig>();
    let navigation = use_context::<Navigation>();
    let mut open_error = use_signal(|| None::<String>);

    let tracks = config.library.clone();

    let on_select = {
        let tracks = tracks.clone();
        move |track: Track| match PlaybackParams::new(tracks.clone(), &track) {
            Ok(params) => {
                open_error.set(None);
                navigation.navigate_to(AppView::NowPlaying(params));
            }
            Err(error) => {
                tracing::warn!(track_id = %track.id, %error, "cannot open playback screen");
                open_error.set(Some(error.to_string()));
            }
        }
    };

    rsx! {
        div { class: "library",
            header { class: "page-header",
                h1 { class: "page-title", "Library" }
                p { class: "page-subtitle", "{tracks.len()} tracks" }
            }

            if let Some(message) = open_error() {
                p { class: "library__error", "{message}" }
            }

            if tracks.is_empty() {
                div { class: "library__empty",
                    Icon { name: "music".to_string(), class: "icon icon--xl".to_string() }
                    p { "No tracks configured" }
                }
            } else {
                ul { class: "library__list",
                    for track in tracks.iter().cloned() {
                        li { key: "{track.id}",
                            button {
                                r#type: "button",
                                class: "library__row",
                                onclick: {
                                    let track = track.clone();
                                    let mut on_select = on_select.clone();
                                    move |_| on_select(track.clone())
                                },
                                if let Some(artwork) = track.artwork.clone() {
                                    img {
                                        class: "library__thumb",
                                        src: "{artwork}",
                                        alt: "{track.title}",
                                        loading: "lazy",
                                    }
                                } else {
                                    div { class: "library__thumb library__thumb--empty",
                                        Icon { name: "music".to_string(), class: "icon icon--sm".to_string() }
                                    }
                                }
                                div { class: "library__meta",
                                    p { class: "library__title", "{track.title}" }
                                    p { class: "library__artist", "{track.display_artist()}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
