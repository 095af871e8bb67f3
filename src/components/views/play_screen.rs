use crate::components::{
    CommentsPanel, ControlCenter, Icon, Navigation, PlayerHandle, SongInfo, SongSlider,
};
use crate::playback::{run_session, screen_sections, PlaybackParams, Readiness, Section};
use dioxus::prelude::*;

/// Now-playing screen: loads `params` into the player once per mount and
/// mirrors the player's active track.
#[component]
pub fn PlayScreen(params: PlaybackParams) -> Element {
    let player = use_context::<PlayerHandle>().0;
    let navigation = use_context::<Navigation>();
    let mut readiness = use_signal(Readiness::default);
    let mut current_track = use_signal(|| params.initial_track().clone());

    // The session owns the subscription and any in-flight lookup. Unmounting
    // cancels the task, which releases both.
    {
        let params = params.clone();
        use_hook(move || {
            spawn(async move {
                run_session(
                    player.as_ref(),
                    &params,
                    |state| readiness.set(state),
                    |track| current_track.set(track),
                )
                .await;
            })
        });
    }

    let current = current_track();
    let sections = screen_sections(readiness(), &params, &current);

    rsx! {
        div { class: "play-screen",
            {
                sections
                    .into_iter()
                    .map(|section| match section {
                        Section::Loading => rsx! {
                            div { class: "play-screen__loading",
                                p { "Loading..." }
                            }
                        },
                        Section::BackButton => rsx! {
                            button {
                                r#type: "button",
                                class: "play-screen__back",
                                disabled: !navigation.can_go_back(),
                                onclick: move |_| {
                                    navigation.go_back();
                                },
                                Icon { name: "arrow-left".to_string(), class: "icon icon--md".to_string() }
                            }
                        },
                        Section::Artwork(tiles) => rsx! {
                            div { class: "artwork-carousel",
                                for tile in tiles {
                                    div {
                                        key: "{tile.key}",
                                        class: if tile.active { "artwork-tile artwork-tile--active" } else { "artwork-tile" },
                                        if let Some(artwork) = tile.artwork.clone() {
                                            img {
                                                class: "artwork-tile__img",
                                                src: "{artwork}",
                                                alt: "{tile.title}",
                                                loading: "lazy",
                                            }
                                        } else {
                                            div { class: "artwork-tile__placeholder",
                                                Icon { name: "music".to_string(), class: "icon icon--xl".to_string() }
                                            }
                                        }
                                    }
                                }
                            }
                        },
                        Section::SongInfo => rsx! {
                            SongInfo { track: current.clone() }
                        },
                        Section::Slider => rsx! {
                            SongSlider {}
                        },
                        Section::Controls => rsx! {
                            ControlCenter {}
                        },
                        Section::Comments => rsx! {
                            CommentsPanel { key: "{current.id}", track_id: current.id.clone() }
                        },
                    })
            }
        }
    }
}
