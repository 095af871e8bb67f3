use crate::api::{format_relative, Comment, CommentClient, NewComment};
use crate::components::Icon;
use crate::config::AppConfig;
use chrono::Utc;
use dioxus::prelude::*;

/// Comment feed for one track. Keyed by track id at the call site so a track
/// change remounts it and refetches.
#[component]
pub fn CommentsPanel(track_id: String) -> Element {
    let config = use_context::<AppConfig>();
    let client = use_hook(|| CommentClient::new(config.comment_api_base_url.clone()));
    let mut comments = use_signal(Vec::<Comment>::new);
    let mut comment_text = use_signal(String::new);
    let mut loading = use_signal(|| true);
    let mut posting = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    {
        let client = client.clone();
        let track_id = track_id.clone();
        use_hook(move || {
            spawn(async move {
                match client.get_comments_for_track(&track_id).await {
                    Ok(fetched) => comments.set(fetched),
                    Err(err) => {
                        tracing::warn!(%track_id, error = %err, "could not load comments");
                        error.set(Some("Comments are unavailable right now.".to_string()));
                    }
                }
                loading.set(false);
            })
        });
    }

    let submit = {
        let client = client.clone();
        let track_id = track_id.clone();
        let username = config.username.clone();
        move || {
            if posting() {
                return;
            }
            let text = comment_text.peek().trim().to_string();
            if text.is_empty() {
                return;
            }
            let client = client.clone();
            let track_id = track_id.clone();
            let new_comment = NewComment::new(username.clone(), text);
            posting.set(true);
            spawn(async move {
                match client.add_comment(&track_id, &new_comment).await {
                    Ok(created) => {
                        comments.write().insert(0, created);
                        comment_text.set(String::new());
                        error.set(None);
                    }
                    Err(err) => {
                        tracing::warn!(%track_id, error = %err, "could not post comment");
                        error.set(Some(format!("Could not post comment: {err}")));
                    }
                }
                posting.set(false);
            });
        }
    };

    let mut submit_on_enter = submit.clone();
    let now = Utc::now();
    let listed = comments();

    rsx! {
        section { class: "comments",
            h3 { class: "comments__title",
                Icon { name: "message".to_string(), class: "icon icon--sm".to_string() }
                "Comments"
            }

            if loading() {
                p { class: "comments__empty", "Loading comments..." }
            } else if listed.is_empty() {
                p { class: "comments__empty", "No comments yet." }
            } else {
                for (idx, comment) in listed.iter().enumerate() {
                    div { key: "{idx}-{comment.timestamp}", class: "comment",
                        p { class: "comment__username", "{comment.username}" }
                        p { class: "comment__text", "{comment.text}" }
                        p { class: "comment__timestamp", "{format_relative(comment.timestamp, now)}" }
                    }
                }
            }

            if let Some(message) = error() {
                p { class: "comments__error", "{message}" }
            }

            input {
                class: "comments__input",
                r#type: "text",
                placeholder: "Add a comment...",
                value: "{comment_text}",
                oninput: move |e: Event<FormData>| comment_text.set(e.value()),
                onkeydown: move |e: Event<KeyboardData>| {
                    if e.key() == Key::Enter {
                        submit_on_enter();
                    }
                },
            }
            button {
                r#type: "button",
                class: "comments__submit",
                disabled: posting() || comment_text().trim().is_empty(),
                onclick: {
                    let mut submit = submit;
                    move |_| submit()
                },
                Icon { name: "send".to_string(), class: "icon icon--sm".to_string() }
                "Post"
            }
        }
    }
}
