use crate::api::models::*;
use crate::error::CommentError;
use once_cell::sync::Lazy;
use serde::Deserialize;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Client for the remote comment feed, keyed by track id.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentClient {
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommentListResponse {
    Bare(Vec<Comment>),
    Wrapped { comments: Vec<Comment> },
}

impl CommentListResponse {
    fn into_comments(self) -> Vec<Comment> {
        match self {
            Self::Bare(comments) => comments,
            Self::Wrapped { comments } => comments,
        }
    }
}

impl CommentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    fn comments_url(&self, track_id: &str) -> String {
        format!(
            "{}/comments/{}",
            self.base_url,
            urlencoding::encode(track_id.trim())
        )
    }

    pub async fn get_comments_for_track(&self, track_id: &str) -> Result<Vec<Comment>, CommentError> {
        let url = self.comments_url(track_id);
        tracing::debug!(%url, "fetching comments");
        let response = HTTP_CLIENT.get(&url).send().await?;
        let body = read_success_body(response).await?;
        let mut comments = parse_comment_list(&body)?;
        comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(comments)
    }

    pub async fn add_comment(
        &self,
        track_id: &str,
        comment: &NewComment,
    ) -> Result<Comment, CommentError> {
        if comment.text.trim().is_empty() {
            return Err(CommentError::EmptyText);
        }
        let url = self.comments_url(track_id);
        tracing::debug!(%url, username = %comment.username, "posting comment");
        let response = HTTP_CLIENT.post(&url).json(comment).send().await?;
        let body = read_success_body(response).await?;
        if body.trim().is_empty() {
            return Ok(Comment {
                username: comment.username.clone(),
                text: comment.text.clone(),
                timestamp: comment.timestamp,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<String, CommentError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(CommentError::Status {
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            }),
        });
    }
    Ok(body)
}

fn parse_comment_list(body: &str) -> Result<Vec<Comment>, CommentError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: CommentListResponse = serde_json::from_str(body)?;
    Ok(parsed.into_comments())
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
        .filter(|message| !message.trim().is_empty())
}
