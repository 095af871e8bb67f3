use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A playable item as handed over by the navigation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Track {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default, alias = "imageUrl")]
    pub artwork: Option<String>,
    #[serde(alias = "mp3Url")]
    pub url: String,
}

impl Track {
    /// Rebuilds a track from what the player reported, keeping `id` as the
    /// library identifier.
    pub fn from_queued(id: String, queued: QueuedTrack) -> Self {
        Self {
            id,
            title: queued.title,
            artist: queued.artist,
            artwork: queued.artwork.filter(|art| !art.trim().is_empty()),
            url: queued.url,
        }
    }

    pub fn display_artist(&self) -> &str {
        if self.artist.trim().is_empty() {
            "Unknown Artist"
        } else {
            &self.artist
        }
    }
}

/// Accepts ids sent either as JSON strings or as JSON numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Unsigned(id) => id.to_string(),
        RawId::Signed(id) => id.to_string(),
        RawId::Float(id) => id.to_string(),
    })
}

/// Track in the shape the player queue expects. `id` is the queue position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueuedTrack {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub artwork: Option<String>,
}

impl QueuedTrack {
    pub fn from_track(position: usize, track: &Track) -> Self {
        Self {
            id: position.to_string(),
            url: track.url.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            artwork: track.artwork.clone(),
        }
    }

    pub fn position(&self) -> Option<usize> {
        self.id.parse().ok()
    }
}

/// Maps a track list into the player's queue format, in order.
pub fn to_queue(tracks: &[Track]) -> Vec<QueuedTrack> {
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| QueuedTrack::from_track(index, track))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of an add-comment request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub username: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl NewComment {
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

pub fn format_duration(seconds: u32) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{}:{:02}", mins, secs)
}

/// Formats a player position in seconds, tolerating NaN and negatives.
pub fn format_position(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return format_duration(0);
    }
    format_duration(seconds.floor() as u32)
}

/// Human relative label for a comment timestamp.
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let seconds = elapsed.num_seconds();
    if seconds < 45 {
        return "just now".to_string();
    }

    let (value, unit) = if seconds < 3600 {
        ((seconds + 30) / 60, "minute")
    } else if seconds < 86_400 {
        ((seconds + 1800) / 3600, "hour")
    } else if seconds < 86_400 * 30 {
        ((seconds + 43_200) / 86_400, "day")
    } else if seconds < 86_400 * 365 {
        ((seconds + 86_400 * 15) / (86_400 * 30), "month")
    } else {
        (seconds / (86_400 * 365), "year")
    };

    let value = value.max(1);
    if value == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{value} {unit}s ago")
    }
}
