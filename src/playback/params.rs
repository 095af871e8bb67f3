use crate::api::Track;
use crate::error::ParamsError;
use serde_json::Value;
use std::collections::HashSet;

/// Validated navigation input for the playback screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackParams {
    tracks: Vec<Track>,
    initial_index: usize,
}

impl PlaybackParams {
    pub fn new(tracks: Vec<Track>, initial: &Track) -> Result<Self, ParamsError> {
        Self::with_initial_id(tracks, &initial.id)
    }

    pub fn with_initial_id(tracks: Vec<Track>, initial_id: &str) -> Result<Self, ParamsError> {
        if tracks.is_empty() {
            return Err(ParamsError::EmptyTrackList);
        }

        {
            let mut seen = HashSet::new();
            for track in &tracks {
                if track.id.trim().is_empty() {
                    return Err(ParamsError::MissingField { field: "tracks[].id" });
                }
                if track.url.trim().is_empty() {
                    return Err(ParamsError::MissingField { field: "tracks[].url" });
                }
                if !seen.insert(track.id.as_str()) {
                    return Err(ParamsError::DuplicateTrackId {
                        id: track.id.clone(),
                    });
                }
            }
        }

        let initial_index = tracks
            .iter()
            .position(|track| track.id == initial_id)
            .ok_or_else(|| ParamsError::InitialTrackMissing {
                id: initial_id.to_string(),
            })?;

        Ok(Self {
            tracks,
            initial_index,
        })
    }

    /// Parses the untyped `{ tracks, track }` payload handed over by the navigator.
    pub fn from_json(payload: &Value) -> Result<Self, ParamsError> {
        let tracks = payload
            .get("tracks")
            .ok_or(ParamsError::MissingField { field: "tracks" })?;
        let track = payload
            .get("track")
            .ok_or(ParamsError::MissingField { field: "track" })?;

        let tracks: Vec<Track> = serde_json::from_value(tracks.clone())
            .map_err(|e| ParamsError::Malformed(e.to_string()))?;
        let initial_id = match track.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(ParamsError::MissingField { field: "track.id" }),
        };

        Self::with_initial_id(tracks, &initial_id)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn initial_index(&self) -> usize {
        self.initial_index
    }

    pub fn initial_track(&self) -> &Track {
        &self.tracks[self.initial_index]
    }

    pub fn track_at(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }
}
