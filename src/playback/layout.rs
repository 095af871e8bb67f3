use crate::api::Track;
use crate::playback::{PlaybackParams, Readiness};

#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkTile {
    pub key: String,
    pub title: String,
    pub artwork: Option<String>,
    pub active: bool,
}

/// Top-to-bottom blocks of the playback screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Loading,
    BackButton,
    Artwork(Vec<ArtworkTile>),
    SongInfo,
    Slider,
    Controls,
    Comments,
}

pub fn artwork_tiles(tracks: &[Track], current: &Track) -> Vec<ArtworkTile> {
    tracks
        .iter()
        .map(|track| ArtworkTile {
            key: track.id.clone(),
            title: track.title.clone(),
            artwork: track
                .artwork
                .clone()
                .filter(|artwork| !artwork.trim().is_empty()),
            active: track.id == current.id,
        })
        .collect()
}

pub fn screen_sections(
    readiness: Readiness,
    params: &PlaybackParams,
    current: &Track,
) -> Vec<Section> {
    match readiness {
        Readiness::NotReady => vec![Section::Loading],
        Readiness::Ready => vec![
            Section::BackButton,
            Section::Artwork(artwork_tiles(params.tracks(), current)),
            Section::SongInfo,
            Section::Slider,
            Section::Controls,
            Section::Comments,
        ],
    }
}
