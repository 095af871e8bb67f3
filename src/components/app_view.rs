//! Defines the shared application view state.

use crate::config::AppConfig;
use crate::playback::PlaybackParams;

#[derive(Debug, Clone, PartialEq)]
pub enum AppView {
    Library,
    NowPlaying(PlaybackParams),
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::Library => "Library",
        AppView::NowPlaying(_) => "Now Playing",
    }
}

/// Launch view: the configured `now_playing` payload when it validates,
/// otherwise the library.
pub fn initial_view(config: &AppConfig) -> AppView {
    let Some(payload) = config.now_playing.as_ref() else {
        return AppView::Library;
    };
    match PlaybackParams::from_json(payload) {
        Ok(params) => AppView::NowPlaying(params),
        Err(error) => {
            tracing::warn!(%error, "ignoring invalid now_playing payload");
            AppView::Library
        }
    }
}
