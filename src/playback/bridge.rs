//! `Player` backed by a hidden `<audio>` element driven through `document::eval`.
//! The queue and repeat policy live on the Rust side. The element only ever
//! holds the current source.

use crate::api::QueuedTrack;
use crate::error::PlayerError;
use crate::playback::{
    EventHub, PlayQueue, PlaybackStatus, Player, PlayerEvent, Progress, RepeatMode, Subscription,
};
use async_trait::async_trait;
use dioxus::prelude::*;
use serde::Deserialize;
use serde_json::json;
use std::cell::{Cell, RefCell};

const BRIDGE_BOOTSTRAP_JS: &str = r#"
return (() => {
  if (window.__playscreenAudioBridge) {
    return true;
  }
  if (!document || !document.body) {
    return false;
  }

  const audio = document.createElement("audio");
  audio.id = "playscreen-audio";
  audio.preload = "metadata";
  audio.style.display = "none";
  audio.setAttribute("playsinline", "true");
  audio.setAttribute("webkit-playsinline", "true");
  document.body.appendChild(audio);

  const safePlay = async () => {
    try {
      await audio.play();
    } catch (_err) {}
  };

  const setMetadata = (meta) => {
    if (!meta || !("mediaSession" in navigator) || typeof MediaMetadata === "undefined") {
      return;
    }
    try {
      navigator.mediaSession.metadata = new MediaMetadata({
        title: meta.title || "",
        artist: meta.artist || "",
        artwork: meta.artwork ? [{ src: meta.artwork, sizes: "512x512" }] : undefined,
      });
    } catch (_err) {}
  };

  const bridge = {
    actions: [],
    apply(cmd) {
      if (!cmd || !cmd.type) return;
      switch (cmd.type) {
        case "load":
          if (cmd.src && audio.src !== cmd.src) {
            audio.src = cmd.src;
          }
          try {
            audio.currentTime = 0;
          } catch (_err) {}
          setMetadata(cmd.meta || null);
          if (cmd.play === true) {
            safePlay();
          } else if (cmd.play === false) {
            audio.pause();
          }
          break;
        case "play":
          safePlay();
          break;
        case "pause":
          audio.pause();
          break;
        case "seek":
          if (typeof cmd.position === "number" && Number.isFinite(cmd.position)) {
            try {
              audio.currentTime = Math.max(0, cmd.position);
            } catch (_err) {}
          }
          break;
        case "loop":
          audio.loop = !!cmd.enabled;
          break;
        case "clear":
          audio.pause();
          audio.removeAttribute("src");
          audio.load();
          bridge.actions = [];
          break;
      }
    },
    snapshot() {
      return {
        current_time: Number.isFinite(audio.currentTime) ? audio.currentTime : 0,
        duration: Number.isFinite(audio.duration) ? audio.duration : 0,
        paused: !!audio.paused,
        has_source: !!audio.getAttribute("src"),
        action: bridge.actions.shift() || null,
      };
    },
  };

  if ("mediaSession" in navigator) {
    try {
      navigator.mediaSession.setActionHandler("nexttrack", () => bridge.actions.push("next"));
      navigator.mediaSession.setActionHandler("previoustrack", () => bridge.actions.push("previous"));
    } catch (_err) {}
  }
  audio.addEventListener("ended", () => bridge.actions.push("ended"));

  window.__playscreenAudioBridge = bridge;
  return true;
})();
"#;

const SNAPSHOT_JS: &str = r#"
return (() => {
  const bridge = window.__playscreenAudioBridge;
  if (!bridge) {
    return { current_time: 0, duration: 0, paused: true, has_source: false, action: null };
  }
  return bridge.snapshot();
})();
"#;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
struct BridgeSnapshot {
    #[serde(default)]
    current_time: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    paused: bool,
    #[serde(default)]
    has_source: bool,
    #[serde(default)]
    action: Option<String>,
}

fn load_command(track: &QueuedTrack, play: Option<bool>) -> serde_json::Value {
    json!({
        "type": "load",
        "src": track.url,
        "play": play,
        "meta": {
            "title": track.title,
            "artist": track.artist,
            "artwork": track.artwork,
        },
    })
}

fn command_script(command: &serde_json::Value) -> String {
    let payload = serde_json::to_string(command).unwrap_or_else(|_| "{}".to_string());
    format!(
        r#"return (function () {{
            const bridge = window.__playscreenAudioBridge;
            if (!bridge) return false;
            bridge.apply({payload});
            return true;
        }})();"#
    )
}

/// Waits `ms` milliseconds using the host's timer.
pub async fn delay_ms(ms: u64) {
    let script = format!(
        r#"return (async function () {{
            await new Promise(resolve => setTimeout(resolve, {ms}));
            return true;
        }})();"#
    );
    let _ = document::eval(&script).await;
}

#[derive(Default)]
pub struct BridgePlayer {
    queue: RefCell<PlayQueue>,
    playing: Cell<bool>,
    hub: EventHub,
}

impl BridgePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    async fn send(&self, command: serde_json::Value) -> Result<(), PlayerError> {
        let applied = document::eval(&command_script(&command))
            .join::<bool>()
            .await
            .map_err(|e| PlayerError::Bridge(e.to_string()))?;
        if applied {
            Ok(())
        } else {
            Err(PlayerError::Bridge("audio bridge is not installed".to_string()))
        }
    }

    async fn snapshot(&self) -> Result<BridgeSnapshot, PlayerError> {
        document::eval(SNAPSHOT_JS)
            .join::<BridgeSnapshot>()
            .await
            .map_err(|e| PlayerError::Bridge(e.to_string()))
    }

    /// Moves the cursor to `index`, loads the source and notifies listeners.
    async fn activate(&self, index: usize, play: Option<bool>) -> Result<(), PlayerError> {
        let track = self.queue.borrow_mut().skip(index)?.clone();
        self.send(load_command(&track, play)).await?;
        if let Some(play) = play {
            self.playing.set(play);
        }
        self.hub.emit(PlayerEvent::TrackChanged { index: Some(index) });
        Ok(())
    }

    /// Drains one pending element action. Called periodically by the app shell.
    pub async fn poll(&self) -> Result<(), PlayerError> {
        let snapshot = self.snapshot().await?;
        match snapshot.action.as_deref() {
            Some("ended") => {
                let next = self.queue.borrow().next_index();
                match next {
                    Some(index) => self.activate(index, Some(true)).await?,
                    None => {
                        self.playing.set(false);
                        self.hub.emit(PlayerEvent::TrackChanged { index: None });
                    }
                }
            }
            Some("next") => self.skip_to_next().await?,
            Some("previous") => self.skip_to_previous().await?,
            _ => {}
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl Player for BridgePlayer {
    async fn setup(&self) -> Result<bool, PlayerError> {
        document::eval(BRIDGE_BOOTSTRAP_JS)
            .join::<bool>()
            .await
            .map_err(|e| PlayerError::Bridge(e.to_string()))
    }

    async fn reset(&self) -> Result<(), PlayerError> {
        self.queue.borrow_mut().clear();
        self.playing.set(false);
        self.send(json!({ "type": "clear" })).await?;
        self.send(json!({ "type": "loop", "enabled": false })).await
    }

    async fn add(&self, tracks: Vec<QueuedTrack>) -> Result<(), PlayerError> {
        let was_empty = self.queue.borrow().is_empty();
        self.queue.borrow_mut().extend(tracks);
        let first = if was_empty {
            self.queue.borrow().current().cloned()
        } else {
            None
        };
        if let Some(track) = first {
            self.send(load_command(&track, None)).await?;
        }
        Ok(())
    }

    async fn skip(&self, index: usize) -> Result<(), PlayerError> {
        let play = self.playing.get();
        self.activate(index, Some(play)).await
    }

    async fn play(&self) -> Result<(), PlayerError> {
        if self.queue.borrow().current().is_none() {
            return Err(PlayerError::EmptyQueue);
        }
        self.send(json!({ "type": "play" })).await?;
        self.playing.set(true);
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.send(json!({ "type": "pause" })).await?;
        self.playing.set(false);
        Ok(())
    }

    async fn skip_to_next(&self) -> Result<(), PlayerError> {
        let next = self.queue.borrow().step_forward_index();
        match next {
            Some(index) => self.skip(index).await,
            None => Ok(()),
        }
    }

    async fn skip_to_previous(&self) -> Result<(), PlayerError> {
        let previous = self.queue.borrow().step_back_index();
        match previous {
            Some(index) => self.skip(index).await,
            None => self.seek_to(0.0).await,
        }
    }

    async fn seek_to(&self, position: f64) -> Result<(), PlayerError> {
        self.send(json!({ "type": "seek", "position": position.max(0.0) }))
            .await
    }

    async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<(), PlayerError> {
        self.queue.borrow_mut().set_repeat(mode);
        self.send(json!({ "type": "loop", "enabled": mode == RepeatMode::Track }))
            .await
    }

    async fn get_track(&self, index: usize) -> Result<Option<QueuedTrack>, PlayerError> {
        Ok(self.queue.borrow().get(index).cloned())
    }

    async fn progress(&self) -> Result<Progress, PlayerError> {
        let snapshot = self.snapshot().await?;
        let duration = if snapshot.duration.is_finite() {
            snapshot.duration.max(0.0)
        } else {
            0.0
        };
        let mut position = snapshot.current_time.max(0.0);
        if duration > 0.0 {
            position = position.min(duration);
        }
        Ok(Progress { position, duration })
    }

    async fn status(&self) -> Result<PlaybackStatus, PlayerError> {
        let snapshot = self.snapshot().await?;
        Ok(if !snapshot.has_source {
            PlaybackStatus::Idle
        } else if snapshot.paused {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Playing
        })
    }

    fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }
}
