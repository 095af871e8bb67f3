//! The playback engine capability surface used by the screen, plus the event
//! fan-out shared by player implementations.

use crate::api::QueuedTrack;
use crate::error::PlayerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    Track,
    Queue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The active queue item changed. `None` means the queue ran out.
    TrackChanged { index: Option<usize> },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Progress {
    pub position: f64,
    pub duration: f64,
}

impl Progress {
    /// Position as a 0..=100 percentage, 0 when the duration is unknown.
    pub fn percent(&self) -> f64 {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return 0.0;
        }
        (self.position.max(0.0) / self.duration * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
}

#[async_trait(?Send)]
pub trait Player {
    /// Prepares the engine. `Ok(false)` means the engine declined setup.
    async fn setup(&self) -> Result<bool, PlayerError>;
    async fn reset(&self) -> Result<(), PlayerError>;
    async fn add(&self, tracks: Vec<QueuedTrack>) -> Result<(), PlayerError>;
    async fn skip(&self, index: usize) -> Result<(), PlayerError>;
    async fn play(&self) -> Result<(), PlayerError>;
    async fn pause(&self) -> Result<(), PlayerError>;
    async fn skip_to_next(&self) -> Result<(), PlayerError>;
    async fn skip_to_previous(&self) -> Result<(), PlayerError>;
    async fn seek_to(&self, position: f64) -> Result<(), PlayerError>;
    async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<(), PlayerError>;
    async fn get_track(&self, index: usize) -> Result<Option<QueuedTrack>, PlayerError>;
    async fn progress(&self) -> Result<Progress, PlayerError>;
    async fn status(&self) -> Result<PlaybackStatus, PlayerError>;
    fn subscribe(&self) -> Subscription;
}

type Listeners = RefCell<Vec<(u64, UnboundedSender<PlayerEvent>)>>;

/// Fan-out of player events to live subscriptions.
#[derive(Default)]
pub struct EventHub {
    listeners: Rc<Listeners>,
    next_id: Cell<u64>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        let (sender, receiver) = unbounded_channel();
        self.listeners.borrow_mut().push((id, sender));
        Subscription {
            id,
            receiver,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    pub fn emit(&self, event: PlayerEvent) {
        tracing::debug!(?event, "player event");
        self.listeners
            .borrow_mut()
            .retain(|(_, sender)| sender.send(event).is_ok());
    }

    #[allow(dead_code)]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Live registration on an [`EventHub`]. Unregisters on drop.
pub struct Subscription {
    id: u64,
    receiver: UnboundedReceiver<PlayerEvent>,
    listeners: Weak<Listeners>,
}

impl Subscription {
    pub async fn next(&mut self) -> Option<PlayerEvent> {
        self.receiver.recv().await
    }

    #[allow(dead_code)]
    pub fn try_next(&mut self) -> Option<PlayerEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut listeners) = listeners.try_borrow_mut() {
                listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_reach_every_live_subscription() {
        let hub = EventHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        hub.emit(PlayerEvent::TrackChanged { index: Some(2) });
        assert_eq!(first.try_next(), Some(PlayerEvent::TrackChanged { index: Some(2) }));
        assert_eq!(second.try_next(), Some(PlayerEvent::TrackChanged { index: Some(2) }));
        assert_eq!(first.try_next(), None);
    }

    #[test]
    fn dropping_a_subscription_unregisters_it() {
        let hub = EventHub::new();
        let kept = hub.subscribe();
        let dropped = hub.subscribe();
        assert_eq!(hub.listener_count(), 2);
        drop(dropped);
        assert_eq!(hub.listener_count(), 1);
        hub.emit(PlayerEvent::TrackChanged { index: None });
        drop(kept);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_hub_drops_cleanly() {
        let hub = EventHub::new();
        let mut subscription = hub.subscribe();
        drop(hub);
        assert_eq!(subscription.try_next(), None);
    }

    #[test]
    fn progress_percent_handles_unknown_duration() {
        let progress = Progress { position: 30.0, duration: 120.0 };
        assert_eq!(progress.percent(), 25.0);
        assert_eq!(Progress { position: 5.0, duration: 0.0 }.percent(), 0.0);
        assert_eq!(Progress { position: 500.0, duration: 100.0 }.percent(), 100.0);
    }
}
