//! Recording `Player` fake for unit tests.

use crate::api::QueuedTrack;
use crate::error::PlayerError;
use crate::playback::{
    EventHub, PlayQueue, PlaybackStatus, Player, PlayerEvent, Progress, RepeatMode,
    Subscription,
};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Setup,
    Reset,
    Add(Vec<QueuedTrack>),
    Skip(usize),
    Play,
    Pause,
    Next,
    Previous,
    Seek(f64),
    SetRepeatMode(RepeatMode),
    GetTrack(usize),
}

pub struct RecordingPlayer {
    commands: RefCell<Vec<Command>>,
    setup_result: RefCell<Result<bool, PlayerError>>,
    lookup_error: RefCell<Option<PlayerError>>,
    queue: RefCell<PlayQueue>,
    overrides: RefCell<HashMap<usize, QueuedTrack>>,
    gates: RefCell<HashMap<usize, oneshot::Receiver<()>>>,
    status: Cell<PlaybackStatus>,
    position: Cell<f64>,
    hub: EventHub,
}

impl RecordingPlayer {
    pub fn new() -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            setup_result: RefCell::new(Ok(true)),
            lookup_error: RefCell::new(None),
            queue: RefCell::new(PlayQueue::new()),
            overrides: RefCell::new(HashMap::new()),
            gates: RefCell::new(HashMap::new()),
            status: Cell::new(PlaybackStatus::Idle),
            position: Cell::new(0.0),
            hub: EventHub::new(),
        }
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    pub fn added_tracks(&self) -> Vec<QueuedTrack> {
        self.commands
            .borrow()
            .iter()
            .filter_map(|command| match command {
                Command::Add(tracks) => Some(tracks.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn set_setup_result(&self, result: Result<bool, PlayerError>) {
        *self.setup_result.borrow_mut() = result;
    }

    pub fn fail_lookups(&self, error: PlayerError) {
        *self.lookup_error.borrow_mut() = Some(error);
    }

    /// Replaces what `get_track(index)` reports.
    pub fn override_track(&self, index: usize, track: QueuedTrack) {
        self.overrides.borrow_mut().insert(index, track);
    }

    /// Makes the next `get_track(index)` wait until the returned sender fires
    /// or is dropped.
    pub fn hold_lookup(&self, index: usize) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.gates.borrow_mut().insert(index, receiver);
        sender
    }

    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }

    fn record(&self, command: Command) {
        self.commands.borrow_mut().push(command);
    }

    fn activate(&self, index: usize) -> Result<(), PlayerError> {
        self.queue.borrow_mut().skip(index)?;
        self.hub.emit(PlayerEvent::TrackChanged { index: Some(index) });
        Ok(())
    }
}

#[async_trait(?Send)]
impl Player for RecordingPlayer {
    async fn setup(&self) -> Result<bool, PlayerError> {
        self.record(Command::Setup);
        self.setup_result.borrow().clone()
    }

    async fn reset(&self) -> Result<(), PlayerError> {
        self.record(Command::Reset);
        self.queue.borrow_mut().clear();
        self.status.set(PlaybackStatus::Idle);
        Ok(())
    }

    async fn add(&self, tracks: Vec<QueuedTrack>) -> Result<(), PlayerError> {
        self.record(Command::Add(tracks.clone()));
        self.queue.borrow_mut().extend(tracks);
        Ok(())
    }

    async fn skip(&self, index: usize) -> Result<(), PlayerError> {
        self.record(Command::Skip(index));
        self.activate(index)
    }

    async fn play(&self) -> Result<(), PlayerError> {
        self.record(Command::Play);
        self.status.set(PlaybackStatus::Playing);
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.record(Command::Pause);
        self.status.set(PlaybackStatus::Paused);
        Ok(())
    }

    async fn skip_to_next(&self) -> Result<(), PlayerError> {
        self.record(Command::Next);
        let next = self.queue.borrow().step_forward_index();
        if let Some(index) = next {
            self.activate(index)?;
        }
        Ok(())
    }

    async fn skip_to_previous(&self) -> Result<(), PlayerError> {
        self.record(Command::Previous);
        let previous = self.queue.borrow().step_back_index();
        if let Some(index) = previous {
            self.activate(index)?;
        }
        Ok(())
    }

    async fn seek_to(&self, position: f64) -> Result<(), PlayerError> {
        self.record(Command::Seek(position));
        self.position.set(position);
        Ok(())
    }

    async fn set_repeat_mode(&self, mode: RepeatMode) -> Result<(), PlayerError> {
        self.record(Command::SetRepeatMode(mode));
        self.queue.borrow_mut().set_repeat(mode);
        Ok(())
    }

    async fn get_track(&self, index: usize) -> Result<Option<QueuedTrack>, PlayerError> {
        self.record(Command::GetTrack(index));
        let gate = self.gates.borrow_mut().remove(&index);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(error) = self.lookup_error.borrow().clone() {
            return Err(error);
        }
        if let Some(track) = self.overrides.borrow().get(&index) {
            return Ok(Some(track.clone()));
        }
        Ok(self.queue.borrow().get(index).cloned())
    }

    async fn progress(&self) -> Result<Progress, PlayerError> {
        Ok(Progress {
            position: self.position.get(),
            duration: 180.0,
        })
    }

    async fn status(&self) -> Result<PlaybackStatus, PlayerError> {
        Ok(self.status.get())
    }

    fn subscribe(&self) -> Subscription {
        self.hub.subscribe()
    }
}
