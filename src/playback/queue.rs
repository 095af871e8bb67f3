use crate::api::QueuedTrack;
use crate::error::PlayerError;
use crate::playback::RepeatMode;

/// Ordered queue with a cursor and a repeat policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayQueue {
    items: Vec<QueuedTrack>,
    current: Option<usize>,
    repeat: RepeatMode,
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the queue and resets the repeat mode.
    pub fn clear(&mut self) {
        self.items.clear();
        self.current = None;
        self.repeat = RepeatMode::Off;
    }

    /// Appends tracks. The first track added to an empty queue becomes current.
    pub fn extend(&mut self, tracks: Vec<QueuedTrack>) {
        self.items.extend(tracks);
        if self.current.is_none() && !self.items.is_empty() {
            self.current = Some(0);
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueuedTrack> {
        self.items.get(index)
    }

    #[allow(dead_code)]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&QueuedTrack> {
        self.current.and_then(|index| self.items.get(index))
    }

    #[allow(dead_code)]
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    pub fn skip(&mut self, index: usize) -> Result<&QueuedTrack, PlayerError> {
        let len = self.items.len();
        if index >= len {
            return Err(PlayerError::IndexOutOfRange { index, len });
        }
        self.current = Some(index);
        Ok(&self.items[index])
    }

    /// Index that follows the current one once it finishes playing.
    pub fn next_index(&self) -> Option<usize> {
        let current = self.current?;
        let len = self.items.len();
        match self.repeat {
            RepeatMode::Track => Some(current),
            RepeatMode::Queue => Some((current + 1) % len),
            RepeatMode::Off => (current + 1 < len).then_some(current + 1),
        }
    }

    /// Index for a user-requested step forward. Track-repeat still advances.
    pub fn step_forward_index(&self) -> Option<usize> {
        let current = self.current?;
        let len = self.items.len();
        if current + 1 < len {
            Some(current + 1)
        } else if self.repeat == RepeatMode::Queue {
            Some(0)
        } else {
            None
        }
    }

    pub fn step_back_index(&self) -> Option<usize> {
        let current = self.current?;
        if current > 0 {
            Some(current - 1)
        } else if self.repeat == RepeatMode::Queue {
            Some(self.items.len() - 1)
        } else {
            None
        }
    }
}
