//! Playback core: the player capability surface, queue policy, navigation
//! params and the screen's setup/sync logic. Nothing here renders.

mod bridge;
mod layout;
mod params;
mod player;
mod queue;
mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use bridge::{delay_ms, BridgePlayer};
pub use layout::{screen_sections, Section};
pub use params::PlaybackParams;
pub use player::{
    EventHub, PlaybackStatus, Player, PlayerEvent, Progress, RepeatMode, Subscription,
};
pub use queue::PlayQueue;
pub use session::{run_session, Readiness};
