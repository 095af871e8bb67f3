//! Mount-time player setup and track-change synchronization for the playback
//! screen.

use crate::api::{to_queue, Track};
use crate::error::PlayerError;
use crate::playback::{PlaybackParams, Player, PlayerEvent, RepeatMode, Subscription};
use futures_util::future::{select, Either, FutureExt, LocalBoxFuture};
use std::cell::Cell;

/// Screen gate. `Ready` is terminal for the lifetime of a mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Readiness {
    #[default]
    NotReady,
    Ready,
}

/// Loads the queue into the player and starts playback at the initial track.
pub async fn initialize<P: Player + ?Sized>(
    player: &P,
    params: &PlaybackParams,
) -> Result<(), PlayerError> {
    if !player.setup().await? {
        return Err(PlayerError::SetupRejected);
    }

    player.reset().await?;
    player.add(to_queue(params.tracks())).await?;
    player.skip(params.initial_index()).await?;
    player.play().await?;
    player.set_repeat_mode(RepeatMode::Queue).await?;
    Ok(())
}

/// Runs [`initialize`] and reports the resulting readiness. Failures are
/// logged and leave the screen `NotReady`.
pub async fn prepare<P: Player + ?Sized>(player: &P, params: &PlaybackParams) -> Readiness {
    match initialize(player, params).await {
        Ok(()) => {
            tracing::debug!(
                tracks = params.tracks().len(),
                start = params.initial_index(),
                "player ready"
            );
            Readiness::Ready
        }
        Err(error) => {
            tracing::warn!(%error, "player setup failed, screen stays in loading state");
            Readiness::NotReady
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Orders track-change resolutions so only the most recent event may apply.
#[derive(Debug, Default)]
pub struct TrackSync {
    latest: Cell<u64>,
}

impl TrackSync {
    pub fn issue(&self) -> Ticket {
        let next = self.latest.get().wrapping_add(1);
        self.latest.set(next);
        Ticket(next)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.get() == ticket.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Replace the current track with this one.
    Resolved(Track),
    /// A newer event arrived while this one was in flight.
    Superseded,
    /// Nothing to apply.
    Ignored,
}

/// Looks up the track the player now reports as active.
pub async fn resolve_track_change<P: Player + ?Sized>(
    player: &P,
    params: &PlaybackParams,
    sync: &TrackSync,
    ticket: Ticket,
    event: PlayerEvent,
) -> Result<Resolution, PlayerError> {
    let PlayerEvent::TrackChanged { index: Some(index) } = event else {
        return Ok(Resolution::Ignored);
    };

    let reported = player.get_track(index).await?;
    if !sync.is_latest(ticket) {
        tracing::debug!(index, "track lookup superseded by a newer event");
        return Ok(Resolution::Superseded);
    }

    let Some(queued) = reported else {
        tracing::warn!(index, "player has no track at reported index");
        return Ok(Resolution::Ignored);
    };

    let position = queued.position().unwrap_or(index);
    let Some(library_track) = params.track_at(position) else {
        tracing::warn!(index, position, "reported track is not part of the track list");
        return Ok(Resolution::Ignored);
    };

    Ok(Resolution::Resolved(Track::from_queued(
        library_track.id.clone(),
        queued,
    )))
}

/// Drives one mount of the playback screen: subscribes, runs setup, reports
/// readiness, then follows track changes until the player stops emitting.
///
/// Subscribing happens before setup so the `skip` to the initial track is
/// observed. Dropping the returned future unregisters the subscription and
/// cancels any lookup still in flight.
pub async fn run_session<P, R, T>(player: &P, params: &PlaybackParams, on_ready: R, on_track: T)
where
    P: Player + ?Sized,
    R: FnOnce(Readiness),
    T: FnMut(Track),
{
    let mut subscription = player.subscribe();
    let state = prepare(player, params).await;
    on_ready(state);
    if state != Readiness::Ready {
        return;
    }
    follow_track_changes(player, params, &mut subscription, on_track).await;
}

/// Resolves each track-changed event. A new event drops the lookup still
/// running for the previous one, so only the latest event reaches `on_track`.
pub async fn follow_track_changes<P, T>(
    player: &P,
    params: &PlaybackParams,
    subscription: &mut Subscription,
    mut on_track: T,
) where
    P: Player + ?Sized,
    T: FnMut(Track),
{
    let sync = TrackSync::default();
    let mut pending: Option<LocalBoxFuture<'_, Result<Resolution, PlayerError>>> = None;

    loop {
        let next = match pending.take() {
            None => subscription.next().await,
            Some(lookup) => match select(lookup, Box::pin(subscription.next())).await {
                Either::Left((result, _)) => {
                    apply_resolution(result, &mut on_track);
                    continue;
                }
                Either::Right((event, _superseded)) => event,
            },
        };

        let Some(event) = next else {
            tracing::debug!("player event stream closed");
            return;
        };
        let ticket = sync.issue();
        pending = Some(resolve_track_change(player, params, &sync, ticket, event).boxed_local());
    }
}

fn apply_resolution(result: Result<Resolution, PlayerError>, on_track: &mut impl FnMut(Track)) {
    match result {
        Ok(Resolution::Resolved(track)) => on_track(track),
        Ok(Resolution::Superseded | Resolution::Ignored) => {}
        Err(error) => tracing::warn!(%error, "could not resolve active track"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::QueuedTrack;
    use crate::playback::testing::{Command, RecordingPlayer};
    use futures_util::future::join;
    use std::cell::RefCell;

    /// Lets the session future run until it is parked on the event stream.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn ids(seen: &RefCell<Vec<Track>>) -> Vec<String> {
        seen.borrow().iter().map(|track| track.id.clone()).collect()
    }

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                id: format!("song-{i}"),
                title: format!("Song {i}"),
                artist: format!("Artist {i}"),
                artwork: (i % 2 == 0).then(|| format!("https://art/{i}.jpg")),
                url: format!("https://audio/{i}.mp3"),
            })
            .collect()
    }

    fn params(n: usize, start: usize) -> PlaybackParams {
        let list = tracks(n);
        let initial = list[start].clone();
        PlaybackParams::new(list, &initial).unwrap()
    }

    #[tokio::test]
    async fn setup_enqueues_all_tracks_in_order_and_skips_to_start() {
        let player = RecordingPlayer::new();
        let params = params(4, 2);

        assert_eq!(prepare(&player, &params).await, Readiness::Ready);

        assert_eq!(
            player.commands(),
            vec![
                Command::Setup,
                Command::Reset,
                Command::Add(to_queue(params.tracks())),
                Command::Skip(2),
                Command::Play,
                Command::SetRepeatMode(RepeatMode::Queue),
            ]
        );
        let added = player.added_tracks();
        assert_eq!(added.len(), 4);
        assert_eq!(added[3].url, "https://audio/3.mp3");
    }

    #[tokio::test]
    async fn rejected_setup_stays_not_ready_without_queue_commands() {
        let player = RecordingPlayer::new();
        player.set_setup_result(Ok(false));

        assert_eq!(prepare(&player, &params(3, 0)).await, Readiness::NotReady);
        assert_eq!(player.commands(), vec![Command::Setup]);
    }

    #[tokio::test]
    async fn failing_setup_reports_the_error() {
        let player = RecordingPlayer::new();
        player.set_setup_result(Err(PlayerError::Bridge("no audio".to_string())));

        let result = initialize(&player, &params(2, 1)).await;
        assert_eq!(result, Err(PlayerError::Bridge("no audio".to_string())));
    }

    #[tokio::test]
    async fn track_change_resolves_player_metadata() {
        let player = RecordingPlayer::new();
        let params = params(3, 0);
        initialize(&player, &params).await.unwrap();
        player.override_track(
            1,
            QueuedTrack {
                id: "1".to_string(),
                url: "https://audio/1.mp3".to_string(),
                title: "Song 1 (Live)".to_string(),
                artist: "Artist 1".to_string(),
                artwork: None,
            },
        );

        let sync = TrackSync::default();
        let ticket = sync.issue();
        let resolution = resolve_track_change(
            &player,
            &params,
            &sync,
            ticket,
            PlayerEvent::TrackChanged { index: Some(1) },
        )
        .await
        .unwrap();

        let Resolution::Resolved(track) = resolution else {
            panic!("expected resolved track, got {resolution:?}");
        };
        assert_eq!(track.id, "song-1");
        assert_eq!(track.title, "Song 1 (Live)");
    }

    #[tokio::test]
    async fn newer_event_supersedes_slow_lookup() {
        let player = RecordingPlayer::new();
        let params = params(3, 0);
        initialize(&player, &params).await.unwrap();
        let release_first = player.hold_lookup(0);

        let sync = TrackSync::default();
        let first_ticket = sync.issue();
        let first = resolve_track_change(
            &player,
            &params,
            &sync,
            first_ticket,
            PlayerEvent::TrackChanged { index: Some(0) },
        );
        let second_ticket = sync.issue();
        let second = async {
            let resolution = resolve_track_change(
                &player,
                &params,
                &sync,
                second_ticket,
                PlayerEvent::TrackChanged { index: Some(2) },
            )
            .await;
            let _ = release_first.send(());
            resolution
        };

        let (first, second) = join(first, second).await;
        assert_eq!(first.unwrap(), Resolution::Superseded);
        let Ok(Resolution::Resolved(track)) = second else {
            panic!("latest event should resolve");
        };
        assert_eq!(track.id, "song-2");
    }

    #[tokio::test]
    async fn end_of_queue_and_missing_tracks_are_ignored() {
        let player = RecordingPlayer::new();
        let params = params(2, 0);
        initialize(&player, &params).await.unwrap();
        let sync = TrackSync::default();

        let none = resolve_track_change(
            &player,
            &params,
            &sync,
            sync.issue(),
            PlayerEvent::TrackChanged { index: None },
        )
        .await;
        assert_eq!(none, Ok(Resolution::Ignored));

        let missing = resolve_track_change(
            &player,
            &params,
            &sync,
            sync.issue(),
            PlayerEvent::TrackChanged { index: Some(9) },
        )
        .await;
        assert_eq!(missing, Ok(Resolution::Ignored));
    }

    #[tokio::test]
    async fn lookup_failure_propagates() {
        let player = RecordingPlayer::new();
        let params = params(2, 0);
        initialize(&player, &params).await.unwrap();
        player.fail_lookups(PlayerError::Bridge("gone".to_string()));
        let sync = TrackSync::default();

        let result = resolve_track_change(
            &player,
            &params,
            &sync,
            sync.issue(),
            PlayerEvent::TrackChanged { index: Some(1) },
        )
        .await;
        assert_eq!(result, Err(PlayerError::Bridge("gone".to_string())));
    }

    #[tokio::test]
    async fn session_follows_player_events_after_setup() {
        let player = RecordingPlayer::new();
        let params = params(4, 1);
        let readiness = Cell::new(None);
        let seen = RefCell::new(Vec::new());

        let session = run_session(
            &player,
            &params,
            |state| readiness.set(Some(state)),
            |track| seen.borrow_mut().push(track),
        );
        let driver = async {
            settle().await;
            assert_eq!(readiness.get(), Some(Readiness::Ready));
            assert_eq!(player.listener_count(), 1);
            // The skip issued during setup is observed.
            assert_eq!(ids(&seen), ["song-1"]);

            player.skip_to_next().await.unwrap();
            settle().await;
            player.skip(0).await.unwrap();
            settle().await;
        };

        let Either::Right(((), session)) = select(Box::pin(session), Box::pin(driver)).await
        else {
            panic!("session ended while the player was still alive");
        };
        assert_eq!(ids(&seen), ["song-1", "song-2", "song-0"]);

        drop(session);
        assert_eq!(player.listener_count(), 0);
    }

    #[tokio::test]
    async fn latest_event_wins_when_lookups_overlap() {
        let player = RecordingPlayer::new();
        let params = params(3, 0);
        let seen = RefCell::new(Vec::new());

        let session = run_session(&player, &params, |_| {}, |track| seen.borrow_mut().push(track));
        let driver = async {
            settle().await;
            let release_slow = player.hold_lookup(1);
            player.skip(1).await.unwrap();
            settle().await;
            player.skip(2).await.unwrap();
            settle().await;
            let _ = release_slow.send(());
            settle().await;
        };

        let _ = select(Box::pin(session), Box::pin(driver)).await;
        assert_eq!(ids(&seen), ["song-0", "song-2"]);
    }

    #[tokio::test]
    async fn rejected_setup_ends_the_session_and_releases_the_listener() {
        let player = RecordingPlayer::new();
        player.set_setup_result(Ok(false));
        let readiness = Cell::new(None);

        run_session(
            &player,
            &params(2, 0),
            |state| readiness.set(Some(state)),
            |_| panic!("no track change expected"),
        )
        .await;

        assert_eq!(readiness.get(), Some(Readiness::NotReady));
        assert_eq!(player.listener_count(), 0);
    }

    #[tokio::test]
    async fn dropping_the_session_unregisters_the_listener() {
        let player = RecordingPlayer::new();
        let params = params(2, 0);
        {
            let session = run_session(&player, &params, |_| {}, |_| {});
            let _ = select(Box::pin(session), Box::pin(settle())).await;
        }
        assert_eq!(player.listener_count(), 0);

        // Later events have nowhere to go and do not fail the player.
        player.skip(1).await.unwrap();
        assert_eq!(player.listener_count(), 0);
    }
}
