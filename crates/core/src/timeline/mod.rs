use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Stage, LAST_STAGE_INDEX};

/// Period of the auto-advance timer unless configured otherwise.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(2);

/// Source of repeating timers. Dropping the returned handle must cancel the
/// timer; the controller relies on that to release it.
pub trait TimerSource {
    type Handle;

    /// Starts a timer that fires every `period`, tagging each tick with
    /// `generation` so late ticks from a cancelled timer can be told apart.
    fn start(&mut self, period: Duration, generation: u64) -> Self::Handle;
}

/// One of the user-facing controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transport {
    JumpToStart,
    StepBack,
    TogglePlay,
    StepForward,
    JumpToEnd,
    /// Slider position, snapped to the nearest stage.
    Scrub(f32),
}

/// Result of feeding a timer tick to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick came from a timer that is no longer running.
    Ignored,
    Advanced(Stage),
    /// The final stage was already showing; playback stopped.
    Finished,
}

/// Snapshot of the mutable domain state read by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub stage: Stage,
    pub is_playing: bool,
}

struct ActiveTimer<H> {
    generation: u64,
    _handle: H,
}

/// Owns the current stage and the auto-advance timer.
///
/// `timer` is `Some` exactly while playing, and starting a timer always drops
/// the previous handle first.
pub struct PlaybackController<T: TimerSource> {
    state: PlaybackState,
    period: Duration,
    timers: T,
    timer: Option<ActiveTimer<T::Handle>>,
    generation: u64,
}

impl<T: TimerSource> PlaybackController<T> {
    pub fn new(timers: T) -> Self {
        Self::with_period(timers, DEFAULT_TICK_INTERVAL)
    }

    pub fn with_period(timers: T, period: Duration) -> Self {
        Self {
            state: PlaybackState::default(),
            period,
            timers,
            timer: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn has_active_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn advance(&mut self) {
        if let Some(next) = self.state.stage.next() {
            self.set_stage(next);
        }
    }

    pub fn retreat(&mut self) {
        if let Some(previous) = self.state.stage.previous() {
            self.set_stage(previous);
        }
    }

    pub fn jump_to_start(&mut self) {
        self.stop();
        self.set_stage(Stage::FIRST);
    }

    pub fn jump_to_end(&mut self) {
        self.set_stage(Stage::LAST);
    }

    pub fn toggle_play_pause(&mut self) {
        if self.state.is_playing {
            self.stop();
            return;
        }

        if self.state.stage == Stage::LAST {
            self.set_stage(Stage::FIRST);
        }
        self.start();
    }

    /// Direct set from the slider, clamped to the last stage.
    pub fn set_stage_index(&mut self, index: usize) {
        self.set_stage(Stage::from_index(index.min(LAST_STAGE_INDEX)));
    }

    /// Slider drag: snaps `value` to the nearest stage. NaN maps to the first.
    pub fn scrub(&mut self, value: f32) {
        let snapped = value.round().clamp(0.0, LAST_STAGE_INDEX as f32);
        self.set_stage_index(snapped as usize);
    }

    pub fn apply(&mut self, action: Transport) {
        match action {
            Transport::JumpToStart => self.jump_to_start(),
            Transport::StepBack => self.retreat(),
            Transport::TogglePlay => self.toggle_play_pause(),
            Transport::StepForward => self.advance(),
            Transport::JumpToEnd => self.jump_to_end(),
            Transport::Scrub(value) => self.scrub(value),
        }
    }

    /// Handles a tick posted by the timer started with `generation`.
    ///
    /// A tick either advances by one stage or, when the final stage is already
    /// showing, stops playback. Never both.
    pub fn on_tick(&mut self, generation: u64) -> TickOutcome {
        match &self.timer {
            Some(active) if active.generation == generation => {}
            _ => {
                tracing::trace!(generation, "ignoring stale tick");
                return TickOutcome::Ignored;
            }
        }

        if self.state.stage == Stage::LAST {
            self.stop();
            tracing::info!("auto-play reached the final stage");
            TickOutcome::Finished
        } else {
            self.advance();
            TickOutcome::Advanced(self.state.stage)
        }
    }

    /// Stops playback and releases the timer. Safe to call when idle.
    pub fn stop(&mut self) {
        if let Some(active) = self.timer.take() {
            tracing::debug!(generation = active.generation, "stopping auto-advance timer");
        }
        self.state.is_playing = false;
    }

    fn start(&mut self) {
        // Release any previous timer before the new one exists.
        self.timer = None;
        self.generation += 1;
        let handle = self.timers.start(self.period, self.generation);
        tracing::debug!(generation = self.generation, period = ?self.period, "starting auto-advance timer");
        self.timer = Some(ActiveTimer {
            generation: self.generation,
            _handle: handle,
        });
        self.state.is_playing = true;
    }

    fn set_stage(&mut self, stage: Stage) {
        if stage != self.state.stage {
            tracing::debug!(from = self.state.stage.index(), to = stage.index(), "stage changed");
            self.state.stage = stage;
        }
    }
}

impl<T: TimerSource> std::fmt::Debug for PlaybackController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("period", &self.period)
            .field("timer", &self.timer.as_ref().map(|active| active.generation))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::STAGE_COUNT;

    #[derive(Debug, Default)]
    struct Ledger {
        started: Vec<(Duration, u64)>,
        live: usize,
        peak: usize,
    }

    /// Test timer source that records starts and tracks live handles.
    #[derive(Clone, Default)]
    struct ManualTimers(Rc<RefCell<Ledger>>);

    struct ManualHandle(Rc<RefCell<Ledger>>);

    impl Drop for ManualHandle {
        fn drop(&mut self) {
            self.0.borrow_mut().live -= 1;
        }
    }

    impl TimerSource for ManualTimers {
        type Handle = ManualHandle;

        fn start(&mut self, period: Duration, generation: u64) -> ManualHandle {
            let mut ledger = self.0.borrow_mut();
            ledger.started.push((period, generation));
            ledger.live += 1;
            ledger.peak = ledger.peak.max(ledger.live);
            ManualHandle(self.0.clone())
        }
    }

    impl ManualTimers {
        fn live(&self) -> usize {
            self.0.borrow().live
        }

        fn peak(&self) -> usize {
            self.0.borrow().peak
        }

        fn last_generation(&self) -> u64 {
            self.0.borrow().started.last().map(|(_, g)| *g).unwrap()
        }
    }

    fn controller() -> (PlaybackController<ManualTimers>, ManualTimers) {
        let timers = ManualTimers::default();
        (PlaybackController::new(timers.clone()), timers)
    }

    #[test]
    fn starts_idle_at_first_stage() {
        let (playback, timers) = controller();
        assert_eq!(playback.state(), PlaybackState::default());
        assert_eq!(playback.stage(), Stage::FIRST);
        assert!(!playback.is_playing());
        assert_eq!(timers.live(), 0);
    }

    #[test]
    fn stepping_is_clamped_at_both_ends() {
        for index in 0..STAGE_COUNT {
            let (mut playback, _) = controller();
            playback.set_stage_index(index);
            playback.advance();
            assert_eq!(playback.stage().index(), (index + 1).min(8));

            playback.set_stage_index(index);
            playback.retreat();
            assert_eq!(playback.stage().index(), index.saturating_sub(1));
        }
    }

    #[test]
    fn advancing_past_the_end_is_a_no_op() {
        let (mut playback, _) = controller();
        for _ in 0..20 {
            playback.advance();
        }
        assert_eq!(playback.stage(), Stage::LAST);
    }

    #[test]
    fn jumps_to_either_end() {
        let (mut playback, timers) = controller();
        playback.set_stage_index(4);
        playback.toggle_play_pause();
        assert!(playback.is_playing());

        playback.jump_to_end();
        assert_eq!(playback.stage(), Stage::LAST);
        assert!(playback.is_playing());

        playback.jump_to_start();
        assert_eq!(playback.stage(), Stage::FIRST);
        assert!(!playback.is_playing());
        assert!(!playback.has_active_timer());
        assert_eq!(timers.live(), 0);
    }

    #[test]
    fn slider_input_is_snapped_and_clamped() {
        let (mut playback, _) = controller();
        playback.scrub(2.6);
        assert_eq!(playback.stage().index(), 3);
        playback.scrub(-4.0);
        assert_eq!(playback.stage().index(), 0);
        playback.scrub(42.0);
        assert_eq!(playback.stage().index(), 8);
        playback.scrub(f32::NAN);
        assert_eq!(playback.stage().index(), 0);
        playback.set_stage_index(100);
        assert_eq!(playback.stage().index(), 8);
    }

    #[test]
    fn slider_matches_repeated_advance() {
        let (mut scrubbed, _) = controller();
        scrubbed.set_stage_index(3);

        let (mut stepped, _) = controller();
        for _ in 0..3 {
            stepped.advance();
        }

        assert_eq!(scrubbed.state(), stepped.state());
        assert_eq!(
            scrubbed.stage().title(),
            "Stage 4: Inside-Out Layering (Layer VI)"
        );
    }

    #[test]
    fn timer_exists_only_while_playing() {
        let (mut playback, timers) = controller();
        playback.toggle_play_pause();
        assert!(playback.is_playing());
        assert!(playback.has_active_timer());
        assert_eq!(timers.live(), 1);

        playback.toggle_play_pause();
        assert!(!playback.is_playing());
        assert!(!playback.has_active_timer());
        assert_eq!(timers.live(), 0);
    }

    #[test]
    fn manual_stepping_keeps_playback_running() {
        let (mut playback, timers) = controller();
        playback.toggle_play_pause();
        let generation = timers.last_generation();

        playback.advance();
        playback.retreat();
        playback.scrub(5.0);

        assert_eq!(playback.stage().index(), 5);
        assert!(playback.is_playing());
        assert!(playback.has_active_timer());
        assert_eq!(timers.live(), 1);
        assert_eq!(timers.last_generation(), generation);
        assert_eq!(
            playback.on_tick(generation),
            TickOutcome::Advanced(Stage::from_index(6))
        );
    }

    #[test]
    fn playing_from_the_end_rewinds_first() {
        let (mut playback, timers) = controller();
        playback.jump_to_end();
        playback.toggle_play_pause();

        assert_eq!(playback.stage(), Stage::FIRST);
        assert!(playback.is_playing());

        let generation = timers.last_generation();
        assert_eq!(
            playback.on_tick(generation),
            TickOutcome::Advanced(Stage::PreplateFormed)
        );
    }

    #[test]
    fn autoplay_runs_to_the_end_and_releases_the_timer() {
        let (mut playback, timers) = controller();
        playback.toggle_play_pause();
        let generation = timers.last_generation();

        for expected in 1..STAGE_COUNT {
            let before = playback.stage().index();
            let outcome = playback.on_tick(generation);
            assert_eq!(outcome, TickOutcome::Advanced(Stage::from_index(expected)));
            assert_eq!(playback.stage().index(), before + 1);
            assert!(playback.is_playing());
        }

        assert_eq!(playback.on_tick(generation), TickOutcome::Finished);
        assert_eq!(playback.stage(), Stage::LAST);
        assert!(!playback.is_playing());
        assert_eq!(timers.live(), 0);

        assert_eq!(playback.on_tick(generation), TickOutcome::Ignored);
    }

    #[test]
    fn restarting_never_overlaps_timers() {
        let (mut playback, timers) = controller();
        playback.toggle_play_pause();
        let first = timers.last_generation();
        playback.toggle_play_pause();
        playback.toggle_play_pause();
        let second = timers.last_generation();

        assert_ne!(first, second);
        assert_eq!(timers.live(), 1);
        assert_eq!(timers.peak(), 1);

        assert_eq!(playback.on_tick(first), TickOutcome::Ignored);
        assert_eq!(playback.stage(), Stage::FIRST);
        assert!(matches!(playback.on_tick(second), TickOutcome::Advanced(_)));
    }

    #[test]
    fn ticks_while_paused_are_ignored() {
        let (mut playback, _) = controller();
        assert_eq!(playback.on_tick(0), TickOutcome::Ignored);
        assert_eq!(playback.on_tick(1), TickOutcome::Ignored);
        assert_eq!(playback.stage(), Stage::FIRST);
    }

    #[test]
    fn teardown_mid_playback_releases_the_timer() {
        let (mut playback, timers) = controller();
        playback.toggle_play_pause();
        playback.on_tick(timers.last_generation());
        assert_eq!(timers.live(), 1);

        drop(playback);
        assert_eq!(timers.live(), 0);
    }

    #[test]
    fn transport_actions_dispatch() {
        let (mut playback, _) = controller();
        playback.apply(Transport::JumpToEnd);
        assert_eq!(playback.stage(), Stage::LAST);
        playback.apply(Transport::StepBack);
        assert_eq!(playback.stage(), Stage::LayerIIFormation);
        playback.apply(Transport::Scrub(1.2));
        assert_eq!(playback.stage(), Stage::PreplateFormed);
        playback.apply(Transport::StepForward);
        assert_eq!(playback.stage(), Stage::PlateSplitting);
        playback.apply(Transport::TogglePlay);
        assert!(playback.is_playing());
        playback.apply(Transport::JumpToStart);
        assert_eq!(playback.state(), PlaybackState::default());
    }

    #[test]
    fn uses_configured_period() {
        let timers = ManualTimers::default();
        let mut playback =
            PlaybackController::with_period(timers.clone(), Duration::from_millis(250));
        playback.toggle_play_pause();
        assert_eq!(timers.0.borrow().started[0].0, Duration::from_millis(250));
        assert_eq!(playback.period(), Duration::from_millis(250));
    }
}
