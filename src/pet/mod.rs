pub mod catalog;
pub mod reaction;
pub mod state;
pub mod walk;

use std::ops::Range;
use std::time::Duration;

use instant::Instant;

use crate::config::PetConfig;
use crate::daynight::DayNightState;
use crate::host::HostBridge;
use crate::sprite::{Sprite, SpriteFrame};
use crate::timer::TimerQueue;

use self::reaction::ReactionCycle;
use self::state::{EngineState, PetState, Reaction};
use self::walk::WalkState;

/// Gap between autonomous behavior picks.
const BEHAVIOR_DELAY_MS: Range<u64> = 8_000..23_000;
/// Gap between blink attempts.
const BLINK_DELAY_MS: Range<u64> = 2_000..7_000;
/// How long the eyes stay shut.
const BLINK_LENGTH_MS: Range<u64> = 150..250;
/// How long a reaction sprite stays up.
const REACTION_MS: u64 = 2_000;
/// Nap length after dozing off from boredom.
const WAKE_DELAY_MS: Range<u64> = 30_000..60_000;
/// Continuous idling before the pet dozes off.
const IDLE_SLEEP_AFTER: Duration = Duration::from_secs(5 * 60);

/// Inbound signals from the host window and the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetEvent {
    /// Primary button pressed over the sprite.
    PointerPressed,
    PointerEntered,
    PointerLeft,
    ToggleSleep,
    AboutAcknowledged,
}

/// Delayed callbacks. Each carries the token its handler re-checks before acting.
#[derive(Debug, Clone, Copy)]
enum PetTimer {
    Behavior { loop_token: u64 },
    EpisodeEnd { state: PetState, epoch: u64, loop_token: u64 },
    Wake { epoch: u64 },
    Blink,
    BlinkEnd,
    ReactionEnd { token: u64 },
    WalkTick,
}

/// The pet's behavior engine. Owns all mutable state; driven by
/// `advance_to` (timers) and `handle` (inbound events) from one thread.
pub struct PetEngine<H: HostBridge> {
    host: H,
    config: PetConfig,
    rng: fastrand::Rng,
    day_night: DayNightState,
    timers: TimerQueue<PetTimer>,
    state: EngineState,
    walk: WalkState,
    reactions: ReactionCycle,
    displayed: Option<SpriteFrame>,
    /// Time of the handler currently running.
    now: Instant,
    /// Bumped on every transition, reactions included.
    epoch: u64,
    /// Only the newest reaction may revert to Idle.
    reaction_token: u64,
    /// Only the newest armed scheduler firing may act.
    loop_token: u64,
}

impl<H: HostBridge> PetEngine<H> {
    pub fn new(config: PetConfig, host: H, now: Instant) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let day_night = match config.pinned_hour {
            Some(hour) => DayNightState::pinned(hour),
            None => DayNightState::new(),
        };
        let (screen_w, screen_h) = config.fallback_screen;
        let walk = WalkState::new(screen_w, screen_h, config.window_size);

        Self {
            host,
            config,
            rng,
            day_night,
            timers: TimerQueue::new(),
            state: EngineState::new(now),
            walk,
            reactions: ReactionCycle::default(),
            displayed: None,
            now,
            epoch: 0,
            reaction_token: 0,
            loop_token: 0,
        }
    }

    /// Query geometry, place the window, and start every recurring cycle.
    pub fn start(&mut self) {
        match self.host.screen_size() {
            Ok((w, h)) => {
                log::info!("Screen size: {w}x{h}");
                self.walk.set_screen(w, h);
            }
            Err(e) => log::warn!(
                "Screen size query failed, keeping {}x{}: {e}",
                self.walk.screen_w,
                self.walk.screen_h
            ),
        }
        self.walk.center();
        self.report_position();
        self.set_click_through(true);
        self.refresh_sprite();
        self.host.set_sleep_indicator(self.state.sleep_indicator_visible());

        self.schedule_blink();
        self.schedule_in(self.config.walk_tick, PetTimer::WalkTick);
        self.arm_scheduler();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Run every timer due at or before `now`, each at its own deadline.
    pub fn advance_to(&mut self, now: Instant) {
        while let Some((at, timer)) = self.timers.pop_due(now) {
            self.now = self.now.max(at);
            self.fire(timer);
        }
        self.now = self.now.max(now);
    }

    pub fn handle(&mut self, event: PetEvent, now: Instant) {
        self.advance_to(now);
        match event {
            PetEvent::PointerPressed => self.on_click(),
            PetEvent::PointerEntered => self.set_click_through(false),
            PetEvent::PointerLeft => self.set_click_through(true),
            PetEvent::ToggleSleep => self.toggle_sleep(),
            PetEvent::AboutAcknowledged => {
                if !self.state.force_sleep {
                    self.trigger_reaction(Reaction::Happy);
                }
            }
        }
    }

    fn fire(&mut self, timer: PetTimer) {
        match timer {
            PetTimer::Behavior { loop_token } => self.on_behavior_timer(loop_token),
            PetTimer::EpisodeEnd {
                state,
                epoch,
                loop_token,
            } => self.on_episode_end(state, epoch, loop_token),
            PetTimer::Wake { epoch } => self.on_wake(epoch),
            PetTimer::Blink => self.on_blink(),
            PetTimer::BlinkEnd => self.on_blink_end(),
            PetTimer::ReactionEnd { token } => self.on_reaction_end(token),
            PetTimer::WalkTick => self.on_walk_tick(),
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn change_state(&mut self, next: PetState) {
        let from = self.state.current;
        if next == from {
            return;
        }
        if !from.is_reacting() {
            self.state.previous = from;
        }
        self.state.current = next;
        self.state.state_start = self.now;
        self.epoch += 1;
        log::debug!("State {from:?} -> {next:?}");

        match next {
            PetState::Idle => self.state.idle_since = self.now,
            PetState::Walking => self.walk.randomize_direction(&mut self.rng),
            _ => {}
        }

        self.host.set_sleep_indicator(self.state.sleep_indicator_visible());
        self.refresh_sprite();
    }

    /// Interrupt whatever is running. The interrupted behavior is abandoned.
    fn trigger_reaction(&mut self, reaction: Reaction) {
        let was_sleeping = self.state.sleep_indicator_visible();
        self.state.current = PetState::Reacting(reaction);
        self.state.state_start = self.now;
        self.epoch += 1;
        self.reaction_token += 1;
        log::debug!("Reaction {reaction:?} (token {})", self.reaction_token);

        if was_sleeping {
            self.host.set_sleep_indicator(false);
        }
        self.refresh_sprite();
        self.schedule_in(
            Duration::from_millis(REACTION_MS),
            PetTimer::ReactionEnd {
                token: self.reaction_token,
            },
        );
    }

    fn on_reaction_end(&mut self, token: u64) {
        if token != self.reaction_token || !self.state.current.is_reacting() {
            return;
        }
        self.change_state(PetState::Idle);
        self.arm_scheduler();
    }

    fn on_click(&mut self) {
        if self.state.force_sleep {
            return;
        }
        let reaction = self.reactions.next();
        self.trigger_reaction(reaction);
    }

    fn toggle_sleep(&mut self) {
        self.state.force_sleep = !self.state.force_sleep;
        if self.state.force_sleep {
            log::info!("Forced sleep on");
            self.change_state(PetState::Sleeping);
        } else {
            log::info!("Forced sleep off");
            self.change_state(PetState::Idle);
            self.arm_scheduler();
        }
    }

    // -----------------------------------------------------------------------
    // Autonomous behavior loop
    // -----------------------------------------------------------------------

    /// Start a fresh scheduler wait, superseding any pending one.
    fn arm_scheduler(&mut self) {
        self.loop_token += 1;
        let delay = catalog::draw_ms(&mut self.rng, BEHAVIOR_DELAY_MS);
        self.schedule_in(
            Duration::from_millis(delay),
            PetTimer::Behavior {
                loop_token: self.loop_token,
            },
        );
    }

    fn on_behavior_timer(&mut self, loop_token: u64) {
        if loop_token != self.loop_token {
            return;
        }
        if self.state.current.is_reacting() || self.state.force_sleep {
            self.arm_scheduler();
            return;
        }
        self.pick_behavior();
    }

    fn pick_behavior(&mut self) {
        let idle_for = self.now.saturating_duration_since(self.state.idle_since);
        if self.state.current == PetState::Idle && idle_for >= IDLE_SLEEP_AFTER {
            log::debug!("Idle for {}s, dozing off", idle_for.as_secs());
            self.change_state(PetState::Sleeping);
            let nap = catalog::draw_ms(&mut self.rng, WAKE_DELAY_MS);
            self.schedule_in(
                Duration::from_millis(nap),
                PetTimer::Wake { epoch: self.epoch },
            );
            return;
        }

        self.day_night.update();
        log::trace!(
            "Picking behavior at hour {} (night: {})",
            self.day_night.hour,
            self.day_night.is_night()
        );
        let candidates = catalog::candidates(self.day_night.hour);
        let (next, duration_ms) = catalog::pick(&candidates, &mut self.rng);
        self.begin_episode(next, duration_ms);
    }

    fn begin_episode(&mut self, next: PetState, duration_ms: u64) {
        log::debug!("Episode {next:?} for {duration_ms}ms");
        self.change_state(next);
        self.schedule_in(
            Duration::from_millis(duration_ms),
            PetTimer::EpisodeEnd {
                state: next,
                epoch: self.epoch,
                loop_token: self.loop_token,
            },
        );
    }

    fn on_episode_end(&mut self, state: PetState, epoch: u64, loop_token: u64) {
        if self.state.current == state && self.epoch == epoch {
            self.change_state(PetState::Idle);
        }
        // A reaction or sleep toggle may already have restarted the loop.
        if loop_token == self.loop_token {
            self.arm_scheduler();
        }
    }

    fn on_wake(&mut self, epoch: u64) {
        if self.state.current != PetState::Sleeping || self.state.force_sleep || self.epoch != epoch
        {
            return;
        }
        log::debug!("Waking up");
        self.change_state(PetState::Idle);
        self.arm_scheduler();
    }

    // -----------------------------------------------------------------------
    // Blink overlay
    // -----------------------------------------------------------------------

    fn schedule_blink(&mut self) {
        let delay = catalog::draw_ms(&mut self.rng, BLINK_DELAY_MS);
        self.schedule_in(Duration::from_millis(delay), PetTimer::Blink);
    }

    fn on_blink(&mut self) {
        if self.state.current == PetState::Idle && !self.state.blinking {
            log::trace!("Blink");
            self.state.blinking = true;
            self.show(SpriteFrame::new(Sprite::IdleBlink));
            let length = catalog::draw_ms(&mut self.rng, BLINK_LENGTH_MS);
            self.schedule_in(Duration::from_millis(length), PetTimer::BlinkEnd);
        }
        self.schedule_blink();
    }

    fn on_blink_end(&mut self) {
        if self.state.current == PetState::Idle {
            self.show(SpriteFrame::new(Sprite::Idle));
        }
        self.state.blinking = false;
    }

    // -----------------------------------------------------------------------
    // Walking
    // -----------------------------------------------------------------------

    fn on_walk_tick(&mut self) {
        if self.state.current == PetState::Walking {
            let heading = self.walk.direction;
            self.walk.step(self.config.walk_speed);
            log::trace!("Walk x={:.1} dir={}", self.walk.pos_x, self.walk.direction);
            if self.walk.direction != heading {
                self.refresh_sprite();
            }
            self.report_position();
        }
        self.schedule_in(self.config.walk_tick, PetTimer::WalkTick);
    }

    // -----------------------------------------------------------------------
    // Host plumbing
    // -----------------------------------------------------------------------

    fn schedule_in(&mut self, delay: Duration, timer: PetTimer) {
        self.timers.schedule(self.now + delay, timer);
    }

    fn refresh_sprite(&mut self) {
        let frame = match self.state.current {
            PetState::Walking => SpriteFrame::walking(self.walk.direction),
            state => SpriteFrame::new(state.sprite()),
        };
        self.show(frame);
    }

    fn show(&mut self, frame: SpriteFrame) {
        if self.displayed != Some(frame) {
            self.displayed = Some(frame);
            self.host.show_sprite(frame);
        }
    }

    fn report_position(&mut self) {
        let origin = self.walk.window_origin();
        if let Err(e) = self.host.set_position(origin) {
            log::warn!("Failed to move window to {origin}: {e}");
        }
    }

    fn set_click_through(&mut self, ignore: bool) {
        if let Err(e) = self.host.set_ignore_cursor_events(ignore) {
            log::warn!("Failed to set click-through={ignore}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};
    use glam::Vec2;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn engine(t0: Instant, screen: Option<(u32, u32)>) -> PetEngine<RecordingHost> {
        let config = PetConfig {
            seed: Some(42),
            pinned_hour: Some(12),
            ..PetConfig::default()
        };
        PetEngine::new(config, RecordingHost::new(screen), t0)
    }

    fn started(t0: Instant) -> PetEngine<RecordingHost> {
        let mut e = engine(t0, Some((1920, 1080)));
        e.start();
        e
    }

    #[test]
    fn start_places_window_and_enables_click_through() {
        let t0 = Instant::now();
        let e = started(t0);
        let calls = &e.host.calls;
        assert_eq!(calls[0], HostCall::ScreenSize);
        assert!(calls.contains(&HostCall::SetPosition(Vec2::new(860.0, 880.0))));
        assert!(calls.contains(&HostCall::IgnoreCursor(true)));
        assert_eq!(e.host.last_sprite(), Some(SpriteFrame::new(Sprite::Idle)));
        assert_eq!(e.state.current, PetState::Idle);
    }

    #[test]
    fn failed_screen_query_keeps_defaults() {
        let t0 = Instant::now();
        let mut e = engine(t0, None);
        e.start();
        assert_eq!((e.walk.screen_w, e.walk.screen_h), (1920, 1080));
        assert_eq!(e.host.positions(), vec![Vec2::new(860.0, 880.0)]);
    }

    #[test]
    fn noop_transition_leaves_timestamps() {
        let t0 = Instant::now();
        let mut e = started(t0);

        e.advance_to(t0 + ms(1_000));
        e.change_state(PetState::Idle);
        assert_eq!(e.state.state_start, t0);
        assert_eq!(e.state.idle_since, t0);

        e.advance_to(t0 + ms(2_000));
        e.change_state(PetState::Thinking);
        assert_eq!(e.state.state_start, t0 + ms(2_000));
        assert_eq!(e.state.idle_since, t0);
        assert_eq!(e.state.previous, PetState::Idle);

        e.advance_to(t0 + ms(3_000));
        e.change_state(PetState::Idle);
        assert_eq!(e.state.state_start, t0 + ms(3_000));
        assert_eq!(e.state.idle_since, t0 + ms(3_000));
        assert_eq!(e.state.previous, PetState::Thinking);
    }

    #[test]
    fn sleep_indicator_follows_sleeping() {
        let t0 = Instant::now();
        let mut e = started(t0);
        e.change_state(PetState::Sleeping);
        assert_eq!(e.host.calls.last(), Some(&HostCall::Sprite(SpriteFrame::new(Sprite::Sleeping))));
        assert!(e.host.calls.contains(&HostCall::SleepIndicator(true)));
        e.change_state(PetState::Eating);
        assert!(e.host.calls.ends_with(&[
            HostCall::SleepIndicator(false),
            HostCall::Sprite(SpriteFrame::new(Sprite::Eating)),
        ]));
    }

    #[test]
    fn click_during_nap_hides_indicator_and_strands_wake() {
        let t0 = Instant::now();
        let mut e = engine(t0, Some((1920, 1080)));
        e.now = t0 + IDLE_SLEEP_AFTER;
        e.pick_behavior();
        assert_eq!(e.state.current, PetState::Sleeping);
        let nap_epoch = e.epoch;
        let woken = e.host.calls.len();

        e.handle(PetEvent::PointerPressed, t0 + IDLE_SLEEP_AFTER + ms(1_000));
        assert_eq!(e.state.current, PetState::Reacting(Reaction::Love));
        assert!(e.host.calls[woken..].ends_with(&[
            HostCall::SleepIndicator(false),
            HostCall::Sprite(SpriteFrame::new(Sprite::Love)),
        ]));
        assert!(!e.state.sleep_indicator_visible());

        e.advance_to(t0 + IDLE_SLEEP_AFTER + ms(3_000));
        assert_eq!(e.state.current, PetState::Idle);

        // The nap's wake timer is still queued but belongs to an old epoch.
        e.change_state(PetState::Sleeping);
        let epoch = e.epoch;
        let pending = e.timers.len();
        e.fire(PetTimer::Wake { epoch: nap_epoch });
        assert_eq!(e.state.current, PetState::Sleeping);
        assert_eq!(e.epoch, epoch);
        assert_eq!(e.timers.len(), pending);
    }

    #[test]
    fn five_idle_minutes_forces_sleep_then_wakes() {
        let t0 = Instant::now();
        let mut e = engine(t0, Some((1920, 1080)));

        e.now = t0 + IDLE_SLEEP_AFTER;
        e.pick_behavior();
        assert_eq!(e.state.current, PetState::Sleeping);
        assert_eq!(e.state.previous, PetState::Idle);
        assert_eq!(e.timers.len(), 1);

        let wake_at = e.next_deadline().unwrap();
        assert!(wake_at >= t0 + IDLE_SLEEP_AFTER + ms(30_000));
        assert!(wake_at < t0 + IDLE_SLEEP_AFTER + ms(60_000));

        e.advance_to(wake_at);
        assert_eq!(e.state.current, PetState::Idle);
        assert_eq!(e.state.idle_since, wake_at);
        // Scheduler re-armed.
        assert_eq!(e.timers.len(), 1);
    }

    #[test]
    fn short_idle_uses_weighted_pick() {
        let t0 = Instant::now();
        let mut e = engine(t0, Some((1920, 1080)));
        for i in 0..50 {
            e.state.current = PetState::Idle;
            e.state.idle_since = t0;
            e.now = t0 + IDLE_SLEEP_AFTER - ms(1_000) + ms(i);
            e.pick_behavior();
            assert_ne!(e.state.current, PetState::Sleeping);
            assert_ne!(e.state.current, PetState::Stargazing);
        }
    }

    #[test]
    fn wake_is_skipped_under_forced_sleep() {
        let t0 = Instant::now();
        let mut e = engine(t0, Some((1920, 1080)));
        e.now = t0 + IDLE_SLEEP_AFTER;
        e.pick_behavior();
        e.handle(PetEvent::ToggleSleep, t0 + IDLE_SLEEP_AFTER + ms(1_000));
        e.advance_to(t0 + IDLE_SLEEP_AFTER + ms(120_000));
        assert_eq!(e.state.current, PetState::Sleeping);

        let off = t0 + IDLE_SLEEP_AFTER + ms(121_000);
        e.handle(PetEvent::ToggleSleep, off);
        assert_eq!(e.state.current, PetState::Idle);
        assert_eq!(e.state.idle_since, off);
        assert!(e.next_deadline().is_some());
    }

    #[test]
    fn forced_sleep_suppresses_everything() {
        let t0 = Instant::now();
        let mut e = started(t0);
        e.change_state(PetState::Walking);

        e.handle(PetEvent::ToggleSleep, t0 + ms(500));
        assert!(e.state.force_sleep);
        assert_eq!(e.state.current, PetState::Sleeping);
        let positions = e.host.positions().len();

        e.handle(PetEvent::PointerPressed, t0 + ms(1_000));
        e.handle(PetEvent::AboutAcknowledged, t0 + ms(1_500));
        assert_eq!(e.reactions.cursor(), 0);

        for step in 1..=600 {
            e.advance_to(t0 + ms(1_500 + step * 1_000));
            assert_eq!(e.state.current, PetState::Sleeping);
        }
        assert_eq!(e.host.positions().len(), positions);

        let off = t0 + ms(700_000);
        e.handle(PetEvent::ToggleSleep, off);
        assert!(!e.state.force_sleep);
        assert_eq!(e.state.current, PetState::Idle);
        assert_eq!(e.state.state_start, off);
    }

    #[test]
    fn clicks_cycle_reactions() {
        let t0 = Instant::now();
        let mut e = started(t0);
        let mut seen = Vec::new();
        for i in 0..5 {
            e.handle(PetEvent::PointerPressed, t0 + ms(100 * i));
            seen.push(e.state.current);
        }
        assert_eq!(
            seen,
            vec![
                PetState::Reacting(Reaction::Love),
                PetState::Reacting(Reaction::Cool),
                PetState::Reacting(Reaction::Surprised),
                PetState::Reacting(Reaction::Waving),
                PetState::Reacting(Reaction::Love),
            ]
        );
        assert_eq!(e.reactions.cursor(), 1);
        assert_eq!(e.host.last_sprite(), Some(SpriteFrame::new(Sprite::Love)));
    }

    #[test]
    fn only_newest_reaction_reverts() {
        let t0 = Instant::now();
        let mut e = started(t0);
        e.handle(PetEvent::PointerPressed, t0 + ms(1_000));
        e.handle(PetEvent::PointerPressed, t0 + ms(2_500));

        // First reaction's timer fires at 3.0s and must be ignored.
        e.advance_to(t0 + ms(3_500));
        assert_eq!(e.state.current, PetState::Reacting(Reaction::Cool));

        e.advance_to(t0 + ms(4_500));
        assert_eq!(e.state.current, PetState::Idle);
        assert_eq!(e.state.state_start, t0 + ms(4_500));
        assert_eq!(e.state.idle_since, t0 + ms(4_500));
        assert_eq!(e.state.previous, PetState::Idle);
    }

    #[test]
    fn about_shows_happy_without_moving_cursor() {
        let t0 = Instant::now();
        let mut e = started(t0);
        e.handle(PetEvent::AboutAcknowledged, t0 + ms(10));
        assert_eq!(e.state.current, PetState::Reacting(Reaction::Happy));
        assert_eq!(e.reactions.cursor(), 0);
    }

    #[test]
    fn reaction_abandons_interrupted_episode() {
        let t0 = Instant::now();
        let mut e = started(t0);

        e.advance_to(t0 + ms(1_000));
        e.begin_episode(PetState::Walking, 5_000);
        e.handle(PetEvent::PointerPressed, t0 + ms(2_000));
        e.advance_to(t0 + ms(4_000));
        assert_eq!(e.state.current, PetState::Idle);

        // A new walk must outlive the abandoned episode's end timer (6s).
        e.advance_to(t0 + ms(4_500));
        e.begin_episode(PetState::Walking, 10_000);
        e.advance_to(t0 + ms(6_100));
        assert_eq!(e.state.current, PetState::Walking);
    }

    #[test]
    fn forced_sleep_overrides_reaction() {
        let t0 = Instant::now();
        let mut e = started(t0);
        e.handle(PetEvent::PointerPressed, t0 + ms(100));
        e.handle(PetEvent::ToggleSleep, t0 + ms(200));
        e.advance_to(t0 + ms(5_000));
        assert_eq!(e.state.current, PetState::Sleeping);
        assert_eq!(e.state.previous, PetState::Idle);
    }

    #[test]
    fn blink_is_sprite_only() {
        let t0 = Instant::now();
        let mut e = started(t0);
        let mut blinked_at = None;
        for step in 1..=750 {
            let t = t0 + ms(step * 10);
            e.advance_to(t);
            if e.host.last_sprite() == Some(SpriteFrame::new(Sprite::IdleBlink)) {
                blinked_at = Some(t);
                break;
            }
        }
        let blinked_at = blinked_at.expect("no blink within 7.5s");
        assert!(e.state.blinking);
        assert_eq!(e.state.current, PetState::Idle);
        assert_eq!(e.state.state_start, t0);

        e.advance_to(blinked_at + ms(260));
        assert!(!e.state.blinking);
        assert_eq!(e.host.last_sprite(), Some(SpriteFrame::new(Sprite::Idle)));
    }

    #[test]
    fn walking_reports_every_tick() {
        let t0 = Instant::now();
        let mut e = started(t0);
        e.change_state(PetState::Walking);
        e.walk.pos_x = 500.0;
        let before = e.host.positions().len();

        e.advance_to(t0 + ms(1_000));
        let positions = e.host.positions();
        let walked = &positions[before..];
        assert_eq!(walked.len(), 20);
        assert!(walked.iter().all(|p| p.y == 880.0));
        assert_eq!(walked[19].x, 500.0 + 30.0 * e.walk.direction);
    }

    #[test]
    fn bounce_flips_sprite() {
        let t0 = Instant::now();
        let mut e = started(t0);
        e.change_state(PetState::Walking);
        e.walk.pos_x = 1719.0;
        e.walk.direction = 1.0;
        e.displayed = Some(SpriteFrame::walking(1.0));

        e.advance_to(t0 + ms(50));
        assert_eq!(e.walk.pos_x, 1720.0);
        assert_eq!(e.walk.direction, -1.0);
        assert_eq!(e.host.last_sprite(), Some(SpriteFrame::walking(-1.0)));
    }

    #[test]
    fn idle_pet_stays_put() {
        let t0 = Instant::now();
        let mut e = started(t0);
        e.advance_to(t0 + ms(5_000));
        assert_eq!(e.host.positions().len(), 1);
    }

    #[test]
    fn pointer_crossing_toggles_click_through() {
        let t0 = Instant::now();
        let mut e = started(t0);
        e.handle(PetEvent::PointerEntered, t0 + ms(10));
        assert_eq!(e.host.calls.last(), Some(&HostCall::IgnoreCursor(false)));
        e.handle(PetEvent::PointerLeft, t0 + ms(20));
        assert_eq!(e.host.calls.last(), Some(&HostCall::IgnoreCursor(true)));
    }

    /// Pending timers able to continue the current scheduler loop.
    fn live_loops(e: &PetEngine<RecordingHost>) -> usize {
        e.timers
            .pending()
            .filter(|t| match t {
                PetTimer::Behavior { loop_token } | PetTimer::EpisodeEnd { loop_token, .. } => {
                    *loop_token == e.loop_token
                }
                _ => false,
            })
            .count()
    }

    #[test]
    fn one_scheduler_loop_under_mixed_input() {
        let t0 = Instant::now();
        let mut e = started(t0);
        assert_eq!(live_loops(&e), 1);

        for step in 1..=4_000u64 {
            let t = t0 + ms(step * 500);
            if step % 7 == 0 {
                e.handle(PetEvent::PointerPressed, t);
            } else if step % 173 == 0 || step % 173 == 40 {
                e.handle(PetEvent::ToggleSleep, t);
            } else if step % 61 == 0 {
                e.handle(PetEvent::AboutAcknowledged, t);
            } else {
                e.advance_to(t);
            }

            let live = live_loops(&e);
            assert!(live <= 1, "{live} scheduler loops at step {step}");
            let resting = e.state.current == PetState::Sleeping || e.state.current.is_reacting();
            if !resting && !e.state.force_sleep {
                assert_eq!(live, 1, "no scheduler loop in {:?} at step {step}", e.state.current);
            }
        }
    }

    #[test]
    fn autonomous_loop_keeps_running() {
        let t0 = Instant::now();
        let mut e = started(t0);
        let mut transitions = 0;
        let mut last_start = e.state.state_start;

        for step in 1..=1_200 {
            e.advance_to(t0 + ms(step * 1_000));
            if e.state.state_start != last_start {
                assert!(e.state.state_start > last_start);
                last_start = e.state.state_start;
                transitions += 1;
            }
            assert!(!e.state.previous.is_reacting());
            assert!(e.walk.pos_x >= 0.0 && e.walk.pos_x <= e.walk.max_x());
        }
        assert!(transitions > 10, "only {transitions} transitions in 20 minutes");
        assert!(e.next_deadline().is_some());
    }
}
