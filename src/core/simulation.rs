//=========================================================================
// Simulation Contract
//
// What a host needs from the game: take raw key events, advance one tick
// from a `UserInput`, and draw into a frame buffer.
//
// Tick pacing:
// ```text
//   host loop ──► TickClock::due_ticks(now) ──► n × run_tick()
//                                              ├─ EventQueue → post_event
//                                              └─ update(&mut UserInput)
// ```
//
// `TickClock` is a fixed-step accumulator. If the host falls far behind
// (debugger, window drag) it runs at most `MAX_CATCH_UP_TICKS` and then
// resynchronises instead of fast-forwarding the game.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use log::debug;

//=== Internal Modules ====================================================
use crate::core::input::{EventQueue, InputEvent, UserInput};
use crate::core::video::{FrameBuffer, FramePresenter};

//=== Constants ===========================================================

/// Engine-wide simulation cadence.
pub const TICS_PER_SECOND: f64 = 35.0;

pub const MAX_CATCH_UP_TICKS: u32 = 10;

//=== UpdateResult ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResult {
    /// Keep running.
    None,
    /// The game asked to quit.
    Completed,
}

//=== Simulation ==========================================================

pub trait Simulation {
    /// Raw key transition for menus and cheats. Returns `true` if the
    /// event was consumed.
    fn post_event(&mut self, event: InputEvent) -> bool;

    /// Advances one tick, sampling `input` exactly once.
    fn update(&mut self, input: &mut dyn UserInput) -> UpdateResult;

    /// Draws the current state into `frame`. The presenter is passed for
    /// wipe and display-setting access; the host presents afterwards.
    fn render(&mut self, frame: &mut FrameBuffer, presenter: &mut dyn FramePresenter);
}

//--- run_tick() ----------------------------------------------------------
//
// One simulation tick: deliver queued key events, then update.
//
pub fn run_tick(
    simulation: &mut dyn Simulation,
    events: &EventQueue,
    input: &mut dyn UserInput,
) -> UpdateResult {
    events.drain_into(|event| {
        simulation.post_event(event);
    });
    simulation.update(input)
}

//=== TickClock ===========================================================

#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    next: Instant,
}

impl TickClock {
    pub fn new(tics_per_second: f64, start: Instant) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / tics_per_second),
            next: start,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the next tick becomes due.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Number of ticks to run at `now`, at most [`MAX_CATCH_UP_TICKS`].
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while now >= self.next && due < MAX_CATCH_UP_TICKS {
            self.next += self.period;
            due += 1;
        }

        if now >= self.next {
            debug!(target: "engine", "Tick loop fell behind, resynchronising");
            self.next = now + self.period;
        }

        due
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::input::{event_channel, InputSynthesizer, Key, NoCursor};

    //=====================================================================
    // TickClock
    //=====================================================================

    #[test]
    fn first_tick_is_due_immediately() {
        let start = Instant::now();
        let mut clock = TickClock::new(TICS_PER_SECOND, start);

        assert_eq!(clock.due_ticks(start), 1);
        assert_eq!(clock.due_ticks(start), 0);
    }

    #[test]
    fn ticks_accumulate_with_elapsed_time() {
        let start = Instant::now();
        let mut clock = TickClock::new(10.0, start);

        assert_eq!(clock.due_ticks(start + Duration::from_millis(250)), 3);
        assert_eq!(clock.deadline(), start + Duration::from_millis(300));
    }

    #[test]
    fn catch_up_is_capped_and_resynchronised() {
        let start = Instant::now();
        let mut clock = TickClock::new(35.0, start);
        let late = start + Duration::from_secs(5);

        assert_eq!(clock.due_ticks(late), MAX_CATCH_UP_TICKS);
        assert_eq!(clock.deadline(), late + clock.period());
        assert_eq!(clock.due_ticks(late), 0);
    }

    //=====================================================================
    // run_tick
    //=====================================================================

    struct Recorder {
        events: Vec<InputEvent>,
        forward: Vec<i8>,
    }

    impl Simulation for Recorder {
        fn post_event(&mut self, event: InputEvent) -> bool {
            self.events.push(event);
            true
        }

        fn update(&mut self, input: &mut dyn UserInput) -> UpdateResult {
            self.forward.push(input.sample().forward_move);
            if self.forward.len() == 2 {
                UpdateResult::Completed
            } else {
                UpdateResult::None
            }
        }

        fn render(&mut self, _frame: &mut FrameBuffer, _presenter: &mut dyn FramePresenter) {}
    }

    #[test]
    fn run_tick_delivers_events_before_update() {
        let (forwarder, queue) = event_channel(8);
        let mut input = InputSynthesizer::new(Config::default().into_shared(), NoCursor);
        let mut sim = Recorder {
            events: Vec::new(),
            forward: Vec::new(),
        };

        forwarder.forward(InputEvent::KeyDown(Key::W));
        input.state_mut().press_key(Key::W);

        assert_eq!(run_tick(&mut sim, &queue, &mut input), UpdateResult::None);
        assert_eq!(sim.events, vec![InputEvent::KeyDown(Key::W)]);
        assert_eq!(sim.forward, vec![50]);

        assert_eq!(run_tick(&mut sim, &queue, &mut input), UpdateResult::Completed);
        assert_eq!(sim.events.len(), 1);
    }
}
