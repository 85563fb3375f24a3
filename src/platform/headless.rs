//=========================================================================
// Headless Host
//
// Runs a fixed number of ticks as fast as possible, with no window and
// no input devices. Each tick is rendered and presented into a
// `HeadlessPresenter`, so a timedemo exercises the full frame path.
//
//=========================================================================

//=== External Crates =====================================================
use log::info;

//=== Internal Imports ====================================================
use super::{HostContext, PlatformError};
use crate::core::input::{InputSynthesizer, NoCursor};
use crate::core::simulation::{run_tick, UpdateResult};
use crate::core::video::{store_display, FrameBuffer, FramePresenter, HeadlessPresenter};

//=== run() ===============================================================

pub(crate) fn run(context: HostContext<'_>, ticks: u64) -> Result<(), PlatformError> {
    let HostContext {
        simulation,
        config,
        display,
        events,
        layout,
        ..
    } = context;

    let mut presenter = HeadlessPresenter::new(&config, display.clone(), layout)?;
    let mut input = InputSynthesizer::new(config.clone(), NoCursor);
    let mut frame = FrameBuffer::new(presenter.format());

    info!(target: "platform", "Headless run: {} ticks", ticks);

    let mut completed = 0;
    while completed < ticks {
        let result = run_tick(&mut *simulation, &events, &mut input);
        completed += 1;

        simulation.render(&mut frame, &mut presenter);
        presenter.present(&frame)?;

        if result == UpdateResult::Completed {
            info!(target: "engine", "Simulation completed");
            break;
        }
    }

    store_display(&config, &display);
    info!(
        target: "platform",
        "Headless run finished: {} ticks, {} frames",
        completed,
        presenter.frames_presented()
    );
    Ok(())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::input::{event_channel, InputEvent, Key, UserInput};
    use crate::core::simulation::Simulation;
    use crate::core::video::{FrameLayout, FrameSize, StoredDisplaySettings};

    struct Counter {
        updates: u64,
        renders: u64,
        events: Vec<InputEvent>,
        stop_after: Option<u64>,
    }

    impl Counter {
        fn new(stop_after: Option<u64>) -> Self {
            Self {
                updates: 0,
                renders: 0,
                events: Vec::new(),
                stop_after,
            }
        }
    }

    impl Simulation for Counter {
        fn post_event(&mut self, event: InputEvent) -> bool {
            self.events.push(event);
            true
        }

        fn update(&mut self, input: &mut dyn UserInput) -> UpdateResult {
            input.sample();
            self.updates += 1;
            match self.stop_after {
                Some(limit) if self.updates >= limit => UpdateResult::Completed,
                _ => UpdateResult::None,
            }
        }

        fn render(&mut self, frame: &mut FrameBuffer, presenter: &mut dyn FramePresenter) {
            self.renders += 1;
            frame.fill([self.renders as u8, 0, 0, 255]);
            if self.renders == 1 {
                presenter.initialize_wipe();
            }
        }
    }

    fn context<'a>(simulation: &'a mut Counter, config: Config) -> (HostContext<'a>, crate::core::input::EventForwarder) {
        let (forwarder, events) = event_channel(16);
        let context = HostContext {
            simulation,
            config: config.into_shared(),
            display: StoredDisplaySettings::new(FrameSize::new(640, 400)).into_shared(),
            forwarder: forwarder.clone(),
            events,
            tics_per_second: 35.0,
            layout: FrameLayout::Transposed,
        };
        (context, forwarder)
    }

    #[test]
    fn runs_the_requested_number_of_ticks() {
        let mut sim = Counter::new(None);
        let (context, _forwarder) = context(&mut sim, Config::default());

        run(context, 12).unwrap();

        assert_eq!(sim.updates, 12);
        assert_eq!(sim.renders, 12);
    }

    #[test]
    fn stops_early_when_simulation_completes() {
        let mut sim = Counter::new(Some(3));
        let (context, _forwarder) = context(&mut sim, Config::default());

        run(context, 100).unwrap();

        assert_eq!(sim.updates, 3);
    }

    #[test]
    fn queued_events_reach_the_simulation() {
        let mut sim = Counter::new(None);
        let (context, forwarder) = context(&mut sim, Config::default());
        forwarder.forward(InputEvent::KeyDown(Key::Escape));

        run(context, 1).unwrap();

        assert_eq!(sim.events, vec![InputEvent::KeyDown(Key::Escape)]);
    }

    #[test]
    fn display_settings_are_written_back() {
        let mut sim = Counter::new(None);
        let mut config = Config::default();
        config.video_gammacorrection = 40;
        let (context, _forwarder) = context(&mut sim, config);
        let shared = context.config.clone();

        run(context, 1).unwrap();

        // clamped on construction, stored back on exit
        assert_eq!(shared.borrow().video_gammacorrection, 10);
    }

    #[test]
    fn zero_ticks_is_a_no_op() {
        let mut sim = Counter::new(None);
        let (context, _forwarder) = context(&mut sim, Config::default());

        run(context, 0).unwrap();

        assert_eq!(sim.updates, 0);
    }
}
