//=========================================================================
// Input Synthesizer
//
// Turns a device snapshot into one `TicCmd` per simulation tick.
//
// Pipeline per tick:
// ```text
//   KeyboardState ──┐
//                   ├─► TicCmdBuilder::build() ──► TicCmd ──► Simulation
//   Config ─────────┘        (turn_held)
// ```
//
// The builder is the only stateful piece: it remembers how many ticks a
// turn key has been held so the first few ticks of a turn use a fixed
// initial rate. Everything else is a pure function of the snapshot.
//
// Backends plug in through `CursorGrab` (how to capture the pointer) and
// by feeding native key events into the synthesizer's `KeyboardState`.
//
//=========================================================================

//=== External Crates =====================================================
use log::{debug, trace};

//=== Internal Modules ====================================================
use super::key::Key;
use super::state::{DeviceState, KeyboardState, MouseMotion};
use super::tic_cmd::{
    TicCmd, ANGLE_TURN, FORWARD_MOVE, INITIAL_TURN_INDEX, MAX_MOVE, SIDE_MOVE, SLOW_TURN_TICS,
    TicCmdButtons, WEAPON_SLOTS,
};
use crate::core::config::{Config, SharedConfig};

//=== Constants ===========================================================

/// Weapon slot keys in scan order; the first held key wins.
pub const WEAPON_KEYS: [Key; WEAPON_SLOTS] = [
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
];

/// Upper bound of the mouse sensitivity setting.
pub const MAX_MOUSE_SENSITIVITY: i32 = 9;

//=== UserInput ===========================================================

/// Per-backend input contract consumed by the simulation.
///
/// `sample` is called exactly once per tick from the engine thread.
pub trait UserInput {
    /// Builds this tick's command from the current device state.
    fn sample(&mut self) -> TicCmd;

    /// Forgets held keys, pending motion and the turn ramp.
    fn reset(&mut self);

    fn grab_mouse(&mut self);
    fn release_mouse(&mut self);

    fn max_mouse_sensitivity(&self) -> i32 {
        MAX_MOUSE_SENSITIVITY
    }

    fn mouse_sensitivity(&self) -> i32;
    fn set_mouse_sensitivity(&mut self, value: i32);
}

//=== TicCmdBuilder =======================================================

/// The turn-acceleration state and the command-building algorithm.
#[derive(Debug, Default)]
pub struct TicCmdBuilder {
    turn_held: u32,
}

impl TicCmdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.turn_held = 0;
    }

    pub fn turn_held(&self) -> u32 {
        self.turn_held
    }

    //--- build() ----------------------------------------------------------
    //
    // `motion` is the relative pointer movement to apply; callers pass a
    // zero motion while the mouse is not grabbed.
    //
    pub fn build<D>(&mut self, config: &Config, device: &D, motion: MouseMotion) -> TicCmd
    where
        D: DeviceState + ?Sized,
    {
        //--- Step 1: Resolve logical actions ----------------------------
        let forward_held = config.key_forward.is_pressed(device);
        let backward_held = config.key_backward.is_pressed(device);
        let strafe_left_held = config.key_strafeleft.is_pressed(device);
        let strafe_right_held = config.key_straferight.is_pressed(device);
        let turn_left_held = config.key_turnleft.is_pressed(device);
        let turn_right_held = config.key_turnright.is_pressed(device);
        let fire_held = config.key_fire.is_pressed(device);
        let use_held = config.key_use.is_pressed(device);
        let run_held = config.key_run.is_pressed(device);
        let strafe_held = config.key_strafe.is_pressed(device);

        let mut cmd = TicCmd::default();

        //--- Step 2: Speed ----------------------------------------------
        let mut speed = usize::from(run_held);
        if config.game_alwaysrun {
            speed = 1 - speed;
        }

        //--- Step 3: Turn ramp ------------------------------------------
        if turn_left_held || turn_right_held {
            self.turn_held = self.turn_held.saturating_add(1);
        } else {
            self.turn_held = 0;
        }

        let turn_speed = if self.turn_held < SLOW_TURN_TICS {
            INITIAL_TURN_INDEX
        } else {
            speed
        };

        let mut forward = 0;
        let mut side = 0;
        let mut angle_turn = cmd.angle_turn;

        //--- Step 4: Turning or strafing --------------------------------
        if strafe_held {
            if turn_right_held {
                side += SIDE_MOVE[speed];
            }
            if turn_left_held {
                side -= SIDE_MOVE[speed];
            }
        } else {
            let rate = ANGLE_TURN[turn_speed] as i16;
            if turn_right_held {
                angle_turn = angle_turn.wrapping_sub(rate);
            }
            if turn_left_held {
                angle_turn = angle_turn.wrapping_add(rate);
            }
        }

        //--- Step 5: Movement -------------------------------------------
        if forward_held {
            forward += FORWARD_MOVE[speed];
        }
        if backward_held {
            forward -= FORWARD_MOVE[speed];
        }
        if strafe_left_held {
            side -= SIDE_MOVE[speed];
        }
        if strafe_right_held {
            side += SIDE_MOVE[speed];
        }

        //--- Mouse look -------------------------------------------------
        if !motion.is_zero() {
            let scale = 0.5 * f64::from(config.mouse_sensitivity);
            let mx = (scale * motion.dx).round_ties_even() as i32;
            let my = (scale * motion.dy).round_ties_even() as i32;

            if !config.mouse_disableyaxis {
                forward = forward.saturating_sub(my);
            }
            if strafe_held {
                side = side.saturating_add(mx.saturating_mul(2));
            } else {
                angle_turn = angle_turn.wrapping_sub(mx.wrapping_mul(8) as i16);
            }
        }

        //--- Step 6: Buttons --------------------------------------------
        if fire_held {
            cmd.buttons |= TicCmdButtons::ATTACK;
        }
        if use_held {
            cmd.buttons |= TicCmdButtons::USE;
        }

        //--- Step 7: Weapon select --------------------------------------
        if let Some(slot) = WEAPON_KEYS.iter().position(|&key| device.is_key_down(key)) {
            cmd.request_weapon(slot as u8);
        }

        //--- Step 8: Clamp and emit -------------------------------------
        cmd.forward_move = forward.clamp(-MAX_MOVE, MAX_MOVE) as i8;
        cmd.side_move = side.clamp(-MAX_MOVE, MAX_MOVE) as i8;
        cmd.angle_turn = angle_turn;

        trace!(target: "platform::input", "{:?} (turn_held {})", cmd, self.turn_held);
        cmd
    }
}

//=== CursorGrab ==========================================================

/// How a backend captures and releases the pointer.
pub trait CursorGrab {
    /// Captures the pointer. Returns `false` if the platform refused.
    fn grab(&mut self) -> bool;
    fn release(&mut self);
}

/// Grab hook for hosts without a pointer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCursor;

impl CursorGrab for NoCursor {
    fn grab(&mut self) -> bool {
        true
    }

    fn release(&mut self) {}
}

//=== InputSynthesizer ====================================================
//
// The `UserInput` every backend hands to the simulation. Backends own one
// of these, push translated device events into `state_mut()` and supply
// their own `CursorGrab`.
//
pub struct InputSynthesizer<G: CursorGrab> {
    config: SharedConfig,
    state: KeyboardState,
    builder: TicCmdBuilder,
    cursor: G,
    grabbed: bool,
}

impl<G: CursorGrab> InputSynthesizer<G> {
    pub fn new(config: SharedConfig, cursor: G) -> Self {
        debug!(target: "platform::input", "Input synthesizer created");
        Self {
            config,
            state: KeyboardState::new(),
            builder: TicCmdBuilder::new(),
            cursor,
            grabbed: false,
        }
    }

    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut KeyboardState {
        &mut self.state
    }

    pub fn cursor(&self) -> &G {
        &self.cursor
    }

    pub fn is_mouse_grabbed(&self) -> bool {
        self.grabbed
    }
}

impl<G: CursorGrab> UserInput for InputSynthesizer<G> {
    fn sample(&mut self) -> TicCmd {
        let motion = self.state.take_motion();
        let motion = if self.grabbed { motion } else { MouseMotion::default() };

        let config = self.config.borrow();
        self.builder.build(&config, &self.state, motion)
    }

    fn reset(&mut self) {
        self.state.release_all();
        self.builder.reset();
    }

    fn grab_mouse(&mut self) {
        if self.grabbed {
            return;
        }
        self.grabbed = self.cursor.grab();
        // Motion collected before the grab is not look input.
        self.state.take_motion();
        debug!(target: "platform::input", "Mouse grab: {}", self.grabbed);
    }

    fn release_mouse(&mut self) {
        if !self.grabbed {
            return;
        }
        self.cursor.release();
        self.grabbed = false;
        debug!(target: "platform::input", "Mouse released");
    }

    fn mouse_sensitivity(&self) -> i32 {
        self.config.borrow().mouse_sensitivity
    }

    fn set_mouse_sensitivity(&mut self, value: i32) {
        self.config.borrow_mut().mouse_sensitivity = value;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
