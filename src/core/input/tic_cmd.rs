//=========================================================================
// Tic Command
//
// One tick of player intent, handed from the input synthesizer to the
// simulation. Field widths match the demo/network wire format, so every
// backend must produce bit-identical commands for identical input.
//
// Button byte:
// ```text
//   bit 0      attack
//   bit 1      use
//   bit 2      weapon change requested
//   bits 3..5  weapon slot index (0..=6)
// ```
//
//=========================================================================

//=== Movement Tables =====================================================

/// Forward displacement per tick, indexed by speed (walk, run).
pub const FORWARD_MOVE: [i32; 2] = [25, 50];

/// Side displacement per tick, indexed by speed (walk, run).
pub const SIDE_MOVE: [i32; 2] = [24, 40];

/// Turn rate per tick: walk, run, and the fixed rate used while a turn
/// key has been held for fewer than [`SLOW_TURN_TICS`] ticks.
pub const ANGLE_TURN: [i32; 3] = [640, 1280, 320];

/// Index into [`ANGLE_TURN`] for the initial turn rate.
pub const INITIAL_TURN_INDEX: usize = 2;

/// Ticks a turn key must be held before the speed-indexed rate applies.
pub const SLOW_TURN_TICS: u32 = 6;

/// Saturation bound for both forward and side displacement.
pub const MAX_MOVE: i32 = 50;

/// Number of weapon slots selectable from the keyboard.
pub const WEAPON_SLOTS: usize = 7;

//=== TicCmdButtons =======================================================

/// Bit constants for [`TicCmd::buttons`].
pub struct TicCmdButtons;

impl TicCmdButtons {
    pub const ATTACK: u8 = 1;
    pub const USE: u8 = 2;
    pub const CHANGE: u8 = 4;
    pub const WEAPON_MASK: u8 = 0b0011_1000;
    pub const WEAPON_SHIFT: u8 = 3;
}

//=== TicCmd ==============================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TicCmd {
    pub forward_move: i8,
    pub side_move: i8,
    pub angle_turn: i16,
    pub buttons: u8,
}

impl TicCmd {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_attacking(&self) -> bool {
        self.buttons & TicCmdButtons::ATTACK != 0
    }

    pub fn is_using(&self) -> bool {
        self.buttons & TicCmdButtons::USE != 0
    }

    /// Requested weapon slot, if a change was signalled this tick.
    pub fn weapon_change(&self) -> Option<u8> {
        if self.buttons & TicCmdButtons::CHANGE == 0 {
            return None;
        }
        Some((self.buttons & TicCmdButtons::WEAPON_MASK) >> TicCmdButtons::WEAPON_SHIFT)
    }

    /// Sets the change flag and packs `slot` into the weapon bits.
    pub fn request_weapon(&mut self, slot: u8) {
        self.buttons &= !TicCmdButtons::WEAPON_MASK;
        self.buttons |= TicCmdButtons::CHANGE;
        self.buttons |= (slot << TicCmdButtons::WEAPON_SHIFT) & TicCmdButtons::WEAPON_MASK;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_is_idle() {
        let cmd = TicCmd::default();
        assert_eq!(cmd.forward_move, 0);
        assert_eq!(cmd.buttons, 0);
        assert_eq!(cmd.weapon_change(), None);
    }

    #[test]
    fn weapon_slot_packs_into_bits_three_to_five() {
        let mut cmd = TicCmd::default();
        cmd.request_weapon(6);

        assert_eq!(cmd.buttons, TicCmdButtons::CHANGE | (6 << 3));
        assert_eq!(cmd.weapon_change(), Some(6));
    }

    #[test]
    fn weapon_request_keeps_other_buttons() {
        let mut cmd = TicCmd {
            buttons: TicCmdButtons::ATTACK | TicCmdButtons::USE,
            ..TicCmd::default()
        };
        cmd.request_weapon(2);

        assert!(cmd.is_attacking());
        assert!(cmd.is_using());
        assert_eq!(cmd.weapon_change(), Some(2));
    }

    #[test]
    fn clear_resets_everything() {
        let mut cmd = TicCmd {
            forward_move: 50,
            side_move: -40,
            angle_turn: 1280,
            buttons: 0xff,
        };
        cmd.clear();
        assert_eq!(cmd, TicCmd::default());
    }
}
