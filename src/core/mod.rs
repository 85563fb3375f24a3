//=========================================================================
// Core
//
// Platform-neutral logic of the device boundary. Nothing in here names a
// native API; backends under `platform` adapt to these contracts.
//
// Responsibilities:
// - Input: keys, bindings, device snapshots, tick command synthesis,
//   key-code translation, raw event forwarding
// - Config: the persisted settings store
// - Video: frame buffers, quad geometry, the presenter contract
// - Simulation: the game-side contract and tick pacing
//
// Notes:
// Everything here runs on the single engine thread. Shared state
// (`SharedConfig`, `SharedDisplay`) is `Rc<RefCell<_>>` for that reason.
//
//=========================================================================

pub mod config;
pub mod input;
pub mod simulation;
pub mod video;

//=== Re-exports ==========================================================
pub use config::{Config, SharedConfig};
pub use simulation::{Simulation, TickClock, UpdateResult, TICS_PER_SECOND};
