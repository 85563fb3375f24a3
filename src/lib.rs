//=========================================================================
// doom_platform — Library Root
//
// The device boundary between a deterministic 35 Hz simulation and the
// machine it runs on: keyboard/mouse in, finished frames out.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`, `Backend`)
// - Expose the platform-neutral contracts under `core` (input, config,
//   video, simulation)
// - Keep native backends (`platform`) hidden behind those contracts
//
// Typical usage:
// ```no_run
// use doom_platform::prelude::*;
//
// fn launch(game: &mut dyn Simulation) -> Result<(), PlatformError> {
//     let display = StoredDisplaySettings::new(FrameSize::new(640, 400)).into_shared();
//     EngineBuilder::new().build().run(game, display)
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds everything that does not name a native API. Games
// implement `Simulation` and consume `UserInput`; alternative hosts can
// reuse the config store, the tick builder and the presenter contract.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit, OpenGL, wgpu and SDL integration and is
// not part of the public API surface.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------
pub use engine::{Backend, Engine, EngineBuilder, DEFAULT_CONFIG_PATH};
pub use platform::PlatformError;
