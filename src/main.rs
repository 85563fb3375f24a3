//=========================================================================
// doom_platform demo
//
// Runs the engine with a built-in test pattern so every backend can be
// smoke-tested without game content.
//
// The pattern scrolls with the tick command: forward/back moves it
// vertically, turning and strafing horizontally, fire flashes the border.
// Escape quits; Enter toggles the mouse grab.
//
//=========================================================================

use clap::{Parser, ValueEnum};
use log::{error, info};

use doom_platform::prelude::*;

//=== Command Line ========================================================

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Gl,
    Wgpu,
    Sdl,
    Headless,
}

#[derive(Debug, Parser)]
#[command(version, about = "Test-pattern host for the doom_platform backends")]
struct Args {
    /// Presentation backend.
    #[arg(long, value_enum, default_value = "gl")]
    backend: BackendArg,

    /// Ticks to run with the headless backend.
    #[arg(long, default_value_t = 350)]
    ticks: u64,

    /// Config file to load and save.
    #[arg(long, default_value = doom_platform::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Render column-major frames, as a software column renderer does.
    #[arg(long)]
    transposed: bool,
}

impl Args {
    fn backend(&self) -> Backend {
        match self.backend {
            BackendArg::Gl => Backend::OpenGl,
            BackendArg::Wgpu => Backend::Wgpu,
            BackendArg::Sdl => Backend::Sdl,
            BackendArg::Headless => Backend::Headless { ticks: self.ticks },
        }
    }

    fn layout(&self) -> FrameLayout {
        if self.transposed {
            FrameLayout::Transposed
        } else {
            FrameLayout::RowMajor
        }
    }
}

//=== TestPattern =========================================================

#[derive(Default)]
struct TestPattern {
    scroll_x: i32,
    scroll_y: i32,
    firing: bool,
    quit: bool,
    toggle_grab: bool,
    grabbed: bool,
}

impl Simulation for TestPattern {
    fn post_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::KeyDown(Key::Escape) => self.quit = true,
            InputEvent::KeyDown(Key::Enter) => self.toggle_grab = true,
            _ => return false,
        }
        true
    }

    fn update(&mut self, input: &mut dyn UserInput) -> UpdateResult {
        if self.quit {
            return UpdateResult::Completed;
        }

        if std::mem::take(&mut self.toggle_grab) {
            if self.grabbed {
                input.release_mouse();
            } else {
                input.grab_mouse();
            }
            self.grabbed = !self.grabbed;
        }

        let cmd = input.sample();
        self.scroll_y += i32::from(cmd.forward_move) / 8;
        self.scroll_x += i32::from(cmd.side_move) / 8 - i32::from(cmd.angle_turn) / 160;
        self.firing = cmd.is_attacking();
        UpdateResult::None
    }

    fn render(&mut self, frame: &mut FrameBuffer, _presenter: &mut dyn FramePresenter) {
        let size = frame.size();
        for y in 0..size.height {
            for x in 0..size.width {
                let border = x < 4 || y < 4 || x >= size.width - 4 || y >= size.height - 4;
                let rgba = if border && self.firing {
                    [255, 255, 255, 255]
                } else {
                    let u = (x as i32 + self.scroll_x).rem_euclid(256) as u8;
                    let v = (y as i32 + self.scroll_y).rem_euclid(256) as u8;
                    [u, v, u ^ v, 255]
                };
                frame.set_pixel(x, y, rgba);
            }
        }
    }
}

//=== main() ==============================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let backend = args.backend();
    info!(target: "engine", "doom_platform demo on {}", backend);

    let display = StoredDisplaySettings::new(FrameSize::for_resolution(true)).into_shared();
    let mut pattern = TestPattern::default();

    let result = EngineBuilder::new()
        .with_backend(backend)
        .with_config_path(&args.config)
        .with_frame_layout(args.layout())
        .build()
        .run(&mut pattern, display);

    if let Err(e) = result {
        error!(target: "engine", "{}", e);
        std::process::exit(1);
    }
}
