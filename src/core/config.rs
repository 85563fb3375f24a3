//=========================================================================
// Configuration Store
//
// Named key bindings plus scalar settings, persisted as a flat
// `name = value` text file next to the executable.
//
// File format:
// ```text
// key_forward = up, w
// key_fire = lcontrol, rcontrol, mouse1
// mouse_sensitivity = 3
// game_alwaysrun = true
// ```
//
// Loading is best-effort: a missing, unreadable or corrupt file is never
// an error for the caller. Individual values that fail to parse keep
// their default; a file that cannot be read as a whole (I/O error,
// duplicate setting names) yields full defaults. Saving is best-effort
// in the same way.
//
// Responsibilities:
// - Hold the compiled defaults
// - Overlay values read from disk
// - Write every setting back on orderly shutdown
// - Window-size helpers used by the hosts before creating a window
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

//=== External Crates =====================================================
use log::{debug, info, warn};
use thiserror::Error;

//=== Internal Modules ====================================================
use crate::core::input::{Key, KeyBinding, MouseButton};

//=== Shared Handle =======================================================

/// The store as shared between input, video and the host on the engine
/// thread.
pub type SharedConfig = Rc<RefCell<Config>>;

//=== Window Size Limits ==================================================

pub const MIN_WINDOW_WIDTH: i32 = 320;
pub const MAX_WINDOW_WIDTH: i32 = 3200;
pub const MIN_WINDOW_HEIGHT: i32 = 200;
pub const MAX_WINDOW_HEIGHT: i32 = 2000;

const WINDOW_STEP: (i32, i32) = (640, 400);

//=== ConfigError =========================================================

/// Reasons a config file was rejected as a whole.
///
/// Never escapes this module: [`Config::load`] and [`Config::save`] log
/// it and carry on.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("setting `{name}` appears more than once (line {line})")]
    DuplicateSetting { name: String, line: usize },
}

//=== Config ==============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub key_forward: KeyBinding,
    pub key_backward: KeyBinding,
    pub key_strafeleft: KeyBinding,
    pub key_straferight: KeyBinding,
    pub key_turnleft: KeyBinding,
    pub key_turnright: KeyBinding,
    pub key_fire: KeyBinding,
    pub key_use: KeyBinding,
    pub key_run: KeyBinding,
    pub key_strafe: KeyBinding,

    pub mouse_sensitivity: i32,
    pub mouse_disableyaxis: bool,

    pub game_alwaysrun: bool,

    pub video_screenwidth: i32,
    pub video_screenheight: i32,
    pub video_fullscreen: bool,
    pub video_highresolution: bool,
    pub video_displaymessage: bool,
    pub video_gamescreensize: i32,
    pub video_gammacorrection: i32,

    restored_from_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_forward: KeyBinding::from_keys(&[Key::Up, Key::W]),
            key_backward: KeyBinding::from_keys(&[Key::Down, Key::S]),
            key_strafeleft: KeyBinding::from_keys(&[Key::A]),
            key_straferight: KeyBinding::from_keys(&[Key::D]),
            key_turnleft: KeyBinding::from_keys(&[Key::Left]),
            key_turnright: KeyBinding::from_keys(&[Key::Right]),
            key_fire: KeyBinding::new(&[Key::LControl, Key::RControl], &[MouseButton::Mouse1]),
            key_use: KeyBinding::new(&[Key::Space], &[MouseButton::Mouse2]),
            key_run: KeyBinding::from_keys(&[Key::LShift, Key::RShift]),
            key_strafe: KeyBinding::from_keys(&[Key::LAlt, Key::RAlt]),

            mouse_sensitivity: 3,
            mouse_disableyaxis: false,

            game_alwaysrun: true,

            video_screenwidth: 1280,
            video_screenheight: 800,
            video_fullscreen: false,
            video_highresolution: true,
            video_displaymessage: true,
            video_gamescreensize: 7,
            video_gammacorrection: 2,

            restored_from_file: false,
        }
    }
}

impl Config {
    //--- Loading ----------------------------------------------------------

    /// Reads `path` over the compiled defaults.
    ///
    /// Never fails. On any file-level problem the returned config is the
    /// full default set and [`Config::is_restored_from_file`] is `false`.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|text| Self::parse(&text))
        {
            Ok(config) => {
                info!(target: "config", "Restored config from {}", path.display());
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!(target: "config", "No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!(target: "config", "Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parses file contents. Values that fail to parse keep their default.
    pub(crate) fn parse(text: &str) -> Result<Self, ConfigError> {
        let table = Self::read_table(text)?;
        let mut config = Self::default();

        //--- Bindings -----------------------------------------------------
        read_binding(&table, "key_forward", &mut config.key_forward);
        read_binding(&table, "key_backward", &mut config.key_backward);
        read_binding(&table, "key_strafeleft", &mut config.key_strafeleft);
        read_binding(&table, "key_straferight", &mut config.key_straferight);
        read_binding(&table, "key_turnleft", &mut config.key_turnleft);
        read_binding(&table, "key_turnright", &mut config.key_turnright);
        read_binding(&table, "key_fire", &mut config.key_fire);
        read_binding(&table, "key_use", &mut config.key_use);
        read_binding(&table, "key_run", &mut config.key_run);
        read_binding(&table, "key_strafe", &mut config.key_strafe);

        //--- Scalars ------------------------------------------------------
        read_int(&table, "mouse_sensitivity", &mut config.mouse_sensitivity);
        read_bool(&table, "mouse_disableyaxis", &mut config.mouse_disableyaxis);

        read_bool(&table, "game_alwaysrun", &mut config.game_alwaysrun);

        read_int(&table, "video_screenwidth", &mut config.video_screenwidth);
        read_int(&table, "video_screenheight", &mut config.video_screenheight);
        read_bool(&table, "video_fullscreen", &mut config.video_fullscreen);
        read_bool(&table, "video_highresolution", &mut config.video_highresolution);
        read_bool(&table, "video_displaymessage", &mut config.video_displaymessage);
        read_int(&table, "video_gamescreensize", &mut config.video_gamescreensize);
        read_int(&table, "video_gammacorrection", &mut config.video_gammacorrection);

        config.restored_from_file = true;
        Ok(config)
    }

    // Lines that do not split into exactly two parts on `=` are skipped.
    fn read_table(text: &str) -> Result<HashMap<&str, &str>, ConfigError> {
        let mut table = HashMap::new();
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        for (index, line) in text.lines().enumerate() {
            let mut parts = line.split('=');
            let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };

            let name = name.trim();
            if table.insert(name, value.trim()).is_some() {
                return Err(ConfigError::DuplicateSetting {
                    name: name.to_owned(),
                    line: index + 1,
                });
            }
        }

        Ok(table)
    }

    //--- Saving -----------------------------------------------------------

    /// Writes every setting to `path`. Failures are logged, not returned.
    pub fn save(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();

        match self.write_to(path) {
            Ok(()) => info!(target: "config", "Saved config to {}", path.display()),
            Err(e) => warn!(target: "config", "Could not save config {}: {}", path.display(), e),
        }
    }

    fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let mut out = BufWriter::new(fs::File::create(path)?);

        writeln!(out, "key_forward = {}", self.key_forward)?;
        writeln!(out, "key_backward = {}", self.key_backward)?;
        writeln!(out, "key_strafeleft = {}", self.key_strafeleft)?;
        writeln!(out, "key_straferight = {}", self.key_straferight)?;
        writeln!(out, "key_turnleft = {}", self.key_turnleft)?;
        writeln!(out, "key_turnright = {}", self.key_turnright)?;
        writeln!(out, "key_fire = {}", self.key_fire)?;
        writeln!(out, "key_use = {}", self.key_use)?;
        writeln!(out, "key_run = {}", self.key_run)?;
        writeln!(out, "key_strafe = {}", self.key_strafe)?;

        writeln!(out, "mouse_sensitivity = {}", self.mouse_sensitivity)?;
        writeln!(out, "mouse_disableyaxis = {}", self.mouse_disableyaxis)?;

        writeln!(out, "game_alwaysrun = {}", self.game_alwaysrun)?;

        writeln!(out, "video_screenwidth = {}", self.video_screenwidth)?;
        writeln!(out, "video_screenheight = {}", self.video_screenheight)?;
        writeln!(out, "video_fullscreen = {}", self.video_fullscreen)?;
        writeln!(out, "video_highresolution = {}", self.video_highresolution)?;
        writeln!(out, "video_displaymessage = {}", self.video_displaymessage)?;
        writeln!(out, "video_gamescreensize = {}", self.video_gamescreensize)?;
        writeln!(out, "video_gammacorrection = {}", self.video_gammacorrection)?;

        out.flush()?;
        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    /// `true` if the values came from a file rather than the defaults.
    pub fn is_restored_from_file(&self) -> bool {
        self.restored_from_file
    }

    pub fn into_shared(self) -> SharedConfig {
        Rc::new(RefCell::new(self))
    }

    //--- Window Size Helpers ----------------------------------------------

    /// Largest multiple of 640x400 whose next step still stays below 90%
    /// of the display in both axes. Never smaller than 640x400.
    pub fn default_window_size(display_width: u32, display_height: u32) -> (i32, i32) {
        let limit_w = 0.9 * f64::from(display_width);
        let limit_h = 0.9 * f64::from(display_height);

        let (mut width, mut height) = WINDOW_STEP;
        loop {
            let next = (width + WINDOW_STEP.0, height + WINDOW_STEP.1);
            if f64::from(next.0) >= limit_w || f64::from(next.1) >= limit_h {
                break;
            }
            (width, height) = next;
        }

        (width, height)
    }

    /// Replaces the stored window size with a display-derived default when
    /// nothing was restored from disk.
    pub fn adopt_display_size(&mut self, display_width: u32, display_height: u32) {
        if self.restored_from_file {
            return;
        }
        let (width, height) = Self::default_window_size(display_width, display_height);
        debug!(target: "config", "Default window size {}x{}", width, height);
        self.video_screenwidth = width;
        self.video_screenheight = height;
    }

    /// Clamps the stored window size to the range every host accepts.
    pub fn clamp_window_dimensions(&mut self) {
        self.video_screenwidth = self
            .video_screenwidth
            .clamp(MIN_WINDOW_WIDTH, MAX_WINDOW_WIDTH);
        self.video_screenheight = self
            .video_screenheight
            .clamp(MIN_WINDOW_HEIGHT, MAX_WINDOW_HEIGHT);
    }
}

//=== Value Readers =======================================================

fn read_binding(table: &HashMap<&str, &str>, name: &str, slot: &mut KeyBinding) {
    if let Some(value) = table.get(name) {
        *slot = KeyBinding::parse(value);
    }
}

fn read_int(table: &HashMap<&str, &str>, name: &str, slot: &mut i32) {
    if let Some(value) = table.get(name) {
        match value.parse() {
            Ok(parsed) => *slot = parsed,
            Err(_) => debug!(target: "config", "Bad integer for {}: {:?}", name, value),
        }
    }
}

// Only the exact literals `true` and `false` are accepted.
fn read_bool(table: &HashMap<&str, &str>, name: &str, slot: &mut bool) {
    match table.get(name) {
        Some(&"true") => *slot = true,
        Some(&"false") => *slot = false,
        Some(value) => debug!(target: "config", "Bad boolean for {}: {:?}", name, value),
        None => {}
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    //--- Test Helpers -----------------------------------------------------

    fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("managed-doom.cfg");
        fs::write(&path, contents).unwrap();
        path
    }

    fn without_restore_flag(mut config: Config) -> Config {
        config.restored_from_file = false;
        config
    }

    //=====================================================================
    // Loading
    //=====================================================================

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("absent.cfg"));

        assert_eq!(config, Config::default());
        assert!(!config.is_restored_from_file());
    }

    #[test]
    fn bad_integer_keeps_default() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "mouse_sensitivity = banana\n");

        let config = Config::load(&path);

        assert_eq!(config.mouse_sensitivity, 3);
        assert!(config.is_restored_from_file());
    }

    #[test]
    fn alwaysrun_false_overrides_only_that_setting() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "game_alwaysrun = false\n");

        let config = Config::load(&path);
        let defaults = Config::default();

        assert!(!config.game_alwaysrun);
        assert_eq!(config.key_forward, defaults.key_forward);
        assert_eq!(config.key_backward, defaults.key_backward);
        assert_eq!(config.key_strafeleft, defaults.key_strafeleft);
        assert_eq!(config.key_straferight, defaults.key_straferight);
        assert_eq!(config.key_turnleft, defaults.key_turnleft);
        assert_eq!(config.key_turnright, defaults.key_turnright);
        assert_eq!(config.key_fire, defaults.key_fire);
        assert_eq!(config.key_use, defaults.key_use);
        assert_eq!(config.key_run, defaults.key_run);
        assert_eq!(config.key_strafe, defaults.key_strafe);
    }

    #[test]
    fn booleans_are_case_sensitive() {
        let config = Config::parse("game_alwaysrun = False\nvideo_fullscreen = TRUE\n").unwrap();

        assert!(config.game_alwaysrun);
        assert!(!config.video_fullscreen);
    }

    #[test]
    fn lines_without_exactly_one_equals_are_ignored() {
        let config =
            Config::parse("mouse_sensitivity 7\nvideo_screenwidth = 1 = 2\n# comment\n").unwrap();

        assert_eq!(config.mouse_sensitivity, 3);
        assert_eq!(config.video_screenwidth, 1280);
    }

    #[test]
    fn leading_byte_order_mark_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "\u{feff}mouse_sensitivity = 7\ngame_alwaysrun = false\n");

        let config = Config::load(&path);

        assert_eq!(config.mouse_sensitivity, 7);
        assert!(!config.game_alwaysrun);
    }

    #[test]
    fn duplicate_setting_rejects_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "mouse_sensitivity = 8\ngame_alwaysrun = false\nmouse_sensitivity = 5\n",
        );

        let config = Config::load(&path);

        assert_eq!(config, Config::default());
        assert!(!config.is_restored_from_file());
    }

    #[test]
    fn duplicate_setting_reports_line() {
        let err = Config::parse("a = 1\nb = 2\na = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSetting { line: 3, .. }));
    }

    #[test]
    fn bindings_parse_leniently() {
        let config = Config::parse("key_fire = f, banana, mouse3\nkey_use = none\n").unwrap();

        assert_eq!(
            config.key_fire,
            KeyBinding::new(&[Key::F], &[MouseButton::Mouse3])
        );
        assert!(config.key_use.is_empty());
    }

    #[test]
    fn whitespace_around_names_and_values_is_trimmed() {
        let config = Config::parse("   video_screenheight   =   600   \n").unwrap();
        assert_eq!(config.video_screenheight, 600);
    }

    //=====================================================================
    // Saving
    //=====================================================================

    #[test]
    fn save_then_load_restores_every_setting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("round.cfg");

        let mut config = Config::default();
        config.key_backward = KeyBinding::from_keys(&[Key::Numpad2]);
        config.key_strafe = KeyBinding::empty();
        config.mouse_sensitivity = 9;
        config.mouse_disableyaxis = true;
        config.game_alwaysrun = false;
        config.video_screenwidth = 1920;
        config.video_screenheight = 1200;
        config.video_fullscreen = true;
        config.video_highresolution = false;
        config.video_displaymessage = false;
        config.video_gamescreensize = 4;
        config.video_gammacorrection = 8;

        config.save(&path);
        let restored = Config::load(&path);

        assert!(restored.is_restored_from_file());
        assert_eq!(without_restore_flag(restored), config);
    }

    #[test]
    fn saved_file_contains_backward_binding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.cfg");

        Config::default().save(&path);
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.contains("key_backward = s, down"));
        assert!(text.contains("key_fire = lcontrol, rcontrol, mouse1"));
        assert!(text.contains("game_alwaysrun = true"));
    }

    #[test]
    fn save_to_unwritable_path_is_silent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("out.cfg");

        Config::default().save(&path);

        assert!(!path.exists());
    }

    //=====================================================================
    // Window Size Helpers
    //=====================================================================

    #[test]
    fn default_window_size_steps_below_ninety_percent() {
        assert_eq!(Config::default_window_size(1920, 1080), (1280, 800));
        assert_eq!(Config::default_window_size(2560, 1440), (1920, 1200));
        assert_eq!(Config::default_window_size(800, 600), (640, 400));
    }

    #[test]
    fn adopt_display_size_respects_restored_files() {
        let mut fresh = Config::default();
        fresh.adopt_display_size(2560, 1440);
        assert_eq!((fresh.video_screenwidth, fresh.video_screenheight), (1920, 1200));

        let mut restored = Config::parse("video_screenwidth = 800\n").unwrap();
        restored.adopt_display_size(2560, 1440);
        assert_eq!(restored.video_screenwidth, 800);
    }

    #[test]
    fn window_dimensions_are_clamped() {
        let mut config = Config::default();
        config.video_screenwidth = 10;
        config.video_screenheight = 99_999;

        config.clamp_window_dimensions();

        assert_eq!(config.video_screenwidth, MIN_WINDOW_WIDTH);
        assert_eq!(config.video_screenheight, MAX_WINDOW_HEIGHT);
    }
}
