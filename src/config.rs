/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD), or from an
/// explicit `--config` path. Falls back to defaults if the file is missing,
/// incomplete or unparsable.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::catch::Tolerance;
use crate::error::{Result, ZineError};
use crate::sim::clock::SpawnWindow;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct ZineConfig {
    pub engine: EngineConfig,
    pub log: LogConfig,
    pub winter_hush: WinterHushConfig,
    pub fragments: FragmentsConfig,
    pub amber_light: SpawnWindow,
    pub caret_cuts: SpawnWindow,
    /// Problems found while loading, logged once the logger is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub tick_rate_ms: u64,
    pub max_catch_up_ticks: u32,
    pub seed: Option<u64>,
    /// Overrides every zine's own theme.
    pub theme: Option<String>,
    /// Title card shown before each issue; zero skips it.
    pub splash_ms: u64,
}

impl EngineConfig {
    pub fn tick_secs(&self) -> f64 {
        self.tick_rate_ms as f64 / 1000.0
    }
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct WinterHushConfig {
    pub spawn: SpawnWindow,
    pub tolerance: Tolerance,
    pub payload_chance: f64,
}

#[derive(Clone, Debug)]
pub struct FragmentsConfig {
    pub spawn: SpawnWindow,
    pub catch_band: f32,
    /// Catch zone row, counted up from the bottom edge.
    pub zone_offset: usize,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    engine: TomlEngine,
    #[serde(default)]
    log: TomlLog,
    #[serde(default)]
    winter_hush: TomlWinterHush,
    #[serde(default)]
    fragments: TomlFragments,
    #[serde(default = "default_amber_light")]
    amber_light: TomlSpawn,
    #[serde(default = "default_caret_cuts")]
    caret_cuts: TomlSpawn,
}

#[derive(Deserialize, Debug)]
struct TomlEngine {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_max_catch_up")]
    max_catch_up_ticks: u32,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default = "default_splash")]
    splash_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_level")]
    level: String,
    #[serde(default)]
    file: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlWinterHush {
    #[serde(default = "default_snow_min")]
    spawn_min_secs: f64,
    #[serde(default = "default_snow_max")]
    spawn_max_secs: f64,
    #[serde(default = "default_tolerance_x")]
    catch_tolerance_x: f32,
    #[serde(default = "default_tolerance_y")]
    catch_tolerance_y: f32,
    #[serde(default = "default_payload_chance")]
    payload_chance: f64,
}

#[derive(Deserialize, Debug)]
struct TomlFragments {
    #[serde(default = "default_fragment_min")]
    spawn_min_secs: f64,
    #[serde(default = "default_fragment_max")]
    spawn_max_secs: f64,
    #[serde(default = "default_catch_band")]
    catch_band: f32,
    #[serde(default = "default_zone_offset")]
    zone_offset: usize,
}

/// Spawn window for zines with nothing else to configure.
/// Missing keys fall back to the common half-second to two-second window.
#[derive(Deserialize, Debug)]
struct TomlSpawn {
    #[serde(default = "default_slow_min")]
    spawn_min_secs: f64,
    #[serde(default = "default_slow_max")]
    spawn_max_secs: f64,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }
fn default_max_catch_up() -> u32 { 5 }
fn default_splash() -> u64 { 2000 }
fn default_log_level() -> String { "info".into() }
fn default_snow_min() -> f64 { 0.1 }
fn default_snow_max() -> f64 { 0.5 }
fn default_tolerance_x() -> f32 { 2.0 }
fn default_tolerance_y() -> f32 { 1.5 }
fn default_payload_chance() -> f64 { 0.25 }
fn default_fragment_min() -> f64 { 0.3 }
fn default_fragment_max() -> f64 { 0.8 }
fn default_catch_band() -> f32 { 1.0 }
fn default_zone_offset() -> usize { 8 }
fn default_slow_min() -> f64 { 0.5 }
fn default_slow_max() -> f64 { 2.0 }
fn default_amber_light() -> TomlSpawn { TomlSpawn::default() }
fn default_caret_cuts() -> TomlSpawn { TomlSpawn::default() }

impl Default for TomlEngine {
    fn default() -> Self {
        TomlEngine {
            tick_rate_ms: default_tick_rate(),
            max_catch_up_ticks: default_max_catch_up(),
            seed: None,
            theme: None,
            splash_ms: default_splash(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { level: default_log_level(), file: None }
    }
}

impl Default for TomlWinterHush {
    fn default() -> Self {
        TomlWinterHush {
            spawn_min_secs: default_snow_min(),
            spawn_max_secs: default_snow_max(),
            catch_tolerance_x: default_tolerance_x(),
            catch_tolerance_y: default_tolerance_y(),
            payload_chance: default_payload_chance(),
        }
    }
}

impl Default for TomlFragments {
    fn default() -> Self {
        TomlFragments {
            spawn_min_secs: default_fragment_min(),
            spawn_max_secs: default_fragment_max(),
            catch_band: default_catch_band(),
            zone_offset: default_zone_offset(),
        }
    }
}

impl Default for TomlSpawn {
    fn default() -> Self {
        TomlSpawn { spawn_min_secs: default_slow_min(), spawn_max_secs: default_slow_max() }
    }
}

// ── Loading ──

impl Default for ZineConfig {
    fn default() -> Self {
        ZineConfig::from_toml(TomlConfig::default(), Vec::new())
    }
}

impl ZineConfig {
    /// Load config from `explicit`, or search for `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// An explicit path that cannot be read is an error; everything else
    /// falls back to defaults with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut warnings = Vec::new();
        let toml_cfg = match explicit {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    ZineError::Config(format!("could not read {}: {e}", path.display()))
                })?;
                parse_or_default(&text, path, &mut warnings)
            }
            None => search_toml(&candidate_dirs(), &mut warnings),
        };
        Ok(ZineConfig::from_toml(toml_cfg, warnings))
    }

    /// Parse config text directly. Parse errors are returned, not defaulted.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(ZineConfig::from_toml(toml_cfg, Vec::new()))
    }

    fn from_toml(t: TomlConfig, mut warnings: Vec<String>) -> Self {
        if t.engine.tick_rate_ms == 0 {
            warnings.push("engine.tick_rate_ms must be positive; using 1".into());
        }
        ZineConfig {
            engine: EngineConfig {
                tick_rate_ms: t.engine.tick_rate_ms.max(1),
                max_catch_up_ticks: t.engine.max_catch_up_ticks.max(1),
                seed: t.engine.seed,
                theme: t.engine.theme,
                splash_ms: t.engine.splash_ms,
            },
            log: LogConfig {
                level: t.log.level,
                file: t.log.file.map(PathBuf::from),
            },
            winter_hush: WinterHushConfig {
                spawn: window(
                    "winter_hush",
                    t.winter_hush.spawn_min_secs,
                    t.winter_hush.spawn_max_secs,
                    &mut warnings,
                ),
                tolerance: Tolerance {
                    x: t.winter_hush.catch_tolerance_x.abs(),
                    y: t.winter_hush.catch_tolerance_y.abs(),
                },
                payload_chance: probability(
                    "winter_hush.payload_chance",
                    t.winter_hush.payload_chance,
                    default_payload_chance(),
                    &mut warnings,
                ),
            },
            fragments: FragmentsConfig {
                spawn: window(
                    "fragments",
                    t.fragments.spawn_min_secs,
                    t.fragments.spawn_max_secs,
                    &mut warnings,
                ),
                catch_band: t.fragments.catch_band.abs(),
                zone_offset: t.fragments.zone_offset,
            },
            amber_light: window(
                "amber_light",
                t.amber_light.spawn_min_secs,
                t.amber_light.spawn_max_secs,
                &mut warnings,
            ),
            caret_cuts: window(
                "caret_cuts",
                t.caret_cuts.spawn_min_secs,
                t.caret_cuts.spawn_max_secs,
                &mut warnings,
            ),
            warnings,
        }
    }
}

/// Build a spawn window, swapping reversed bounds.
fn window(section: &str, min: f64, max: f64, warnings: &mut Vec<String>) -> SpawnWindow {
    let (min, max) = (min.max(0.0), max.max(0.0));
    if min > max {
        warnings.push(format!(
            "{section}: spawn_min_secs {min} is above spawn_max_secs {max}; swapped"
        ));
        SpawnWindow::new(max, min)
    } else {
        SpawnWindow::new(min, max)
    }
}

/// Clamp into `0.0..=1.0`. `nan` and infinities fall back to `default`.
fn probability(key: &str, value: f64, default: f64, warnings: &mut Vec<String>) -> f64 {
    if !value.is_finite() {
        warnings.push(format!("{key} must be a finite number; using {default}"));
        return default;
    }
    value.clamp(0.0, 1.0)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn search_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() { continue; }
        match std::fs::read_to_string(&path) {
            Ok(text) => return parse_or_default(&text, &path, warnings),
            Err(e) => warnings.push(format!("could not read {}: {e}", path.display())),
        }
    }
    TomlConfig::default()
}

fn parse_or_default(text: &str, path: &Path, warnings: &mut Vec<String>) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Warning: {} parse error: {e}", path.display());
            eprintln!("Using default settings.");
            warnings.push(format!("{} parse error, using defaults: {e}", path.display()));
            TomlConfig::default()
        }
    }
}
