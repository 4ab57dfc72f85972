/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to the classic arcade constants if the file is missing or
/// incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::entity::SpriteId;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: RuleConfig,
    pub sprites: SpriteConfig,
    pub gamepad: GamepadConfig,
    pub maze_dir: Option<PathBuf>,
}

/// Everything the simulation reads. Defaults are the arcade constants.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleConfig {
    pub tick_rate_ms: u64,
    pub scare_duration_ms: u32,
    pub ghost_redirect_ticks: u32,
    pub lives: u32,
    pub cherry_one_in: u32, // 0 = no cherries
    pub cherry_cap: usize,  // spawn allowed while count <= cap
    pub seed: Option<u64>,
    pub points: PointTable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointTable {
    pub pellet: u32,
    pub cherry: u32,
    pub power_pellet: u32,
    pub ghost: u32,
    pub level_clear: u32,
}

/// One glyph string per sprite asset.
#[derive(Clone, Debug)]
pub struct SpriteConfig {
    pub wall: String,
    pub blue_ghost: String,
    pub orange_ghost: String,
    pub pink_ghost: String,
    pub red_ghost: String,
    pub scared_ghost: String,
    pub cherry: String,
    pub power_food: String,
    pub pacman_up: String,
    pub pacman_down: String,
    pub pacman_left: String,
    pub pacman_right: String,
}

impl SpriteConfig {
    pub fn glyph(&self, id: SpriteId) -> &str {
        match id {
            SpriteId::Wall => &self.wall,
            SpriteId::BlueGhost => &self.blue_ghost,
            SpriteId::OrangeGhost => &self.orange_ghost,
            SpriteId::PinkGhost => &self.pink_ghost,
            SpriteId::RedGhost => &self.red_ghost,
            SpriteId::ScaredGhost => &self.scared_ghost,
            SpriteId::Cherry => &self.cherry,
            SpriteId::PowerFood => &self.power_food,
            SpriteId::PacmanUp => &self.pacman_up,
            SpriteId::PacmanDown => &self.pacman_down,
            SpriteId::PacmanLeft => &self.pacman_left,
            SpriteId::PacmanRight => &self.pacman_right,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub pause: Vec<String>,
    pub restart: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    scoring: TomlScoring,
    #[serde(default)]
    sprites: TomlSprites,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_scare_duration")]
    scare_duration_ms: u32,
    #[serde(default = "default_redirect_ticks")]
    ghost_redirect_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_cherry_one_in")]
    cherry_one_in: u32,
    #[serde(default = "default_cherry_cap")]
    cherry_cap: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlScoring {
    #[serde(default = "default_pellet_points")]
    pellet: u32,
    #[serde(default = "default_cherry_points")]
    cherry: u32,
    #[serde(default = "default_power_points")]
    power_pellet: u32,
    #[serde(default = "default_ghost_points")]
    ghost: u32,
    #[serde(default = "default_level_clear_points")]
    level_clear: u32,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct TomlSprites {
    wall: String,
    blue_ghost: String,
    orange_ghost: String,
    pink_ghost: String,
    red_ghost: String,
    scared_ghost: String,
    cherry: String,
    power_food: String,
    pacman_up: String,
    pacman_down: String,
    pacman_left: String,
    pacman_right: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pause_buttons")]
    pause: Vec<String>,
    #[serde(default = "default_restart_buttons")]
    restart: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    maze_dir: Option<String>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }
fn default_scare_duration() -> u32 { 10_000 }
fn default_redirect_ticks() -> u32 { 50 }   // ≈2.5 s at 20 Hz
fn default_lives() -> u32 { 3 }
fn default_cherry_one_in() -> u32 { 100 }
fn default_cherry_cap() -> usize { 5 }

fn default_pellet_points() -> u32 { 10 }
fn default_cherry_points() -> u32 { 50 }
fn default_power_points() -> u32 { 100 }
fn default_ghost_points() -> u32 { 200 }
fn default_level_clear_points() -> u32 { 100 }

fn default_pause_buttons() -> Vec<String> { vec!["Start".into()] }
fn default_restart_buttons() -> Vec<String> { vec!["Start".into()] }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            scare_duration_ms: default_scare_duration(),
            ghost_redirect_ticks: default_redirect_ticks(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            lives: default_lives(),
            cherry_one_in: default_cherry_one_in(),
            cherry_cap: default_cherry_cap(),
            seed: None,
        }
    }
}

impl Default for TomlScoring {
    fn default() -> Self {
        TomlScoring {
            pellet: default_pellet_points(),
            cherry: default_cherry_points(),
            power_pellet: default_power_points(),
            ghost: default_ghost_points(),
            level_clear: default_level_clear_points(),
        }
    }
}

impl Default for TomlSprites {
    fn default() -> Self {
        TomlSprites {
            wall: "██".into(),
            blue_ghost: "ᗣ".into(),
            orange_ghost: "ᗣ".into(),
            pink_ghost: "ᗣ".into(),
            red_ghost: "ᗣ".into(),
            scared_ghost: "ᗣ".into(),
            cherry: "🍒".into(),
            power_food: "●".into(),
            pacman_up: "ᗢ".into(),
            pacman_down: "ᗥ".into(),
            pacman_left: "ᗤ".into(),
            pacman_right: "ᗧ".into(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            pause: default_pause_buttons(),
            restart: default_restart_buttons(),
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        TomlConfig::default().rule_config()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into_game_config()
    }
}

// ── Conversion ──

impl TomlConfig {
    fn rule_config(&self) -> RuleConfig {
        RuleConfig {
            // A zero tick would freeze the scare countdown
            tick_rate_ms: self.timing.tick_rate_ms.max(1),
            scare_duration_ms: self.timing.scare_duration_ms,
            ghost_redirect_ticks: self.timing.ghost_redirect_ticks,
            lives: self.rules.lives,
            cherry_one_in: self.rules.cherry_one_in,
            cherry_cap: self.rules.cherry_cap,
            seed: self.rules.seed,
            points: PointTable {
                pellet: self.scoring.pellet,
                cherry: self.scoring.cherry,
                power_pellet: self.scoring.power_pellet,
                ghost: self.scoring.ghost,
                level_clear: self.scoring.level_clear,
            },
        }
    }

    fn into_game_config(self) -> GameConfig {
        let rules = self.rule_config();
        let s = self.sprites;
        GameConfig {
            rules,
            sprites: SpriteConfig {
                wall: s.wall,
                blue_ghost: s.blue_ghost,
                orange_ghost: s.orange_ghost,
                pink_ghost: s.pink_ghost,
                red_ghost: s.red_ghost,
                scared_ghost: s.scared_ghost,
                cherry: s.cherry,
                power_food: s.power_food,
                pacman_up: s.pacman_up,
                pacman_down: s.pacman_down,
                pacman_left: s.pacman_left,
                pacman_right: s.pacman_right,
            },
            gamepad: GamepadConfig {
                pause: self.gamepad.pause,
                restart: self.gamepad.restart,
            },
            maze_dir: self.general.maze_dir.map(PathBuf::from),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut config = load_toml(&search_dirs).into_game_config();

        // Relative maze_dir resolves against the first search dir that has it
        if let Some(dir) = config.maze_dir.take() {
            let resolved = if dir.is_absolute() {
                dir
            } else {
                search_dirs.iter()
                    .map(|d| d.join(&dir))
                    .find(|p| p.is_dir())
                    .unwrap_or(dir)
            };
            config.maze_dir = Some(resolved);
        }

        config
    }

    /// Parse a config document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(TomlConfig::into_game_config)
    }
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
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            return read_toml(&path);
        }
    }
    log::debug!("no config.toml found, using defaults");
    TomlConfig::default()
}

fn read_toml(path: &Path) -> TomlConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => {
                log::info!("loaded {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("config.toml parse error: {e}; using default settings");
                TomlConfig::default()
            }
        },
        Err(e) => {
            log::warn!("could not read {}: {e}", path.display());
            TomlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_arcade_defaults() {
        let cfg = GameConfig::from_toml_str("").unwrap();
        let r = &cfg.rules;
        assert_eq!(r.tick_rate_ms, 50);
        assert_eq!(r.scare_duration_ms, 10_000);
        assert_eq!(r.ghost_redirect_ticks, 50);
        assert_eq!(r.lives, 3);
        assert_eq!(r.cherry_one_in, 100);
        assert_eq!(r.cherry_cap, 5);
        assert_eq!(r.seed, None);
        assert_eq!(r.points, PointTable { pellet: 10, cherry: 50, power_pellet: 100, ghost: 200, level_clear: 100 });
        assert!(cfg.maze_dir.is_none());
        assert_eq!(cfg.gamepad.pause, vec!["Start".to_string()]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[rules]\nlives = 5\nseed = 42\n\n[scoring]\nghost = 400\n\n[sprites]\nwall = \"##\"\n",
        ).unwrap();
        assert_eq!(cfg.rules.lives, 5);
        assert_eq!(cfg.rules.seed, Some(42));
        assert_eq!(cfg.rules.cherry_cap, 5);
        assert_eq!(cfg.rules.points.ghost, 400);
        assert_eq!(cfg.rules.points.pellet, 10);
        assert_eq!(cfg.sprites.glyph(SpriteId::Wall), "##");
        assert_eq!(cfg.sprites.glyph(SpriteId::PacmanRight), "ᗧ");
    }

    #[test]
    fn maze_dir_is_read_from_general() {
        let cfg = GameConfig::from_toml_str("[general]\nmaze_dir = \"mazes\"\n").unwrap();
        assert_eq!(cfg.maze_dir, Some(PathBuf::from("mazes")));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(GameConfig::from_toml_str("[rules]\nlives = \"many\"\n").is_err());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let cfg = GameConfig::from_toml_str(include_str!("../config.toml")).unwrap();
        assert_eq!(cfg.rules, RuleConfig::default());
        for id in SpriteId::ALL {
            assert_eq!(cfg.sprites.glyph(id), GameConfig::default().sprites.glyph(id));
        }
        assert!(cfg.maze_dir.is_none());
    }

    #[test]
    fn zero_tick_rate_is_raised_to_one() {
        let cfg = GameConfig::from_toml_str("[timing]\ntick_rate_ms = 0\n").unwrap();
        assert_eq!(cfg.rules.tick_rate_ms, 1);
    }

    #[test]
    fn avatar_glyphs_differ_from_ghost_glyphs() {
        let sprites = GameConfig::default().sprites;
        let ghosts = [
            SpriteId::RedGhost, SpriteId::BlueGhost, SpriteId::PinkGhost,
            SpriteId::OrangeGhost, SpriteId::ScaredGhost,
        ];
        for facing in crate::domain::entity::Facing::ALL {
            let avatar = sprites.glyph(SpriteId::for_avatar(facing));
            assert!(ghosts.iter().all(|&g| sprites.glyph(g) != avatar), "{facing:?}");
        }
    }

    #[test]
    fn default_rules_match_default_config() {
        assert_eq!(RuleConfig::default(), GameConfig::default().rules);
    }
}
