/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Relative data paths are resolved against the same search directories.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub title: String,
    pub questions_path: PathBuf,
    pub title_path: PathBuf,
    pub delimiter: char,
    pub emotions_dir: PathBuf,
    pub sounds_dir: PathBuf,
    pub fps: u32,
    pub board: BoardConfig,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug)]
pub struct BoardConfig {
    pub rows: Vec<String>,
    pub columns: usize,
    pub start_columns: [usize; 2],
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub control: Vec<String>,
    pub pick: Vec<String>,
    pub new_game: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Log file; `None` disables logging.
    pub file: Option<PathBuf>,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    board: TomlBoard,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_data_dir")]
    data_dir: String,
    #[serde(default = "default_questions_file")]
    questions_file: String,
    #[serde(default = "default_delimiter")]
    delimiter: char,
    #[serde(default = "default_emotions_dir")]
    emotions_dir: String,
    #[serde(default = "default_sounds_dir")]
    sounds_dir: String,
    #[serde(default = "default_fps")]
    fps: u32,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_rows")]
    rows: Vec<String>,
    #[serde(default = "default_columns")]
    columns: usize,
    #[serde(default = "default_start_columns")]
    start_columns: [usize; 2],
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_control")]
    control: Vec<String>,
    #[serde(default = "default_pick")]
    pick: Vec<String>,
    #[serde(default = "default_new_game")]
    new_game: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_title() -> String { "Recall It All Together".into() }
fn default_data_dir() -> String { "data".into() }
fn default_questions_file() -> String { "quest.csv".into() }
fn default_delimiter() -> char { ';' }
fn default_emotions_dir() -> String { "emotions".into() }
fn default_sounds_dir() -> String { "sounds".into() }
fn default_fps() -> u32 { 10 }

fn default_rows() -> Vec<String> {
    ["S", "M", "L", "XL", "V"].iter().map(|s| s.to_string()).collect()
}
fn default_columns() -> usize { 5 }
fn default_start_columns() -> [usize; 2] { [1, 3] }

fn default_control() -> Vec<String> { vec!["Start".into(), "X".into()] }
fn default_pick() -> Vec<String> { vec!["A".into()] }
fn default_new_game() -> Vec<String> { vec!["Y".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

fn default_log_file() -> String { "hexquiz.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            title: default_title(),
            data_dir: default_data_dir(),
            questions_file: default_questions_file(),
            delimiter: default_delimiter(),
            emotions_dir: default_emotions_dir(),
            sounds_dir: default_sounds_dir(),
            fps: default_fps(),
        }
    }
}

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            rows: default_rows(),
            columns: default_columns(),
            start_columns: default_start_columns(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            control: default_control(),
            pick: default_pick(),
            new_game: default_new_game(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            level: default_log_level(),
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
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    /// Build from TOML text (used by tests; paths resolve against `base`).
    #[cfg(test)]
    fn from_str(text: &str, base: &Path) -> Result<Self, toml::de::Error> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(cfg, &[base.to_path_buf()]))
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let data_dir = resolve_dir(&cfg.general.data_dir, search_dirs);
        let log_file = if cfg.log.file.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&cfg.log.file))
        };

        GameConfig {
            title: cfg.general.title,
            questions_path: data_dir.join(&cfg.general.questions_file),
            title_path: data_dir.join("game_head.txt"),
            delimiter: cfg.general.delimiter,
            emotions_dir: resolve_dir(&cfg.general.emotions_dir, search_dirs),
            sounds_dir: resolve_dir(&cfg.general.sounds_dir, search_dirs),
            fps: cfg.general.fps.clamp(1, 60),
            board: BoardConfig {
                rows: cfg.board.rows,
                columns: cfg.board.columns,
                start_columns: cfg.board.start_columns,
            },
            gamepad: GamepadConfig {
                control: cfg.gamepad.control,
                pick: cfg.gamepad.pick,
                new_game: cfg.gamepad.new_game,
                quit: cfg.gamepad.quit,
            },
            log: LogConfig {
                file: log_file,
                level: cfg.log.level,
            },
        }
    }

    /// Title from `game_head.txt` if present (first 30 chars), else the
    /// configured one.
    pub fn resolve_title(&self) -> String {
        match std::fs::read_to_string(&self.title_path) {
            Ok(text) => {
                let head: String = text.trim().chars().take(30).collect();
                if head.is_empty() { self.title.clone() } else { head }
            }
            Err(_) => self.title.clone(),
        }
    }
}

/// Absolute paths are kept; relative ones are looked up in the search dirs
/// and default to CWD-relative.
fn resolve_dir(name: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = PathBuf::from(name);
    if path.is_absolute() {
        return path;
    }
    search_dirs
        .iter()
        .map(|d| d.join(name))
        .find(|p| p.is_dir())
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. Fallback
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
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PathBuf {
        std::env::temp_dir().join("hexquiz-config-test-missing")
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_str("", &base()).unwrap();
        assert_eq!(cfg.board.rows, vec!["S", "M", "L", "XL", "V"]);
        assert_eq!(cfg.board.columns, 5);
        assert_eq!(cfg.board.start_columns, [1, 3]);
        assert_eq!(cfg.delimiter, ';');
        assert_eq!(cfg.fps, 10);
        assert_eq!(cfg.questions_path, Path::new("data").join("quest.csv"));
        assert_eq!(cfg.log.file, Some(PathBuf::from("hexquiz.log")));
        assert_eq!(cfg.gamepad.pick, vec!["A"]);
    }

    #[test]
    fn partial_sections_override() {
        let text = r#"
            [general]
            delimiter = ","
            fps = 500

            [board]
            rows = ["easy", "hard", "goal"]
            start_columns = [0, 2]

            [log]
            file = ""
        "#;
        let cfg = GameConfig::from_str(text, &base()).unwrap();
        assert_eq!(cfg.delimiter, ',');
        assert_eq!(cfg.fps, 60);
        assert_eq!(cfg.board.rows.len(), 3);
        assert_eq!(cfg.board.columns, 5);
        assert_eq!(cfg.board.start_columns, [0, 2]);
        assert_eq!(cfg.log.file, None);
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn bad_types_are_errors() {
        assert!(GameConfig::from_str("[board]\ncolumns = \"five\"\n", &base()).is_err());
    }

    #[test]
    fn title_file_overrides_and_truncates() {
        let dir = std::env::temp_dir().join(format!("hexquiz-title-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut cfg = GameConfig::from_str("", &base()).unwrap();
        cfg.title_path = dir.join("game_head.txt");
        assert_eq!(cfg.resolve_title(), "Recall It All Together");

        std::fs::write(&cfg.title_path, "  A very long game title that keeps going on\n").unwrap();
        let title = cfg.resolve_title();
        assert_eq!(title.chars().count(), 30);
        assert!(title.starts_with("A very long"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
