use std::path::{Path, PathBuf};

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::renderer::CanvasScale;
use crate::types::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub key_bindings: KeyBindings,
    pub canvas_scale: CanvasScale,
    pub default_object_size: Size,
    pub default_object_color: Rgb,
    pub default_camera_size: Size,
    /// Colors the recolor binding cycles through.
    pub palette: Vec<Rgb>,
    pub play: PlayConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    /// Play surface in world units; camera views are clipped to it.
    pub surface: Size,
    pub fps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub add_object: String,
    pub add_camera: String,
    pub select_next: String,
    pub select_prev: String,
    pub delete: String,
    pub recolor: String,
    pub play: String,
    pub save: String,
    pub new_project: String,
    pub load: String,
    pub quit: String,
    pub confirm: String,
    pub cancel: String,
    pub fullscreen: String,
    pub next_camera: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            key_bindings: KeyBindings::default(),
            canvas_scale: CanvasScale::default(),
            default_object_size: Size { width: 50, height: 50 },
            default_object_color: Rgb::RED,
            default_camera_size: Size { width: 200, height: 150 },
            palette: vec![
                Rgb::RED,
                Rgb::GREEN,
                Rgb::YELLOW,
                Rgb::MAGENTA,
                Rgb::CYAN,
                Rgb::WHITE,
            ],
            play: PlayConfig::default(),
            log_file: None,
        }
    }
}

impl Default for PlayConfig {
    fn default() -> Self {
        PlayConfig {
            surface: Size { width: 800, height: 600 },
            fps: 60,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            add_object: "o".into(),
            add_camera: "c".into(),
            select_next: "Tab".into(),
            select_prev: "Shift-Tab".into(),
            delete: "d".into(),
            recolor: "k".into(),
            play: "p".into(),
            save: "Ctrl-s".into(),
            new_project: "Ctrl-n".into(),
            load: "Ctrl-o".into(),
            quit: "q".into(),
            confirm: "Enter".into(),
            cancel: "Esc".into(),
            fullscreen: "F11".into(),
            next_camera: "Tab".into(),
        }
    }
}

impl Config {
    /// Load the user config, falling back to defaults.
    ///
    /// A missing file is not an error. An unreadable or invalid file yields
    /// the defaults plus the error, so the caller can report it once logging
    /// is up.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        match Self::load_from(&Self::config_path()) {
            Ok(config) => (config.unwrap_or_default(), None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.canvas_scale = config.canvas_scale.clamped();
        Ok(Some(config))
    }

    pub fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("pike-engine");
        path.push("editor.json");
        path
    }
}

/// A parsed key binding such as `"Ctrl-s"`, `"Alt-x"`, `"Shift-Tab"`,
/// `"F11"`, `"Up"` or `"o"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn parse(binding: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = binding;
        loop {
            if let Some(r) = rest.strip_prefix("Ctrl-") {
                modifiers |= KeyModifiers::CONTROL;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("Alt-") {
                modifiers |= KeyModifiers::ALT;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("Shift-") {
                modifiers |= KeyModifiers::SHIFT;
                rest = r;
            } else {
                break;
            }
        }

        let code = match rest {
            "Enter" => KeyCode::Enter,
            "Esc" => KeyCode::Esc,
            "Tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            "Tab" => KeyCode::Tab,
            "Backspace" => KeyCode::Backspace,
            "Delete" => KeyCode::Delete,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            "Up" => KeyCode::Up,
            "Down" => KeyCode::Down,
            "Left" => KeyCode::Left,
            "Right" => KeyCode::Right,
            "Space" => KeyCode::Char(' '),
            s => {
                if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                    KeyCode::F(n)
                } else {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => KeyCode::Char(c),
                        _ => return None,
                    }
                }
            }
        };

        Some(KeyBinding { code, modifiers })
    }

    /// Ctrl and Alt must match exactly; Shift is carried by the key code
    /// itself (`'O'`, `BackTab`) so it is not compared.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let strict = KeyModifiers::CONTROL | KeyModifiers::ALT;
        event.code == self.code && (event.modifiers & strict) == (self.modifiers & strict)
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
/// Unparseable bindings never match.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    KeyBinding::parse(binding).is_some_and(|b| b.matches(event))
}
