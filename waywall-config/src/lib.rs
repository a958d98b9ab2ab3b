// SPDX-License-Identifier: GPL-3.0-only

//! Profile configuration for waywall.
//!
//! Profiles are RON files stored in `$XDG_CONFIG_HOME/waywall/` (falling
//! back to `~/.config/waywall/`). A profile describes the appearance of the
//! wall, the XKB settings and remap table used for input routing, and the
//! CPU weights applied to the cgroup priority groups.

use std::{fmt, fs, path::PathBuf, str::FromStr};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use xdg::BaseDirectories;

/// An RGBA color, stored as `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Solid black, the default wall background.
    pub const BLACK: Color = Color([0, 0, 0, 255]);

    /// Returns the color packed as little-endian ARGB8888, the only format
    /// the shared buffer pool serves.
    pub fn argb8888(&self) -> [u8; 4] {
        let [r, g, b, a] = self.0;
        [b, g, r, a]
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("invalid hex color {s:?}");
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).unwrap() * 0x11;
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap();

        Ok(Color(match hex.len() {
            3 => [nibble(0), nibble(1), nibble(2), 255],
            4 => [nibble(0), nibble(1), nibble(2), nibble(3)],
            6 => [byte(0), byte(2), byte(4), 255],
            8 => [byte(0), byte(2), byte(4), byte(6)],
            _ => bail!("invalid hex color {s:?}"),
        }))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A keyboard modifier usable in remap rules.
#[derive(Debug, Deserialize, Serialize, Copy, Clone, PartialEq, Eq)]
pub enum Modifier {
    Shift,
    Caps,
    Ctrl,
    Alt,
    Mod2,
    Mod3,
    Logo,
    Mod5,
}

impl Modifier {
    /// Bit position matching the `wl_keyboard.modifiers` depressed mask.
    pub fn mask(self) -> u32 {
        1 << match self {
            Modifier::Shift => 0,
            Modifier::Caps => 1,
            Modifier::Ctrl => 2,
            Modifier::Alt => 3,
            Modifier::Mod2 => 4,
            Modifier::Mod3 => 5,
            Modifier::Logo => 6,
            Modifier::Mod5 => 7,
        }
    }
}

/// Folds a modifier list into a single depressed-modifier mask.
pub fn modifier_mask(mods: &[Modifier]) -> u32 {
    mods.iter().fold(0, |acc, m| acc | m.mask())
}

/// One side of a remap rule: an evdev keycode or a pointer button code.
#[derive(Debug, Deserialize, Serialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RemapTarget {
    /// An evdev keycode (`KEY_*`, e.g. 17 for W).
    Key(u32),
    /// A pointer button code (`BTN_*`, e.g. 272 for left).
    Button(u32),
}

/// A single remap rule.
///
/// `mods: None` is a wildcard and matches any modifier set. `output: None`
/// marks a binding consumed by the surrounding system; the input event is
/// swallowed and never forwarded to the focused client.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Remap {
    pub input: RemapTarget,
    #[serde(default)]
    pub mods: Option<Vec<Modifier>>,
    #[serde(default)]
    pub output: Option<RemapTarget>,
}

/// XKB keymap settings handed to guests.
///
/// Empty strings defer to libxkbcommon's defaults, the same convention the
/// `xkb_rule_names` struct uses.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct XkbSettings {
    #[serde(default)]
    pub rules: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub options: String,
}

/// Input routing options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    #[serde(default)]
    pub xkb: XkbSettings,
    /// Key repeat rate in characters per second.
    #[serde(default = "default_repeat_rate")]
    pub repeat_rate: i32,
    /// Key repeat delay in milliseconds.
    #[serde(default = "default_repeat_delay")]
    pub repeat_delay: i32,
    #[serde(default)]
    pub remaps: Vec<Remap>,
}

fn default_repeat_rate() -> i32 {
    25
}

fn default_repeat_delay() -> i32 {
    600
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            xkb: XkbSettings::default(),
            repeat_rate: default_repeat_rate(),
            repeat_delay: default_repeat_delay(),
            remaps: Vec::new(),
        }
    }
}

/// Appearance of the wall window.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    #[serde(default = "default_background")]
    pub background: Color,
    /// Optional image composited over the background, decoded into the
    /// shared buffer pool.
    #[serde(default)]
    pub background_png: Option<PathBuf>,
}

fn default_background() -> Color {
    Color::BLACK
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self { background: default_background(), background_png: None }
    }
}

/// cgroup weights for the CPU priority groups and the preview threshold.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct CpuConfig {
    #[serde(default = "default_weight_idle")]
    pub weight_idle: u32,
    #[serde(default = "default_weight_low")]
    pub weight_low: u32,
    #[serde(default = "default_weight_high")]
    pub weight_high: u32,
    #[serde(default = "default_weight_active")]
    pub weight_active: u32,
    /// World-generation percentage past which a previewing instance is
    /// demoted from `high` to `low`.
    #[serde(default = "default_preview_threshold")]
    pub preview_threshold: i32,
}

fn default_weight_idle() -> u32 {
    1
}

fn default_weight_low() -> u32 {
    2
}

fn default_weight_high() -> u32 {
    19
}

fn default_weight_active() -> u32 {
    100
}

fn default_preview_threshold() -> i32 {
    30
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            weight_idle: default_weight_idle(),
            weight_low: default_weight_low(),
            weight_high: default_weight_high(),
            weight_active: default_weight_active(),
            preview_threshold: default_preview_threshold(),
        }
    }
}

/// A complete waywall profile.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub cpu: CpuConfig,
}

impl Profile {
    /// Loads the named profile, or `waywall.ron` when `name` is `None`.
    pub fn load(name: Option<&str>) -> Result<Self> {
        let path = profile_path(name)?;
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read profile {}", path.display()))?;
        let profile = ron::from_str(&data)
            .with_context(|| format!("failed to parse profile {}", path.display()))?;
        debug!("loaded profile from {}", path.display());
        Ok(profile)
    }

    /// Like [`Profile::load`], but falls back to the default profile when
    /// no profile file exists on disk.
    pub fn load_or_default(name: Option<&str>) -> Result<Self> {
        match profile_path(name) {
            Ok(path) if path.exists() => Self::load(name),
            Ok(_) | Err(_) => {
                debug!("no profile on disk, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Returns the configuration directory, creating nothing.
pub fn config_dir() -> Result<PathBuf> {
    let base = BaseDirectories::with_prefix("waywall")
        .context("failed to resolve XDG base directories")?;
    Ok(base.get_config_home())
}

fn profile_path(name: Option<&str>) -> Result<PathBuf> {
    let mut path = config_dir()?;
    path.push(format!("{}.ron", name.unwrap_or("waywall")));
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parsing() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color([255, 255, 255, 255]));
        assert_eq!("#ff00ffff".parse::<Color>().unwrap(), Color([255, 0, 255, 255]));
        assert_eq!("1a2b3c".parse::<Color>().unwrap(), Color([0x1a, 0x2b, 0x3c, 255]));
        assert_eq!("#abcd".parse::<Color>().unwrap(), Color([0xaa, 0xbb, 0xcc, 0xdd]));
        assert!("#ggg".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn color_argb_order() {
        let c = Color([0x11, 0x22, 0x33, 0x44]);
        assert_eq!(c.argb8888(), [0x33, 0x22, 0x11, 0x44]);
    }

    #[test]
    fn profile_round_trip() {
        let profile = Profile {
            theme: ThemeConfig { background: Color([16, 32, 48, 255]), background_png: None },
            input: InputConfig {
                remaps: vec![Remap {
                    input: RemapTarget::Key(17),
                    mods: Some(vec![Modifier::Ctrl]),
                    output: None,
                }],
                ..Default::default()
            },
            cpu: CpuConfig::default(),
        };

        let text = ron::to_string(&profile).unwrap();
        let back: Profile = ron::from_str(&text).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn partial_profile_uses_defaults() {
        let profile: Profile = ron::from_str("(cpu: (preview_threshold: 20))").unwrap();
        assert_eq!(profile.cpu.preview_threshold, 20);
        assert_eq!(profile.cpu.weight_active, 100);
        assert_eq!(profile.input.repeat_rate, 25);
        assert_eq!(profile.theme.background, Color::BLACK);
    }

    #[test]
    fn modifier_masks_are_distinct() {
        let all = [
            Modifier::Shift,
            Modifier::Caps,
            Modifier::Ctrl,
            Modifier::Alt,
            Modifier::Mod2,
            Modifier::Mod3,
            Modifier::Logo,
            Modifier::Mod5,
        ];
        let mask = modifier_mask(&all);
        assert_eq!(mask.count_ones() as usize, all.len());
    }
}
