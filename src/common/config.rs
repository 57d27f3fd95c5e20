use std::hash::Hash;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::common::collections::HashSet;
use crate::layout_engine::validate_layout;
use crate::model::{BarHeight, Direction, Layout};
use crate::ui::icons::parse_color;

pub fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config")).join("winshift")
}

pub fn config_file() -> PathBuf { config_dir().join("config.toml") }

/// On-disk shape of a config file. Used for both the bundled defaults and
/// the user's overrides.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    layouts: Vec<Layout>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    bar_heights: Vec<BarHeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icons: Option<IconSettings>,
}

impl ConfigFile {
    fn parse(buf: &str) -> anyhow::Result<ConfigFile> { Ok(toml::from_str(buf)?) }

    /// Reads the file at `path`, or an empty one if it does not exist yet.
    fn read_or_empty(path: &Path) -> anyhow::Result<ConfigFile> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&buf).with_context(|| format!("parsing {}", path.display()))
    }

    fn write(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Effective configuration: the user's entries merged over the defaults.
#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct Config {
    pub layouts: Vec<Layout>,
    pub bar_heights: Vec<BarHeight>,
    pub icons: IconSettings,
}

/// How `render-icons` draws its previews.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct IconSettings {
    /// Side length of the square image, in pixels.
    #[serde(default = "default_icon_size")]
    pub size: u32,
    #[serde(default = "default_icon_margin")]
    pub margin: u32,
    #[serde(default = "default_screen_color")]
    pub screen_color: String,
    #[serde(default = "default_screen_border_color")]
    pub screen_border_color: String,
    #[serde(default = "default_screen_border_width")]
    pub screen_border_width: u32,
    #[serde(default = "default_window_color")]
    pub window_color: String,
    #[serde(default = "default_window_border_color")]
    pub window_border_color: String,
    #[serde(default = "default_window_border_width")]
    pub window_border_width: u32,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            size: default_icon_size(),
            margin: default_icon_margin(),
            screen_color: default_screen_color(),
            screen_border_color: default_screen_border_color(),
            screen_border_width: default_screen_border_width(),
            window_color: default_window_color(),
            window_border_color: default_window_border_color(),
            window_border_width: default_window_border_width(),
        }
    }
}

impl IconSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.size == 0 {
            issues.push("icons.size must be positive".to_string());
        } else if self.margin.saturating_mul(2) >= self.size {
            issues.push(format!(
                "icons.margin {} leaves no room in a {}px icon",
                self.margin, self.size
            ));
        }

        for (field, color) in [
            ("screen_color", &self.screen_color),
            ("screen_border_color", &self.screen_border_color),
            ("window_color", &self.window_color),
            ("window_border_color", &self.window_border_color),
        ] {
            if let Err(e) = parse_color(color) {
                issues.push(format!("icons.{field}: {e}"));
            }
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;
        let defaults = IconSettings::default();

        if self.size == 0 || self.margin.saturating_mul(2) >= self.size {
            self.size = defaults.size;
            self.margin = defaults.margin;
            fixes += 1;
        }

        for (color, default) in [
            (&mut self.screen_color, defaults.screen_color),
            (&mut self.screen_border_color, defaults.screen_border_color),
            (&mut self.window_color, defaults.window_color),
            (&mut self.window_border_color, defaults.window_border_color),
        ] {
            if parse_color(color).is_err() {
                *color = default;
                fixes += 1;
            }
        }

        fixes
    }
}

fn default_icon_size() -> u32 { 64 }

fn default_icon_margin() -> u32 { 4 }

fn default_screen_color() -> String { "#2e3440ff".to_string() }

fn default_screen_border_color() -> String { "#d8dee9ff".to_string() }

fn default_screen_border_width() -> u32 { 2 }

fn default_window_color() -> String { "#88c0d0ff".to_string() }

fn default_window_border_color() -> String { "#eceff4ff".to_string() }

fn default_window_border_width() -> u32 { 1 }

fn layout_key(layout: &Layout) -> (Direction, String) { (layout.direction, layout.name.clone()) }

fn bar_height_key(bar: &BarHeight) -> String { bar.screen_name.clone() }

/// Merges two keyed collections. Every user entry is kept in order, followed
/// by the defaults whose key the user did not define.
pub fn merge_by_key<T, K: Hash + Eq>(
    user: Vec<T>,
    defaults: Vec<T>,
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let overridden: HashSet<K> = user.iter().map(&key).collect();
    let mut merged = user;
    merged.extend(defaults.into_iter().filter(|item| !overridden.contains(&key(item))));
    merged
}

fn upsert<T, K: PartialEq>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> K) {
    let wanted = key(&item);
    match items.iter_mut().find(|existing| key(existing) == wanted) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

impl Default for Config {
    fn default() -> Self {
        let file = ConfigFile::parse(include_str!("../../winshift.default.toml"))
            .expect("bundled default config is valid");
        Config {
            layouts: file.layouts,
            bar_heights: file.bar_heights,
            icons: file.icons.unwrap_or_default(),
        }
    }
}

impl Config {
    /// Reads the user file at `path` and merges it over the defaults.
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&buf).with_context(|| format!("parsing {}", path.display()))
    }

    /// Like [`Config::read`], but falls back to the defaults when there is
    /// no user file.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        if path.exists() {
            Self::read(path)
        } else {
            debug!(path = %path.display(), "no user config, using defaults");
            Ok(Self::default())
        }
    }

    fn parse(buf: &str) -> anyhow::Result<Config> {
        let user = ConfigFile::parse(buf)?;
        Ok(Self::default().merged_with(user))
    }

    fn merged_with(self, user: ConfigFile) -> Config {
        Config {
            layouts: merge_by_key(user.layouts, self.layouts, layout_key),
            bar_heights: merge_by_key(user.bar_heights, self.bar_heights, bar_height_key),
            icons: user.icons.unwrap_or(self.icons),
        }
    }

    pub fn layout(&self, name: &str, direction: Direction) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.name == name && l.direction == direction)
    }

    pub fn layouts_for(&self, direction: Direction) -> impl Iterator<Item = &Layout> {
        self.layouts.iter().filter(move |l| l.direction == direction)
    }

    pub fn bar_height_for(&self, screen_name: &str) -> Option<&BarHeight> {
        self.bar_heights.iter().find(|b| b.screen_name == screen_name)
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let mut seen_layouts = HashSet::default();
        for layout in &self.layouts {
            if let Err(e) = validate_layout(&layout.layout) {
                issues.push(format!("{} layout {}: {}", layout.direction, layout.name, e));
            }
            if !seen_layouts.insert(layout_key(layout)) {
                issues.push(format!(
                    "duplicate {} layout {}",
                    layout.direction, layout.name
                ));
            }
        }

        let mut seen_screens = HashSet::default();
        for bar in &self.bar_heights {
            issues.extend(bar.validate());
            if !seen_screens.insert(bar_height_key(bar)) {
                issues.push(format!("duplicate bar height for screen {}", bar.screen_name));
            }
        }

        issues.extend(self.icons.validate());

        issues
    }

    /// Drops invalid or duplicate entries and resets out of range values.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        let before = self.layouts.len();
        let mut seen_layouts = HashSet::default();
        self.layouts.retain(|layout| {
            validate_layout(&layout.layout).is_ok() && seen_layouts.insert(layout_key(layout))
        });
        fixes += before - self.layouts.len();

        let before = self.bar_heights.len();
        let mut seen_screens = HashSet::default();
        self.bar_heights.retain(|bar| seen_screens.insert(bar_height_key(bar)));
        fixes += before - self.bar_heights.len();

        for bar in &mut self.bar_heights {
            fixes += bar.auto_fix_values();
        }

        fixes += self.icons.auto_fix_values();

        fixes
    }
}

/// Validates `layout` and stores it in the user file at `path`, replacing an
/// entry with the same name and direction.
pub fn add_layout(path: &Path, layout: Layout) -> anyhow::Result<()> {
    validate_layout(&layout.layout)?;

    let mut file = ConfigFile::read_or_empty(path)?;
    info!(name = %layout.name, direction = %layout.direction, template = %layout.layout, "adding layout");
    upsert(&mut file.layouts, layout, layout_key);
    file.write(path)
}

/// Stores `bar` in the user file at `path`, replacing any entry for the same
/// screen.
pub fn add_bar_height(path: &Path, bar: BarHeight) -> anyhow::Result<()> {
    if bar.screen_name.trim().is_empty() {
        bail!("bar height needs a screen name");
    }
    let issues = bar.validate();
    if !issues.is_empty() {
        bail!("{}", issues.join("; "));
    }

    let mut file = ConfigFile::read_or_empty(path)?;
    info!(screen = %bar.screen_name, ?bar, "adding bar height");
    upsert(&mut file.bar_heights, bar, bar_height_key);
    file.write(path)
}
