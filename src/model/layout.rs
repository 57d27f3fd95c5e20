use serde::{Deserialize, Serialize};

use super::Direction;

/// A named tiling pattern for one screen direction.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    pub name: String,
    /// Four comma separated expressions over `{x}`, `{y}`, `{width}` and `{height}`.
    pub layout: String,
    pub direction: Direction,
}

impl Layout {
    pub fn new(name: impl Into<String>, layout: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            layout: layout.into(),
            direction,
        }
    }
}

/// Reserved margins for a screen (status bars, docks) plus the uniform gap
/// applied to edges that are not reserved.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct BarHeight {
    pub screen_name: String,
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub bottom: i32,
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub gap: i32,
}

impl BarHeight {
    pub fn none(screen_name: impl Into<String>) -> Self {
        Self {
            screen_name: screen_name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (edge, value) in [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
            ("gap", self.gap),
        ] {
            if value < 0 {
                issues.push(format!(
                    "bar height {} for screen {} must be non-negative, got {}",
                    edge, self.screen_name, value
                ));
            }
        }

        issues
    }

    /// Resets negative values to zero. Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        for value in [
            &mut self.top,
            &mut self.bottom,
            &mut self.left,
            &mut self.right,
            &mut self.gap,
        ] {
            if *value < 0 {
                *value = 0;
                fixes += 1;
            }
        }

        fixes
    }
}
