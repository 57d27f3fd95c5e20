use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("screen {name} has invalid dimensions {width}x{height}")]
    InvalidScreenSize { name: String, width: i32, height: i32 },
}

/// Orientation of a screen. Layouts are defined per direction.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn of(width: i32, height: i32) -> Self {
        if width > height {
            Direction::Horizontal
        } else {
            Direction::Vertical
        }
    }
}

/// Snapshot of one monitor in desktop coordinates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScreenData {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub direction: Direction,
}

impl ScreenData {
    pub fn new(
        name: impl Into<String>,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        if width <= 0 || height <= 0 {
            return Err(ModelError::InvalidScreenSize { name, width, height });
        }
        Ok(ScreenData {
            name,
            x,
            y,
            width,
            height,
            direction: Direction::of(width, height),
        })
    }

    pub fn right(&self) -> i32 { self.x + self.width }

    pub fn bottom(&self) -> i32 { self.y + self.height }

    /// Inclusive on both ends.
    pub fn spans_x(&self, x: i32) -> bool { self.x <= x && x <= self.right() }

    /// Inclusive on both ends.
    pub fn spans_y(&self, y: i32) -> bool { self.y <= y && y <= self.bottom() }
}

impl fmt::Display for ScreenData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{}+{}+{} ({})",
            self.name, self.width, self.height, self.x, self.y, self.direction
        )
    }
}

/// The window that is about to be moved, as reported by the window system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WindowData {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl fmt::Display for WindowData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "window {} {}x{}+{}+{}",
            self.id, self.width, self.height, self.x, self.y
        )
    }
}

/// Final absolute geometry for a window. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CalculatedLayout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl fmt::Display for CalculatedLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn direction_follows_aspect_ratio() {
        assert_eq!(Direction::of(1920, 1080), Direction::Horizontal);
        assert_eq!(Direction::of(1080, 1920), Direction::Vertical);
        assert_eq!(Direction::of(1000, 1000), Direction::Vertical);
    }

    #[test]
    fn direction_round_trips_through_strings() {
        assert_eq!(Direction::from_str("horizontal"), Ok(Direction::Horizontal));
        assert_eq!(Direction::from_str("vertical"), Ok(Direction::Vertical));
        assert!(Direction::from_str("diagonal").is_err());
        assert_eq!(Direction::Vertical.to_string(), "vertical");
    }

    #[test]
    fn screen_rejects_empty_dimensions() {
        assert_eq!(
            ScreenData::new("DP-0", 0, 0, 0, 1080),
            Err(ModelError::InvalidScreenSize {
                name: "DP-0".into(),
                width: 0,
                height: 1080,
            })
        );
        assert!(ScreenData::new("DP-0", 0, 0, 1920, -1).is_err());
    }

    #[test]
    fn screen_spans_are_inclusive() {
        let screen = ScreenData::new("DP-1", 1920, 0, 1920, 1080).unwrap();
        assert!(screen.spans_x(1920));
        assert!(screen.spans_x(3840));
        assert!(!screen.spans_x(3841));
        assert!(screen.spans_y(0));
        assert!(screen.spans_y(1080));
        assert!(!screen.spans_y(-1));
    }
}
