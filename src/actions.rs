//! Operations behind the command line, written against [`System`] so they
//! can run without an X server.

use serde::Serialize;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{info, instrument};

use crate::common::config::Config;
use crate::layout_engine::{LayoutError, calculate, locate};
use crate::model::{CalculatedLayout, Direction, Layout, ScreenData, WindowData};
use crate::sys::screen::list_screens;
use crate::sys::window::{active_window, resize_and_move};
use crate::sys::{SysError, System};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("no screen named {0:?}")]
    ScreenNotFound(String),
    #[error("no screen contains the point ({x}, {y})")]
    NoScreenAtPoint { x: i32, y: i32 },
    #[error("no {direction} layout named {name:?}")]
    LayoutNotFound { name: String, direction: Direction },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Sys(#[from] SysError),
}

/// Outcome of [`change_layout`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub window: WindowData,
    pub screen: ScreenData,
    pub layout: Layout,
    pub geometry: CalculatedLayout,
    /// False for a dry run.
    pub applied: bool,
}

/// Picks the screen by name, or the one holding the window's origin.
pub fn resolve_screen<'a>(
    screens: &'a [ScreenData],
    screen_name: Option<&str>,
    window: &WindowData,
) -> Result<&'a ScreenData, ActionError> {
    match screen_name {
        Some(name) => screens
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ActionError::ScreenNotFound(name.to_string())),
        None => locate(screens, window.x, window.y).ok_or(ActionError::NoScreenAtPoint {
            x: window.x,
            y: window.y,
        }),
    }
}

/// Moves the focused window into `layout_name` on its screen, or on
/// `screen_name` when given.
#[instrument(skip(system, config))]
pub fn change_layout<S: System>(
    system: &S,
    config: &Config,
    layout_name: &str,
    screen_name: Option<&str>,
    dry_run: bool,
) -> Result<Placement, ActionError> {
    let screens = list_screens(system)?;
    let window = active_window(system)?;
    let screen = resolve_screen(&screens, screen_name, &window)?;

    let layout = config.layout(layout_name, screen.direction).ok_or_else(|| {
        ActionError::LayoutNotFound {
            name: layout_name.to_string(),
            direction: screen.direction,
        }
    })?;
    let geometry = calculate(screen, layout, config.bar_height_for(&screen.name))?;

    if dry_run {
        info!(%screen, %geometry, "dry run, leaving the window in place");
    } else {
        resize_and_move(system, &window, &geometry)?;
    }

    Ok(Placement {
        window,
        screen: screen.clone(),
        layout: layout.clone(),
        geometry,
        applied: !dry_run,
    })
}

/// Layout names grouped by direction, optionally restricted to one.
pub fn layout_listing(config: &Config, only: Option<Direction>) -> String {
    let mut out = String::new();
    for direction in Direction::iter().filter(|d| only.is_none_or(|o| o == *d)) {
        out.push_str(&format!("{direction}:\n"));
        for layout in config.layouts_for(direction) {
            out.push_str(&format!("  {:<24} {}\n", layout.name, layout.layout));
        }
    }
    out
}

pub fn bar_height_listing(config: &Config) -> String {
    config
        .bar_heights
        .iter()
        .map(|bar| {
            format!(
                "{}: top={} bottom={} left={} right={} gap={}\n",
                bar.screen_name, bar.top, bar.bottom, bar.left, bar.right, bar.gap
            )
        })
        .collect()
}

pub fn screen_listing(screens: &[ScreenData]) -> String {
    screens.iter().map(|screen| format!("{screen}\n")).collect()
}
