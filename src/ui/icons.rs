//! PNG previews of the configured layouts.
//!
//! Each icon shows a reference screen scaled into a square canvas with the
//! layout's window drawn on top of it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{Rgba, RgbaImage};
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::common::config::{Config, IconSettings};
use crate::layout_engine::{LayoutError, calculate};
use crate::model::{CalculatedLayout, Direction, ScreenData};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid color {0:?}: expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
}

/// Parses `#RRGGBB` or `#RRGGBBAA`. Colors without alpha are opaque.
pub fn parse_color(src: &str) -> Result<Rgba<u8>, ColorError> {
    let invalid = || ColorError::InvalidColor(src.to_string());
    let hex = src.strip_prefix('#').ok_or_else(invalid)?;
    if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { byte(6)? } else { u8::MAX };
    Ok(Rgba([byte(0)?, byte(2)?, byte(4)?, alpha]))
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Paint {
    fill: Rgba<u8>,
    border: Rgba<u8>,
    border_width: u32,
}

/// [`IconSettings`] with the colors already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    size: u32,
    margin: u32,
    screen: Paint,
    window: Paint,
}

impl IconStyle {
    pub fn new(settings: &IconSettings) -> Result<IconStyle, ColorError> {
        Ok(IconStyle {
            size: settings.size,
            margin: settings.margin,
            screen: Paint {
                fill: parse_color(&settings.screen_color)?,
                border: parse_color(&settings.screen_border_color)?,
                border_width: settings.screen_border_width,
            },
            window: Paint {
                fill: parse_color(&settings.window_color)?,
                border: parse_color(&settings.window_border_color)?,
                border_width: settings.window_border_width,
            },
        })
    }
}

/// Inclusive pixel bounds. May extend past the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelRect {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl PixelRect {
    fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x0: x, y0: y, x1: x + width - 1, y1: y + height - 1 }
    }

    fn on_border(&self, x: i64, y: i64, width: i64) -> bool {
        x - self.x0 < width || self.x1 - x < width || y - self.y0 < width || self.y1 - y < width
    }
}

fn draw_rect(canvas: &mut RgbaImage, rect: PixelRect, paint: Paint) {
    let (w, h) = canvas.dimensions();
    let border_width = i64::from(paint.border_width);
    for y in rect.y0.max(0)..=rect.y1.min(i64::from(h) - 1) {
        for x in rect.x0.max(0)..=rect.x1.min(i64::from(w) - 1) {
            let color = if rect.on_border(x, y, border_width) { paint.border } else { paint.fill };
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Draws `screen` scaled and centered inside the icon's margin, with
/// `target` placed at the same scale relative to the screen's origin.
pub fn render_icon(style: &IconStyle, screen: &ScreenData, target: &CalculatedLayout) -> RgbaImage {
    let mut canvas = RgbaImage::new(style.size, style.size);

    let inner = style.size.saturating_sub(style.margin.saturating_mul(2));
    let scale = (f64::from(inner) / f64::from(screen.width))
        .min(f64::from(inner) / f64::from(screen.height));
    let scaled = |v: i32| (f64::from(v) * scale).round() as i64;

    let (inner, margin) = (i64::from(inner), i64::from(style.margin));
    let (width, height) = (scaled(screen.width), scaled(screen.height));
    let origin_x = margin + (inner - width) / 2;
    let origin_y = margin + (inner - height) / 2;
    draw_rect(&mut canvas, PixelRect::new(origin_x, origin_y, width, height), style.screen);

    let window = PixelRect::new(
        origin_x + scaled(target.x - screen.x),
        origin_y + scaled(target.y - screen.y),
        scaled(target.width).max(1),
        scaled(target.height).max(1),
    );
    draw_rect(&mut canvas, window, style.window);

    canvas
}

fn reference_screen(direction: Direction) -> Result<ScreenData, crate::model::ModelError> {
    match direction {
        Direction::Horizontal => ScreenData::new("reference", 0, 0, 1920, 1080),
        Direction::Vertical => ScreenData::new("reference", 0, 0, 1080, 1920),
    }
}

fn icon_file_name(direction: Direction, name: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{direction}-{name}.png")
}

/// Writes one `<direction>-<name>.png` per configured layout into `dir` and
/// returns the written paths. Layouts that leave no area, or do not fit in
/// pixel coordinates, are skipped.
pub fn render_layout_icons(config: &Config, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let style = IconStyle::new(&config.icons)?;
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::new();
    for direction in Direction::iter() {
        let screen = reference_screen(direction)?;
        for layout in config.layouts_for(direction) {
            let target = match calculate(&screen, layout, None) {
                Ok(target) => target,
                Err(e @ (LayoutError::EmptyArea { .. } | LayoutError::OutOfRange { .. })) => {
                    warn!(name = %layout.name, %direction, "skipping icon: {e}");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let path = dir.join(icon_file_name(direction, &layout.name));
            render_icon(&style, &screen, &target)
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            debug!(path = %path.display(), %target, "rendered icon");
            written.push(path);
        }
    }

    info!(count = written.len(), dir = %dir.display(), "rendered layout icons");
    Ok(written)
}
