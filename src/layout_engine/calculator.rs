//! Turns a layout template into absolute window geometry on one screen.
//!
//! Margins and the gap are applied per edge. A leading edge (left, top) is
//! clamped to the reserved margin when the template would start inside it,
//! otherwise it is pushed in by the gap. A trailing edge (right, bottom) is
//! pulled back to the reserved boundary when the template would cross it,
//! otherwise it is pulled in by the gap.

use std::borrow::Cow;

use tracing::trace;

use super::LayoutError;
use super::expr::Frame;
use super::template::{LayoutTemplate, RawRect};
use crate::model::{BarHeight, CalculatedLayout, Layout, ScreenData};

/// New offset for a leading edge.
pub fn clamp_or_gap_leading(offset: i64, margin: i64, gap: i64) -> i64 {
    if offset < margin { margin } else { offset + gap }
}

/// New extent for a trailing edge. `limit` is the screen extent minus the
/// reserved margin on that edge.
pub fn clamp_or_gap_trailing(offset: i64, extent: i64, limit: i64, gap: i64) -> i64 {
    let far_edge = offset + extent;
    if far_edge > limit {
        extent - (far_edge - limit)
    } else {
        extent - gap
    }
}

/// Intermediate geometry. Template values are `i32`, so sums of a few of
/// them cannot overflow here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WideRect {
    x: i64,
    y: i64,
    width: i64,
    height: i64,
}

impl From<RawRect> for WideRect {
    fn from(rect: RawRect) -> Self {
        Self {
            x: rect.x.into(),
            y: rect.y.into(),
            width: rect.width.into(),
            height: rect.height.into(),
        }
    }
}

fn apply_leading(rect: WideRect, bar: &BarHeight) -> WideRect {
    WideRect {
        x: clamp_or_gap_leading(rect.x, bar.left.into(), bar.gap.into()),
        y: clamp_or_gap_leading(rect.y, bar.top.into(), bar.gap.into()),
        ..rect
    }
}

fn apply_trailing(rect: WideRect, screen: &ScreenData, bar: &BarHeight) -> WideRect {
    let limit = |extent: i32, margin: i32| i64::from(extent) - i64::from(margin);
    WideRect {
        width: clamp_or_gap_trailing(
            rect.x,
            rect.width,
            limit(screen.width, bar.right),
            bar.gap.into(),
        ),
        height: clamp_or_gap_trailing(
            rect.y,
            rect.height,
            limit(screen.height, bar.bottom),
            bar.gap.into(),
        ),
        ..rect
    }
}

fn translate(rect: WideRect, screen: &ScreenData) -> WideRect {
    WideRect {
        x: rect.x + i64::from(screen.x),
        y: rect.y + i64::from(screen.y),
        ..rect
    }
}

fn narrow(rect: WideRect) -> Option<CalculatedLayout> {
    Some(CalculatedLayout {
        x: i32::try_from(rect.x).ok()?,
        y: i32::try_from(rect.y).ok()?,
        width: i32::try_from(rect.width).ok()?,
        height: i32::try_from(rect.height).ok()?,
    })
}

/// Computes the absolute geometry of `layout` on `screen`.
///
/// The caller is responsible for picking a layout whose direction matches
/// the screen. Without a bar height the screen is treated as having no
/// reserved margins and no gap.
pub fn calculate(
    screen: &ScreenData,
    layout: &Layout,
    bar_height: Option<&BarHeight>,
) -> Result<CalculatedLayout, LayoutError> {
    let template = LayoutTemplate::parse(&layout.layout)?;
    template.evaluate(&Frame::CANONICAL)?;

    let frame = Frame {
        x: screen.x,
        y: screen.y,
        width: screen.width,
        height: screen.height,
    };
    let raw = template.evaluate(&frame)?;

    let bar = match bar_height {
        Some(bar) => Cow::Borrowed(bar),
        None => Cow::Owned(BarHeight::none(&screen.name)),
    };

    let leading = apply_leading(raw.into(), &bar);
    let trailing = apply_trailing(leading, screen, &bar);
    let placed = translate(trailing, screen);
    trace!(?raw, ?leading, ?trailing, ?placed, layout = %layout.name, screen = %screen.name, "calculated layout");

    let result = narrow(placed).ok_or_else(|| LayoutError::OutOfRange {
        layout: layout.name.clone(),
        screen: screen.name.clone(),
    })?;

    if result.width <= 0 || result.height <= 0 {
        return Err(LayoutError::EmptyArea {
            layout: layout.name.clone(),
            screen: screen.name.clone(),
            width: result.width,
            height: result.height,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::layout_engine::template::FormatIssue;
    use crate::model::Direction;

    fn dp0() -> ScreenData { ScreenData::new("DP-0", 0, 0, 1920, 1080).unwrap() }

    fn horizontal(template: &str) -> Layout { Layout::new("test", template, Direction::Horizontal) }

    fn bar(top: i32, bottom: i32, left: i32, right: i32, gap: i32) -> BarHeight {
        BarHeight {
            screen_name: "DP-0".into(),
            top,
            bottom,
            left,
            right,
            gap,
        }
    }

    #[test]
    fn half_width_without_bar_height() {
        let result = calculate(&dp0(), &horizontal("{x},{y},{width}/2,{height}"), None).unwrap();
        assert_eq!(result, CalculatedLayout { x: 0, y: 0, width: 960, height: 1080 });
    }

    #[test]
    fn uniform_margins_clamp_every_edge() {
        let result = calculate(
            &dp0(),
            &horizontal("{x},{y},{width},{height}"),
            Some(&bar(10, 10, 10, 10, 0)),
        )
        .unwrap();
        assert_eq!(result, CalculatedLayout { x: 10, y: 10, width: 1900, height: 1060 });
    }

    #[test]
    fn bottom_third_of_a_vertical_screen() {
        let screen = ScreenData::new("DP-2", 0, 0, 2160, 3840).unwrap();
        assert_eq!(screen.direction, Direction::Vertical);
        let layout = Layout::new("bottom-third", "0,{height}*2/3,{width},{height}/3", Direction::Vertical);
        let bar = BarHeight {
            screen_name: "DP-2".into(),
            top: 45,
            bottom: 45,
            left: 45,
            right: 45,
            gap: 0,
        };

        let result = calculate(&screen, &layout, Some(&bar)).unwrap();
        assert_eq!(result, CalculatedLayout { x: 45, y: 2560, width: 2070, height: 1235 });
    }

    #[test]
    fn malformed_template_fails_with_invalid_format() {
        let err = calculate(&dp0(), &horizontal("0,0,{width}/2"), None).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidFormat {
            reason: FormatIssue::FieldCount(3),
            ..
        }));
    }

    #[test]
    fn zero_bar_height_only_translates() {
        let templates = [
            "0,0,{width},{height}",
            "{width}/2,{height}/2,{width}/2,{height}/2",
            "50,{height}*1/6,{width}*3/5,{height}*2/3",
            "{width}*2/3,0,{width}/3,{height}",
        ];
        let screen = ScreenData::new("HDMI-1", 1920, 240, 2560, 1440).unwrap();
        for template in templates {
            let layout = horizontal(template);
            let frame = Frame {
                x: screen.x,
                y: screen.y,
                width: screen.width,
                height: screen.height,
            };
            let raw = LayoutTemplate::parse(template).unwrap().evaluate(&frame).unwrap();
            let expected = CalculatedLayout {
                x: raw.x + screen.x,
                y: raw.y + screen.y,
                width: raw.width,
                height: raw.height,
            };

            assert_eq!(calculate(&screen, &layout, None).unwrap(), expected);
            assert_eq!(
                calculate(&screen, &layout, Some(&BarHeight::none("HDMI-1"))).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn calculation_is_repeatable() {
        let layout = horizontal("{width}/3,0,{width}*2/3,{height}");
        let bar = bar(0, 45, 0, 0, 8);
        let first = calculate(&dp0(), &layout, Some(&bar)).unwrap();
        let second = calculate(&dp0(), &layout, Some(&bar)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn top_bar_clamps_while_bottom_gets_the_gap() {
        let result = calculate(
            &dp0(),
            &horizontal("0,0,{width}/2,{height}/2"),
            Some(&bar(30, 0, 0, 0, 8)),
        )
        .unwrap();
        // left is free: 0 + 8, top is reserved: clamped to 30.
        // right edge 8 + 960 fits: 960 - 8. bottom edge 30 + 540 fits: 540 - 8.
        assert_eq!(result, CalculatedLayout { x: 8, y: 30, width: 952, height: 532 });
    }

    #[test]
    fn margins_are_never_violated() {
        let screen = ScreenData::new("DP-1", 1920, 0, 1920, 1080).unwrap();
        let bar = BarHeight {
            screen_name: "DP-1".into(),
            top: 32,
            bottom: 45,
            left: 12,
            right: 20,
            gap: 6,
        };
        for template in [
            "0,0,{width},{height}",
            "0,0,{width}/2,{height}",
            "{width}/2,0,{width}/2,{height}",
            "0,{height}/2,{width}/2,{height}/2",
            "{width}*2/3,{height}/2,{width}/3,{height}/2",
        ] {
            let r = calculate(&screen, &horizontal(template), Some(&bar)).unwrap();
            assert!(r.x >= screen.x + bar.left, "{template}: {r}");
            assert!(r.y >= screen.y + bar.top, "{template}: {r}");
            assert!(r.x + r.width <= screen.right() - bar.right, "{template}: {r}");
            assert!(r.y + r.height <= screen.bottom() - bar.bottom, "{template}: {r}");
        }
    }

    #[test]
    fn offset_screen_is_translated() {
        let screen = ScreenData::new("DP-0", 2160, 973, 1920, 1080).unwrap();
        let result =
            calculate(&screen, &horizontal("{width}/2,0,{width}/2,{height}"), None).unwrap();
        assert_eq!(result, CalculatedLayout { x: 3120, y: 973, width: 960, height: 1080 });
    }

    #[test]
    fn margins_wider_than_the_screen_leave_no_area() {
        let err = calculate(
            &dp0(),
            &horizontal("0,0,{width},{height}"),
            Some(&bar(0, 0, 1000, 1000, 0)),
        )
        .unwrap_err();
        assert_eq!(err, LayoutError::EmptyArea {
            layout: "test".into(),
            screen: "DP-0".into(),
            width: -80,
            height: 1080,
        });
    }

    #[test]
    fn extreme_templates_fail_without_panicking() {
        // Leading edge starts far off screen, so the width collapses.
        let err = calculate(&dp0(), &horizontal("2000000000,0,2000000000,{height}"), None)
            .unwrap_err();
        assert_eq!(err, LayoutError::EmptyArea {
            layout: "test".into(),
            screen: "DP-0".into(),
            width: -1_999_998_080,
            height: 1080,
        });

        let err = calculate(
            &dp0(),
            &horizontal("0,0,-2147483648,{height}"),
            Some(&bar(0, 0, 0, 0, 8)),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::OutOfRange { .. }), "{err}");

        // Far negative offsets clamp to the leading margin.
        let result =
            calculate(&dp0(), &horizontal("-2147483648,-2147483648,{width},{height}"), None)
                .unwrap();
        assert_eq!(result, CalculatedLayout { x: 0, y: 0, width: 1920, height: 1080 });

        let offset = ScreenData::new("DP-1", 1920, 0, 1920, 1080).unwrap();
        let err = calculate(&offset, &horizontal("2147483000,0,{width},{height}"), None)
            .unwrap_err();
        assert_eq!(err, LayoutError::OutOfRange {
            layout: "test".into(),
            screen: "DP-1".into(),
        });
    }

    #[test]
    fn edge_rules() {
        assert_eq!(clamp_or_gap_leading(0, 45, 8), 45);
        assert_eq!(clamp_or_gap_leading(45, 45, 8), 53);
        assert_eq!(clamp_or_gap_leading(960, 0, 8), 968);

        assert_eq!(clamp_or_gap_trailing(45, 1920, 1875, 0), 1830);
        assert_eq!(clamp_or_gap_trailing(0, 960, 1920, 8), 952);
        assert_eq!(clamp_or_gap_trailing(960, 960, 1920, 8), 952);
    }
}
