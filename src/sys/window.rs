use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use super::{SysError, System};
use crate::model::{CalculatedLayout, WindowData};

static WINDOW_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Window\s+(\S+)").expect("window id pattern"));
static POSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*Position:\s*(-?\d+),(-?\d+)").expect("window position pattern")
});
static GEOMETRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Geometry:\s*(\d+)x(\d+)").expect("window geometry pattern"));

/// Returns the geometry of the focused window.
pub fn active_window<S: System>(system: &S) -> Result<WindowData, SysError> {
    let output = system.output("xdotool", &["getactivewindow", "getwindowgeometry"])?;
    let window = parse_window_geometry(&output)?;
    debug!(%window, "active window");
    Ok(window)
}

pub fn parse_window_geometry(output: &str) -> Result<WindowData, SysError> {
    let mut id = None;
    let mut position = None;
    let mut size = None;

    for line in output.lines() {
        if let Some(caps) = WINDOW_ID.captures(line) {
            id = Some(caps[1].to_string());
        } else if let Some(caps) = POSITION.captures(line) {
            position = Some((number(&caps[1], line)?, number(&caps[2], line)?));
        } else if let Some(caps) = GEOMETRY.captures(line) {
            size = Some((number(&caps[1], line)?, number(&caps[2], line)?));
        }
    }

    match (id, position, size) {
        (Some(id), Some((x, y)), Some((width, height))) => Ok(WindowData { id, x, y, width, height }),
        _ => Err(SysError::Parse {
            program: "xdotool".into(),
            line: output.trim().to_string(),
        }),
    }
}

fn number(raw: &str, line: &str) -> Result<i32, SysError> {
    raw.parse().map_err(|_| SysError::Parse {
        program: "xdotool".into(),
        line: line.to_string(),
    })
}

/// Resizes the window, then moves it.
pub fn resize_and_move<S: System>(
    system: &S,
    window: &WindowData,
    target: &CalculatedLayout,
) -> Result<(), SysError> {
    let (width, height) = (target.width.to_string(), target.height.to_string());
    system.output("xdotool", &[
        "windowsize",
        window.id.as_str(),
        width.as_str(),
        height.as_str(),
    ])?;
    let (x, y) = (target.x.to_string(), target.y.to_string());
    system.output("xdotool", &["windowmove", window.id.as_str(), x.as_str(), y.as_str()])?;
    info!(id = %window.id, %target, "window resized and repositioned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sys::test::Stub;

    #[test]
    fn parses_active_window() {
        let stub = Stub::new(["Window 123731979\n  Position: 3953,1833 (screen: 0)\n  Geometry: 2160x960\n"]);
        let window = active_window(&stub).unwrap();
        assert_eq!(window, WindowData {
            id: "123731979".into(),
            x: 3953,
            y: 1833,
            width: 2160,
            height: 960,
        });
    }

    #[test]
    fn negative_positions_are_allowed() {
        let window =
            parse_window_geometry("Window 42\n  Position: -8,-30 (screen: 0)\n  Geometry: 800x600\n")
                .unwrap();
        assert_eq!((window.x, window.y), (-8, -30));
    }

    #[test]
    fn incomplete_output_is_a_parse_error() {
        let err = parse_window_geometry("Window 42\n  Geometry: 800x600\n").unwrap_err();
        assert!(matches!(err, SysError::Parse { .. }));
    }

    #[test]
    fn resizes_before_moving() {
        let stub = Stub::default();
        let window = WindowData {
            id: "77".into(),
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        };
        let target = CalculatedLayout { x: 10, y: 20, width: 960, height: 1080 };

        resize_and_move(&stub, &window, &target).unwrap();

        let calls = stub.calls.borrow();
        assert_eq!(*calls, vec![
            vec!["xdotool", "windowsize", "77", "960", "1080"],
            vec!["xdotool", "windowmove", "77", "10", "20"],
        ]
        .into_iter()
        .map(|c| c.into_iter().map(String::from).collect::<Vec<_>>())
        .collect::<Vec<_>>());
    }

    #[test]
    fn failed_resize_stops_before_move() {
        let stub = Stub::default();
        stub.push_err(SysError::Failed {
            program: "xdotool".into(),
            status: "exit status: 1".into(),
            stderr: "BadWindow".into(),
        });
        let window = WindowData {
            id: "77".into(),
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        };
        let target = CalculatedLayout { x: 0, y: 0, width: 10, height: 10 };

        assert!(resize_and_move(&stub, &window, &target).is_err());
        assert_eq!(stub.calls.borrow().len(), 1);
    }
}
