use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{SysError, System};
use crate::model::ScreenData;

// " 0: +*DP-2 1920/509x1080/286+0+0  DP-2"
static MONITOR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+:\s+\S+\s+(\d+)(?:/\d+)?x(\d+)(?:/\d+)?([+-]\d+)([+-]\d+)\s+(\S+)\s*$")
        .expect("monitor line pattern")
});

/// Returns the active monitors in the order xrandr reports them.
pub fn list_screens<S: System>(system: &S) -> Result<Vec<ScreenData>, SysError> {
    let output = system.output("xrandr", &["--listactivemonitors"])?;
    let screens = parse_monitors(&output)?;
    debug!(count = screens.len(), "enumerated screens");
    Ok(screens)
}

pub fn parse_monitors(output: &str) -> Result<Vec<ScreenData>, SysError> {
    output
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(parse_monitor_line)
        .collect()
}

fn parse_monitor_line(line: &str) -> Result<ScreenData, SysError> {
    let parse_err = || SysError::Parse {
        program: "xrandr".into(),
        line: line.to_string(),
    };
    let caps = MONITOR_LINE.captures(line).ok_or_else(parse_err)?;
    let num = |i: usize| caps[i].parse::<i32>().map_err(|_| parse_err());

    Ok(ScreenData::new(&caps[5], num(3)?, num(4)?, num(1)?, num(2)?)?)
}
