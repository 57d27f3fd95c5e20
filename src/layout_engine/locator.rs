use tracing::debug;

use crate::model::ScreenData;

/// Finds the screen that contains the point `(x, y)`.
///
/// Screens are checked in the order given. The first screen containing the
/// point on both axes wins. Failing that, the first screen whose horizontal
/// span contains `x` is returned, then the first whose vertical span
/// contains `y`.
pub fn locate(screens: &[ScreenData], x: i32, y: i32) -> Option<&ScreenData> {
    let mut horizontal = None;
    let mut vertical = None;

    for screen in screens {
        let in_x = screen.spans_x(x);
        let in_y = screen.spans_y(y);

        if in_x && in_y {
            return Some(screen);
        }
        if in_x && horizontal.is_none() {
            horizontal = Some(screen);
        }
        if in_y && vertical.is_none() {
            vertical = Some(screen);
        }
    }

    let fallback = horizontal.or(vertical);
    debug!(x, y, screen = ?fallback.map(|s| &s.name), "no screen contains point, using partial match");
    fallback
}
