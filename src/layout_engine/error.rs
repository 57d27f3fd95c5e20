use thiserror::Error;

use super::template::FormatIssue;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum LayoutError {
    #[error(
        "invalid layout format {template:?}: exactly four numeric expressions over {{x}}, {{y}}, \
         {{width}} and {{height}} separated by commas are required ({reason})"
    )]
    InvalidFormat {
        template: String,
        #[source]
        reason: FormatIssue,
    },
    #[error("layout {layout:?} leaves no room on screen {screen}: {width}x{height}")]
    EmptyArea {
        layout: String,
        screen: String,
        width: i32,
        height: i32,
    },
    #[error("layout {layout:?} does not fit in pixel coordinates on screen {screen}")]
    OutOfRange { layout: String, screen: String },
}
