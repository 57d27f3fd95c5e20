pub mod calculator;
mod error;
pub mod expr;
pub mod locator;
pub mod template;

pub use calculator::calculate;
pub use error::LayoutError;
pub use expr::{Expr, ExprError, Frame};
pub use locator::locate;
pub use template::{FormatIssue, LayoutTemplate, RawRect, validate_layout};
