mod layout;
mod screen;

pub use layout::{BarHeight, Layout};
pub use screen::{CalculatedLayout, Direction, ModelError, ScreenData, WindowData};
