pub mod actions;
pub mod common;
pub mod layout_engine;
pub mod model;
pub mod sys;
pub mod ui;
