//! UI module for the dashboard.

mod footer;
mod header;
mod layout;
mod panels;

pub use layout::draw_ui;
