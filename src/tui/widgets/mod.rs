pub mod color;
pub mod help;
pub mod status_bar;
pub mod tags;
