pub mod cli;
pub mod config;
pub mod logging;
pub mod tag_input;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use tag_input::{TagEvent, TagInput, TagInputOptions};
pub use utils::Profile;
