// region:    --- Modules

pub mod ais;
pub mod check;
pub mod config;
pub mod convo;
mod error;
pub mod event;
pub mod msgs;
mod utils;

pub use self::error::{Error, Result};
pub use crate::config::Config;
pub use crate::utils::files::{ensure_dir, list_image_files, save_to_json, to_pretty_json};

// endregion: --- Modules
