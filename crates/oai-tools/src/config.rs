//! Startup configuration.
//!
//! Settings come from an optional TOML file (`oait.toml` by default), every field
//! having a default. Credentials are passed in explicitly by the caller (the CLI
//! resolves `--api-key` with the `OPENAI_API_KEY` fallback), so nothing down the
//! call chain reads the environment.

use crate::ais::poll::PollPolicy;
use crate::check::CheckRules;
use crate::{Error, Result};
use serde::Deserialize;
use simple_fs::load_toml;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SETTINGS_FILE: &str = "oait.toml";

// region:    --- Config

#[derive(Debug, Clone)]
pub struct Config {
	api_key: Option<String>,
	pub settings: Settings,
}

impl Config {
	pub fn new(api_key: Option<String>, settings: Settings) -> Self {
		let api_key = api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
		Self { api_key, settings }
	}

	/// Loads the settings file (see [`Settings::load`]) and binds the api key.
	pub fn resolve(api_key: Option<String>, settings_file: Option<&Path>) -> Result<Self> {
		let settings = Settings::load(settings_file)?;
		Ok(Self::new(api_key, settings))
	}

	pub fn api_key(&self) -> Result<&str> {
		self.api_key.as_deref().ok_or(Error::MissingApiKey)
	}
}

// endregion: --- Config

// region:    --- Settings

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub api_base: Option<String>,
	pub vision: VisionSettings,
	pub poll: PollSettings,
	pub assistant: AssistantSettings,
	pub check: CheckSettings,
}

impl Settings {
	/// - `file` given: the file must exist.
	/// - `file` is `None`: loads `oait.toml` from the current dir if present, defaults otherwise.
	pub fn load(file: Option<&Path>) -> Result<Self> {
		match file {
			Some(file) => {
				if !file.is_file() {
					return Err(Error::ConfigFileNotFound(file.display().to_string()));
				}
				Ok(load_toml(file)?)
			}
			None => {
				let file = Path::new(DEFAULT_SETTINGS_FILE);
				if file.is_file() {
					Ok(load_toml(file)?)
				} else {
					Ok(Settings::default())
				}
			}
		}
	}
}

/// Overrides for the vision preset defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
	pub model: Option<String>,
	pub max_tokens: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollSettings {
	pub initial_interval_ms: u64,
	pub max_interval_ms: u64,
	pub multiplier: f64,
	pub max_attempts: u32,
}

impl Default for PollSettings {
	fn default() -> Self {
		Self {
			initial_interval_ms: 500,
			max_interval_ms: 8_000,
			multiplier: 2.0,
			max_attempts: 60,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
	pub name: String,
	pub model: String,
	pub instructions: String,
}

impl Default for AssistantSettings {
	fn default() -> Self {
		Self {
			name: "Math Tutor".to_string(),
			model: "gpt-4-turbo-preview".to_string(),
			instructions: "You are a helpful document assistant. Help users answer questions relating to passport renewal.".to_string(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
	pub min_len: usize,
	pub max_len: usize,
	pub max_prompt_tokens: u64,
	pub max_completion_tokens: u64,
	pub forbidden: Vec<String>,
}

impl Default for CheckSettings {
	fn default() -> Self {
		Self {
			min_len: 5,
			max_len: 1000,
			max_prompt_tokens: 1000,
			max_completion_tokens: 2000,
			forbidden: Vec::new(),
		}
	}
}

// endregion: --- Settings

// region:    --- Froms

impl From<&PollSettings> for PollPolicy {
	fn from(val: &PollSettings) -> Self {
		PollPolicy::new(
			Duration::from_millis(val.initial_interval_ms),
			Duration::from_millis(val.max_interval_ms),
			val.multiplier,
			val.max_attempts,
		)
	}
}

impl From<&CheckSettings> for CheckRules {
	fn from(val: &CheckSettings) -> Self {
		CheckRules {
			min_len: val.min_len,
			max_len: val.max_len,
			max_prompt_tokens: val.max_prompt_tokens,
			max_completion_tokens: val.max_completion_tokens,
			forbidden: val.forbidden.clone(),
		}
	}
}

// endregion: --- Froms

// region:    --- Tests


// endregion: --- Tests
