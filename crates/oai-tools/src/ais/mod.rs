//! The `ais` module is the interface with the OpenAI service.
//!
//! It wraps the async-openai client with the event bus, and hosts the assistant/thread
//! operations (`asst`), the run polling (`poll`), and the vision text extraction (`vision`).

// region:    --- Modules

pub mod asst;
mod event;
pub mod msg;
pub mod poll;
mod types;
pub mod vision;

pub use event::AisEvent;
pub use types::*;

use crate::event::EventBus;
use crate::{Config, Result};
use async_openai::config::OpenAIConfig;
use async_openai::Client;

// endregion: --- Modules

// region:    --- Client

pub type OaClient = Client<OpenAIConfig>;

/// Wraps the async-openai client and provides additional functionalities
/// such as an event bus.
#[derive(Debug)]
pub struct AisClient {
	oa_client: OaClient,
	http_client: reqwest::Client,
	event_bus: EventBus,
}

impl AisClient {
	pub fn oa_client(&self) -> &OaClient {
		&self.oa_client
	}
	/// For the calls that bypass the typed client (raw JSON listings).
	pub(crate) fn http_client(&self) -> &reqwest::Client {
		&self.http_client
	}
	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}
}

/// Fails with `Error::MissingApiKey` before anything goes on the wire.
pub fn new_ais_client(config: &Config, event_bus: EventBus) -> Result<AisClient> {
	let api_key = config.api_key()?;

	let mut oa_config = OpenAIConfig::new().with_api_key(api_key);
	if let Some(api_base) = config.settings.api_base.as_deref() {
		oa_config = oa_config.with_api_base(api_base);
	}

	Ok(AisClient {
		oa_client: Client::with_config(oa_config),
		http_client: reqwest::Client::new(),
		event_bus,
	})
}

// endregion: --- Client

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;
	use crate::config::Settings;

	#[test]
	fn test_new_ais_client_no_key_err() -> Result<()> {
		let config = Config::new(None, Settings::default());

		let res = new_ais_client(&config, EventBus::new());

		assert!(matches!(res, Err(crate::Error::MissingApiKey)));

		Ok(())
	}

	#[test]
	fn test_new_ais_client_ok() -> Result<()> {
		let config = Config::new(Some("sk-test".to_string()), Settings::default());

		let res = new_ais_client(&config, EventBus::new());

		assert!(res.is_ok());

		Ok(())
	}
}

// endregion: --- Tests
