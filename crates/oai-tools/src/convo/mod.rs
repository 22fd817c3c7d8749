//! The `convo` module drives a conversation with a freshly created assistant.
//!
//! A `Convo` owns one assistant and one thread. Each `ask` posts a user message,
//! runs the assistant, waits for the run with the bounded poll policy, and returns
//! the full transcript so far.
//!
//! Everything is sequential: one request at a time, a run must finish before the next message.

// region:    --- Modules

use crate::ais::asst::{self, CreateConfig};
use crate::ais::msg::TranscriptEntry;
use crate::ais::poll::PollPolicy;
use crate::ais::{new_ais_client, AisClient, AsstRef, ThreadId};
use crate::config::AssistantSettings;
use crate::event::{Event, EventBus};
use crate::{Config, Result};
use tokio::sync::broadcast::Receiver;
use tracing::info;

// endregion: --- Modules

/// Scripted user turns of the demo conversation.
pub const DEMO_SCRIPT: &[&str] = &[
	"How long is a US passport valid for?",
	"I live in Lexington, MA.  Where can I go to get my passport renewed?",
	"I am a US citizen.  How much does it cost to renew my passport?",
];

#[derive(Debug)]
pub struct Convo {
	ais_client: AisClient,
	asst: AsstRef,
	thread_id: ThreadId,
	policy: PollPolicy,
	event_bus: EventBus,
}

/// Constructor functions
impl Convo {
	/// Creates the assistant and the thread. `asst_settings` overrides the config's assistant settings.
	pub async fn start(
		config: &Config,
		asst_settings: AssistantSettings,
		event_bus: Option<EventBus>,
	) -> Result<Self> {
		let event_bus = event_bus.unwrap_or_else(EventBus::new);

		// -- Client (fails before any call when no api key)
		let ais_client = new_ais_client(config, event_bus.clone())?;

		// -- Create the OpenAI Assistant
		let create_config = CreateConfig::from(&asst_settings);
		let asst_id = asst::create(&ais_client, &create_config).await?;
		let asst = AsstRef::new(asst_settings.name, asst_id);

		// -- Create the thread
		let thread_id = asst::create_thread(&ais_client).await?;
		info!(asst_id = %asst.id, thread_id = %thread_id, "conversation started");

		Ok(Convo {
			ais_client,
			asst,
			thread_id,
			policy: PollPolicy::from(&config.settings.poll),
			event_bus,
		})
	}
}

/// Public functions
impl Convo {
	pub fn asst(&self) -> &AsstRef {
		&self.asst
	}

	pub fn thread_id(&self) -> &ThreadId {
		&self.thread_id
	}

	pub fn subscribe(&self) -> Result<Receiver<Event>> {
		self.event_bus.subscribe()
	}

	/// Posts `msg`, runs the assistant, and returns the whole transcript (oldest first).
	pub async fn ask(&self, msg: &str) -> Result<Vec<TranscriptEntry>> {
		asst::run_thread_msg(
			&self.ais_client,
			&self.asst.id,
			&self.thread_id,
			msg,
			&self.policy,
		)
		.await?;

		asst::transcript(&self.ais_client, &self.thread_id).await
	}

	/// Deletes the assistant. The thread is left on the server.
	pub async fn close(self) -> Result<()> {
		asst::delete(&self.ais_client, &self.asst).await
	}
}

// region:    --- Froms

impl From<&AssistantSettings> for CreateConfig {
	fn from(settings: &AssistantSettings) -> Self {
		Self {
			name: settings.name.clone(),
			model: settings.model.clone(),
			instructions: settings.instructions.clone(),
		}
	}
}

// endregion: --- Froms

// region:    --- Tests


// endregion: --- Tests
