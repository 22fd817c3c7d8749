pub use crate::ais::AisEvent;

use crate::Result;
use derive_more::From;
use std::sync::Arc;
use tokio::sync::broadcast::{self, Receiver, Sender};

#[derive(Debug, Clone, From)]
pub enum Event {
	Ais(AisEvent),
}

/// EventBus lets the assistant/thread operations report progress
/// (assistant created, run polled, ...) without printing anything themselves.
///
/// Notes:
/// - Clone-efficient, so it's fine to clone it into each client.
/// - Backed by a Tokio broadcast channel; sending with no subscriber is not an error.
/// - `_rx` is kept in an Arc so the channel stays open even before anyone subscribes.
#[derive(Debug, Clone)]
pub struct EventBus {
	tx: Sender<Event>,
	_rx: Arc<Receiver<Event>>,
}

impl EventBus {
	#[allow(clippy::new_without_default)]
	pub fn new() -> EventBus {
		let (tx, rx) = broadcast::channel::<Event>(64);
		EventBus {
			tx,
			_rx: Arc::new(rx),
		}
	}

	pub(crate) fn send(&self, evt: impl Into<Event>) -> Result<()> {
		let evt = evt.into();
		self.tx.send(evt)?;
		Ok(())
	}

	pub fn subscribe(&self) -> Result<Receiver<Event>> {
		Ok(self.tx.subscribe())
	}
}

// region:    --- Tests


// endregion: --- Tests
