//! Ais Event

use crate::ais::{AsstRef, RunId, ThreadId};
use async_openai::types::RunStatus;

#[derive(Debug, Clone)]
pub enum AisEvent {
	// -- Asst Events
	AsstCreated(AsstRef),
	AsstDeleted(AsstRef),

	// -- Thread Events
	ThreadCreated(ThreadId),
	MsgAdded {
		thread_id: ThreadId,
		content: String,
	},

	// -- Run Events
	RunStarted(RunId),
	RunPolled {
		run_id: RunId,
		attempt: u32,
		status: RunStatus,
	},
	RunCompleted(RunId),
}
