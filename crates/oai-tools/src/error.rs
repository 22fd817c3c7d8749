use crate::event;
use async_openai::error::OpenAIError;
use async_openai::types::RunStatus;
use derive_more::From;
use std::io;
use tokio::sync::broadcast;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, From)]
pub enum Error {
	// -- config
	MissingApiKey,
	ConfigFileNotFound(String),

	// -- msgs
	TimestampParse {
		input: String,
		cause: String,
	},
	InvalidMessageFile {
		file: String,
		cause: String,
	},
	InvalidMessageListing {
		thread_id: String,
		cause: String,
	},

	// -- ais
	HttpStatus {
		status: u16,
		body: String,
	},
	NoMessageInMessageObjectContent,
	RunEnded(RunStatus),
	RunPollExhausted {
		attempts: u32,
		last_status: Option<RunStatus>,
	},

	// -- files
	FileNotFound(String),
	FileCannotCreate {
		file: String,
		cause: io::Error,
	},

	// -- Event
	#[from]
	BoadcastSend(broadcast::error::SendError<event::Event>),

	// -- Std
	#[from]
	IO(io::Error),

	// -- Externals
	#[from]
	SerdeJson(serde_json::Error),
	#[from]
	SimpleFs(simple_fs::Error),
	#[from]
	OpenAI(OpenAIError),
	#[from]
	Reqwest(reqwest::Error),
}

// region:    --- Error Boilerplate
impl core::fmt::Display for Error {
	fn fmt(
		&self,
		fmt: &mut core::fmt::Formatter,
	) -> core::result::Result<(), core::fmt::Error> {
		write!(fmt, "{self:?}")
	}
}

impl std::error::Error for Error {}
// endregion: --- Error Boilerplate
