//! Where the messages come from: a local JSON file, or a thread listing from the API.

use crate::ais::asst::list_msgs_json;
use crate::ais::{AisClient, MessagePage, ThreadId};
use crate::msgs::Message;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use simple_fs::load_json;
use std::path::PathBuf;
use tracing::debug;

#[async_trait]
pub trait MessageSource {
	async fn fetch(&self) -> Result<Vec<Message>>;

	/// Short human label, for logs.
	fn describe(&self) -> String;
}

// region:    --- File Source

/// A JSON file holding either an array of messages or a `{"data": [...]}` object.
#[derive(Debug, Clone)]
pub struct FileSource {
	file: PathBuf,
}

impl FileSource {
	pub fn new(file: impl Into<PathBuf>) -> Self {
		Self { file: file.into() }
	}
}

#[async_trait]
impl MessageSource for FileSource {
	async fn fetch(&self) -> Result<Vec<Message>> {
		if !self.file.is_file() {
			return Err(Error::FileNotFound(self.file.display().to_string()));
		}
		let value: Value = load_json(&self.file)?;

		parse_messages(value).map_err(|cause| Error::InvalidMessageFile {
			file: self.file.display().to_string(),
			cause,
		})
	}

	fn describe(&self) -> String {
		format!("file {}", self.file.display())
	}
}

/// Accepts `[...]` or `{"data": [...]}`. Returns the shape problem otherwise.
pub fn parse_messages(value: Value) -> core::result::Result<Vec<Message>, String> {
	let items = match value {
		Value::Array(items) => items,
		Value::Object(mut obj) => match obj.remove("data") {
			Some(Value::Array(items)) => items,
			Some(_) => return Err("'data' is not an array".to_string()),
			None => return Err("object has no 'data' array".to_string()),
		},
		_ => return Err("expected an array or an object with a 'data' array".to_string()),
	};

	Ok(items.into_iter().map(Message::from).collect())
}

// endregion: --- File Source

// region:    --- Api Source

/// The messages of one thread, as listed by the API (one page), kept as returned.
pub struct ApiSource<'a> {
	ais: &'a AisClient,
	thread_id: ThreadId,
	page: MessagePage,
}

impl<'a> ApiSource<'a> {
	pub fn new(ais: &'a AisClient, thread_id: impl Into<ThreadId>, page: MessagePage) -> Self {
		Self {
			ais,
			thread_id: thread_id.into(),
			page,
		}
	}
}

#[async_trait]
impl MessageSource for ApiSource<'_> {
	async fn fetch(&self) -> Result<Vec<Message>> {
		let listing = list_msgs_json(self.ais, &self.thread_id, &self.page).await?;

		let msgs = parse_messages(listing).map_err(|cause| Error::InvalidMessageListing {
			thread_id: self.thread_id.to_string(),
			cause,
		})?;
		debug!(thread_id = %self.thread_id, count = msgs.len(), "api source fetched");

		Ok(msgs)
	}

	fn describe(&self) -> String {
		format!("thread {}", self.thread_id)
	}
}

// endregion: --- Api Source

// region:    --- Tests


// endregion: --- Tests
