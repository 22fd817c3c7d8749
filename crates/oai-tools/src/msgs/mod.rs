//! Thread message selection.
//!
//! Messages are opaque JSON objects. The filters only read `created_at` and
//! `metadata`, never rewrite a message, and always keep the input order.

// region:    --- Modules

mod source;
mod timestamp;

pub use source::{ApiSource, FileSource, MessageSource, parse_messages};
pub use timestamp::parse_timestamp;

use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

// endregion: --- Modules

// region:    --- Message

#[derive(Debug, Clone, PartialEq, From, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(Value);

impl Message {
	/// `None` when absent or not an integer.
	pub fn created_at(&self) -> Option<i64> {
		self.0.get("created_at").and_then(Value::as_i64)
	}

	/// `None` when the message has no metadata object (absent or `null`).
	pub fn metadata(&self) -> Option<&Map<String, Value>> {
		self.0.get("metadata").and_then(Value::as_object)
	}

	pub fn metadata_str(&self, key: &str) -> Option<&str> {
		self.metadata()?.get(key)?.as_str()
	}
}

// endregion: --- Message

// region:    --- Time Range

/// Inclusive `[start, end]` in Unix epoch seconds. `start > end` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
	pub start: i64,
	pub end: i64,
}

impl TimeRange {
	pub fn new(start: i64, end: i64) -> Self {
		Self { start, end }
	}

	/// Parses both bounds with [`parse_timestamp`].
	pub fn parse(start: &str, end: &str) -> crate::Result<Self> {
		Ok(Self::new(parse_timestamp(start)?, parse_timestamp(end)?))
	}

	pub fn all_time() -> Self {
		Self::new(i64::MIN, i64::MAX)
	}

	pub fn contains(&self, ts: i64) -> bool {
		self.start <= ts && ts <= self.end
	}

	pub fn matches(&self, msg: &Message) -> bool {
		msg.created_at().is_some_and(|ts| self.contains(ts))
	}
}

pub fn filter_by_created_at(msgs: impl IntoIterator<Item = Message>, range: &TimeRange) -> Vec<Message> {
	msgs.into_iter().filter(|m| range.matches(m)).collect()
}

// endregion: --- Time Range

// region:    --- Metadata Filter

/// Required `key -> value` pairs, all of which must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFilter {
	constraints: BTreeMap<String, String>,
}

impl MetadataFilter {
	/// Parses `key=value` entries, splitting at the first `=` and trimming both sides.
	/// Entries without `=` are skipped with a warning.
	pub fn from_pairs<I, S>(pairs: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut filter = Self::default();
		for pair in pairs {
			let pair = pair.as_ref();
			match pair.split_once('=') {
				Some((key, value)) => filter = filter.with(key.trim(), value.trim()),
				None => warn!(entry = pair, "metadata filter entry has no '=', skipped"),
			}
		}
		filter
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.constraints.insert(key.into(), value.into());
		self
	}

	pub fn is_empty(&self) -> bool {
		self.constraints.is_empty()
	}

	pub fn len(&self) -> usize {
		self.constraints.len()
	}

	pub fn matches(&self, msg: &Message) -> bool {
		self.constraints
			.iter()
			.all(|(key, value)| msg.metadata_str(key) == Some(value.as_str()))
	}
}

pub fn filter_by_metadata(msgs: impl IntoIterator<Item = Message>, filter: &MetadataFilter) -> Vec<Message> {
	msgs.into_iter().filter(|m| filter.matches(m)).collect()
}

// endregion: --- Metadata Filter

// region:    --- Filter Output

/// The `{"data": [...], "count": N}` document the filter commands emit.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOutput {
	pub data: Vec<Message>,
	pub count: usize,
}

impl From<Vec<Message>> for FilterOutput {
	fn from(data: Vec<Message>) -> Self {
		let count = data.len();
		Self { data, count }
	}
}

// endregion: --- Filter Output

// region:    --- Tests


// endregion: --- Tests
