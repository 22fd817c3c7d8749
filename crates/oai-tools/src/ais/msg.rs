use crate::{Error, Result};
use async_openai::types::{CreateMessageRequest, MessageContent, MessageObject};
use serde::Serialize;

// region:    --- Message Constructors

pub fn user_msg(content: impl Into<String>) -> CreateMessageRequest {
	CreateMessageRequest {
		role: "user".to_string(),
		content: content.into(),
		..Default::default()
	}
}

// endregion: --- Message Constructors

// region:    --- Content Extractor

/// Text of the first content item. Image content renders as a placeholder.
pub fn get_text_content(msg: MessageObject) -> Result<String> {
	// -- Get the first content item
	let msg_content = msg
		.content
		.into_iter()
		.next()
		.ok_or(Error::NoMessageInMessageObjectContent)?;

	// -- Get the text
	let txt = match msg_content {
		MessageContent::Text(text) => text.text.value,
		MessageContent::ImageFile(image) => format!("[image file {}]", image.image_file.file_id),
	};

	Ok(txt)
}

// endregion: --- Content Extractor

// region:    --- Transcript

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
	pub role: String,
	pub text: String,
}

impl TranscriptEntry {
	pub fn from_message(msg: MessageObject) -> Result<Self> {
		// The role serializes to its wire name ("user", "assistant").
		let role = serde_json::to_value(&msg.role)?
			.as_str()
			.unwrap_or_default()
			.to_string();
		let text = get_text_content(msg)?;

		Ok(Self { role, text })
	}
}

impl core::fmt::Display for TranscriptEntry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "{}: {}", self.role.to_uppercase(), self.text)
	}
}

// endregion: --- Transcript

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;

	#[test]
	fn test_user_msg_ok() -> Result<()> {
		let msg = user_msg("How long is a US passport valid for?");

		assert_eq!(msg.role, "user");
		assert_eq!(msg.content, "How long is a US passport valid for?");

		Ok(())
	}

	fn fx_message(content: serde_json::Value) -> Result<MessageObject> {
		let msg = serde_json::from_value(serde_json::json!({
			"id": "msg_1",
			"object": "thread.message",
			"created_at": 100,
			"thread_id": "thread_1",
			"role": "assistant",
			"content": [content],
			"assistant_id": null,
			"run_id": null,
			"file_ids": [],
			"metadata": null
		}))?;
		Ok(msg)
	}

	#[test]
	fn test_get_text_content_image_file_ok() -> Result<()> {
		let msg = fx_message(serde_json::json!({
			"type": "image_file",
			"image_file": {"file_id": "file-abc123"}
		}))?;

		let txt = get_text_content(msg)?;

		assert_eq!(txt, "[image file file-abc123]");

		Ok(())
	}

	#[test]
	fn test_transcript_entry_from_message_ok() -> Result<()> {
		let msg = fx_message(serde_json::json!({
			"type": "text",
			"text": {"value": "Ten years.", "annotations": []}
		}))?;

		let entry = TranscriptEntry::from_message(msg)?;

		assert_eq!(entry.role, "assistant");
		assert_eq!(entry.text, "Ten years.");

		Ok(())
	}

	#[test]
	fn test_transcript_entry_display_ok() -> Result<()> {
		let entry = TranscriptEntry {
			role: "assistant".to_string(),
			text: "Ten years.".to_string(),
		};

		assert_eq!(entry.to_string(), "ASSISTANT: Ten years.");

		Ok(())
	}
}

// endregion: --- Tests
