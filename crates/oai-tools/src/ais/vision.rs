//! Image text extraction through a vision-capable chat completion model.
//!
//! One request per image. API, rate-limit, and transport failures are logged and
//! return `Ok(None)`; only local failures (unreadable image) are errors.

use crate::ais::AisClient;
use crate::config::VisionSettings;
use crate::utils::files::XFile;
use crate::{Error, Result};
use async_openai::error::OpenAIError;
use async_openai::types::{
	ChatCompletionRequestMessageContentPartImageArgs, ChatCompletionRequestMessageContentPartTextArgs,
	ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
	CreateChatCompletionRequestArgs, ImageUrlArgs, ImageUrlDetail,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

// region:    --- Preset

const GENERAL_PROMPT: &str = "Extract all text from this image.";

const ID_DOCUMENT_PROMPT: &str = r#"Extract ALL text visible on this ID document.

Provide ONLY the exact text as it appears, preserving:
- Field labels and values (e.g., "Name: John Smith")
- Document numbers, dates, codes
- ALL text visible on the ID, front and back if shown
- Exact spacing and formatting where possible

Format as plain text with no commentary or analysis. Organize by sections if multiple sections exist."#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Preset {
	#[default]
	General,
	IdDocument,
}

impl Preset {
	pub fn prompt(&self) -> &'static str {
		match self {
			Preset::General => GENERAL_PROMPT,
			Preset::IdDocument => ID_DOCUMENT_PROMPT,
		}
	}

	pub fn default_model(&self) -> &'static str {
		match self {
			Preset::General => "gpt-4o",
			Preset::IdDocument => "gpt-4-turbo",
		}
	}

	pub fn default_max_tokens(&self) -> u16 {
		match self {
			Preset::General => 1000,
			Preset::IdDocument => 500,
		}
	}
}

// endregion: --- Preset

// region:    --- Extract Options

#[derive(Debug, Clone)]
pub struct ExtractOptions {
	pub preset: Preset,
	pub model: String,
	pub max_tokens: u16,
}

impl ExtractOptions {
	/// Precedence: `model` argument, then settings, then the preset default.
	pub fn new(preset: Preset, settings: &VisionSettings, model: Option<String>) -> Self {
		let model = model
			.or_else(|| settings.model.clone())
			.unwrap_or_else(|| preset.default_model().to_string());
		let max_tokens = settings
			.max_tokens
			.unwrap_or_else(|| preset.default_max_tokens());

		Self {
			preset,
			model,
			max_tokens,
		}
	}
}

// endregion: --- Extract Options

// region:    --- Image Encoding

pub fn image_mime(file: &Path) -> &'static str {
	match file.x_extension().to_ascii_lowercase().as_str() {
		"png" => "image/png",
		"webp" => "image/webp",
		"gif" => "image/gif",
		_ => "image/jpeg",
	}
}

/// `data:<mime>;base64,<payload>` for the image file.
pub fn image_data_url(file: &Path) -> Result<String> {
	if !file.is_file() {
		return Err(Error::FileNotFound(file.display().to_string()));
	}
	let bytes = fs::read(file)?;
	let payload = STANDARD.encode(bytes);

	Ok(format!("data:{};base64,{payload}", image_mime(file)))
}

/// `<out_dir>/<image stem>_text.txt`
pub fn text_output_path(out_dir: &Path, image: &Path) -> PathBuf {
	out_dir.join(format!("{}_text.txt", image.x_file_stem()))
}

// endregion: --- Image Encoding

// region:    --- Extract

pub fn build_request(data_url: String, opts: &ExtractOptions) -> Result<CreateChatCompletionRequest> {
	let request = CreateChatCompletionRequestArgs::default()
		.model(opts.model.as_str())
		.max_tokens(opts.max_tokens)
		.messages([ChatCompletionRequestUserMessageArgs::default()
			.content(vec![
				ChatCompletionRequestMessageContentPartTextArgs::default()
					.text(opts.preset.prompt())
					.build()?
					.into(),
				ChatCompletionRequestMessageContentPartImageArgs::default()
					.image_url(
						ImageUrlArgs::default()
							.url(data_url)
							.detail(ImageUrlDetail::High)
							.build()?,
					)
					.build()?
					.into(),
			])
			.build()?
			.into()])
		.build()?;

	Ok(request)
}

/// Returns the text of the first choice, or `None` when the service call failed.
pub async fn extract_text(ais: &AisClient, file: &Path, opts: &ExtractOptions) -> Result<Option<String>> {
	let data_url = image_data_url(file)?;
	let request = build_request(data_url, opts)?;

	debug!(file = %file.display(), model = %opts.model, "vision request");

	match ais.oa_client().chat().create(request).await {
		Ok(response) => {
			let text = response
				.choices
				.into_iter()
				.next()
				.and_then(|choice| choice.message.content);
			if text.is_none() {
				warn!(file = %file.display(), "vision response has no text content");
			}
			Ok(text)
		}
		Err(err) => {
			log_service_error(file, &err);
			Ok(None)
		}
	}
}

fn log_service_error(file: &Path, err: &OpenAIError) {
	let file = file.display();
	match err {
		OpenAIError::ApiError(api_err) => {
			warn!(
				%file,
				kind = ?api_err.r#type,
				code = ?api_err.code,
				param = ?api_err.param,
				"API error: {}",
				api_err.message
			)
		}
		OpenAIError::Reqwest(req_err) => warn!(%file, "transport error: {req_err}"),
		other => warn!(%file, "unexpected error: {other}"),
	}
}

// endregion: --- Extract

// region:    --- Tests


// endregion: --- Tests
