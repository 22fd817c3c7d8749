//! Structural checks over a saved chat completion response.

use crate::{Error, Result};
use serde_json::Value;
use simple_fs::load_json;
use std::path::Path;

pub const VALID_FINISH_REASONS: &[&str] = &[
	"stop",
	"length",
	"content_filter",
	"function_call",
	"tool_calls",
	"null",
];

const REQUIRED_KEYS: &[&str] = &["id", "object", "created", "choices", "usage"];

// region:    --- Types

#[derive(Debug, Clone)]
pub struct CheckRules {
	pub min_len: usize,
	pub max_len: usize,
	pub max_prompt_tokens: u64,
	pub max_completion_tokens: u64,
	pub forbidden: Vec<String>,
}

impl Default for CheckRules {
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

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
	MissingKey(&'static str),
	NoChoices,
	MissingContent,
	ContentLength { len: usize, min: usize, max: usize },
	InvalidFinishReason(String),
	MissingUsage(&'static str),
	TokenSumMismatch { prompt: u64, completion: u64, total: u64 },
	TooManyPromptTokens { count: u64, max: u64 },
	TooManyCompletionTokens { count: u64, max: u64 },
	ForbiddenWord(String),
}

impl core::fmt::Display for Violation {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Violation::MissingKey(key) => write!(f, "missing top-level key '{key}'"),
			Violation::NoChoices => write!(f, "'choices' is not a non-empty array"),
			Violation::MissingContent => write!(f, "first choice has no string message content"),
			Violation::ContentLength { len, min, max } => {
				write!(f, "content length {len} outside {min}..={max}")
			}
			Violation::InvalidFinishReason(reason) => write!(f, "invalid finish reason '{reason}'"),
			Violation::MissingUsage(key) => write!(f, "usage has no integer '{key}'"),
			Violation::TokenSumMismatch {
				prompt,
				completion,
				total,
			} => write!(f, "total_tokens {total} != prompt {prompt} + completion {completion}"),
			Violation::TooManyPromptTokens { count, max } => {
				write!(f, "prompt_tokens {count} above {max}")
			}
			Violation::TooManyCompletionTokens { count, max } => {
				write!(f, "completion_tokens {count} above {max}")
			}
			Violation::ForbiddenWord(word) => write!(f, "content contains forbidden word '{word}'"),
		}
	}
}

// endregion: --- Types

// region:    --- Check

pub fn load_response(file: &Path) -> Result<Value> {
	if !file.is_file() {
		return Err(Error::FileNotFound(file.display().to_string()));
	}
	Ok(load_json(file)?)
}

/// Returns every violation found. Empty means the response passes.
pub fn check_completion(resp: &Value, rules: &CheckRules) -> Vec<Violation> {
	let mut violations = Vec::new();

	for key in REQUIRED_KEYS {
		if resp.get(key).is_none() {
			violations.push(Violation::MissingKey(*key));
		}
	}

	// -- First choice
	match resp.get("choices").and_then(Value::as_array).and_then(|c| c.first()) {
		Some(choice) => {
			check_content(choice, rules, &mut violations);
			check_finish_reason(choice, &mut violations);
		}
		None => violations.push(Violation::NoChoices),
	}

	// -- Usage
	if let Some(usage) = resp.get("usage") {
		check_usage(usage, rules, &mut violations);
	}

	violations
}

fn check_content(choice: &Value, rules: &CheckRules, violations: &mut Vec<Violation>) {
	let Some(content) = choice.pointer("/message/content").and_then(Value::as_str) else {
		violations.push(Violation::MissingContent);
		return;
	};

	let len = content.chars().count();
	if content.is_empty() || len < rules.min_len || len > rules.max_len {
		violations.push(Violation::ContentLength {
			len,
			min: rules.min_len,
			max: rules.max_len,
		});
	}

	let lower = content.to_lowercase();
	for word in rules.forbidden.iter().filter(|w| !w.is_empty()) {
		if lower.contains(&word.to_lowercase()) {
			violations.push(Violation::ForbiddenWord(word.clone()));
		}
	}
}

fn check_finish_reason(choice: &Value, violations: &mut Vec<Violation>) {
	let reason = match choice.get("finish_reason") {
		None | Some(Value::Null) => "null".to_string(),
		Some(Value::String(reason)) => reason.clone(),
		Some(other) => other.to_string(),
	};
	if !VALID_FINISH_REASONS.contains(&reason.as_str()) {
		violations.push(Violation::InvalidFinishReason(reason));
	}
}

fn check_usage(usage: &Value, rules: &CheckRules, violations: &mut Vec<Violation>) {
	let get = |key: &'static str, violations: &mut Vec<Violation>| {
		let count = usage.get(key).and_then(Value::as_u64);
		if count.is_none() {
			violations.push(Violation::MissingUsage(key));
		}
		count
	};

	let prompt = get("prompt_tokens", violations);
	let completion = get("completion_tokens", violations);
	let total = get("total_tokens", violations);

	if let Some(count) = prompt.filter(|c| *c > rules.max_prompt_tokens) {
		violations.push(Violation::TooManyPromptTokens {
			count,
			max: rules.max_prompt_tokens,
		});
	}
	if let Some(count) = completion.filter(|c| *c > rules.max_completion_tokens) {
		violations.push(Violation::TooManyCompletionTokens {
			count,
			max: rules.max_completion_tokens,
		});
	}
	if let (Some(prompt), Some(completion), Some(total)) = (prompt, completion, total) {
		if prompt.checked_add(completion) != Some(total) {
			violations.push(Violation::TokenSumMismatch {
				prompt,
				completion,
				total,
			});
		}
	}
}

// endregion: --- Check

// region:    --- Tests


// endregion: --- Tests
