//! Smoke tests of the `oait` commands that do not reach the network.

type Error = Box<dyn std::error::Error>;
type Result<T> = core::result::Result<T, Error>; // For tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MESSAGES: &str = r#"{
  "object": "list",
  "data": [
    {"id": "msg_1", "created_at": 100, "metadata": {"topic": "billing", "lang": "en"}},
    {"id": "msg_2", "created_at": 200, "metadata": {"topic": "support"}},
    {"id": "msg_3", "created_at": 300, "metadata": {"topic": "billing", "lang": "fr"}},
    {"id": "msg_4", "metadata": {}}
  ]
}"#;

const RESPONSE: &str = r#"{
  "id": "cmpl-uqkvlQyYK7bGYrRHQ0eXlWi7",
  "object": "text_completion",
  "created": 1589478378,
  "model": "gpt-3.5-turbo",
  "choices": [
    {
      "message": {"content": "This is a test response from the OpenAI API.", "role": "assistant"},
      "finish_reason": "stop",
      "index": 0
    }
  ],
  "usage": {"prompt_tokens": 5, "completion_tokens": 10, "total_tokens": 15}
}"#;

/// `oait` run from an empty temp dir (no `oait.toml`), without an API key.
fn oait(dir: &TempDir) -> Result<Command> {
	let mut cmd = Command::cargo_bin("oait")?;
	cmd.current_dir(dir.path())
		.env_remove("OPENAI_API_KEY")
		.env_remove("RUST_LOG");
	Ok(cmd)
}

fn write_fixture(dir: &Path, name: &str, content: &str) -> Result<()> {
	fs::write(dir.join(name), content)?;
	Ok(())
}

// region:    --- Help

#[test]
fn test_filter_date_help_ok() -> Result<()> {
	let dir = tempfile::tempdir()?;

	oait(&dir)?
		.args(["filter-date", "--help"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Start timestamp"))
		.stdout(predicate::str::contains("Without an offset, read as UTC"));

	Ok(())
}

#[test]
fn test_filter_meta_help_ok() -> Result<()> {
	let dir = tempfile::tempdir()?;

	oait(&dir)?
		.args(["filter-meta", "--help"])
		.assert()
		.success()
		.stdout(predicate::str::contains("key=value"));

	Ok(())
}

#[test]
fn test_image_text_help_ok() -> Result<()> {
	let dir = tempfile::tempdir()?;

	oait(&dir)?
		.args(["image-text", "--help"])
		.assert()
		.success()
		.stdout(predicate::str::contains("id-document"));

	Ok(())
}

#[test]
fn test_thread_demo_help_ok() -> Result<()> {
	let dir = tempfile::tempdir()?;

	oait(&dir)?
		.args(["thread-demo", "--help"])
		.assert()
		.success()
		.stdout(predicate::str::contains("--cleanup"));

	Ok(())
}

// endregion: --- Help

// region:    --- Filter Date

#[test]
fn test_filter_date_input_ok() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "messages.json", MESSAGES)?;

	// -- Exec & Check
	oait(&dir)?
		.args(["filter-date", "--start", "150", "--end", "300", "--input", "messages.json"])
		.assert()
		.success()
		.stdout(predicate::str::contains(r#""count": 2"#))
		.stdout(predicate::str::contains("msg_2"))
		.stdout(predicate::str::contains("msg_3"))
		.stdout(predicate::str::contains("msg_4").not());

	Ok(())
}

#[test]
fn test_filter_date_output_file_ok() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "messages.json", MESSAGES)?;

	// -- Exec
	oait(&dir)?
		.args([
			"filter-date",
			"--start",
			"1970-01-01T00:00:00Z",
			"--end",
			"1970-01-01T00:02:30Z",
			"--input",
			"messages.json",
			"--output",
			"filtered.json",
		])
		.assert()
		.success()
		.stderr(predicate::str::contains("Filtered 1 messages written to"));

	// -- Check
	let content = fs::read_to_string(dir.path().join("filtered.json"))?;
	let value: serde_json::Value = serde_json::from_str(&content)?;
	assert_eq!(value["count"], 1);
	assert_eq!(value["data"][0]["id"], "msg_1");

	Ok(())
}

#[test]
fn test_filter_date_bad_timestamp_err() -> Result<()> {
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "messages.json", MESSAGES)?;

	oait(&dir)?
		.args(["filter-date", "--start", "yesterday", "--end", "300", "--input", "messages.json"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("TimestampParse"));

	Ok(())
}

#[test]
fn test_filter_date_missing_input_err() -> Result<()> {
	let dir = tempfile::tempdir()?;

	oait(&dir)?
		.args(["filter-date", "--start", "0", "--end", "300", "--input", "missing.json"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("FileNotFound"));

	Ok(())
}

// endregion: --- Filter Date

// region:    --- Filter Meta

#[test]
fn test_filter_meta_input_ok() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "messages.json", MESSAGES)?;

	// -- Exec & Check
	let output = oait(&dir)?
		.args([
			"filter-meta",
			"--input",
			"messages.json",
			"--metadata",
			"topic=billing",
			"lang = fr",
			"--stdout",
		])
		.assert()
		.success()
		.stderr(predicate::str::contains("Successfully retrieved 1 messages"))
		.get_output()
		.stdout
		.clone();

	// -- Check (the raw message array, no wrapper)
	let value: serde_json::Value = serde_json::from_slice(&output)?;
	let msgs = value.as_array().ok_or("stdout is not a JSON array")?;
	assert_eq!(msgs.len(), 1);
	assert_eq!(msgs[0]["id"], "msg_3");

	Ok(())
}

#[test]
fn test_filter_meta_default_export_file_ok() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "messages.json", MESSAGES)?;

	// -- Exec
	oait(&dir)?
		.args(["filter-meta", "--input", "messages.json", "--metadata", "topic=billing"])
		.assert()
		.success()
		.stderr(predicate::str::contains("Exported 2 messages to openai_messages_"));

	// -- Check
	let exported: Vec<_> = fs::read_dir(dir.path())?
		.filter_map(|entry| entry.ok())
		.map(|entry| entry.file_name().to_string_lossy().to_string())
		.filter(|name| name.starts_with("openai_messages_") && name.ends_with(".json"))
		.collect();
	assert_eq!(exported.len(), 1);
	let content = fs::read_to_string(dir.path().join(&exported[0]))?;
	let value: serde_json::Value = serde_json::from_str(&content)?;
	assert_eq!(value.as_array().map(Vec::len), Some(2));

	Ok(())
}

#[test]
fn test_filter_meta_no_match_ok() -> Result<()> {
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "messages.json", MESSAGES)?;

	oait(&dir)?
		.args(["filter-meta", "--input", "messages.json", "--metadata", "topic=sales"])
		.assert()
		.success()
		.stderr(predicate::str::contains("No messages found matching the criteria"));

	Ok(())
}

#[test]
fn test_filter_meta_unreadable_source_ok() -> Result<()> {
	// A failing source is reported, then treated as no messages.
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "messages.json", r#"{"items": []}"#)?;

	oait(&dir)?
		.args(["filter-meta", "--input", "messages.json"])
		.assert()
		.success()
		.stderr(predicate::str::contains("Error retrieving messages"))
		.stderr(predicate::str::contains("No messages found matching the criteria"));

	Ok(())
}

// endregion: --- Filter Meta

// region:    --- Image Text

#[test]
fn test_image_text_creates_missing_dir_ok() -> Result<()> {
	let dir = tempfile::tempdir()?;

	oait(&dir)?
		.args(["image-text", "--dir", "test_images"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Created directory"));

	assert!(dir.path().join("test_images").is_dir());

	Ok(())
}

#[test]
fn test_image_text_empty_dir_ok() -> Result<()> {
	let dir = tempfile::tempdir()?;
	fs::create_dir(dir.path().join("test_images"))?;

	oait(&dir)?
		.args(["image-text", "--dir", "test_images"])
		.assert()
		.success()
		.stdout(predicate::str::contains("No .jpg or .png images found"));

	Ok(())
}

#[test]
fn test_image_text_no_api_key_err() -> Result<()> {
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "id.jpg", "not really a jpeg")?;

	oait(&dir)?
		.args(["image-text", "--image", "id.jpg"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("MissingApiKey"));

	Ok(())
}

// endregion: --- Image Text

// region:    --- Thread Demo

#[test]
fn test_thread_demo_no_api_key_err() -> Result<()> {
	let dir = tempfile::tempdir()?;

	oait(&dir)?
		.arg("thread-demo")
		.assert()
		.failure()
		.stderr(predicate::str::contains("MissingApiKey"));

	Ok(())
}

// endregion: --- Thread Demo

// region:    --- Check Response

#[test]
fn test_check_response_pass_ok() -> Result<()> {
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "response.json", RESPONSE)?;

	oait(&dir)?
		.args(["check-response", "response.json"])
		.assert()
		.success()
		.stdout(predicate::str::contains("passes all checks"));

	Ok(())
}

#[test]
fn test_check_response_forbidden_word_err() -> Result<()> {
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "response.json", RESPONSE)?;

	oait(&dir)?
		.args(["check-response", "response.json", "--forbid", "OPENAI"])
		.assert()
		.failure()
		.stdout(predicate::str::contains("forbidden word 'OPENAI'"));

	Ok(())
}

#[test]
fn test_check_response_settings_file_ok() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "response.json", RESPONSE)?;
	write_fixture(dir.path(), "oait.toml", "[check]\nmax_len = 10\n")?;

	// -- Exec & Check
	oait(&dir)?
		.args(["check-response", "response.json"])
		.assert()
		.failure()
		.stdout(predicate::str::contains("content length 44 outside 5..=10"));

	Ok(())
}

#[test]
fn test_missing_config_file_err() -> Result<()> {
	let dir = tempfile::tempdir()?;
	write_fixture(dir.path(), "response.json", RESPONSE)?;

	oait(&dir)?
		.args(["--config", "nope.toml", "check-response", "response.json"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("ConfigFileNotFound"));

	Ok(())
}

// endregion: --- Check Response

// region:    --- Mock Api

/// `oait` pointed at `server` through `oait.toml`, with a test API key.
fn oait_with_api(dir: &TempDir, server: &mockito::ServerGuard) -> Result<Command> {
	write_fixture(dir.path(), "oait.toml", &format!("api_base = \"{}\"\n", server.url()))?;
	let mut cmd = oait(dir)?;
	cmd.env("OPENAI_API_KEY", "sk-test");
	Ok(cmd)
}

const THREAD_LISTING: &str = r#"{
  "object": "list",
  "data": [
    {
      "id": "msg_2",
      "object": "thread.message",
      "created_at": 200,
      "thread_id": "thread_1",
      "role": "assistant",
      "status": "completed",
      "attachments": [],
      "content": [{"type": "text", "text": {"value": "Ten years.", "annotations": []}}],
      "metadata": {"topic": "support"}
    },
    {
      "id": "msg_1",
      "object": "thread.message",
      "created_at": 100,
      "thread_id": "thread_1",
      "role": "user",
      "status": "completed",
      "attachments": [],
      "content": [{"type": "text", "text": {"value": "How long?", "annotations": []}}],
      "metadata": {"topic": "billing"}
    }
  ],
  "has_more": false
}"#;

#[test]
fn test_filter_date_thread_keeps_message_fields_ok() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	let mut server = mockito::Server::new();
	let mock = server
		.mock("GET", "/threads/thread_1/messages")
		.match_query(mockito::Matcher::Any)
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(THREAD_LISTING)
		.create();

	// -- Exec
	let output = oait_with_api(&dir, &server)?
		.args(["filter-date", "--start", "150", "--end", "1000", "--thread", "thread_1"])
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	// -- Check
	mock.assert();
	let value: serde_json::Value = serde_json::from_slice(&output)?;
	let listing: serde_json::Value = serde_json::from_str(THREAD_LISTING)?;
	assert_eq!(value["count"], 1);
	assert_eq!(value["data"][0], listing["data"][0]);

	Ok(())
}

#[test]
fn test_filter_meta_thread_api_error_ok() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	let mut server = mockito::Server::new();
	let _mock = server
		.mock("GET", "/threads/thread_1/messages")
		.match_query(mockito::Matcher::Any)
		.with_status(500)
		.with_body("upstream down")
		.create();

	// -- Exec & Check
	oait_with_api(&dir, &server)?
		.args(["filter-meta", "thread_1", "--metadata", "topic=billing"])
		.assert()
		.success()
		.stderr(predicate::str::contains("Error retrieving messages"))
		.stderr(predicate::str::contains("500"))
		.stderr(predicate::str::contains("upstream down"))
		.stderr(predicate::str::contains("No messages found matching the criteria"));

	Ok(())
}

#[test]
fn test_image_text_dir_empty_result_skipped_ok() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	fs::create_dir(dir.path().join("imgs"))?;
	write_fixture(&dir.path().join("imgs"), "a.jpg", "not really a jpeg")?;
	let mut server = mockito::Server::new();
	let _mock = server
		.mock("POST", "/chat/completions")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(
			r#"{"id": "chatcmpl-1", "object": "chat.completion", "created": 1589478378, "model": "gpt-4o",
			"choices": [{"index": 0, "message": {"role": "assistant", "content": "  "}, "finish_reason": "stop"}]}"#,
		)
		.create();

	// -- Exec
	oait_with_api(&dir, &server)?
		.args(["image-text", "--dir", "imgs", "--out-dir", "out"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Failed to extract text from"))
		.stdout(predicate::str::contains("1 failed"));

	// -- Check
	assert!(!dir.path().join("out").join("a_text.txt").exists());

	Ok(())
}

#[test]
fn test_image_text_dir_ok() -> Result<()> {
	// -- Setup & Fixtures
	let dir = tempfile::tempdir()?;
	fs::create_dir(dir.path().join("imgs"))?;
	write_fixture(&dir.path().join("imgs"), "a.jpg", "not really a jpeg")?;
	let mut server = mockito::Server::new();
	let _mock = server
		.mock("POST", "/chat/completions")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(
			r#"{"id": "chatcmpl-1", "object": "chat.completion", "created": 1589478378, "model": "gpt-4o",
			"choices": [{"index": 0, "message": {"role": "assistant", "content": "DRIVER LICENSE"}, "finish_reason": "stop"}]}"#,
		)
		.create();

	// -- Exec
	oait_with_api(&dir, &server)?
		.args(["image-text", "--dir", "imgs", "--out-dir", "out"])
		.assert()
		.success()
		.stdout(predicate::str::contains("DRIVER LICENSE"));

	// -- Check
	let content = fs::read_to_string(dir.path().join("out").join("a_text.txt"))?;
	assert_eq!(content, "DRIVER LICENSE");

	Ok(())
}

// endregion: --- Mock Api
