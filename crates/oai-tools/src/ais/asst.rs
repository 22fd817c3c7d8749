use crate::ais::msg::{user_msg, TranscriptEntry};
use crate::ais::poll::{poll_until_terminal, PollPolicy};
use crate::ais::{AisClient, AisEvent, AsstId, AsstRef, MessagePage, RunId, ThreadId};
use crate::{Error, Result};
use async_openai::config::{Config as _, OPENAI_BETA_HEADER};
use async_openai::error::{ApiError, OpenAIError};
use async_openai::types::{
	CreateAssistantRequest, CreateRunRequest, CreateThreadRequest, MessageObject, RunStatus,
};
use reqwest::header::HeaderValue;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

// region:    --- Types

pub struct CreateConfig {
	pub name: String,
	pub model: String,
	pub instructions: String,
}

// endregion: --- Types

// region:    --- Asst CRUD

pub async fn create(ais: &AisClient, config: &CreateConfig) -> Result<AsstId> {
	let oac = ais.oa_client();

	let oa_assts = oac.assistants();

	let asst_obj = oa_assts
		.create(CreateAssistantRequest {
			model: config.model.clone(),
			name: Some(config.name.clone()),
			instructions: Some(config.instructions.clone()),
			..Default::default()
		})
		.await?;

	let asst_id: AsstId = asst_obj.id.into();
	debug!(asst_id = %asst_id, model = %config.model, "assistant created");

	ais.event_bus().send(AisEvent::AsstCreated(AsstRef::new(
		&config.name,
		asst_id.clone(),
	)))?;

	Ok(asst_id)
}

pub async fn delete(ais: &AisClient, asst_ref: &AsstRef) -> Result<()> {
	let oac = ais.oa_client();

	let oa_assts = oac.assistants();

	oa_assts.delete(&asst_ref.id).await?;

	ais.event_bus()
		.send(AisEvent::AsstDeleted(asst_ref.clone()))?;

	Ok(())
}

// endregion: --- Asst CRUD

// region:    --- Thread

pub async fn create_thread(ais: &AisClient) -> Result<ThreadId> {
	let oac = ais.oa_client();

	let oa_threads = oac.threads();

	let res = oa_threads
		.create(CreateThreadRequest {
			..Default::default()
		})
		.await?;

	let thread_id: ThreadId = res.id.into();
	ais.event_bus()
		.send(AisEvent::ThreadCreated(thread_id.clone()))?;

	Ok(thread_id)
}

pub async fn add_user_msg(ais: &AisClient, thread_id: &ThreadId, msg: &str) -> Result<()> {
	let oac = ais.oa_client();

	let _message_obj = oac.threads().messages(thread_id).create(user_msg(msg)).await?;

	ais.event_bus().send(AisEvent::MsgAdded {
		thread_id: thread_id.clone(),
		content: msg.to_string(),
	})?;

	Ok(())
}

pub async fn list_msgs(
	ais: &AisClient,
	thread_id: &ThreadId,
	page: &MessagePage,
) -> Result<Vec<MessageObject>> {
	let oac = ais.oa_client();

	let messages = oac
		.threads()
		.messages(thread_id)
		.list(&page.to_query())
		.await?;

	debug!(thread_id = %thread_id, count = messages.data.len(), "messages listed");

	Ok(messages.data)
}

/// The raw `{"object": "list", "data": [...]}` listing of the thread messages.
///
/// Goes around the typed client so every message field comes back untouched,
/// whatever the API version adds or removes.
pub async fn list_msgs_json(ais: &AisClient, thread_id: &ThreadId, page: &MessagePage) -> Result<Value> {
	let oa_config = ais.oa_client().config();
	let url = oa_config.url(&format!("/threads/{thread_id}/messages"));

	let mut headers = oa_config.headers();
	headers.insert(OPENAI_BETA_HEADER, HeaderValue::from_static("assistants=v2"));

	let res = ais
		.http_client()
		.get(url)
		.headers(headers)
		.query(&page.to_query())
		.send()
		.await?;
	let status = res.status();
	let body = res.bytes().await?;

	if !status.is_success() {
		return Err(error_from_body(status.as_u16(), &body));
	}

	let listing: Value = serde_json::from_slice(&body)?;
	debug!(thread_id = %thread_id, "raw message listing fetched");

	Ok(listing)
}

#[derive(Deserialize)]
struct ApiErrorBody {
	error: ApiError,
}

/// The API error when the body carries one, the status and raw body otherwise.
fn error_from_body(status: u16, body: &[u8]) -> Error {
	match serde_json::from_slice::<ApiErrorBody>(body) {
		Ok(ApiErrorBody { error }) => Error::OpenAI(OpenAIError::ApiError(error)),
		Err(_) => Error::HttpStatus {
			status,
			body: String::from_utf8_lossy(body).into_owned(),
		},
	}
}

/// The thread messages in chronological order (the listing is newest first).
pub async fn transcript(ais: &AisClient, thread_id: &ThreadId) -> Result<Vec<TranscriptEntry>> {
	let msgs = list_msgs(ais, thread_id, &MessagePage::default()).await?;

	msgs.into_iter()
		.rev()
		.map(TranscriptEntry::from_message)
		.collect()
}

// endregion: --- Thread

// region:    --- Run

pub async fn create_run(ais: &AisClient, asst_id: &AsstId, thread_id: &ThreadId) -> Result<RunId> {
	let oac = ais.oa_client();

	let run_request = CreateRunRequest {
		assistant_id: asst_id.to_string(),
		..Default::default()
	};
	let run = oac.threads().runs(thread_id).create(run_request).await?;

	let run_id: RunId = run.id.into();
	ais.event_bus().send(AisEvent::RunStarted(run_id.clone()))?;

	Ok(run_id)
}

/// Polls the run per `policy` until it completes. See [`poll_until_terminal`].
pub async fn wait_for_run(
	ais: &AisClient,
	thread_id: &ThreadId,
	run_id: &RunId,
	policy: &PollPolicy,
) -> Result<RunStatus> {
	let status = poll_until_terminal(policy, |attempt| {
		fetch_run_status(ais, thread_id, run_id, attempt)
	})
	.await?;

	ais.event_bus()
		.send(AisEvent::RunCompleted(run_id.clone()))?;

	Ok(status)
}

async fn fetch_run_status(
	ais: &AisClient,
	thread_id: &ThreadId,
	run_id: &RunId,
	attempt: u32,
) -> Result<RunStatus> {
	let run = ais.oa_client().threads().runs(thread_id).retrieve(run_id).await?;

	ais.event_bus().send(AisEvent::RunPolled {
		run_id: run_id.clone(),
		attempt,
		status: run.status.clone(),
	})?;

	Ok(run.status)
}

/// Posts `msg` as the user, runs the assistant on the thread, and waits for the run to complete.
pub async fn run_thread_msg(
	ais: &AisClient,
	asst_id: &AsstId,
	thread_id: &ThreadId,
	msg: &str,
	policy: &PollPolicy,
) -> Result<RunStatus> {
	add_user_msg(ais, thread_id, msg).await?;

	let run_id = create_run(ais, asst_id, thread_id).await?;

	wait_for_run(ais, thread_id, &run_id, policy).await
}

// endregion: --- Run

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;
	use crate::ais::new_ais_client;
	use crate::config::Settings;
	use crate::event::{Event, EventBus};
	use crate::Config;
	use serde_json::json;
	use std::time::Duration;

	fn fx_ais_client(server: &mockito::ServerGuard) -> Result<AisClient> {
		let settings = Settings {
			api_base: Some(server.url()),
			..Default::default()
		};
		let config = Config::new(Some("sk-test".to_string()), settings);
		Ok(new_ais_client(&config, EventBus::new())?)
	}

	fn fx_run(status: &str) -> String {
		json!({
			"id": "run_1",
			"object": "thread.run",
			"created_at": 100,
			"thread_id": "thread_1",
			"assistant_id": "asst_1",
			"status": status,
			"required_action": null,
			"last_error": null,
			"expires_at": null,
			"started_at": 101,
			"cancelled_at": null,
			"failed_at": null,
			"completed_at": null,
			"model": "gpt-4-turbo-preview",
			"instructions": "",
			"tools": [],
			"file_ids": [],
			"metadata": {}
		})
		.to_string()
	}

	fn fx_policy() -> PollPolicy {
		PollPolicy::new(Duration::from_millis(1), Duration::from_millis(1), 1.0, 3)
	}

	#[tokio::test]
	async fn test_wait_for_run_completed_ok() -> Result<()> {
		// -- Setup & Fixtures
		let mut server = mockito::Server::new_async().await;
		let mock = server
			.mock("GET", "/threads/thread_1/runs/run_1")
			.with_status(200)
			.with_header("content-type", "application/json")
			.with_body(fx_run("completed"))
			.expect(1)
			.create_async()
			.await;
		let ais = fx_ais_client(&server)?;
		let mut rx = ais.event_bus().subscribe()?;

		// -- Exec
		let status = wait_for_run(&ais, &ThreadId::from("thread_1"), &RunId::from("run_1".to_string()), &fx_policy()).await?;

		// -- Check
		mock.assert_async().await;
		assert_eq!(status, RunStatus::Completed);
		match rx.recv().await? {
			Event::Ais(AisEvent::RunPolled { attempt, status, .. }) => {
				assert_eq!(attempt, 1);
				assert_eq!(status, RunStatus::Completed);
			}
			other => return Err(format!("unexpected event {other:?}").into()),
		}
		match rx.recv().await? {
			Event::Ais(AisEvent::RunCompleted(run_id)) => assert_eq!(run_id.as_str(), "run_1"),
			other => return Err(format!("unexpected event {other:?}").into()),
		}

		Ok(())
	}

	#[tokio::test]
	async fn test_wait_for_run_failed_err() -> Result<()> {
		// -- Setup & Fixtures
		let mut server = mockito::Server::new_async().await;
		let _mock = server
			.mock("GET", "/threads/thread_1/runs/run_1")
			.with_status(200)
			.with_header("content-type", "application/json")
			.with_body(fx_run("failed"))
			.create_async()
			.await;
		let ais = fx_ais_client(&server)?;
		let mut rx = ais.event_bus().subscribe()?;

		// -- Exec
		let res = wait_for_run(&ais, &ThreadId::from("thread_1"), &RunId::from("run_1".to_string()), &fx_policy()).await;

		// -- Check
		assert!(matches!(res, Err(crate::Error::RunEnded(RunStatus::Failed))), "unexpected {res:?}");
		match rx.recv().await? {
			Event::Ais(AisEvent::RunPolled { status, .. }) => assert_eq!(status, RunStatus::Failed),
			other => return Err(format!("unexpected event {other:?}").into()),
		}

		Ok(())
	}

	#[tokio::test]
	async fn test_wait_for_run_exhausted_err() -> Result<()> {
		// -- Setup & Fixtures
		let mut server = mockito::Server::new_async().await;
		let mock = server
			.mock("GET", "/threads/thread_1/runs/run_1")
			.with_status(200)
			.with_header("content-type", "application/json")
			.with_body(fx_run("in_progress"))
			.expect(3)
			.create_async()
			.await;
		let ais = fx_ais_client(&server)?;

		// -- Exec
		let res = wait_for_run(&ais, &ThreadId::from("thread_1"), &RunId::from("run_1".to_string()), &fx_policy()).await;

		// -- Check
		mock.assert_async().await;
		assert!(
			matches!(
				res,
				Err(crate::Error::RunPollExhausted {
					attempts: 3,
					last_status: Some(RunStatus::InProgress)
				})
			),
			"unexpected {res:?}"
		);

		Ok(())
	}
}

// endregion: --- Tests
