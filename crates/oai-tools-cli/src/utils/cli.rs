use crate::Result;
use console::{style, Style, StyledObject, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use oai_tools::ais::msg::TranscriptEntry;
use oai_tools::ais::AisEvent;
use oai_tools::event::{Event, EventBus};

// region:    --- Prompts

pub fn prompt(text: &str) -> Result<String> {
	let theme = ColorfulTheme {
		prompt_style: Style::new().for_stderr().color256(45),
		prompt_prefix: style("?".to_string()).color256(45).for_stderr(),
		..ColorfulTheme::default()
	};

	Term::stdout().write_line("")?;
	let input = Input::with_theme(&theme);
	let res = input.with_prompt(text).interact_text()?;

	Ok(res)
}

// endregion: --- Prompts

// region:    --- Icons

pub fn ico_res() -> StyledObject<&'static str> {
	style("➤").color256(45)
}

pub fn ico_check() -> StyledObject<&'static str> {
	style("✔").green()
}

pub fn ico_wait() -> StyledObject<&'static str> {
	style("…").yellow()
}

pub fn ico_deleted_ok() -> StyledObject<&'static str> {
	style("⌫").green()
}

pub fn ico_err() -> StyledObject<&'static str> {
	style("✗").red()
}

// endregion: --- Icons

// region:    --- Text Output

pub fn txt_res(text: String) -> StyledObject<String> {
	style(text).bright()
}

const WRAP_WIDTH: usize = 100;

pub fn print_transcript(entries: &[TranscriptEntry]) {
	println!("\nConversation:");
	for entry in entries {
		println!("{}", textwrap::fill(&entry.to_string(), WRAP_WIDTH));
	}
}

// endregion: --- Text Output

// region:    --- Event Printer

pub fn event_printer(event_bus: &EventBus) -> Result<()> {
	let mut rx = event_bus.subscribe()?;

	tokio::spawn(async move {
		let term = Term::stdout();

		// Err means the bus is gone (or lagged), nothing more to print.
		while let Ok(evt) = rx.recv().await {
			let line = match evt {
				Event::Ais(ais_evt) => match ais_evt {
					AisEvent::AsstCreated(asst_ref) => format!(
						"{} Created assistant {} with ID: {}",
						ico_check(),
						asst_ref.name,
						asst_ref.id
					),
					AisEvent::AsstDeleted(asst_ref) => format!(
						"{} Assistant {} deleted",
						ico_deleted_ok(),
						asst_ref.name
					),
					AisEvent::ThreadCreated(thread_id) => {
						format!("{} Created thread with ID: {thread_id}", ico_check())
					}
					AisEvent::MsgAdded { content, .. } => {
						format!("{} Added message to thread: '{content}'", ico_check())
					}
					AisEvent::RunStarted(run_id) => {
						format!("{} Started run with ID: {run_id}", ico_check())
					}
					AisEvent::RunPolled {
						attempt, status, ..
					} => format!(
						"{} Waiting for run to complete. Current status: {status:?} (check {attempt})",
						ico_wait()
					),
					AisEvent::RunCompleted(run_id) => {
						format!("{} Run {run_id} completed", ico_check())
					}
				},
			};
			let _ = term.write_line(&line);
		}
	});

	Ok(())
}

// endregion: --- Event Printer
