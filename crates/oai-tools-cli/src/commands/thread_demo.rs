use crate::cmd::ThreadDemoArgs;
use crate::utils::cli::{event_printer, ico_res, print_transcript, prompt};
use crate::Result;
use oai_tools::config::AssistantSettings;
use oai_tools::convo::{Convo, DEMO_SCRIPT};
use oai_tools::event::EventBus;
use oai_tools::Config;
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

const QUIT: &str = "/q";

/// Lets the event printer catch up before the next prompt or exit.
const EVENT_FLUSH_DELAY: Duration = Duration::from_millis(50);

pub async fn exec(config: &Config, args: ThreadDemoArgs) -> Result<ExitCode> {
	// -- Assistant settings, CLI args win over the config file
	let defaults = config.settings.assistant.clone();
	let asst_settings = AssistantSettings {
		name: args.name.unwrap_or(defaults.name),
		model: args.model.unwrap_or(defaults.model),
		instructions: args.instructions.unwrap_or(defaults.instructions),
	};

	// -- Start, with events printed as they come
	let event_bus = EventBus::new();
	event_printer(&event_bus)?;
	let convo = Convo::start(config, asst_settings, Some(event_bus)).await?;
	info!(asst = %convo.asst().name, thread_id = %convo.thread_id(), "thread demo started");

	// -- Scripted turns
	let script: Vec<String> = if args.messages.is_empty() {
		DEMO_SCRIPT.iter().map(|msg| msg.to_string()).collect()
	} else {
		args.messages
	};
	for msg in &script {
		let transcript = convo.ask(msg).await?;
		print_transcript(&transcript);
	}

	// -- Interactive turns
	if args.interactive {
		loop {
			sleep(EVENT_FLUSH_DELAY).await;
			let input = prompt("Ask")?;
			let input = input.trim();
			if input == QUIT {
				break;
			}
			if input.is_empty() {
				continue;
			}
			let transcript = convo.ask(input).await?;
			if let Some(last) = transcript.last() {
				println!("\n{} {last}", ico_res());
			}
		}
	}

	if args.cleanup {
		convo.close().await?;
		sleep(EVENT_FLUSH_DELAY).await;
	}

	Ok(ExitCode::SUCCESS)
}
