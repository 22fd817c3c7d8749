use crate::cmd::FilterMetaArgs;
use crate::Result;
use chrono::Local;
use oai_tools::ais::{new_ais_client, MessagePage};
use oai_tools::event::EventBus;
use oai_tools::msgs::{filter_by_metadata, ApiSource, FileSource, Message, MessageSource, MetadataFilter};
use oai_tools::{save_to_json, to_pretty_json, Config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

pub async fn exec(config: &Config, args: FilterMetaArgs) -> Result<ExitCode> {
	let filter = MetadataFilter::from_pairs(&args.metadata);
	if filter.is_empty() {
		info!("no metadata constraints, keeping every message");
	}
	let page = MessagePage::new(args.limit, args.order.into());

	// -- Fetch (a failing source yields an empty list)
	let msgs = match (args.input, args.thread_id) {
		(Some(input), _) => fetch_or_empty(&FileSource::new(input)).await,
		(None, Some(thread_id)) => {
			let ais = new_ais_client(config, EventBus::new())?;
			fetch_or_empty(&ApiSource::new(&ais, thread_id.as_str(), page)).await
		}
		(None, None) => return Err("either THREAD_ID or --input is required".into()),
	};

	// -- Filter
	let msgs = filter_by_metadata(msgs, &filter);
	info!(constraints = filter.len(), kept = msgs.len(), "filtered by metadata");

	if msgs.is_empty() {
		eprintln!("No messages found matching the criteria");
		return Ok(ExitCode::SUCCESS);
	}

	// -- Output (the raw message array)
	if args.stdout {
		println!("{}", to_pretty_json(&msgs)?);
	} else {
		let file = args.output.unwrap_or_else(export_file_name);
		save_to_json(&file, &msgs)?;
		eprintln!("Exported {} messages to {}", msgs.len(), file.display());
	}
	eprintln!("Successfully retrieved {} messages", msgs.len());

	Ok(ExitCode::SUCCESS)
}

async fn fetch_or_empty(source: &impl MessageSource) -> Vec<Message> {
	match source.fetch().await {
		Ok(msgs) => msgs,
		Err(err) => {
			warn!("cannot read messages from {}: {err}", source.describe());
			eprintln!("Error retrieving messages: {err}");
			Vec::new()
		}
	}
}

/// `openai_messages_<YYYYmmdd_HHMMSS>.json` in the current dir.
fn export_file_name() -> PathBuf {
	PathBuf::from(format!(
		"openai_messages_{}.json",
		Local::now().format("%Y%m%d_%H%M%S")
	))
}
