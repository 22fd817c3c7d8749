use crate::cmd::FilterDateArgs;
use crate::Result;
use oai_tools::ais::{new_ais_client, MessagePage};
use oai_tools::event::EventBus;
use oai_tools::msgs::{
	filter_by_created_at, ApiSource, FileSource, FilterOutput, Message, MessageSource, TimeRange,
};
use oai_tools::{save_to_json, to_pretty_json, Config};
use std::process::ExitCode;
use tracing::info;

pub async fn exec(config: &Config, args: FilterDateArgs) -> Result<ExitCode> {
	// -- Bad bounds fail before any read
	let range = TimeRange::parse(&args.start, &args.end)?;

	// -- Fetch (source errors are fatal here)
	let msgs = match (args.input, args.thread) {
		(Some(input), _) => fetch(&FileSource::new(input)).await?,
		(None, Some(thread_id)) => {
			let ais = new_ais_client(config, EventBus::new())?;
			fetch(&ApiSource::new(&ais, thread_id.as_str(), MessagePage::default())).await?
		}
		(None, None) => return Err("either --input or --thread is required".into()),
	};
	let total = msgs.len();

	// -- Filter
	let output = FilterOutput::from(filter_by_created_at(msgs, &range));
	info!(total, kept = output.count, "filtered by created_at");

	// -- Output
	match args.output {
		Some(file) => {
			save_to_json(&file, &output)?;
			eprintln!("Filtered {} messages written to {}", output.count, file.display());
		}
		None => println!("{}", to_pretty_json(&output)?),
	}

	Ok(ExitCode::SUCCESS)
}

async fn fetch(source: &impl MessageSource) -> oai_tools::Result<Vec<Message>> {
	info!("reading messages from {}", source.describe());
	source.fetch().await
}
