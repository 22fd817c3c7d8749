// region:    --- Modules

mod cmd;
mod commands;
mod error;
mod utils;

pub use self::error::{Error, Result};
use crate::cmd::{Cli, Command};
use crate::utils::log::init_tracing;
use clap::Parser;
use oai_tools::Config;
use std::process::ExitCode;

// endregion: --- Modules

#[tokio::main]
async fn main() -> ExitCode {
	// A missing .env is fine.
	let _ = dotenvy::dotenv();

	let cli = Cli::parse();
	init_tracing(cli.debug);

	match start(cli).await {
		Ok(code) => code,
		Err(e) => {
			eprintln!("\nError: {}\n", e);
			ExitCode::FAILURE
		}
	}
}

async fn start(cli: Cli) -> Result<ExitCode> {
	// -- Resolve the config once, before any command runs
	let config = Config::resolve(cli.api_key, cli.config.as_deref())?;

	match cli.command {
		Command::FilterDate(args) => commands::filter_date::exec(&config, args).await,
		Command::FilterMeta(args) => commands::filter_meta::exec(&config, args).await,
		Command::ImageText(args) => commands::image_text::exec(&config, args).await,
		Command::ThreadDemo(args) => commands::thread_demo::exec(&config, args).await,
		Command::CheckResponse(args) => commands::check_response::exec(&config, args),
	}
}
