use clap::{Args, Parser, Subcommand, ValueEnum};
use oai_tools::ais::vision::Preset;
use oai_tools::ais::Order;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
	name = "oait",
	version,
	about = "Small OpenAI API utilities: filter thread messages, extract image text, drive an assistant thread."
)]
pub struct Cli {
	/// Path to the TOML settings file (default: ./oait.toml when present).
	#[arg(long, global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// OpenAI API key.
	#[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
	pub api_key: Option<String>,

	/// Debug logging (unless RUST_LOG is set).
	#[arg(long, global = true)]
	pub debug: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Keep the messages whose created_at falls within [start, end].
	FilterDate(FilterDateArgs),
	/// Keep the messages whose metadata matches every key=value pair.
	FilterMeta(FilterMetaArgs),
	/// Extract the text of one image, or of every image in a directory.
	ImageText(ImageTextArgs),
	/// Create an assistant and a thread, and run a scripted conversation.
	ThreadDemo(ThreadDemoArgs),
	/// Validate a saved chat completion response.
	CheckResponse(CheckResponseArgs),
}

// region:    --- Filter Args

#[derive(Args, Debug)]
pub struct FilterDateArgs {
	/// Start timestamp (ISO 8601 or Unix seconds), inclusive. Without an offset, read as UTC.
	#[arg(long)]
	pub start: String,

	/// End timestamp (ISO 8601 or Unix seconds), inclusive. Without an offset, read as UTC.
	#[arg(long)]
	pub end: String,

	/// Input JSON file with the messages (array or {"data": [...]}).
	#[arg(long, value_name = "FILE", required_unless_present = "thread")]
	pub input: Option<PathBuf>,

	/// Thread to fetch the messages from when no --input is given.
	#[arg(long, value_name = "THREAD_ID", conflicts_with = "input")]
	pub thread: Option<String>,

	/// Output JSON file (default: stdout).
	#[arg(long, value_name = "FILE")]
	pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct FilterMetaArgs {
	/// Thread to fetch the messages from.
	#[arg(required_unless_present = "input", conflicts_with = "input")]
	pub thread_id: Option<String>,

	/// Input JSON file with the messages, instead of a thread.
	#[arg(long, value_name = "FILE")]
	pub input: Option<PathBuf>,

	/// Metadata filters in key=value format.
	#[arg(long, num_args = 1.., value_name = "KEY=VALUE")]
	pub metadata: Vec<String>,

	/// Maximum number of messages to retrieve (1-100).
	#[arg(long, default_value_t = 100)]
	pub limit: u32,

	/// Sort order by creation time.
	#[arg(long, value_enum, default_value_t = OrderArg::Desc)]
	pub order: OrderArg,

	/// Output JSON file (default: openai_messages_<YYYYmmdd_HHMMSS>.json).
	#[arg(long, value_name = "FILE", conflicts_with = "stdout")]
	pub output: Option<PathBuf>,

	/// Print the messages to stdout instead of writing a file.
	#[arg(long)]
	pub stdout: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OrderArg {
	Asc,
	Desc,
}

impl From<OrderArg> for Order {
	fn from(val: OrderArg) -> Self {
		match val {
			OrderArg::Asc => Order::Asc,
			OrderArg::Desc => Order::Desc,
		}
	}
}

// endregion: --- Filter Args

// region:    --- Image Args

#[derive(Args, Debug)]
pub struct ImageTextArgs {
	/// Path to the image file.
	#[arg(long, value_name = "FILE", required_unless_present = "dir")]
	pub image: Option<PathBuf>,

	/// Directory of .jpg/.png images, processed recursively.
	#[arg(long, value_name = "DIR", conflicts_with = "image")]
	pub dir: Option<PathBuf>,

	/// Output JSON file for --image.
	#[arg(long, value_name = "FILE", requires = "image")]
	pub output: Option<PathBuf>,

	/// Output directory of the <stem>_text.txt files for --dir.
	#[arg(long, value_name = "DIR", default_value = "extracted_text")]
	pub out_dir: PathBuf,

	/// Prompt preset.
	#[arg(long, value_enum, default_value_t = PresetArg::General)]
	pub preset: PresetArg,

	/// Vision model (overrides settings and preset default).
	#[arg(long)]
	pub model: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PresetArg {
	General,
	IdDocument,
}

impl From<PresetArg> for Preset {
	fn from(val: PresetArg) -> Self {
		match val {
			PresetArg::General => Preset::General,
			PresetArg::IdDocument => Preset::IdDocument,
		}
	}
}

// endregion: --- Image Args

// region:    --- Thread Args

#[derive(Args, Debug)]
pub struct ThreadDemoArgs {
	/// Assistant model.
	#[arg(long)]
	pub model: Option<String>,

	/// Assistant name.
	#[arg(long)]
	pub name: Option<String>,

	/// Assistant instructions.
	#[arg(long)]
	pub instructions: Option<String>,

	/// User message (repeatable). Replaces the scripted passport questions.
	#[arg(long = "message", value_name = "TEXT")]
	pub messages: Vec<String>,

	/// Keep asking after the scripted turns (`/q` to quit).
	#[arg(long)]
	pub interactive: bool,

	/// Delete the assistant at the end.
	#[arg(long)]
	pub cleanup: bool,
}

// endregion: --- Thread Args

// region:    --- Check Args

#[derive(Args, Debug)]
pub struct CheckResponseArgs {
	/// Chat completion response JSON file.
	#[arg(value_name = "FILE")]
	pub file: PathBuf,

	/// Forbidden word (repeatable, case-insensitive). Adds to the settings list.
	#[arg(long = "forbid", value_name = "WORD")]
	pub forbidden: Vec<String>,
}

// endregion: --- Check Args
