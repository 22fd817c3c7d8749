use crate::cmd::CheckResponseArgs;
use crate::utils::cli::{ico_check, ico_err};
use crate::Result;
use oai_tools::check::{check_completion, load_response, CheckRules};
use oai_tools::Config;
use std::process::ExitCode;

pub fn exec(config: &Config, args: CheckResponseArgs) -> Result<ExitCode> {
	let resp = load_response(&args.file)?;

	let mut rules = CheckRules::from(&config.settings.check);
	rules.forbidden.extend(args.forbidden);

	let violations = check_completion(&resp, &rules);
	if violations.is_empty() {
		println!("{} {} passes all checks", ico_check(), args.file.display());
		return Ok(ExitCode::SUCCESS);
	}

	println!("{} {} has {} violation(s):", ico_err(), args.file.display(), violations.len());
	for violation in &violations {
		println!("  - {violation}");
	}

	Ok(ExitCode::FAILURE)
}
