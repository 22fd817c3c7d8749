use crate::cmd::ImageTextArgs;
use crate::utils::cli::{ico_check, ico_err, txt_res};
use crate::Result;
use oai_tools::ais::vision::{extract_text, text_output_path, ExtractOptions};
use oai_tools::ais::{new_ais_client, AisClient};
use oai_tools::event::EventBus;
use oai_tools::{ensure_dir, list_image_files, save_to_json, to_pretty_json, Config};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

const SEPARATOR: &str = "--------------------------------------------------";

pub async fn exec(config: &Config, args: ImageTextArgs) -> Result<ExitCode> {
	let opts = ExtractOptions::new(args.preset.into(), &config.settings.vision, args.model);

	match (args.image, args.dir) {
		(Some(image), _) => {
			let ais = new_ais_client(config, EventBus::new())?;
			extract_one(&ais, &image, args.output.as_deref(), &opts).await
		}
		(None, Some(dir)) => extract_dir(config, &dir, &args.out_dir, &opts).await,
		(None, None) => Err("either --image or --dir is required".into()),
	}
}

async fn extract_one(
	ais: &AisClient,
	image: &Path,
	output: Option<&Path>,
	opts: &ExtractOptions,
) -> Result<ExitCode> {
	let Some(text) = extract_text(ais, image, opts).await?.filter(|text| !text.trim().is_empty()) else {
		eprintln!("{} No text extracted from {}", ico_err(), image.display());
		return Ok(ExitCode::FAILURE);
	};

	match output {
		Some(file) => {
			save_to_json(file, &text)?;
			eprintln!("{} Text written to {}", ico_check(), file.display());
		}
		None => println!("{}", to_pretty_json(&text)?),
	}

	Ok(ExitCode::SUCCESS)
}

async fn extract_dir(config: &Config, dir: &Path, out_dir: &Path, opts: &ExtractOptions) -> Result<ExitCode> {
	// -- Input dir
	if ensure_dir(dir)? {
		println!(
			"Created directory {}. Add .jpg or .png images to it and run again.",
			dir.display()
		);
		return Ok(ExitCode::SUCCESS);
	}
	let images = list_image_files(dir)?;
	if images.is_empty() {
		println!("No .jpg or .png images found in {}", dir.display());
		return Ok(ExitCode::SUCCESS);
	}

	// -- Extract each image
	let ais = new_ais_client(config, EventBus::new())?;
	ensure_dir(out_dir)?;
	let mut failed = 0;

	for image in &images {
		println!("\nProcessing {}...", image.display());
		match extract_text(&ais, image, opts).await? {
			Some(text) if !text.trim().is_empty() => {
				let out_file = text_output_path(out_dir, image);
				fs::write(&out_file, &text)?;
				println!("{} Saved to {}", ico_check(), out_file.display());
				println!("{SEPARATOR}");
				println!("{}", txt_res(text));
				println!("{SEPARATOR}");
			}
			_ => {
				failed += 1;
				println!("{} Failed to extract text from {}", ico_err(), image.display());
			}
		}
	}

	println!("\nProcessed {} image(s), {failed} failed.", images.len());

	Ok(ExitCode::SUCCESS)
}
