use crate::{Error, Result};
use serde::Serialize;
use simple_fs::list_files;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const IMAGE_GLOBS: &[&str] = &["**/*.jpg", "**/*.jpeg", "**/*.png"];

// region:    --- Json Writer

/// Pretty JSON with 2-space indentation.
pub fn to_pretty_json<T>(data: &T) -> Result<String>
where
	T: Serialize,
{
	Ok(serde_json::to_string_pretty(data)?)
}

pub fn save_to_json<T>(file: impl AsRef<Path>, data: &T) -> Result<()>
where
	T: Serialize,
{
	let file = file.as_ref();

	let file = File::create(file).map_err(|e| Error::FileCannotCreate {
		file: file.display().to_string(),
		cause: e,
	})?;

	let mut writer = BufWriter::new(file);
	serde_json::to_writer_pretty(&mut writer, data)?;
	writeln!(writer)?;
	writer.flush()?;

	Ok(())
}

// endregion: --- Json Writer

// region:    --- Dir Utils

/// Returns true if one or more dir was created.
pub fn ensure_dir(dir: &Path) -> Result<bool> {
	if dir.is_dir() {
		Ok(false)
	} else {
		fs::create_dir_all(dir)?;
		Ok(true)
	}
}

// endregion: --- Dir Utils

// region:    --- Image Files

/// All `.jpg`, `.jpeg`, and `.png` files under `dir` (recursive), sorted by path.
pub fn list_image_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
	let dir = dir.as_ref();
	if !dir.is_dir() {
		return Err(Error::FileNotFound(dir.display().to_string()));
	}

	let mut files: Vec<PathBuf> = list_files(dir, Some(IMAGE_GLOBS), None)?
		.into_iter()
		.map(|file| AsRef::<Path>::as_ref(&file).to_path_buf())
		.collect();
	files.sort();

	Ok(files)
}

// endregion: --- Image Files

// region:    --- XFile

/// Trait that has methods that returns
/// the `&str` when ok, and when none or err, returns ""
pub trait XFile {
	fn x_file_stem(&self) -> &str;
	fn x_extension(&self) -> &str;
}

impl XFile for Path {
	fn x_file_stem(&self) -> &str {
		self.file_stem().and_then(OsStr::to_str).unwrap_or("")
	}

	fn x_extension(&self) -> &str {
		self.extension().and_then(OsStr::to_str).unwrap_or("")
	}
}

// endregion: --- XFile

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Error = Box<dyn std::error::Error>;
	type Result<T> = core::result::Result<T, Error>; // For tests.

	use super::*;
	use serde_json::json;
	use std::fs;

	#[test]
	fn test_to_pretty_json_two_space_ok() -> Result<()> {
		let txt = to_pretty_json(&json!({"data": [], "count": 0}))?;

		assert!(txt.contains("\n  \"count\": 0"), "not 2-space indented: {txt}");

		Ok(())
	}

	#[test]
	fn test_save_to_json_ok() -> Result<()> {
		// -- Setup & Fixtures
		let dir = tempfile::tempdir()?;
		let file = dir.path().join("out.json");

		// -- Exec
		save_to_json(&file, &json!({"count": 1}))?;

		// -- Check
		let content = fs::read_to_string(&file)?;
		assert_eq!(content, "{\n  \"count\": 1\n}\n");

		Ok(())
	}

	#[test]
	fn test_ensure_dir_ok() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let out_dir = dir.path().join("extracted_text");

		assert!(ensure_dir(&out_dir)?);
		assert!(!ensure_dir(&out_dir)?);
		assert!(out_dir.is_dir());

		Ok(())
	}

	#[test]
	fn test_list_image_files_ok() -> Result<()> {
		// -- Setup & Fixtures
		let dir = tempfile::tempdir()?;
		let sub = dir.path().join("back");
		fs::create_dir_all(&sub)?;
		fs::write(dir.path().join("front.jpg"), b"x")?;
		fs::write(sub.join("back.png"), b"x")?;
		fs::write(dir.path().join("notes.txt"), b"x")?;

		// -- Exec
		let files = list_image_files(dir.path())?;

		// -- Check
		let names: Vec<&str> = files.iter().map(|f| f.x_file_stem()).collect();
		assert_eq!(files.len(), 2);
		assert!(names.contains(&"front"));
		assert!(names.contains(&"back"));

		Ok(())
	}

	#[test]
	fn test_xfile_ok() -> Result<()> {
		let path = Path::new("test_images/id_card.front.jpg");

		assert_eq!(path.x_file_stem(), "id_card.front");
		assert_eq!(path.x_extension(), "jpg");
		assert_eq!(Path::new("/").x_file_stem(), "");

		Ok(())
	}
}

// endregion: --- Tests
