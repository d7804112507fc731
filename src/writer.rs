//! Writing encoded currencies to files

use crate::currency::Currencies;
use crate::error::{CurrencyError, Result};
use crate::format::OutputFormat;
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// What to do when the output file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Ask on the given input/output streams
    Prompt,
    /// Overwrite silently
    Always,
    /// Fail with [`CurrencyError::FileExists`]
    Never,
}

/// State of an output path after [`prepare_output_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFile {
    /// The file did not exist and an empty one was created
    Created,
    /// The file exists and may be overwritten
    Overwrite,
}

/// Check that `path` can be written before anything is fetched.
///
/// Missing files are created empty so that permission problems show up early.
pub fn prepare_output_file<R: BufRead, W: Write>(
    path: &Path,
    policy: OverwritePolicy,
    input: &mut R,
    output: &mut W,
) -> Result<OutputFile> {
    if path.as_os_str().is_empty() {
        return Err(CurrencyError::InvalidFileName("empty".to_string()));
    }

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("File {} does not exist, creating", path.display());
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|source| CurrencyError::FileWrite {
                    path: path.to_path_buf(),
                    source,
                })?;
            return Ok(OutputFile::Created);
        }
        Err(e) => {
            return Err(CurrencyError::InvalidFileName(format!(
                "failed to check if file {} exists: {}",
                path.display(),
                e
            )))
        }
    };

    if metadata.is_dir() {
        return Err(CurrencyError::InvalidFileName(format!(
            "{} is a directory",
            path.display()
        )));
    }

    match policy {
        OverwritePolicy::Always => Ok(OutputFile::Overwrite),
        OverwritePolicy::Never => Err(CurrencyError::FileExists(path.to_path_buf())),
        OverwritePolicy::Prompt => {
            write!(
                output,
                "File {} already exists. Do you want to overwrite it? (y/n): ",
                path.display()
            )?;
            output.flush()?;

            let mut answer = String::new();
            input.read_line(&mut answer)?;

            match answer.trim() {
                "y" | "Y" => Ok(OutputFile::Overwrite),
                _ => Err(CurrencyError::OverwriteDeclined(path.to_path_buf())),
            }
        }
    }
}

/// Encode `currencies` and write them to `path`, replacing any existing content
pub fn write_currencies_to_file(
    currencies: &Currencies,
    format: OutputFormat,
    path: &Path,
) -> Result<()> {
    let content = currencies.encode(format)?;

    fs::write(path, content).map_err(|source| CurrencyError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "Wrote {} currencies to {} as {}",
        currencies.len(),
        path.display(),
        format
    );
    Ok(())
}

/// Default path for `format` inside `directory`
pub fn default_output_path(
    directory: &Path,
    prefix: &str,
    format: OutputFormat,
    date: NaiveDate,
) -> PathBuf {
    directory.join(format.default_file_name(prefix, date))
}

/// Result of writing one format
#[derive(Debug)]
pub struct FormatWrite {
    pub format: OutputFormat,
    pub path: PathBuf,
    pub result: Result<()>,
}

/// Write each `(format, path)` target in order.
///
/// Every target is attempted; a failure for one does not stop the others.
pub fn write_targets(currencies: &Currencies, targets: &[(OutputFormat, PathBuf)]) -> Vec<FormatWrite> {
    targets
        .iter()
        .map(|(format, path)| {
            let result = write_currencies_to_file(currencies, *format, path);
            if let Err(e) = &result {
                log::debug!("Writing {} failed: {}", format, e);
            }
            FormatWrite {
                format: *format,
                path: path.clone(),
                result,
            }
        })
        .collect()
}

/// Write each format to its default file name inside `directory`
pub fn write_formats_to_default_files(
    currencies: &Currencies,
    formats: &[OutputFormat],
    directory: &Path,
    prefix: &str,
    date: NaiveDate,
) -> Vec<FormatWrite> {
    let targets: Vec<(OutputFormat, PathBuf)> = formats
        .iter()
        .map(|&format| (format, default_output_path(directory, prefix, format, date)))
        .collect();

    write_targets(currencies, &targets)
}
