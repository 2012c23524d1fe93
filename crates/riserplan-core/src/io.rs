//! Loading schedule inputs and overrides from disk
//!
//! Both TOML and JSON are accepted; the format follows the file extension.

use crate::{DurationOverrides, InputError, ScheduleInput};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Serialisation format of an input file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            _ => Err(InputError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn parse<T: DeserializeOwned>(text: &str, format: Format) -> Result<T, InputError> {
    match format {
        Format::Toml => Ok(toml::from_str(text)?),
        Format::Json => Ok(serde_json::from_str(text)?),
    }
}

/// Parse a schedule input from text
pub fn parse_input(text: &str, format: Format) -> Result<ScheduleInput, InputError> {
    parse(text, format)
}

/// Parse a duration overrides table from text
pub fn parse_overrides(text: &str, format: Format) -> Result<DurationOverrides, InputError> {
    parse(text, format)
}

/// Load a schedule input file (`.toml` or `.json`)
pub fn load_input(path: &Path) -> Result<ScheduleInput, InputError> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    parse_input(&text, format)
}

/// Load a duration overrides file (`.toml` or `.json`)
pub fn load_overrides(path: &Path) -> Result<DurationOverrides, InputError> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    parse_overrides(&text, format)
}

/// Serialise an input as TOML
pub fn input_to_toml(input: &ScheduleInput) -> Result<String, InputError> {
    Ok(toml::to_string(input)?)
}
