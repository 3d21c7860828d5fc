//! Command-line interface module
//!
//! This module contains the implementations for the CLI subcommands.

pub mod print;
pub mod replace;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

fn read_source(input: &Path) -> Result<String> {
    fs::read_to_string(input)
        .map_err(|e| Error::Io(format!("Failed to read {}: {}", input.display(), e)))
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .map_err(|e| Error::Io(format!("Failed to write {}: {}", path.display(), e)))?;
            log::info!("output written to {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
