use std::path::Path;

use clap::ValueEnum;

use super::{read_source, write_output};
use crate::ast::Ast;
use crate::error::Result;

/// Output format of the print subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Js,
    Json,
}

/// Parse a file and print it back as source or as a JSON tree
pub fn print(input: &Path, format: Format, output: Option<&Path>) -> Result<()> {
    let source = read_source(input)?;
    let ast = Ast::parse(&source)?;
    let text = match format {
        Format::Js => ast.print()?,
        Format::Json => {
            let mut json = ast.to_json()?;
            json.push('\n');
            json
        }
    };
    write_output(output, &text)
}
