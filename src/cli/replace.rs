use std::path::PathBuf;

use super::{read_source, write_output};
use crate::ast::{Ast, Node, NodeKind};
use crate::error::{Error, Result};
use crate::parser;

/// What to put at the target path
#[derive(Debug, Clone)]
pub enum Edit {
    /// One expression, given as source text
    Expression(String),
    /// Statements placed in an expression position
    Statements(String),
    /// Statements spliced in place, or a single node replaced
    Inline(String),
}

/// Arguments for the replace command
#[derive(Debug, Clone)]
pub struct ReplaceArgs {
    pub input_path: PathBuf,
    pub route: String,
    pub edit: Edit,
    pub output_path: Option<PathBuf>,
}

/// Run the replace subcommand
pub fn replace(args: &ReplaceArgs) -> Result<()> {
    let source = read_source(&args.input_path)?;
    let mut ast = Ast::parse(&source)?;
    let mut path = ast.path(&args.route)?;
    if path.node_id().is_none() {
        return Err(Error::invalid_operation(format!(
            "nothing at `{}` to replace",
            args.route
        )));
    }

    match &args.edit {
        Edit::Expression(text) => path.replace_with_source_string(&mut ast, text)?,
        Edit::Statements(text) => {
            let statements = parse_statements(text)?;
            path.replace_expression_with_statements(&mut ast, statements)?
        }
        Edit::Inline(text) => {
            let mut statements = parse_statements(text)?;
            if statements.len() == 1 {
                path.replace_inline(&mut ast, statements.remove(0))?
            } else {
                path.replace_inline(&mut ast, statements)?
            }
        }
    }

    let output = ast.print()?;
    write_output(args.output_path.as_deref(), &output)
}

fn parse_statements(text: &str) -> Result<Vec<Node>> {
    let program = parser::parse(text)?;
    match program.kind {
        NodeKind::Program { body } => Ok(body),
        _ => Err(Error::internal("parser returned a non-program root")),
    }
}
