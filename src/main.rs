use clap::{ArgGroup, Parser, Subcommand};
use miette::{miette, Result};
use std::path::PathBuf;

use jsrewrite_rs::cli;
use jsrewrite_rs::cli::print::Format;
use jsrewrite_rs::cli::replace::{Edit, ReplaceArgs};

#[derive(Parser)]
#[command(name = "jsrewrite-rs")]
#[command(about = "Replace nodes in JavaScript syntax trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and print it back
    Print {
        /// Input JavaScript file
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "js")]
        format: Format,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the node at a path and print the result
    #[command(group(ArgGroup::new("edit").required(true).args(["with", "statements", "inline"])))]
    Replace {
        /// Input JavaScript file
        input: PathBuf,

        /// Dotted route from the program root, e.g. `body.0.expression`
        #[arg(short, long)]
        path: String,

        /// Expression source to put at the path
        #[arg(long)]
        with: Option<String>,

        /// Statements to evaluate in place of the expression at the path
        #[arg(long)]
        statements: Option<String>,

        /// Statements to splice in at the path
        #[arg(long)]
        inline: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Print {
            input,
            format,
            output,
        } => cli::print::print(&input, format, output.as_deref()).map_err(|e| miette!("{}", e)),
        Commands::Replace {
            input,
            path,
            with,
            statements,
            inline,
            output,
        } => {
            let edit = match (with, statements, inline) {
                (Some(text), _, _) => Edit::Expression(text),
                (_, Some(text), _) => Edit::Statements(text),
                (_, _, Some(text)) => Edit::Inline(text),
                _ => return Err(miette!("one of --with, --statements or --inline is required")),
            };
            let args = ReplaceArgs {
                input_path: input,
                route: path,
                edit,
                output_path: output,
            };
            cli::replace::replace(&args).map_err(|e| miette!("{}", e))
        }
    }
}
