use std::{
    io::{BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{ArgAction, CommandFactory, Parser, ValueEnum, error::ErrorKind};
use tracing_subscriber::EnvFilter;
use xmlast::{DEFAULT_MAX_DEPTH, Document, ParseOptions, UnclosedPolicy, tag_name_filter};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    /// Indented element/attribute/text listing
    #[default]
    Dump,

    /// Re-serialised XML
    Xml,
}

#[derive(Parser)]
#[command(name = "xmlast", bin_name = "xmlast")]
#[command(about = "Parse an XML document and print its element tree")]
struct Cli {
    /// Document to parse (prompted for on stdin when omitted)
    file: Option<PathBuf>,

    /// Only list elements with this tag name (dump format only)
    #[arg(long, value_name = "TAG")]
    filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Dump)]
    format: OutputFormat,

    /// Accept elements still open at the end of the input
    #[arg(long)]
    lenient: bool,

    /// Deepest element nesting accepted
    #[arg(long, value_name = "LEVELS", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}
impl Cli {
    /// Rejects flag combinations that clap cannot express on its own.
    fn check(&self) -> Result<(), clap::Error> {
        if self.filter.is_some() && matches!(self.format, OutputFormat::Xml) {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "--filter only applies to the dump format",
            ));
        }
        Ok(())
    }

    fn parse_options(&self) -> ParseOptions {
        let options = ParseOptions::default().with_max_depth(self.max_depth);
        if self.lenient {
            options.with_unclosed(UnclosedPolicy::Close)
        } else {
            options
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = cli.check() {
        e.exit();
    }
    init_logging(cli.verbose);

    let options = cli.parse_options();
    let path = match cli.file {
        Some(path) => path,
        None => match prompt_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Could not read the file name: {e}");
                return ExitCode::from(1);
            }
        },
    };

    let document = match Document::open(&path, options) {
        Ok(document) => document,
        Err(e) if e.is_io() => {
            tracing::error!(path = %path.display(), "could not open document");
            eprintln!("Error opening file: {e}");
            return ExitCode::from(1);
        }
        Err(e) => {
            tracing::error!(path = %path.display(), "parse failed");
            eprint!("{e}");
            return ExitCode::from(2);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let result = match cli.format {
        OutputFormat::Dump => {
            let filter = cli.filter.as_deref().map(tag_name_filter);
            let filter = filter.as_ref().map(|f| f as &dyn Fn(&xmlast::Element) -> bool);
            document.write_dump(&mut stdout, filter)
        }
        OutputFormat::Xml => document.to_xml_with_writer(&mut stdout, None),
    };

    if let Err(e) = result.and_then(|()| stdout.flush()) {
        eprintln!("Error writing output: {e}");
        return ExitCode::from(1);
    }

    document.release();
    ExitCode::SUCCESS
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt_path() -> std::io::Result<PathBuf> {
    print!("Enter the XML/XHTML file to parse: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim_end_matches(['\r', '\n'])))
}
