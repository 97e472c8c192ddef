use std::path::PathBuf;

use clap::{builder::ArgAction, Parser, Subcommand};
use console::{style, Emoji};
use eprint::{
  fulltext::resolve_full_text, identifier::current_year, BibEntry, EntryType, FetcherConfig, Field,
  IacrFetcher, ReportId,
};
use errors::EprintCliError;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod errors;

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(author, version, about = "Fetch IACR Cryptology ePrint reports as BibTeX records")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Configuration file (defaults to the user's config directory)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Archive root to talk to instead of the configured one
  #[arg(long, global = true)]
  base_url: Option<String>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Find the report identifier in a piece of text without going online
  Parse {
    /// Text mentioning a report, e.g. "ePrint 2017/1118"
    text: String,
  },
  /// Fetch the BibTeX record of a report
  Fetch {
    /// Text mentioning a report
    text: String,
    /// Print the record as JSON instead of BibTeX
    #[arg(long)]
    json: bool,
  },
  /// Fetch a report and print the location of its PDF
  Pdf {
    /// Text mentioning a report
    text: String,
  },
  /// Resolve the PDF location of a record URL without going online
  Resolve {
    /// The `url` field of a record
    url: String,
  },
  /// Fetch a report and save its PDF
  Download {
    /// Text mentioning a report
    text: String,
    /// Directory to save into (defaults to the current directory)
    #[arg(long, short)]
    dir:  Option<PathBuf>,
  },
}

/// Setup logging with the specified verbosity level
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

/// Loads the configuration file and applies command line overrides.
fn load_config(cli: &Cli) -> Result<FetcherConfig, EprintCliError> {
  let config = match &cli.config {
    Some(path) => FetcherConfig::load(path)?,
    None => FetcherConfig::load_or_default()?,
  };
  let config = match &cli.base_url {
    Some(base_url) => config.with_base_url(base_url)?,
    None => config,
  };
  trace!("Using configuration: {config:?}");
  Ok(config)
}

/// Prints the headline fields of a record.
fn print_summary(entry: &BibEntry) {
  println!("\n{} Found report {}:", style(SUCCESS).green(), style(entry.citation_key()).yellow());
  for (label, field) in [("Title:", Field::Title), ("Authors:", Field::Author), ("Date:", Field::Date)] {
    if let Some(value) = entry.field(field) {
      println!("   {} {}", style(label).green().bold(), style(value).white());
    }
  }
}

#[tokio::main]
async fn main() -> Result<(), EprintCliError> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);
  let config = load_config(&cli)?;

  match cli.command {
    Commands::Parse { text } => {
      let id = ReportId::parse(&text, current_year())?;
      println!("{id} ({})", id.format());
      Ok(())
    },

    Commands::Fetch { text, json } => {
      let fetcher = IacrFetcher::with_config(config)?;
      let entry = fetcher.search_by_free_text(&text).await?;
      debug!("Record: {entry:?}");

      if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
      } else {
        print!("{}", entry.to_bibtex());
      }
      Ok(())
    },

    Commands::Pdf { text } => {
      let fetcher = IacrFetcher::with_config(config)?;
      eprintln!("{} Fetching report: {}", style(LOOKING_GLASS).cyan(), style(&text).yellow());
      let entry = fetcher.search_by_free_text(&text).await?;

      match fetcher.find_full_text(&entry)? {
        Some(pdf) => println!("{pdf}"),
        None => eprintln!("{} Record has no URL to resolve", style(WARNING).yellow()),
      }
      Ok(())
    },

    Commands::Resolve { url } => {
      let entry = BibEntry::new(EntryType::Misc, "record").with_field(Field::Url, url);
      match resolve_full_text(&entry, &config)? {
        Some(pdf) => println!("{pdf}"),
        None => eprintln!("{} Nothing to resolve", style(WARNING).yellow()),
      }
      Ok(())
    },

    Commands::Download { text, dir } => {
      let dir = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
      };
      let fetcher = IacrFetcher::with_config(config)?;

      println!("{} Fetching report: {}", style(LOOKING_GLASS).cyan(), style(&text).yellow());
      let entry = fetcher.search_by_free_text(&text).await?;
      print_summary(&entry);

      if let Some(pdf) = fetcher.find_full_text(&entry)? {
        println!("\n{} Downloading {}", style(LINK).cyan(), style(pdf).blue().underlined());
      }
      let path = fetcher.download_full_text(&entry, &dir).await?;
      println!("{} Saved PDF to: {}", style(SAVE).green(), style(path.display()).yellow());
      println!("{} Done", style(PAPER).green());
      Ok(())
    },
  }
}
