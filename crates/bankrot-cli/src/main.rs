use anyhow::Result;
use bankrot_browser::{CardPolicy, LookupConfig, WaitConfig, DEFAULT_SEARCH_URL};
use bankrot_cli::OutputFormat;
use bankrot_cli::commands::check::{self, CheckOptions};
use bankrot_core::matcher::BIRTHDAY_FIELD;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bankrot")]
#[command(author, version)]
#[command(
    about = "Check people against the public bankruptcy registry",
    long_about = "Searches the bankruptcy registry for every `<name>||<birthday>` line of the \
                  input file, opens the matching person card and compares its birth date. \
                  Prints a found/not found report once all records are checked."
)]
struct Cli {
    /// File with one `<name>||<birthday>` record per line
    #[arg(value_name = "FILE", env = "BANKROT_INPUT", default_value = "target.txt")]
    input: PathBuf,

    /// Show the browser window instead of running headless
    #[arg(long, env = "BANKROT_DEBUG")]
    debug: bool,

    /// Browser profile directory, kept between runs
    #[arg(long, value_name = "DIR", env = "BANKROT_PROFILE_DIR", default_value = "./tmp")]
    profile_dir: PathBuf,

    /// Use a temporary profile that is deleted afterwards
    #[arg(long)]
    temp: bool,

    /// Path to the Chromium/Chrome binary
    #[arg(long, value_name = "PATH", env = "BANKROT_CHROME")]
    chrome_path: Option<PathBuf>,

    /// Registry search page
    #[arg(long, env = "BANKROT_URL", default_value = DEFAULT_SEARCH_URL, value_parser = parse_url)]
    url: String,

    /// Detail page label holding the birth date
    #[arg(long, env = "BANKROT_FIELD", default_value = BIRTHDAY_FIELD)]
    field: String,

    /// Try every result card instead of only the first one
    #[arg(long)]
    all_cards: bool,

    /// Seconds to wait for search results to render
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    results_timeout: u64,

    /// Seconds to wait for a person's detail tab
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    detail_timeout: u64,

    /// Extra milliseconds to let results settle after they appear
    #[arg(long, value_name = "MS", default_value_t = 0)]
    settle_ms: u64,

    /// Milliseconds to wait for result cards to fill the results list
    #[arg(long, value_name = "MS", default_value_t = 2000)]
    cards_timeout_ms: u64,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn check_options(self) -> CheckOptions {
        let lookup = LookupConfig {
            search_url: self.url,
            target_field: self.field,
            card_policy: if self.all_cards {
                CardPolicy::All
            } else {
                CardPolicy::First
            },
            results_wait: WaitConfig::new(Duration::from_secs(self.results_timeout)),
            settle: Duration::from_millis(self.settle_ms),
            cards_wait: WaitConfig::new(Duration::from_millis(self.cards_timeout_ms)),
            detail_wait: WaitConfig::new(Duration::from_secs(self.detail_timeout)),
            ..LookupConfig::default()
        };

        CheckOptions {
            input: self.input,
            profile_dir: self.profile_dir,
            temp_profile: self.temp,
            chrome_path: self.chrome_path,
            debug: self.debug,
            lookup,
            format: self.format,
        }
    }
}

fn parse_url(value: &str) -> std::result::Result<String, String> {
    let url = url::Url::parse(value).map_err(|e| format!("{}: {}", value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        scheme => Err(format!("unsupported scheme '{}', expected http or https", scheme)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    tracing::debug!("Report format: {}", cli.format.as_str());
    check::execute(cli.check_options())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("bankrot=debug,bankrot_cli=debug,bankrot_core=debug,bankrot_browser=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("bankrot=info,bankrot_cli=info,bankrot_core=info,bankrot_browser=info")
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
