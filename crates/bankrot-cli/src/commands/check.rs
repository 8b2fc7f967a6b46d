use crate::OutputFormat;
use anyhow::Result;
use bankrot_browser::{
    BankruptLookup, ChromeFinder, ChromiumSession, LaunchOptions, LookupConfig, ProfileDir,
};
use bankrot_core::{Collector, InputRecord, ReportWriter, TargetReader};
use std::path::PathBuf;
use std::time::Duration;

/// Everything a check run needs, resolved from flags and environment
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub input: PathBuf,
    pub profile_dir: PathBuf,
    pub temp_profile: bool,
    pub chrome_path: Option<PathBuf>,
    /// Show the browser window
    pub debug: bool,
    pub lookup: LookupConfig,
    pub format: OutputFormat,
}

pub fn execute(options: CheckOptions) -> Result<()> {
    let Some(targets) = TargetReader::from_file(&options.input)? else {
        return Ok(());
    };

    if targets.is_empty() {
        tracing::info!("No valid records in {}", options.input.display());
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut collector = Collector::new();
    let result = runtime.block_on(run_lookups(&options, &targets.records, &mut collector));

    // Don't let a stuck CDP connection keep the process alive
    runtime.shutdown_timeout(Duration::from_millis(100));

    if let Err(e) = &result {
        if collector.is_empty() {
            return result;
        }
        tracing::warn!(
            "Lookup aborted after {} of {} records: {}",
            collector.len(),
            targets.records.len(),
            e
        );
    }

    print_report(&collector, options.format)?;

    result
}

async fn run_lookups(
    options: &CheckOptions,
    records: &[InputRecord],
    collector: &mut Collector,
) -> Result<()> {
    let chrome_path = ChromeFinder::new(options.chrome_path.clone()).find()?;

    let profile = if options.temp_profile {
        tracing::debug!("Using temporary profile");
        ProfileDir::temporary()?
    } else {
        tracing::debug!("Using profile: {}", options.profile_dir.display());
        ProfileDir::persistent(options.profile_dir.clone())?
    };

    let launch = LaunchOptions::new(profile.path().to_path_buf())
        .with_chrome_path(chrome_path)
        .with_headless(!options.debug);

    let session = ChromiumSession::launch(&launch).await?;

    let lookup = BankruptLookup::new(&session, options.lookup.clone());
    let lookup_result = lookup.run(records, collector).await;

    // Close even when a lookup failed; the lookup error wins
    let close_result = session.close().await;
    lookup_result?;
    close_result?;

    Ok(())
}

fn print_report(collector: &Collector, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Pretty => {
            use console::style;

            print!("{}", ReportWriter::pretty(collector));
            println!(
                "{}",
                style(format!(
                    "{} of {} found",
                    collector.found_count(),
                    collector.len()
                ))
                .bold()
            );
        }
        OutputFormat::Json => println!("{}", ReportWriter::json(collector)?),
    }

    Ok(())
}
