// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::analysis;
use crate::config::consts::SETTINGS_FILE;
use crate::config::options::{AppOptions, ExportFormat};
use crate::config::settings::{self, Settings};
use crate::core::net::HttpFetcher;
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::scrape;
use crate::store::{self, DataSet};

#[derive(Parser, Debug)]
#[command(name = "fic_scrape", version, about = "Scrape AO3 search listings and analyze the results")]
pub struct Cli {
    /// More console output (-v, -vv). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (key=value). Defaults to ./fic_scrape.cfg if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl search listings and save CSV/TSV + JSON snapshots
    Scrape(ScrapeArgs),
    /// Print a report and render charts from a saved table
    Analyze(AnalyzeArgs),
    /// Scrape, save, then analyze what was collected
    Run(RunArgs),
    /// List the topics a scrape would crawl
    Topics,
}

#[derive(Args, Debug, Default)]
pub struct ScrapeArgs {
    /// Search term; repeat for several. Replaces the default set.
    #[arg(short, long = "topic", value_name = "TOPIC")]
    pub topics: Vec<String>,

    /// Listing pages per topic
    #[arg(long, value_name = "N")]
    pub max_pages: Option<u32>,

    /// Seconds between requests
    #[arg(long, value_name = "SECS")]
    pub delay: Option<f64>,

    /// Output directory, or a file path whose stem names the snapshot
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<String>,

    /// Table format: csv | tsv
    #[arg(long, value_name = "FMT", value_parser = parse_format)]
    pub format: Option<ExportFormat>,
}

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Directory for PNG charts
    #[arg(long, value_name = "DIR")]
    pub charts: Option<PathBuf>,

    /// Entries in each "Top N" list
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Table or JSON to read. Defaults to the scraper's output path.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub scrape: ScrapeArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

fn parse_format(s: &str) -> std::result::Result<ExportFormat, String> {
    match s.to_ascii_lowercase().as_str() {
        "csv" => Ok(ExportFormat::Csv),
        "tsv" => Ok(ExportFormat::Tsv),
        other => Err(format!("unknown format: {other} (expected csv or tsv)")),
    }
}

/// Settings file first, then flags on top.
pub fn build_options(
    settings: &Settings,
    scrape: Option<&ScrapeArgs>,
    analyze: Option<&AnalyzeArgs>,
    report: Option<&ReportArgs>,
) -> Result<AppOptions> {
    let mut opts = AppOptions::default();
    settings.apply(&mut opts);

    if let Some(a) = scrape {
        if !a.topics.is_empty() {
            opts.scrape.topics = a.topics.iter().map(|t| s!(t.trim())).filter(|t| !t.is_empty()).collect();
            if opts.scrape.topics.is_empty() {
                return Err(Error::InvalidArgument(s!("--topic must not be blank")));
            }
        }
        if let Some(n) = a.max_pages {
            if n == 0 {
                return Err(Error::InvalidArgument(s!("--max-pages must be at least 1")));
            }
            opts.scrape.max_pages = n;
        }
        if let Some(secs) = a.delay {
            opts.scrape.delay = Duration::try_from_secs_f64(secs)
                .map_err(|_| Error::InvalidArgument(format!("--delay must be a reasonable number of seconds >= 0, got {secs}")))?;
        }
        if let Some(out) = &a.out {
            opts.export.set_path(out);
        }
        if let Some(f) = a.format {
            opts.export.format = f;
        }
    }

    if let Some(a) = analyze {
        if let Some(input) = &a.input {
            opts.analysis.input = Some(input.clone());
        }
    }

    let report = report.or(analyze.map(|a| &a.report));
    if let Some(r) = report {
        if let Some(dir) = &r.charts {
            opts.analysis.charts_dir = dir.clone();
        }
        if let Some(n) = r.top {
            opts.analysis.top_n = n;
        }
    }

    Ok(opts)
}

pub fn run(cli: Cli) -> Result<()> {
    let cfg_path = cli.config.clone().unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let settings = settings::load(&cfg_path);
    debug!("settings from {}: {settings:?}", cfg_path.display());

    match &cli.command {
        Command::Topics => {
            let opts = build_options(&settings, None, None, None)?;
            for t in &opts.scrape.topics {
                println!("{t}");
            }
            Ok(())
        }
        Command::Scrape(args) => {
            let opts = build_options(&settings, Some(args), None, None)?;
            run_scrape(&opts).map(|_| ())
        }
        Command::Analyze(args) => {
            let opts = build_options(&settings, None, Some(args), None)?;
            let input = opts.analysis_input();
            let ds = store::load(&input)?;
            info!("Loaded {} works from {}", ds.len(), input.display());
            run_analysis(&opts, &ds)
        }
        Command::Run(args) => {
            let opts = build_options(&settings, Some(&args.scrape), None, Some(&args.report))?;
            let ds = run_scrape(&opts)?;
            run_analysis(&opts, &ds)
        }
    }
}

fn run_scrape(opts: &AppOptions) -> Result<DataSet> {
    let mut fetcher = HttpFetcher::new(opts.scrape.delay)?;
    let mut progress = CliProgress::new();
    let ds = scrape::collect(&mut fetcher, &opts.scrape, Some(&mut progress));

    for path in store::save_snapshot(&opts.export, &ds)? {
        println!("Saved {}", path.display());
    }
    Ok(ds)
}

fn run_analysis(opts: &AppOptions, ds: &DataSet) -> Result<()> {
    let out = analysis::analyze(&ds.works, &opts.analysis);
    print!("{}", out.report);
    if let Some(e) = &out.chart_error {
        eprintln!("Charts not rendered: {e}");
    }
    if !out.charts.is_empty() {
        println!();
        for path in &out.charts {
            println!("Chart: {}", path.display());
        }
    }
    Ok(())
}

/// Progress bar over the total page budget (topics × max pages).
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for CliProgress {
    fn begin(&mut self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
    }

    fn log(&mut self, msg: &str) {
        self.bar.set_message(s!(msg));
    }

    fn page_done(&mut self, topic: &str, page: u32, works: usize) {
        self.bar.set_message(format!("{topic} p{page}: {works} works"));
        self.bar.inc(1);
    }

    fn page_failed(&mut self, topic: &str, page: u32, err: &str) {
        self.bar.println(format!("{topic}: page {page} failed: {err}"));
        self.bar.inc(1);
    }

    fn topic_done(&mut self, _topic: &str, _collected: usize, skipped: u32) {
        self.bar.inc(u64::from(skipped));
    }

    fn finish(&mut self) {
        self.bar.finish_with_message("Done");
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fic_scrape").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn scrape_flags_override_settings() {
        let settings = settings::parse("max_pages=7\ndelay=2\nout_dir=snap\n");
        let cli = parse(&["scrape", "--topic", "Sherlock", "-t", "Star Trek", "--max-pages", "2", "--format", "tsv"]);
        let Command::Scrape(args) = &cli.command else { panic!("expected scrape") };
        let opts = build_options(&settings, Some(args), None, None).unwrap();

        assert_eq!(opts.scrape.topics, vec![s!("Sherlock"), s!("Star Trek")]);
        assert_eq!(opts.scrape.max_pages, 2);
        assert_eq!(opts.scrape.delay, Duration::from_secs(2));
        assert_eq!(opts.export.format, ExportFormat::Tsv);
        assert_eq!(opts.export.table_path(), Path::new("snap").join("ao3_fanfictions.tsv"));
    }

    #[test]
    fn analyze_flags() {
        let cli = parse(&["-vv", "analyze", "--input", "x/works.json", "--charts", "figs", "--top", "3"]);
        assert_eq!(cli.verbose, 2);
        let Command::Analyze(args) = &cli.command else { panic!("expected analyze") };
        let opts = build_options(&Settings::default(), None, Some(args), None).unwrap();
        assert_eq!(opts.analysis_input(), PathBuf::from("x/works.json"));
        assert_eq!(opts.analysis.charts_dir, PathBuf::from("figs"));
        assert_eq!(opts.analysis.top_n, 3);
    }

    #[test]
    fn run_takes_scrape_and_report_flags() {
        let cli = parse(&["run", "--max-pages", "1", "--top", "5"]);
        let Command::Run(args) = &cli.command else { panic!("expected run") };
        let opts = build_options(&Settings::default(), Some(&args.scrape), None, Some(&args.report)).unwrap();
        assert_eq!(opts.scrape.max_pages, 1);
        assert_eq!(opts.analysis.top_n, 5);
        assert_eq!(opts.analysis_input(), opts.export.table_path());
    }

    #[test]
    fn bad_values_are_rejected() {
        let bad_pages = ScrapeArgs { max_pages: Some(0), ..Default::default() };
        assert!(matches!(
            build_options(&Settings::default(), Some(&bad_pages), None, None),
            Err(Error::InvalidArgument(_))
        ));
        for secs in [-1.0, f64::NAN, f64::INFINITY, 1e20] {
            let bad_delay = ScrapeArgs { delay: Some(secs), ..Default::default() };
            assert!(matches!(
                build_options(&Settings::default(), Some(&bad_delay), None, None),
                Err(Error::InvalidArgument(_))
            ));
        }
        assert!(Cli::try_parse_from(["fic_scrape", "scrape", "--format", "xlsx"]).is_err());
    }

    #[test]
    fn defaults_without_flags() {
        let opts = build_options(&Settings::default(), None, None, None).unwrap();
        assert_eq!(opts, AppOptions::default());
    }
}
