//! CLI parsing and orchestration. Parses args, fetches one work or a search listing, prints
//! metadata, and optionally downloads a file per work. Maps errors to exit codes.

use crate::archive::{self, search, ArchiveError, PoliteClient};
use crate::config::{self, Config};
use crate::formats::{render_info, render_json, write_file, FormatError, InfoFormat};
use crate::model::{DownloadFormat, WorkRecord};
use clap::Parser;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_DELAY_SECS: u64 = 2;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRY_COUNT: u32 = 3;
const DEFAULT_RETRY_BACKOFF_SECS: [u64; 3] = [1, 2, 4];

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Archive(_) => 2,
            CliRunError::Format(_) => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ao3meta", version)]
#[command(about = "Show metadata for Archive of Our Own works and download them")]
#[command(
    after_help = "Config file keys (output_dir, user_agent, request_delay_secs, timeout_secs, retry_count, retry_backoff_secs) are read from ./ao3meta.toml or the user config dir. CLI flags override config."
)]
pub struct Args {
    /// Work URL or numeric work id. With --search, a search or tag listing URL.
    pub target: String,

    /// Treat the target as a listing page and process every work on it.
    #[arg(long)]
    pub search: bool,

    /// Print work metadata (default when --download is not given).
    #[arg(short, long)]
    pub info: bool,

    /// Metadata output format: text or json.
    #[arg(long, default_value = "text", value_parser = parse_info_format)]
    pub format: InfoFormat,

    /// Download the work in this format: azw3, epub, mobi, pdf, or html.
    #[arg(short, long, value_parser = parse_download_format)]
    pub download: Option<DownloadFormat>,

    /// Download path. Default: {output_dir}/{title}.{ext}. With --search, a directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// HTTP User-Agent (overrides config).
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Delay between requests in seconds (overrides config; default 2).
    #[arg(long)]
    pub delay: Option<u64>,

    /// Request timeout in seconds (overrides config; default 30).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Suppress progress output (errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug logging and the full error chain.
    #[arg(long)]
    pub verbose: bool,
}

/// Effective client and output settings after merging flags, config, and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub user_agent: Option<String>,
    pub delay_secs: u64,
    pub timeout_secs: u64,
    pub retry_count: u32,
    pub retry_backoff_secs: Vec<u64>,
}

pub fn resolve_settings(args: &Args, config: Option<&Config>) -> Settings {
    Settings {
        output_dir: config
            .and_then(|c| c.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(".")),
        user_agent: args
            .user_agent
            .clone()
            .or_else(|| config.and_then(|c| c.user_agent.clone())),
        delay_secs: args
            .delay
            .or_else(|| config.and_then(|c| c.request_delay_secs))
            .unwrap_or(DEFAULT_DELAY_SECS),
        timeout_secs: args
            .timeout
            .or_else(|| config.and_then(|c| c.timeout_secs))
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        retry_count: config
            .and_then(|c| c.retry_count)
            .unwrap_or(DEFAULT_RETRY_COUNT)
            .max(1),
        retry_backoff_secs: config
            .and_then(|c| c.retry_backoff_secs.clone())
            .unwrap_or_else(|| DEFAULT_RETRY_BACKOFF_SECS.to_vec()),
    }
}

fn parse_info_format(s: &str) -> Result<InfoFormat, String> {
    match s.to_lowercase().as_str() {
        "text" | "txt" => Ok(InfoFormat::Text),
        "json" => Ok(InfoFormat::Json),
        _ => Err(format!("Invalid --format value: '{}'. Use text or json.", s)),
    }
}

fn parse_download_format(s: &str) -> Result<DownloadFormat, String> {
    DownloadFormat::ALL
        .into_iter()
        .find(|f| f.extension().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| {
            format!(
                "Invalid --download value: '{}'. Use azw3, epub, mobi, pdf, or html.",
                s
            )
        })
}

/// Where a downloaded file goes. In batch mode `output` is a directory.
fn download_path(
    output: Option<&Path>,
    output_dir: &Path,
    record: &WorkRecord,
    format: DownloadFormat,
    batch: bool,
) -> PathBuf {
    let file_name = format!("{}.{}", record.file_stem(), format.extension());
    match output {
        Some(dir) if batch => dir.join(file_name),
        Some(path) => path.to_path_buf(),
        None => output_dir.join(file_name),
    }
}

/// Ensure output path parent exists.
fn validate_output_path(path: &Path) -> Result<(), CliRunError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(CliRunError::InvalidInput(format!(
                "Cannot write output: {}: parent directory does not exist.",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Bad user input reported by the archive layer is an input error, not a fetch error.
fn classify_archive_error(e: ArchiveError) -> CliRunError {
    match e {
        ArchiveError::InvalidUrl { input, reason } => CliRunError::InvalidInput(format!(
            "Expected a work URL or id, e.g. https://archiveofourown.org/works/12345 or 12345. Invalid: {:?}: {}",
            input, reason
        )),
        other => CliRunError::Archive(other),
    }
}

fn build_client(settings: &Settings) -> Result<PoliteClient, CliRunError> {
    let mut builder = PoliteClient::builder()
        .delay_secs(settings.delay_secs)
        .timeout_secs(settings.timeout_secs)
        .retry_count(settings.retry_count)
        .retry_backoff_secs(settings.retry_backoff_secs.clone());
    if let Some(ref ua) = settings.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(e.to_string()))
}

fn print_records(format: InfoFormat, records: &[WorkRecord]) -> Result<(), CliRunError> {
    match format {
        InfoFormat::Text => {
            for record in records {
                println!("{}", render_info(record));
            }
        }
        InfoFormat::Json => println!("{}", render_json(records)?),
    }
    Ok(())
}

fn download_records(
    client: &mut PoliteClient,
    args: &Args,
    settings: &Settings,
    records: &[WorkRecord],
    format: DownloadFormat,
) -> Result<(), CliRunError> {
    let batch = args.search;
    if batch {
        if let Some(ref dir) = args.output {
            if !dir.is_dir() {
                return Err(CliRunError::InvalidInput(format!(
                    "Cannot write output: {}: not a directory.",
                    dir.display()
                )));
            }
        }
    }
    for record in records {
        let path = download_path(
            args.output.as_deref(),
            &settings.output_dir,
            record,
            format,
            batch,
        );
        validate_output_path(&path)?;
        let bytes = archive::download(client, record, format)?;
        write_file(&bytes, &path)?;
        if !args.quiet {
            eprintln!("Wrote {}", path.display());
        }
    }
    Ok(())
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config().map_err(CliRunError::InvalidInput)?;
    let settings = resolve_settings(args, config.as_ref());
    tracing::debug!(?settings, "resolved settings");
    let mut client = build_client(&settings)?;
    let show_info = args.info || args.download.is_none();

    if !args.search {
        let record = archive::fetch_work(&mut client, &args.target).map_err(classify_archive_error)?;
        return report_works(
            &mut client,
            args,
            &settings,
            std::slice::from_ref(&record),
            show_info,
        );
    }

    let progress_state: RefCell<Option<indicatif::ProgressBar>> = RefCell::new(None);
    let progress_cb = |n: u32, total: u32| {
        if total == 0 {
            return;
        }
        let mut state = progress_state.borrow_mut();
        let pb = state.get_or_insert_with(|| {
            let bar = indicatif::ProgressBar::new(total as u64);
            if let Ok(style) = indicatif::ProgressStyle::default_bar()
                .template("{spinner} {msg} [{bar:40}] {pos}/{len} ({elapsed})")
            {
                bar.set_style(
                    style
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                        .progress_chars("█▉▊▋▌▍▎▏ "),
                );
            }
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        pb.set_position(n as u64);
        pb.set_message(format!("Fetching work {}/{}", n, total));
    };
    let progress: Option<&dyn Fn(u32, u32)> = if args.quiet { None } else { Some(&progress_cb) };

    let outcome = search::collect_search(&mut client, &args.target, progress)
        .map_err(classify_archive_error)?;

    if let Some(pb) = progress_state.borrow_mut().take() {
        pb.disable_steady_tick();
        pb.finish_and_clear();
    }
    if !args.quiet {
        eprintln!("Collected {} work(s)", outcome.works.len());
    }

    // Completed works are still reported when a later one failed.
    let reported = report_works(&mut client, args, &settings, &outcome.works, show_info);
    search_result(outcome.failure, reported)
}

fn report_works(
    client: &mut PoliteClient,
    args: &Args,
    settings: &Settings,
    works: &[WorkRecord],
    show_info: bool,
) -> Result<(), CliRunError> {
    if show_info {
        print_records(args.format, works)?;
    }
    if let Some(format) = args.download {
        download_records(client, args, settings, works, format)?;
    }
    Ok(())
}

/// The collection failure takes precedence; a later output error is logged rather than
/// replacing it.
fn search_result(
    failure: Option<ArchiveError>,
    reported: Result<(), CliRunError>,
) -> Result<(), CliRunError> {
    match (failure, reported) {
        (Some(failure), Err(output)) => {
            tracing::error!(error = %output, "output failed after search collection stopped");
            Err(CliRunError::Archive(failure))
        }
        (Some(failure), Ok(())) => Err(CliRunError::Archive(failure)),
        (None, reported) => reported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["ao3meta"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn parse_download_format_all() {
        assert_eq!(parse_download_format("azw3").unwrap(), DownloadFormat::Azw3);
        assert_eq!(parse_download_format("EPUB").unwrap(), DownloadFormat::Epub);
        assert_eq!(parse_download_format("mobi").unwrap(), DownloadFormat::Mobi);
        assert_eq!(parse_download_format("Pdf").unwrap(), DownloadFormat::Pdf);
        assert_eq!(parse_download_format("html").unwrap(), DownloadFormat::Html);
        assert!(parse_download_format("docx").is_err());
    }

    #[test]
    fn parse_info_format_all() {
        assert_eq!(parse_info_format("text").unwrap(), InfoFormat::Text);
        assert_eq!(parse_info_format("JSON").unwrap(), InfoFormat::Json);
        assert!(parse_info_format("yaml").is_err());
    }

    #[test]
    fn args_parse_download_and_output() {
        let a = args(&["12345", "-d", "epub", "-o", "out.epub", "--delay", "5"]);
        assert_eq!(a.target, "12345");
        assert_eq!(a.download, Some(DownloadFormat::Epub));
        assert_eq!(a.output, Some(PathBuf::from("out.epub")));
        assert_eq!(a.delay, Some(5));
        assert_eq!(a.format, InfoFormat::Text);
        assert!(!a.search);
    }

    #[test]
    fn settings_prefer_flags_then_config_then_defaults() {
        let config = Config {
            output_dir: Some(PathBuf::from("library")),
            user_agent: Some("FromConfig/1.0".to_string()),
            request_delay_secs: Some(7),
            timeout_secs: Some(90),
            retry_count: Some(0),
            retry_backoff_secs: Some(vec![3]),
        };
        let a = args(&["1", "--delay", "1", "--user-agent", "FromFlag/2.0"]);
        let s = resolve_settings(&a, Some(&config));
        assert_eq!(s.output_dir, PathBuf::from("library"));
        assert_eq!(s.user_agent.as_deref(), Some("FromFlag/2.0"));
        assert_eq!(s.delay_secs, 1);
        assert_eq!(s.timeout_secs, 90);
        assert_eq!(s.retry_count, 1);
        assert_eq!(s.retry_backoff_secs, vec![3]);

        let s = resolve_settings(&args(&["1"]), None);
        assert_eq!(s.output_dir, PathBuf::from("."));
        assert_eq!(s.user_agent, None);
        assert_eq!(s.delay_secs, DEFAULT_DELAY_SECS);
        assert_eq!(s.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(s.retry_count, DEFAULT_RETRY_COUNT);
        assert_eq!(s.retry_backoff_secs, vec![1, 2, 4]);
    }

    #[test]
    fn download_path_defaults_and_batch_directory() {
        let record = WorkRecord {
            title: "Home/Away".to_string(),
            ..Default::default()
        };
        let dir = Path::new("library");
        assert_eq!(
            download_path(None, dir, &record, DownloadFormat::Epub, false),
            PathBuf::from("library/Home_Away.epub")
        );
        assert_eq!(
            download_path(Some(Path::new("mine.pdf")), dir, &record, DownloadFormat::Pdf, false),
            PathBuf::from("mine.pdf")
        );
        assert_eq!(
            download_path(Some(Path::new("batch")), dir, &record, DownloadFormat::Mobi, true),
            PathBuf::from("batch/Home_Away.mobi")
        );
    }

    #[test]
    fn validate_output_path_parent_missing() {
        let path = PathBuf::from("/nonexistent_dir_ao3meta_xyz/work.epub");
        match validate_output_path(&path) {
            Err(CliRunError::InvalidInput(msg)) => assert!(msg.contains("parent directory does not exist")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
        assert!(validate_output_path(&std::env::temp_dir().join("ao3meta_cli.epub")).is_ok());
    }

    #[test]
    fn invalid_url_maps_to_input_error() {
        let e = classify_archive_error(ArchiveError::InvalidUrl {
            input: "x".into(),
            reason: "relative URL without a base".into(),
        });
        assert_eq!(e.exit_code(), 1);
        let e = classify_archive_error(ArchiveError::NotFound { url: "u".into() });
        assert_eq!(e.exit_code(), 2);
    }

    #[test]
    fn search_failure_wins_over_later_output_error() {
        let output_err = || {
            Err(CliRunError::InvalidInput(
                "Cannot write output: x: not a directory.".into(),
            ))
        };
        let failure = || Some(ArchiveError::NotFound { url: "https://archiveofourown.org/works/2".into() });

        match search_result(failure(), output_err()) {
            Err(CliRunError::Archive(ArchiveError::NotFound { url })) => {
                assert!(url.ends_with("/works/2"))
            }
            other => panic!("expected the collection failure, got {:?}", other),
        }
        assert!(matches!(search_result(failure(), Ok(())), Err(CliRunError::Archive(_))));
        assert!(matches!(search_result(None, output_err()), Err(CliRunError::InvalidInput(_))));
        assert!(search_result(None, Ok(())).is_ok());
    }

    #[test]
    fn cli_run_error_exit_codes() {
        assert_eq!(CliRunError::InvalidInput("x".into()).exit_code(), 1);
        assert_eq!(
            CliRunError::Archive(ArchiveError::FormatUnavailable {
                format: DownloadFormat::Html
            })
            .exit_code(),
            2
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            CliRunError::Format(FormatError::Io {
                path: PathBuf::from("x"),
                source: io
            })
            .exit_code(),
            3
        );
    }
}
