use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{ArgAction, Args, Parser, Subcommand};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use toplog_types::TIME_FORMAT;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use toplog::export::ChartData;
use toplog::source::{self, LogKind};
use toplog::{events, run_batch, ui, App, Overrides, Settings, TimeRange};

#[derive(Parser, Debug)]
#[command(name = "toplog", version)]
#[command(about = "Rebuild per-process CPU and memory tables from top and free logs")]
struct Cli {
    /// TOML settings file (defaults to ./toplog.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-process %MEM and %CPU tables from `top -b` logs
    Top(TopArgs),
    /// System memory usage table from timestamped `free` logs
    Free(CommonArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Logs to analyze (default: every matching log in the input directory)
    files: Vec<PathBuf>,

    /// Directory searched for logs when no files are given
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory CSV results are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Drop samples before this time
    #[arg(long, value_parser = parse_filter_time, value_name = "YYYY-MM-DD HH:MM:SS")]
    start_time: Option<NaiveDateTime>,

    /// Drop samples after this time
    #[arg(long, value_parser = parse_filter_time, value_name = "YYYY-MM-DD HH:MM:SS")]
    end_time: Option<NaiveDateTime>,

    /// Open the chart viewer once every file is processed
    #[arg(long)]
    view_graph: bool,
}

#[derive(Args, Debug)]
struct TopArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Values below this are left out of the tables
    #[arg(long)]
    threshold: Option<f64>,

    /// Processes per chart
    #[arg(long)]
    rank_limit: Option<usize>,

    /// Also write an Excel workbook with a line chart per table
    #[arg(long)]
    with_excel: bool,
}

fn parse_filter_time(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| format!("expected \"YYYY-MM-DD HH:MM:SS\", got \"{value}\""))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (kind, common, overrides) = match &cli.command {
        Command::Top(args) => (
            LogKind::Top,
            &args.common,
            Overrides {
                threshold: args.threshold,
                rank_limit: args.rank_limit,
                with_excel: args.with_excel.then_some(true),
                ..common_overrides(&args.common)
            },
        ),
        Command::Free(args) => (LogKind::Free, args, common_overrides(args)),
    };

    let settings = Settings::load(cli.config.as_deref(), &overrides)
        .context("failed to load settings")?;
    if !settings.threshold.is_finite() {
        bail!("threshold must be a finite number, got {}", settings.threshold);
    }
    debug!(?settings, "settings loaded");

    let range = TimeRange::new(common.start_time, common.end_time);
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            warn!(%start, %end, "start time is after end time, every sample will be dropped");
        }
    }

    let files = resolve_files(&common.files, &settings.input_dir, kind)?;
    if files.is_empty() {
        warn!(dir = %settings.input_dir.display(), ?kind, "no logs to analyze");
    }

    let outcome = run_batch(kind, &files, &settings, &range);

    if common.view_graph {
        if outcome.charts.is_empty() {
            warn!("no table has data rows, nothing to chart");
        } else {
            run_viewer(outcome.charts)?;
        }
    }

    if outcome.failed > 0 {
        bail!("{} of {} files failed", outcome.failed, files.len());
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn common_overrides(args: &CommonArgs) -> Overrides {
    Overrides {
        input_dir: args.input_dir.clone(),
        output_dir: args.output_dir.clone(),
        ..Overrides::default()
    }
}

/// Files named on the command line, or every log of `kind` in `input_dir`.
fn resolve_files(files: &[PathBuf], input_dir: &Path, kind: LogKind) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }
    source::discover(input_dir, kind)
        .with_context(|| format!("failed to list logs in {}", input_dir.display()))
}

/// Run the chart viewer until the user quits
fn run_viewer(charts: Vec<ChartData>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(charts);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }
    }
    Ok(())
}
