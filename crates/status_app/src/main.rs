mod app;
mod config;
mod effects;
mod logging;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use status_core::{status_report, Msg, ViewKind};
use status_logging::{level_for_verbosity, status_error, status_info};

use app::App;
use config::AppConfig;
use logging::LogDestination;

#[derive(Parser)]
#[command(name = "recipe_status")]
#[command(about = "Inspect the published recipe status snapshot")]
struct Cli {
    /// Snapshot document URL.
    #[arg(long, global = true)]
    url: Option<String>,
    /// RON config file (default: ./recipe_status.ron if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one view of the snapshot as a table.
    View(ViewArgs),
    /// Print the markdown status summary.
    Report,
    /// Refresh periodically and re-render when a new snapshot is published.
    Watch {
        #[command(flatten)]
        view: ViewArgs,
        /// Seconds between refreshes.
        #[arg(long, default_value_t = 300)]
        interval: u64,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// updatable, updates, unsupported, inconsistent or up-to-date.
    view: Option<ViewKind>,
    /// Hide a column by its label. Repeatable.
    #[arg(long = "disable")]
    disable: Vec<String>,
    /// Show the detail panel of a recipe. Repeatable.
    #[arg(long = "expand")]
    expand: Vec<String>,
    #[arg(long)]
    search: Option<String>,
    /// Sort by a column label.
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, default_value_t = false)]
    desc: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading config")?;

    let log_file = cli.log_file.clone().or_else(|| config.log_file.clone());
    logging::initialize(
        LogDestination::from_log_file(log_file, !cli.quiet),
        level_for_verbosity(cli.verbose, cli.quiet),
    );

    let mut app = App::new(config.fetch_settings(cli.url.as_deref()));
    apply_config(&mut app, &config)?;

    match cli.command {
        Commands::View(args) => {
            apply_view_args(&mut app, &args);
            Ok(run_once(&mut app, |app| render::render(&app.view())))
        }
        Commands::Report => Ok(run_once(&mut app, |app| {
            status_report(&app.store().snapshot())
        })),
        Commands::Watch { view, interval } => {
            apply_view_args(&mut app, &view);
            watch(&mut app, Duration::from_secs(interval.max(1)));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn apply_config(app: &mut App, config: &AppConfig) -> anyhow::Result<()> {
    if let Some(view) = config.default_view()? {
        app.dispatch(Msg::ViewSelected(view));
    }
    for (view, label) in config.disabled_columns()? {
        app.dispatch(Msg::ColumnToggled {
            view,
            label: label.to_string(),
            enabled: false,
        });
    }
    Ok(())
}

fn apply_view_args(app: &mut App, args: &ViewArgs) {
    if let Some(view) = args.view {
        app.dispatch(Msg::ViewSelected(view));
    }
    let view = app.view().active_view;
    for label in &args.disable {
        app.dispatch(Msg::ColumnToggled {
            view,
            label: label.clone(),
            enabled: false,
        });
    }
    for key in &args.expand {
        app.dispatch(Msg::RowToggled { key: key.clone() });
    }
    if let Some(search) = &args.search {
        app.dispatch(Msg::SearchChanged(search.clone()));
    }
    if let Some(label) = &args.sort {
        app.dispatch(Msg::SortChanged {
            label: Some(label.clone()),
            descending: args.desc,
        });
    }
}

/// Refreshes once and prints `output`. Fails only when nothing could be
/// loaded at all.
fn run_once(app: &mut App, output: impl Fn(&App) -> String) -> ExitCode {
    app.refresh_blocking();
    let view = app.view();
    if let (Some(error), 0) = (&view.error_banner, view.generation) {
        status_error!("No snapshot available: {}", error);
        return ExitCode::FAILURE;
    }
    println!("{}", output(app));
    ExitCode::SUCCESS
}

fn watch(app: &mut App, interval: Duration) {
    let mut published = app.store().subscribe();
    let mut last_banner = None;
    let mut first = true;
    status_info!("Watching every {:?}", interval);
    loop {
        app.refresh_blocking();
        app.consume_dirty();
        let changed = published.has_changed().unwrap_or(false);
        if changed {
            let generation = published.borrow_and_update().generation;
            status_info!("Snapshot generation {} published", generation);
        }
        let view = app.view();
        if first || changed || view.error_banner != last_banner {
            println!(
                "== {} ==\n{}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                render::render(&view)
            );
            last_banner = view.error_banner;
            first = false;
        }
        thread::sleep(interval);
    }
}
