//! `commodity_ledger_cli` command surface.

pub mod output;
pub mod table;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, ConfigManager};
use crate::core::{MonthLedger, SummaryService};
use crate::errors::CliError;
use crate::ledger::{BandTier, Category, Commodity, Flags, LedgerKind, SystemClock};
use crate::utils::{build_info, persistence};

#[derive(Parser)]
#[command(name = "commodity_ledger_cli")]
#[command(version = build_info::CLI_VERSION)]
#[command(about = "Daily commodity stock ledger for school nutrition programs", long_about = None)]
pub struct Cli {
    /// Disable colored output regardless of configuration
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the day-by-day sheet of a month
    Show(MonthArgs),
    /// Print the month summary per commodity
    Totals(MonthArgs),
    /// Enter one day's inputs and save the month file
    Record(RecordArgs),
    /// Summarize an egg and banana sheet by payer
    Supplements {
        #[arg(long)]
        input: PathBuf,
    },
    /// Inspect or change preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Print build information
    Version,
}

#[derive(Args)]
struct MonthArgs {
    #[arg(long)]
    year: i32,
    #[arg(long)]
    month: u32,
    /// `meal` or `dairy`; defaults to the configured kind
    #[arg(long)]
    kind: Option<String>,
    /// Month file; defaults to `<data dir>/YYYY-MM-<kind>.json`
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Args)]
struct RecordArgs {
    #[command(flatten)]
    month: MonthArgs,
    #[arg(long)]
    day: u32,
    /// Attendance of the 1-5 band
    #[arg(long)]
    younger: Option<u32>,
    /// Attendance of the 6-8 band
    #[arg(long)]
    older: Option<u32>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    supplement: Option<bool>,
    /// Received stock as `commodity=quantity`, repeatable
    #[arg(long = "added", value_parser = parse_assignment)]
    added: Vec<(Commodity, f64)>,
    /// Day-1 opening stock as `commodity=quantity`, repeatable
    #[arg(long = "opening", value_parser = parse_assignment)]
    opening: Vec<(Commodity, f64)>,
}

#[derive(Subcommand)]
enum ConfigAction {
    Show,
    SetKind {
        kind: String,
    },
    SetColor {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

/// Parses the process arguments and runs the selected command.
pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<(), CliError> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    output::set_color_enabled(config.ui_color_enabled && !cli.no_color);

    match cli.command {
        Command::Show(args) => {
            let kind = resolve_kind(args.kind.as_deref(), &config)?;
            let ledger = open_month(&args, kind, &manager, &config)?;
            output::section(format!("{} sheet {:04}-{:02}", kind, args.year, args.month));
            print!("{}", table::render_month(&ledger, kind, &config, &SystemClock));
        }
        Command::Totals(args) => {
            let kind = resolve_kind(args.kind.as_deref(), &config)?;
            let ledger = open_month(&args, kind, &manager, &config)?;
            output::section(format!("{} totals {:04}-{:02}", kind, args.year, args.month));
            let lines = SummaryService::commodity_lines(&ledger, kind);
            print!("{}", table::render_commodity_lines(&lines, &config));
            print!("{}", table::render_attendance(&SummaryService::month_totals(&ledger)));
        }
        Command::Record(args) => record_day(args, &manager, &config)?,
        Command::Supplements { input } => {
            let records = persistence::load_supplement_records(&input)?;
            if records.is_empty() {
                output::warning(format!("no supplement rows in {}", input.display()));
            }
            let summary = SummaryService::supplements(&records);
            output::section("Egg and banana summary");
            print!("{}", table::render_supplements(&summary, &config));
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let json = serde_json::to_string_pretty(&config)
                    .map_err(crate::errors::LedgerError::from)?;
                output::info(format!("# {}", manager.path().display()));
                output::info(json);
            }
            ConfigAction::SetKind { kind } => {
                let kind = parse_kind(&kind)?;
                let updated = Config {
                    default_kind: kind,
                    ..config
                };
                manager.save(&updated)?;
                output::success(format!("default kind set to {kind}"));
            }
            ConfigAction::SetColor { enabled } => {
                let updated = Config {
                    ui_color_enabled: enabled,
                    ..config
                };
                manager.save(&updated)?;
                output::success(format!("color output {}", if enabled { "enabled" } else { "disabled" }));
            }
        },
        Command::Version => {
            output::info(build_info::current().summary());
            output::info(format!("rustc: {}", build_info::current().rustc));
        }
    }

    Ok(())
}

fn record_day(args: RecordArgs, manager: &ConfigManager, config: &Config) -> Result<(), CliError> {
    let kind = resolve_kind(args.month.kind.as_deref(), config)?;
    let category = args
        .category
        .as_deref()
        .map(|label| category_for(label, kind))
        .transpose()?;
    let path = month_path(&args.month, kind, manager, config);
    let mut ledger = open_at(&args.month, &path)?;
    let day = args.day;

    if let Some(count) = args.younger {
        ledger.set_count(day, BandTier::Younger, count)?;
    }
    if let Some(count) = args.older {
        ledger.set_count(day, BandTier::Older, count)?;
    }
    if let Some(category) = category {
        ledger.set_category(day, category)?;
    }
    if let Some(supplement) = args.supplement {
        ledger.set_flags(day, Flags { supplement })?;
    }
    for (commodity, quantity) in args.added {
        ledger.set_added(day, commodity, quantity)?;
    }
    for (commodity, quantity) in args.opening {
        ledger.set_opening(commodity, quantity)?;
    }

    persistence::save_sparse_records(&ledger.to_sparse(), &path)?;
    output::success(format!("{kind} day {day} saved to {}", path.display()));
    Ok(())
}

/// Only the categories offered on `kind`'s sheet are accepted.
fn category_for(label: &str, kind: LedgerKind) -> Result<Category, CliError> {
    let category = Category::normalize(Some(label));
    if !category.is_set() && !label.trim().is_empty() {
        output::warning(format!("category `{label}` not recognised, day left unset"));
    }
    if !kind.categories().contains(&category) {
        return Err(CliError::Input(format!(
            "category `{category}` is not available on the {kind} sheet"
        )));
    }
    Ok(category)
}

fn month_path(args: &MonthArgs, kind: LedgerKind, manager: &ConfigManager, config: &Config) -> PathBuf {
    match &args.input {
        Some(path) => path.clone(),
        None => {
            let dir = config.resolve_data_dir(manager.base_dir());
            persistence::month_file(&dir, args.year, args.month, kind)
        }
    }
}

fn open_month(
    args: &MonthArgs,
    kind: LedgerKind,
    manager: &ConfigManager,
    config: &Config,
) -> Result<MonthLedger, CliError> {
    open_at(args, &month_path(args, kind, manager, config))
}

fn open_at(args: &MonthArgs, path: &Path) -> Result<MonthLedger, CliError> {
    let records = persistence::load_sparse_records(path)?;
    Ok(MonthLedger::open(args.year, args.month, &records)?)
}

fn resolve_kind(label: Option<&str>, config: &Config) -> Result<LedgerKind, CliError> {
    match label {
        Some(label) => parse_kind(label),
        None => Ok(config.default_kind),
    }
}

fn parse_kind(label: &str) -> Result<LedgerKind, CliError> {
    LedgerKind::from_label(label)
        .ok_or_else(|| CliError::Input(format!("unknown ledger kind `{label}`, expected meal or dairy")))
}

fn parse_assignment(raw: &str) -> Result<(Commodity, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected commodity=quantity, got `{raw}`"))?;
    let commodity =
        Commodity::from_key(key.trim()).ok_or_else(|| format!("unknown commodity `{}`", key.trim()))?;
    let quantity = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid quantity `{}`: {err}", value.trim()))?;
    Ok((commodity, quantity))
}
