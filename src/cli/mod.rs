//! Command line driver for `water_billing`.

pub mod output;

use std::env;
use std::path::PathBuf;

use crate::config::{BillingConfig, ConfigOverrides};
use crate::core::{BillingResult, Orchestrator};
use crate::errors::{BillingError, Result};
use crate::storage::{InputSource, StatementSink};
use crate::utils::build_info;

use output::OutputPreferences;

const USAGE: &str = "\
Usage: water_billing <command> [options]

Commands:
  run        Allocate every cycle and write statement records
  version    Print version and build information
  help       Show this message

Options for run:
  --config FILE      Config file (default: $WATER_BILLING_CONFIG or water_billing.json)
  --customers FILE   Customer table
  --business FILE    Business table
  --cycles FILE      Expense cycle table
  --payments FILE    Payment table
  --out DIR          Statement output directory
  --dry-run          Print the summary without writing statements
  --quiet            Only print cycle headings and warnings
  --no-color         Disable colored output";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub dry_run: bool,
    pub output: OutputFlags,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFlags {
    pub quiet: bool,
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(RunOptions),
    Version,
    Help,
}

/// Parses the arguments that follow the program name.
pub fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let command = args
        .next()
        .ok_or_else(|| usage_error("missing command"))?;

    match command.as_str() {
        "run" => parse_run(args).map(Command::Run),
        "version" | "--version" | "-V" => Ok(Command::Version),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(usage_error(&format!("unknown command `{other}`"))),
    }
}

fn parse_run(mut args: impl Iterator<Item = String>) -> Result<RunOptions> {
    let mut options = RunOptions::default();
    while let Some(arg) = args.next() {
        let mut value = || {
            args.next()
                .map(PathBuf::from)
                .ok_or_else(|| usage_error(&format!("`{arg}` needs a value")))
        };
        match arg.as_str() {
            "--config" => options.config = Some(value()?),
            "--customers" => options.overrides.customers = Some(value()?),
            "--business" => options.overrides.business = Some(value()?),
            "--cycles" => options.overrides.cycles = Some(value()?),
            "--payments" => options.overrides.payments = Some(value()?),
            "--out" => options.overrides.statements_dir = Some(value()?),
            "--dry-run" => options.dry_run = true,
            "--quiet" => options.output.quiet = true,
            "--no-color" => options.output.no_color = true,
            other => return Err(usage_error(&format!("unknown option `{other}`"))),
        }
    }
    Ok(options)
}

fn usage_error(message: &str) -> BillingError {
    BillingError::Config(format!("{message}\n\n{USAGE}"))
}

/// Entry point used by the `water_billing` binary.
pub fn run_cli() -> Result<()> {
    match parse_args(env::args().skip(1))? {
        Command::Run(options) => run(options),
        Command::Version => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
    }
}

fn run(options: RunOptions) -> Result<()> {
    output::set_preferences(OutputPreferences {
        plain: options.output.no_color,
        quiet: options.output.quiet,
    });

    let config_path = options.config.unwrap_or_else(BillingConfig::default_path);
    let mut config = BillingConfig::load(&config_path)?;
    config.apply(options.overrides);

    let inputs = config.inputs().load()?;
    let result = Orchestrator::new(inputs)?.run()?;
    print_summary(&result);

    if options.dry_run {
        output::info("dry run: no statements written");
        return Ok(());
    }
    let written = config.statements().store(&result)?;
    for path in &written {
        output::success(format!("wrote {path}"));
    }
    Ok(())
}

fn print_summary(result: &BillingResult) {
    for cycle in &result.cycles {
        output::section(format!("{} ({})", cycle.invoice_name, cycle.cycle.label()));
        output::info(format!(
            "expenses {} scaled {} | {} | margin {:.0}% | {} connections",
            cycle.cycle.total_expenses(),
            cycle.scaled_total,
            cycle.cycle.method,
            cycle.cycle.margin * 100.0,
            cycle.cycle.effective_connections,
        ));
        output::info(format!(
            "{:<20} {:>6} {:>14} {:>14}",
            "account", "weight", "pay", "total due"
        ));
        for statement in &cycle.statements {
            output::info(format!(
                "{:<20} {:>6} {:>14} {:>14}",
                statement.account_name,
                statement.record.weight,
                statement.record.pay,
                statement.record.total_due,
            ));
        }
        if !cycle.unallocated.is_zero() {
            output::warning(format!(
                "{} of {} not allocated to any customer",
                cycle.unallocated, cycle.scaled_total
            ));
        }
    }
}
