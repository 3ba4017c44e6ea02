//! CLI commands for reports
//!
//! Every report renders as a terminal table, JSON or YAML, or exports to CSV
//! when `--output` is given.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{DateRange, UserId};
use crate::reports::{
    AggregateFilter, BudgetVsActualReport, CategorySpending, MonthlySummary, ReportService,
    TransactionAggregate,
};
use crate::storage::Storage;

use super::{parse_kind_arg, parse_optional_date};

/// Rendering for report output on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MonthArgs {
    /// Month number (1-12), defaults to the current month
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Year, defaults to the current year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Month as YYYY-MM (alternative to --month/--year)
    #[arg(short, long, conflicts_with_all = ["month", "year"])]
    pub period: Option<String>,
}

impl MonthArgs {
    /// Resolve to `(year, month)`; the month itself is checked by the report
    fn resolve(&self, today: NaiveDate) -> SpendwiseResult<(i32, u32)> {
        if let Some(period) = &self.period {
            return parse_year_month(period);
        }
        Ok((
            self.year.unwrap_or_else(|| today.year()),
            self.month.unwrap_or_else(|| today.month()),
        ))
    }
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expenses and balance for one month
    Summary {
        #[command(flatten)]
        month: MonthArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Budgeted vs. actual spending for one month
    #[command(alias = "budget")]
    Compare {
        #[command(flatten)]
        month: MonthArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Expenses by category over a date range
    Spending {
        /// Start date (YYYY-MM-DD), defaults to the first of this month
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Income and expense totals over a date range
    Aggregate {
        /// Start date (YYYY-MM-DD), defaults to the first of this month
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<String>,
        /// Only income or only expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// A report the CLI knows how to render
trait ReportOutput: Serialize {
    const TITLE: &'static str;

    fn terminal(&self) -> String;
    fn csv<W: Write>(&self, writer: W) -> SpendwiseResult<()>;
}

impl ReportOutput for MonthlySummary {
    const TITLE: &'static str = "Monthly summary";

    fn terminal(&self) -> String {
        self.format_terminal()
    }

    fn csv<W: Write>(&self, writer: W) -> SpendwiseResult<()> {
        self.export_csv(writer)
    }
}

impl ReportOutput for BudgetVsActualReport {
    const TITLE: &'static str = "Budget comparison";

    fn terminal(&self) -> String {
        self.format_terminal()
    }

    fn csv<W: Write>(&self, writer: W) -> SpendwiseResult<()> {
        self.export_csv(writer)
    }
}

impl ReportOutput for CategorySpending {
    const TITLE: &'static str = "Spending report";

    fn terminal(&self) -> String {
        self.format_terminal()
    }

    fn csv<W: Write>(&self, writer: W) -> SpendwiseResult<()> {
        self.export_csv(writer)
    }
}

impl ReportOutput for TransactionAggregate {
    const TITLE: &'static str = "Aggregate report";

    fn terminal(&self) -> String {
        self.format_terminal()
    }

    fn csv<W: Write>(&self, writer: W) -> SpendwiseResult<()> {
        self.export_csv(writer)
    }
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    user_id: &UserId,
    cmd: ReportCommands,
) -> SpendwiseResult<()> {
    let service = ReportService::new(storage);
    let today = Local::now().date_naive();

    match cmd {
        ReportCommands::Summary { month, output } => {
            let (year, month) = month.resolve(today)?;
            let summary = service.summarize(user_id, month, year)?;
            emit(&summary, &output)
        }
        ReportCommands::Compare { month, output } => {
            let (year, month) = month.resolve(today)?;
            let report = service.compare(user_id, month, year)?;
            emit(&report, &output)
        }
        ReportCommands::Spending { from, to, output } => {
            let range = report_window(from, to, today)?;
            let report = service.category_spending(user_id, range)?;
            emit(&report, &output)
        }
        ReportCommands::Aggregate {
            from,
            to,
            kind,
            category,
            output,
        } => {
            let range = report_window(from, to, today)?;
            let filter = AggregateFilter {
                transaction_type: kind.as_deref().map(parse_kind_arg).transpose()?,
                category: category.map(|c| c.trim().to_string()),
            };
            let report = service.aggregate(user_id, range, filter)?;
            emit(&report, &output)
        }
    }
}

fn emit<R: ReportOutput>(report: &R, args: &OutputArgs) -> SpendwiseResult<()> {
    if let Some(path) = &args.output {
        let file = File::create(path).map_err(|e| {
            SpendwiseError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        report.csv(&mut writer)?;
        writer.flush()?;
        println!("{} exported to: {}", R::TITLE, path.display());
        return Ok(());
    }

    match args.format {
        OutputFormat::Text => println!("{}", report.terminal()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(report)?),
    }
    Ok(())
}

/// `--from`/`--to` window, defaulting to the current month to date
fn report_window(
    from: Option<String>,
    to: Option<String>,
    today: NaiveDate,
) -> SpendwiseResult<DateRange> {
    let start = parse_optional_date(from)?.unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    let end = parse_optional_date(to)?.unwrap_or(today);
    Ok(DateRange::new(start, end)?)
}

/// Parse "YYYY-MM"
fn parse_year_month(s: &str) -> SpendwiseResult<(i32, u32)> {
    let invalid = || {
        SpendwiseError::Validation(format!(
            "Invalid period format: {}. Use YYYY-MM (e.g., 2024-03)",
            s
        ))
    };

    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    Ok((year, month))
}
