//! Budget CLI commands

use clap::Subcommand;

use crate::display::budget::{format_budget_details, format_budget_list};
use crate::error::{SpendwiseError, SpendwiseResult};
use crate::models::{BudgetPeriod, DateRange, UserId};
use crate::services::{BudgetService, CreateBudgetInput, UpdateBudgetInput};
use crate::storage::{BudgetFilter, Storage};

use super::{parse_amount_arg, parse_optional_date};

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Create a budget for a category
    Add {
        /// Category name
        category: String,
        /// Budgeted amount, e.g. "400"
        amount: String,
        /// daily, weekly, monthly or yearly
        #[arg(short, long)]
        period: Option<String>,
        /// First day covered (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        start: Option<String>,
        /// Last day covered (YYYY-MM-DD), defaults to one period after start
        #[arg(short, long)]
        end: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List budgets, latest start first
    List {
        #[arg(short, long)]
        category: Option<String>,
        /// Only budgets starting on or after this date
        #[arg(long)]
        from: Option<String>,
        /// Only budgets ending on or before this date
        #[arg(long)]
        to: Option<String>,
    },
    /// Show budget details
    Show {
        /// Budget ID
        id: String,
    },
    /// Edit a budget
    Edit {
        /// Budget ID
        id: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
        /// New description ("" clears it)
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },
}

fn parse_period(s: &str) -> SpendwiseResult<BudgetPeriod> {
    s.parse::<BudgetPeriod>()
        .map_err(|e| SpendwiseError::Validation(e.to_string()))
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    user_id: &UserId,
    default_period: BudgetPeriod,
    cmd: BudgetCommands,
) -> SpendwiseResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Add {
            category,
            amount,
            period,
            start,
            end,
            description,
        } => {
            let period = match period {
                Some(p) => parse_period(&p)?,
                None => default_period,
            };

            let budget = service.create(
                user_id,
                CreateBudgetInput {
                    category,
                    amount: parse_amount_arg(&amount)?,
                    period: Some(period),
                    start_date: parse_optional_date(start)?,
                    end_date: parse_optional_date(end)?,
                    description,
                },
            )?;

            println!(
                "Created {} budget of {} for '{}' ({} to {})",
                budget.period, budget.amount, budget.category, budget.start_date, budget.end_date
            );
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::List { category, from, to } => {
            let mut filter = BudgetFilter::new();
            if let Some(category) = category {
                filter = filter.category(category.trim());
            }

            let from = parse_optional_date(from)?;
            let to = parse_optional_date(to)?;
            if from.is_some() || to.is_some() {
                let range = DateRange::new(
                    from.unwrap_or(chrono::NaiveDate::MIN),
                    to.unwrap_or(chrono::NaiveDate::MAX),
                )?;
                filter = filter.within(range);
            }

            let budgets = service.list(user_id, &filter)?;
            print!("{}", format_budget_list(&budgets));
        }

        BudgetCommands::Show { id } => {
            let budget = service.find(user_id, &id)?;
            print!("{}", format_budget_details(&budget));
        }

        BudgetCommands::Edit {
            id,
            category,
            amount,
            period,
            start,
            end,
            description,
        } => {
            let budget = service.find(user_id, &id)?;

            let input = UpdateBudgetInput {
                category,
                amount: amount.as_deref().map(parse_amount_arg).transpose()?,
                period: period.as_deref().map(parse_period).transpose()?,
                start_date: parse_optional_date(start)?,
                end_date: parse_optional_date(end)?,
                description,
            };

            if input.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(user_id, budget.id, input)?;
            println!("Updated budget {}", updated.id);
            print!("{}", format_budget_details(&updated));
        }

        BudgetCommands::Delete { id } => {
            let budget = service.find(user_id, &id)?;
            let removed = service.delete(user_id, budget.id)?;
            println!("Deleted budget {} for '{}'", removed.id, removed.category);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SpendwisePaths;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, UserId) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendwisePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage, UserId::new("alice").unwrap())
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("weekly").unwrap(), BudgetPeriod::Weekly);
        assert!(parse_period("fortnightly").unwrap_err().is_validation());
    }

    #[test]
    fn test_add_uses_default_period() {
        let (_temp_dir, storage, user) = setup();

        handle_budget_command(
            &storage,
            &user,
            BudgetPeriod::Yearly,
            BudgetCommands::Add {
                category: "Travel".into(),
                amount: "1200".into(),
                period: None,
                start: Some("2024-01-01".into()),
                end: None,
                description: None,
            },
        )
        .unwrap();

        let budgets = BudgetService::new(&storage).list_by_category(&user, "Travel").unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].period, BudgetPeriod::Yearly);
        assert_eq!(budgets[0].end_date, chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_add_overlap_is_rejected() {
        let (_temp_dir, storage, user) = setup();
        let add = |start: &str| BudgetCommands::Add {
            category: "Food".into(),
            amount: "400".into(),
            period: Some("monthly".into()),
            start: Some(start.into()),
            end: None,
            description: None,
        };

        handle_budget_command(&storage, &user, BudgetPeriod::Monthly, add("2024-03-01")).unwrap();
        let err =
            handle_budget_command(&storage, &user, BudgetPeriod::Monthly, add("2024-03-31")).unwrap_err();
        assert!(err.is_overlap());
    }
}
