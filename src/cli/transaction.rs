//! Transaction CLI commands

use chrono::Local;
use clap::Subcommand;

use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::error::SpendwiseResult;
use crate::models::{DateRange, TransactionType, UserId};
use crate::services::{CreateTransactionInput, TransactionService, UpdateTransactionInput};
use crate::storage::{Storage, TransactionFilter};

use super::{parse_amount_arg, parse_date_arg, parse_kind_arg, parse_optional_date};

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record an income or expense
    Add {
        /// income or expense
        kind: String,
        /// Amount, e.g. "12.50"
        amount: String,
        /// Category name
        category: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// New description ("" clears it)
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Build a window from optional bounds; an open side extends as far as needed
fn window(
    from: Option<String>,
    to: Option<String>,
) -> SpendwiseResult<Option<DateRange>> {
    let from = parse_optional_date(from)?;
    let to = parse_optional_date(to)?;
    let range = match (from, to) {
        (None, None) => None,
        (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
        (Some(start), None) => Some(DateRange::new(start, chrono::NaiveDate::MAX)?),
        (None, Some(end)) => Some(DateRange::new(chrono::NaiveDate::MIN, end)?),
    };
    Ok(range)
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    user_id: &UserId,
    cmd: TransactionCommands,
) -> SpendwiseResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            description,
        } => {
            let date = match date {
                Some(d) => parse_date_arg(&d)?,
                None => Local::now().date_naive(),
            };

            let txn = service.create(
                user_id,
                CreateTransactionInput {
                    transaction_type: parse_kind_arg(&kind)?,
                    amount: parse_amount_arg(&amount)?,
                    category,
                    description,
                    date,
                },
            )?;

            println!("Recorded {} of {} in '{}' on {}", txn.transaction_type, txn.amount, txn.category, txn.date);
            println!("  ID: {}", txn.id);
        }

        TransactionCommands::List {
            from,
            to,
            kind,
            category,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(range) = window(from, to)? {
                filter = filter.date_range(range);
            }
            if let Some(kind) = kind {
                filter = filter.transaction_type(parse_kind_arg(&kind)?);
            }
            if let Some(category) = category {
                filter = filter.category(category.trim());
            }

            let transactions = service.list(user_id, &filter)?;
            print!("{}", format_transaction_register(&transactions));
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(user_id, &id)?;
            print!("{}", format_transaction_details(&txn));
        }

        TransactionCommands::Edit {
            id,
            kind,
            amount,
            category,
            date,
            description,
        } => {
            let txn = service.find(user_id, &id)?;

            let input = UpdateTransactionInput {
                transaction_type: kind.as_deref().map(parse_kind_arg).transpose()?,
                amount: amount.as_deref().map(parse_amount_arg).transpose()?,
                category,
                description,
                date: parse_optional_date(date)?,
            };

            if input.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }

            let updated = service.update(user_id, txn.id, input)?;
            println!("Updated transaction {}", updated.id);
            print!("{}", format_transaction_details(&updated));
        }

        TransactionCommands::Delete { id } => {
            let txn = service.find(user_id, &id)?;
            let removed = service.delete(user_id, txn.id)?;
            println!(
                "Deleted transaction {} ({} {} on {})",
                removed.id, removed.category, removed.amount, removed.date
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_window() {
        assert_eq!(window(None, None).unwrap(), None);

        let closed = window(Some("2024-03-01".into()), Some("2024-03-31".into()))
            .unwrap()
            .unwrap();
        assert_eq!(closed, DateRange::month(2024, 3).unwrap());

        let open = window(Some("2024-03-01".into()), None).unwrap().unwrap();
        assert!(open.contains(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));

        let err = window(Some("2024-03-31".into()), Some("2024-03-01".into())).unwrap_err();
        assert!(err.is_invalid_range());
    }

    #[test]
    fn test_parse_kind_arg() {
        assert_eq!(parse_kind_arg("expense").unwrap(), TransactionType::Expense);
        assert!(parse_kind_arg("transfer").unwrap_err().is_validation());
    }
}
