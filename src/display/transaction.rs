//! Transaction display formatting

use crate::models::{Transaction, TransactionType};

use super::report::truncate;

/// One register row: id, date, direction, category, signed amount
pub fn format_transaction_row(txn: &Transaction) -> String {
    let direction = match txn.transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };

    format!(
        "{:12} {} {} {:20} {:>12}",
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        direction,
        truncate(&txn.category, 20),
        txn.signed_amount()
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {} {:20} {:>12}\n",
        "ID", "Date", " ", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(60));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }

    output
}

pub fn format_transaction_details(txn: &Transaction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if let Some(description) = &txn.description {
        output.push_str(&format!("Description: {}\n", description));
    }

    output.push_str(&format!(
        "Recorded:    {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if txn.updated_at != txn.created_at {
        output.push_str(&format!(
            "Updated:     {}\n",
            txn.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output
}
