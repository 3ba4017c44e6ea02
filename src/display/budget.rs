//! Budget display formatting

use crate::models::Budget;

use super::report::truncate;

pub fn format_budget_row(budget: &Budget) -> String {
    format!(
        "{:12} {:20} {:>12} {:8} {} .. {}",
        budget.id.to_string(),
        truncate(&budget.category, 20),
        budget.amount,
        budget.period.as_str(),
        budget.start_date.format("%Y-%m-%d"),
        budget.end_date.format("%Y-%m-%d")
    )
}

pub fn format_budget_list(budgets: &[Budget]) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let mut output = format!(
        "{:12} {:20} {:>12} {:8} {}\n",
        "ID", "Category", "Amount", "Period", "Dates"
    );
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for budget in budgets {
        output.push_str(&format_budget_row(budget));
        output.push('\n');
    }

    output
}

pub fn format_budget_details(budget: &Budget) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget:      {}\n", budget.id));
    output.push_str(&format!("Category:    {}\n", budget.category));
    output.push_str(&format!("Amount:      {}\n", budget.amount));
    output.push_str(&format!("Period:      {}\n", budget.period));
    output.push_str(&format!(
        "Dates:       {} to {}\n",
        budget.start_date.format("%Y-%m-%d"),
        budget.end_date.format("%Y-%m-%d")
    ));

    if let Some(description) = &budget.description {
        output.push_str(&format!("Description: {}\n", description));
    }

    output
}
