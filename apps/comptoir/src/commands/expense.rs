//! # Expense Commands

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use comptoir_core::ids::new_id;
use comptoir_core::{Entity, Expense, ExpenseCategory, ValidationError};
use comptoir_sync::RemoteBackend;

use crate::context::AppContext;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub amount: i64,
    #[serde(default)]
    pub description: String,
}

/// Records an expense declared by the logged-in user.
pub async fn record_expense<R: RemoteBackend>(
    ctx: &mut AppContext<R>,
    input: ExpenseInput,
) -> ApiResult<Expense> {
    let company_id = ctx.session().require_tenant()?.to_string();
    let declared_by = ctx.session().require_user()?.name.clone();
    if input.amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        }
        .into());
    }

    let mut expense = Expense {
        id: new_id(),
        company_id: String::new(),
        date: input.date,
        category: input.category,
        amount: input.amount,
        description: input.description,
        declared_by,
    };
    expense.assign_company(&company_id);

    let expense = ctx.persist(&expense).await?;
    info!(expense_id = %expense.id, amount = expense.amount, "Expense recorded");
    Ok(expense)
}

pub async fn delete_expense<R: RemoteBackend>(ctx: &mut AppContext<R>, id: &str) -> ApiResult<()> {
    ctx.session().require_tenant()?;
    let expense = ctx.scoped_record::<Expense>(id)?;
    ctx.discard::<Expense>(&expense.id).await?;
    Ok(())
}
