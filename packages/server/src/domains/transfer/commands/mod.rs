//! Transfer command - payload parsing and field validation

use rust_decimal::Decimal;

use crate::common::{CommandError, PayloadReader, ValidationErrors, ValidationRules};
use crate::domains::transfer::models::{AccountRef, Operation};
use crate::domains::transfer::plan::TransferPlan;

/// Digits kept after the decimal point by account balances.
pub const AMOUNT_MAX_SCALE: u32 = 18;

/// Transfer payload:
/// `{key, category, description?, operations: [{currency, amount, account_src, account_dst}]}`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransferCommand(pub TransferPlan);

impl CreateTransferCommand {
    pub fn parse(data: &serde_json::Value) -> Result<Self, CommandError> {
        let reader = PayloadReader::new(data)?;

        let operations = reader
            .array("operations")?
            .iter()
            .map(|op| -> Result<Operation, CommandError> {
                Ok(Operation {
                    currency: op.string("currency")?.trim().to_lowercase(),
                    amount: op.decimal("amount")?,
                    account_src: parse_account(op, "account_src")?,
                    account_dst: parse_account(op, "account_dst")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(TransferPlan {
            key: reader.identifier("key")?,
            category: reader.string("category")?,
            description: reader.optional_string("description")?.unwrap_or_default(),
            operations,
        }))
    }

    pub fn validate(&self, rules: &ValidationRules) -> Result<(), ValidationErrors> {
        let plan = &self.0;
        let mut errors = ValidationErrors::new();

        if plan.key.trim().is_empty() {
            errors.add("key", "can't be blank");
        }
        if !rules.transfer_categories.iter().any(|c| c == &plan.category) {
            errors.add("category", "is not included in the list");
        }
        if plan.operations.is_empty() {
            errors.add("operations", "can't be blank");
        }

        for operation in &plan.operations {
            if operation.currency.is_empty() {
                errors.add("currency", "can't be blank");
            }
            if operation.amount <= Decimal::ZERO {
                errors.add("amount", "must be greater than 0");
            } else if operation.amount.normalize().scale() > AMOUNT_MAX_SCALE {
                errors.add(
                    "amount",
                    format!("has more than {} decimal places", AMOUNT_MAX_SCALE),
                );
            }
            if operation.account_src.uid.trim().is_empty() {
                errors.add("account_src", "can't be blank");
            }
            if operation.account_dst.uid.trim().is_empty() {
                errors.add("account_dst", "can't be blank");
            }
            if operation.account_src == operation.account_dst {
                errors.add("account_dst", "must differ from account src");
            }
        }

        errors.into_result()
    }

    pub fn into_plan(self) -> TransferPlan {
        self.0
    }
}

fn parse_account(operation: &PayloadReader<'_>, field: &str) -> Result<AccountRef, CommandError> {
    let account = operation.object(field)?;
    Ok(AccountRef {
        uid: account.identifier("uid")?,
        code: account.integer("code")?,
    })
}
