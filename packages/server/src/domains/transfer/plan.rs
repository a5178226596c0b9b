use std::collections::BTreeSet;

use crate::domains::account::AccountKey;
use crate::domains::transfer::models::Operation;

/// One transfer as a single unit of work.
///
/// Built from a validated command and handed whole to the store, which
/// applies it inside one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPlan {
    pub key: String,
    pub category: String,
    pub description: String,
    pub operations: Vec<Operation>,
}

impl TransferPlan {
    /// Every account the plan touches, in lock order.
    pub fn account_keys(&self) -> BTreeSet<AccountKey> {
        self.operations
            .iter()
            .flat_map(|op| [op.source_key(), op.destination_key()])
            .collect()
    }

    /// Members credited by the plan, sorted and deduplicated.
    pub fn destination_uids(&self) -> Vec<String> {
        self.operations
            .iter()
            .map(|op| op.account_dst.uid.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::transfer::models::AccountRef;
    use rust_decimal::Decimal;

    fn op(src: &str, dst: &str, currency: &str) -> Operation {
        Operation {
            currency: currency.to_string(),
            amount: Decimal::ONE,
            account_src: AccountRef {
                uid: src.to_string(),
                code: 101,
            },
            account_dst: AccountRef {
                uid: dst.to_string(),
                code: 201,
            },
        }
    }

    #[test]
    fn test_account_keys_are_sorted_and_unique() {
        let plan = TransferPlan {
            key: "t1".into(),
            category: "wire".into(),
            description: String::new(),
            operations: vec![op("b", "a", "usd"), op("b", "a", "usd"), op("a", "c", "btc")],
        };

        let keys: Vec<_> = plan.account_keys().into_iter().map(|k| k.to_string()).collect();
        assert_eq!(
            keys,
            vec!["a/btc/101", "a/usd/201", "b/usd/101", "c/btc/201"]
        );
        assert_eq!(plan.destination_uids(), vec!["a", "c"]);
    }
}
