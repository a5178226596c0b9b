//! PostgresStore tests against a real database.
//!
//! Require Docker: `cargo test -- --ignored`

mod common;

use crate::common::PostgresHarness;
use management_core::domains::account::{Account, AccountKey};
use management_core::domains::member::{NewMember, UpsertOutcome};
use management_core::domains::transfer::{AccountRef, Operation, TransferPlan, TransferRejection};
use management_core::kernel::{BaseStore, StoreError};
use rust_decimal::Decimal;
use test_context::test_context;

fn member(uid: &str) -> NewMember {
    NewMember {
        uid: uid.to_string(),
        email: "a@b.com".to_string(),
        level: 1,
        role: "member".to_string(),
        group: None,
        state: None,
    }
}

fn plan(key: &str, src: &str, dst: &str, amounts: &[i64]) -> TransferPlan {
    TransferPlan {
        key: key.to_string(),
        category: "wire".to_string(),
        description: String::new(),
        operations: amounts
            .iter()
            .map(|amount| Operation {
                currency: "usd".to_string(),
                amount: Decimal::new(*amount, 0),
                account_src: AccountRef {
                    uid: src.to_string(),
                    code: 101,
                },
                account_dst: AccountRef {
                    uid: dst.to_string(),
                    code: 201,
                },
            })
            .collect(),
    }
}

/// Two members; the first holds 10 usd on account 101
async fn seed(ctx: &PostgresHarness) -> (String, String) {
    let alice = ctx.unique("alice");
    let bob = ctx.unique("bob");
    ctx.store.upsert_member(&member(&alice)).await.unwrap();
    ctx.store.upsert_member(&member(&bob)).await.unwrap();

    let mut conn = ctx.db_pool.acquire().await.unwrap();
    Account::provision(&AccountKey::new(&alice, "usd", 101), Decimal::new(10, 0), &mut *conn)
        .await
        .unwrap();

    (alice, bob)
}

async fn balance(ctx: &PostgresHarness, uid: &str, code: i32) -> Option<Decimal> {
    ctx.store
        .find_account(&AccountKey::new(uid, "usd", code))
        .await
        .unwrap()
        .map(|account| account.balance)
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn upsert_distinguishes_create_from_update(ctx: &PostgresHarness) {
    let uid = ctx.unique("member");

    let created = ctx.store.upsert_member(&member(&uid)).await.unwrap();
    let mut update = member(&uid);
    update.group = Some("vip-3".to_string());
    let updated = ctx.store.upsert_member(&update).await.unwrap();

    assert_eq!(created.outcome, UpsertOutcome::Created);
    assert_eq!(created.member.group, "vip-0");
    assert_eq!(updated.outcome, UpsertOutcome::Updated);
    assert_eq!(updated.member.group, "vip-3");
    assert_eq!(updated.member.id, created.member.id);
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn update_group_of_missing_member_returns_none(ctx: &PostgresHarness) {
    let uid = ctx.unique("ghost");
    assert!(ctx.store.update_member_group(&uid, "vip-1").await.unwrap().is_none());
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn transfer_provisions_and_records(ctx: &PostgresHarness) {
    let (alice, bob) = seed(ctx).await;
    let key = ctx.unique("transfer");

    let transfer = ctx
        .store
        .execute_transfer(&plan(&key, &alice, &bob, &[3, 4]))
        .await
        .unwrap();

    assert_eq!(transfer.operations.len(), 2);
    assert_eq!(balance(ctx, &alice, 101).await, Some(Decimal::new(3, 0)));
    assert_eq!(balance(ctx, &bob, 201).await, Some(Decimal::new(7, 0)));

    let stored = ctx.store.find_transfer(&key).await.unwrap().unwrap();
    assert_eq!(stored.operations, transfer.operations);

    let replay = ctx
        .store
        .execute_transfer(&plan(&key, &alice, &bob, &[1]))
        .await
        .unwrap_err();
    assert!(matches!(
        replay,
        StoreError::TransferRejected(TransferRejection::DuplicateKey)
    ));
    assert_eq!(balance(ctx, &bob, 201).await, Some(Decimal::new(7, 0)));
}

#[test_context(PostgresHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn rejected_transfer_rolls_back(ctx: &PostgresHarness) {
    let (alice, bob) = seed(ctx).await;
    let key = ctx.unique("transfer");

    let err = ctx
        .store
        .execute_transfer(&plan(&key, &alice, &bob, &[6, 6]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::TransferRejected(TransferRejection::InsufficientBalance { position: 1, .. })
    ));
    assert_eq!(balance(ctx, &alice, 101).await, Some(Decimal::new(10, 0)));
    assert_eq!(balance(ctx, &bob, 201).await, None);
    assert!(ctx.store.find_transfer(&key).await.unwrap().is_none());
}

#[test_context(PostgresHarness)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[ignore = "requires Docker"]
async fn concurrent_transfers_serialize_on_source_account(ctx: &PostgresHarness) {
    let (alice, bob) = seed(ctx).await;
    let first = plan(&ctx.unique("transfer"), &alice, &bob, &[6]);
    let second = plan(&ctx.unique("transfer"), &alice, &bob, &[6]);

    let (a, b) = tokio::join!(
        ctx.store.execute_transfer(&first),
        ctx.store.execute_transfer(&second)
    );

    let (accepted, refused, err) = match (a, b) {
        (Ok(_), Err(err)) => (&first, &second, err),
        (Err(err), Ok(_)) => (&second, &first, err),
        other => panic!("expected exactly one transfer to succeed: {:?}", other),
    };
    assert!(matches!(
        err,
        StoreError::TransferRejected(TransferRejection::InsufficientBalance { .. })
    ));

    assert_eq!(balance(ctx, &alice, 101).await, Some(Decimal::new(4, 0)));
    assert_eq!(balance(ctx, &bob, 201).await, Some(Decimal::new(6, 0)));
    assert!(ctx.store.find_transfer(&accepted.key).await.unwrap().is_some());
    assert!(ctx.store.find_transfer(&refused.key).await.unwrap().is_none());
}
