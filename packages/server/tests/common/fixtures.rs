//! Test fixtures: payloads and deterministic signer keys.

use ed25519_dalek::SigningKey;
use serde_json::{json, Value};

pub const MEMBERS_PATH: &str = "/api/v2/management/members";
pub const GROUP_PATH: &str = "/api/v2/management/members/group";
pub const TRANSFERS_PATH: &str = "/api/v2/management/transfers/new";

/// Fixed signing keys so envelopes are reproducible across runs.
///
/// `mallory` holds a valid key pair that no keychain knows about.
pub fn signing_key(signer: &str) -> SigningKey {
    let seed = match signer {
        "alex" => 1,
        "jeff" => 2,
        "james" => 3,
        "mallory" => 9,
        other => panic!("No test key for signer {}", other),
    };
    SigningKey::from_bytes(&[seed; 32])
}

/// Member payload used by the concrete HTTP scenarios
pub fn member_payload(uid: &str) -> Value {
    json!({
        "uid": uid,
        "email": "a@b.com",
        "level": 3,
        "role": "member",
        "group": "none",
        "state": "active"
    })
}

/// Single-operation transfer of `amount` usd from `src` (code 101) to `dst` (code 201)
pub fn transfer_payload(key: &str, src: &str, dst: &str, amount: &str) -> Value {
    transfer_with_operations(key, vec![operation(src, dst, amount)])
}

pub fn transfer_with_operations(key: &str, operations: Vec<Value>) -> Value {
    json!({
        "key": key,
        "category": "wire",
        "description": "Referral program payouts",
        "operations": operations
    })
}

pub fn operation(src: &str, dst: &str, amount: &str) -> Value {
    json!({
        "currency": "usd",
        "amount": amount,
        "account_src": {"uid": src, "code": 101},
        "account_dst": {"uid": dst, "code": 201}
    })
}
