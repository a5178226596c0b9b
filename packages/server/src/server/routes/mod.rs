// HTTP routes
pub mod health;
pub mod members;
pub mod transfers;

use serde::Deserialize;
use serde_json::Value;

use crate::common::SignedEnvelope;

pub use health::*;
pub use members::*;
pub use transfers::*;

/// Body of every management request: the command payload plus the
/// envelopes signing it.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedRequest {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub signatures: Vec<SignedEnvelope>,
}
