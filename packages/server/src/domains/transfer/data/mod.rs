mod transfer;

pub use transfer::{OperationData, TransferData};
