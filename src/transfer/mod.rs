//! Equipment/vault transfer protocol

pub mod engine;

pub use engine::{
    Location, TransferRequest, TransferKind, Transfer, TransferOutcome,
    TransferError, TransferEngine,
};
