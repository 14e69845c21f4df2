//! Pallet packing engine.
//!
//! Assigns a batch of physical items to the minimum number of fixed-size
//! pallets a greedy allocator can manage, respecting per-pallet volume
//! and weight limits, and reports the packed layout of every pallet.

pub mod packer;
pub mod types;

pub use packer::Packer;
pub use types::{
    Item, PackError, PackRequest, PackResult, PackSummary, PalletLayout, PalletSpec, Placement,
    RejectReason, RejectedItem, Rotation,
};
