//! # Formats Module
//!
//! Binary serialization formats for Slipbox snapshots.

pub mod persistence;

pub use persistence::{
    MAX_PERSISTENCE_PAYLOAD_SIZE, PersistenceHeader, snapshot_from_bytes, snapshot_to_bytes,
};
