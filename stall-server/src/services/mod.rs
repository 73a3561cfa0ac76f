//! Services Module
//!
//! Long-lived collaborators owned by [`crate::core::ServerState`].

pub mod proof_store;

pub use proof_store::{ProofStore, ProofStoreError};
