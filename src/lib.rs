//! Hexfab game-contract library.
//!
//! Exposes the hex board representation, the game transaction machine, the
//! alliance side-contract, and the ledger abstraction for use by integration
//! tests and the binary entry points.

pub mod alliance;
pub mod board;
pub mod contract;
pub mod error;
pub mod ledger;
