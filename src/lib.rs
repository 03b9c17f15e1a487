/// Account data model: identifiers, names and balances.
pub mod account;

/// Transactional account storage: the store port, its unit-of-work contract
/// and an "in memory" adapter with optimistic version checks.
///
/// NOTE: The port exists so the in-memory adapter can be swapped for a real
/// database without touching the transfer logic.
pub mod store;

/// The funds-transfer operation: request validation and the all-or-nothing
/// two-balance update, with its outcome and error types.
pub mod transfer;

/// Ideally, this module should exist on its own crate, as a way to
/// bootstrap core logic. However, I want to use it for integration test
/// so I put it here.
pub mod bin_utils;
