//! Cryptographic helpers used by the ABI, currently only account addresses.
pub mod address;
