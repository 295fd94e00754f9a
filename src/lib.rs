//! Textbook RSA: probabilistic prime generation, key construction,
//! sentinel-framed block encryption and identity signatures.
//!
//! The block framing is a single `0xFF` byte per block. It is deterministic
//! and malleable, and offers no semantic security.

pub mod cli;
pub mod config;
pub mod rsa;
pub mod util;
