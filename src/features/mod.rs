//! # Features
//!
//! Feature modules backing the built-in commands.

pub mod whitelist;
