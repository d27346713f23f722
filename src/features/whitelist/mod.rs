//! # Minecraft Whitelist
//!
//! Backing store and profile lookup for the /mc-whitelist command.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

pub mod mojang;
pub mod store;

pub use mojang::{MojangClient, MojangProfile};
pub use store::{find_conflict, WhitelistEntry, WhitelistStore};
