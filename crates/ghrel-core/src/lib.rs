//! Core utilities shared by the ghrel crates: the error type, platform
//! paths and the keychain-backed credential store.

pub mod core;

pub use crate::core::credentials::CredentialStore;
pub use crate::core::error::{GhrelError, GhrelResult};
