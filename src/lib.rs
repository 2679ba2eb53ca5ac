//! registry-warden - authentication resolution and access control for package registries
//!
//! This crate resolves who is making a request from an `Authorization`
//! header under one of two mutually exclusive credential schemes (legacy
//! symmetrically-encrypted tokens and signed JWT bearer tokens), and decides
//! whether a resolved identity may perform a guarded action on a package.

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod store;
