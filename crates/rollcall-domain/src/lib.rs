//! Domain types shared across all Rollcall crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; `infra/` converts to and from storage columns.

pub mod attendance;
pub mod user;
