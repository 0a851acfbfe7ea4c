//! Auth types shared across Rollcall crates.
//!
//! Provides JWT issuing/validation, the bearer-token `Identity` extractor and the
//! typed role guards (`Caller<Admin>`, `Caller<Teacher>`, `Caller<Student>`).

pub mod identity;
pub mod token;
