//! Domain records stored in the agenda document store.
//!
//! # Responsibility
//! - Define `User` (with embedded `Contact` entries) and `Note`.
//! - Define the shaped views returned to callers.
//!
//! # Invariants
//! - Identifiers are store-assigned UUIDs and never reused.
//! - A `Note` always carries the id of the `User` that created it.

pub mod contact;
pub mod note;
pub mod user;
