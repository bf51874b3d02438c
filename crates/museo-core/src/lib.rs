#![deny(missing_docs)]

//! # museo-core — Foundational Types for the Museo Catalog
//!
//! This crate defines the domain types the API layer depends on. It has no
//! internal crate dependencies — only `serde` and `thiserror` from the
//! external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **[`FloorPosition`] is the single placement enum.** One definition,
//!    six variants, exhaustive `match` everywhere. Wire-level integers are
//!    parsed at the boundary via [`FloorPosition::from_level`]; an undefined
//!    level never becomes a value of this type.
//!
//! 2. **Visibility is a pure function.** The [`visibility`] module holds the
//!    allow/deny rules for floors and expositions. No side effects, no
//!    ambient viewer state — the caller's admin flag is always an explicit
//!    parameter.
//!
//! 3. **Field rules live in one place.** The [`fields`] module validates
//!    titles, descriptions, usernames, and emails, and applies the
//!    restoration invariant (`on_restoration ⇒ !open`) on every write path.
//!
//! 4. **[`ValidationError`] hierarchy.** Structured errors with `thiserror` —
//!    no `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod fields;
pub mod position;
pub mod visibility;

pub use error::ValidationError;
pub use fields::effective_open;
pub use position::FloorPosition;
