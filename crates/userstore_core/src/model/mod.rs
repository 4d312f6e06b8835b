//! Domain model for the user entity.
//!
//! # Responsibility
//! - Define the canonical record shared by repository and service layers.
//! - Own field-level validation rules.
//!
//! # Invariants
//! - Identity (`id`) is assigned by storage, never by callers.
//! - Validation runs before any write reaches SQL.

pub mod user;
