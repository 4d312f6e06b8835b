//! Repository layer: user CRUD contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Translate CRUD intents into parameterized statements.
//! - Map backend failures to domain error kinds; raw driver errors never
//!   cross this boundary.
//!
//! # Invariants
//! - This layer is the only one permitted to issue writes against storage.
//! - Writes validate the record before touching SQL.

pub mod user_repo;
