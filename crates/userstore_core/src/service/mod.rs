//! Service layer: orchestration between external callers and the
//! repository.
//!
//! # Responsibility
//! - Reshape wire-facing requests/responses to and from the domain record.
//! - Delegate persistence to the repository; no business rules live here.

pub mod user_service;
