//! Core domain logic for the userstore CRUD console.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging};
pub use model::user::{is_valid_email, User, UserId, UserValidationError};
pub use repo::user_repo::{RepoError, RepoResult, SqliteUserRepository, UserRepository};
pub use service::user_service::{
    CreateUserRequest, UpdateUserRequest, UserResponse, UserService,
};
