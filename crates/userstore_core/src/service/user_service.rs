//! User use-case service and its request/response DTOs.
//!
//! The repository speaks domain `User` records only; every DTO reshape
//! happens here and nowhere else.

use crate::model::user::{User, UserId};
use crate::repo::user_repo::{RepoError, RepoResult, UserRepository};
use log::warn;
use serde::{Deserialize, Serialize};

/// Input shape for `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// Input shape for `update`: target id plus full replacement fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Output shape handed to the presentation layer. Always carries an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl UserResponse {
    fn from_record(user: User) -> RepoResult<Self> {
        let id = user.id.ok_or(RepoError::MissingId)?;
        Ok(Self {
            id,
            name: user.name,
            email: user.email,
        })
    }
}

/// Thin orchestration wrapper over a repository implementation.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new user and returns the response carrying the assigned id.
    pub fn create_user(&self, request: &CreateUserRequest) -> RepoResult<UserResponse> {
        let user = User::new(request.name.as_str(), request.email.as_str());
        let id = self.repo.create_user(&user)?;
        Ok(UserResponse {
            id,
            name: user.name,
            email: user.email,
        })
    }

    pub fn get_user(&self, id: UserId) -> RepoResult<Option<UserResponse>> {
        match self.repo.get_user(id)? {
            Some(user) => Ok(Some(UserResponse::from_record(user)?)),
            None => Ok(None),
        }
    }

    /// Lists all users. Never fails the caller; backend trouble surfaces
    /// as an empty list at the repository boundary.
    pub fn list_users(&self) -> Vec<UserResponse> {
        self.repo
            .list_users()
            .into_iter()
            .filter_map(|user| match UserResponse::from_record(user) {
                Ok(response) => Some(response),
                Err(err) => {
                    warn!("event=user_list module=service status=skip error={err}");
                    None
                }
            })
            .collect()
    }

    /// Flattens the update request into a domain record and delegates.
    pub fn update_user(&self, request: &UpdateUserRequest) -> RepoResult<UserResponse> {
        let user = User::with_id(request.id, request.name.as_str(), request.email.as_str());
        self.repo.update_user(&user)?;
        UserResponse::from_record(user)
    }

    pub fn delete_user(&self, id: UserId) -> RepoResult<()> {
        self.repo.delete_user(id)
    }
}
