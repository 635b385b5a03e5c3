use tracing::info;

use crate::client::RequestExecutor;
use crate::error::Result;
use crate::http::Response;
use crate::types::User;

const USER_ENDPOINT: &str = "/user";

/// Operations under `/user`.
///
/// Usernames are percent-encoded into a single path segment, so spaces,
/// `?` or `/` never change which resource is addressed.
#[derive(Clone, Copy)]
pub struct UserApi<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> UserApi<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    pub fn create_user(&self, user: &User) -> Result<Response> {
        info!(username = ?user.username, "creating user");
        self.executor.post(USER_ENDPOINT, user)
    }

    pub fn create_users_with_list(&self, users: &[User]) -> Result<Response> {
        info!(count = users.len(), "creating users");
        self.executor.post(&format!("{USER_ENDPOINT}/createWithList"), users)
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Response> {
        info!(username, "getting user");
        self.executor.reset_template();
        self.executor.get(&user_path(username))
    }

    pub fn update_user(&self, username: &str, user: &User) -> Result<Response> {
        info!(username, "updating user");
        self.executor.put(&user_path(username), user)
    }

    pub fn delete_user(&self, username: &str) -> Result<Response> {
        info!(username, "deleting user");
        self.executor.delete(&user_path(username))
    }

    /// Credentials travel as query parameters; nothing else is done with them.
    pub fn login_user(&self, username: &str, password: &str) -> Result<Response> {
        info!(username, "logging in user");
        self.executor.reset_template();
        self.executor.get_with_params(
            &format!("{USER_ENDPOINT}/login"),
            &[("username", username), ("password", password)],
        )
    }

    pub fn logout_user(&self) -> Result<Response> {
        info!("logging out user");
        self.executor.reset_template();
        self.executor.get(&format!("{USER_ENDPOINT}/logout"))
    }
}

fn user_path(username: &str) -> String {
    format!("{USER_ENDPOINT}/{}", urlencoding::encode(username))
}
