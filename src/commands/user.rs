//! User and Config Commands

use serde::Serialize;
use crate::models::{UiConfig, User};
use crate::mutation::MutationError;
use super::{call, IdArgs, NoArgs};

#[derive(Serialize)]
struct CreateUserArgs<'a> {
    name: &'a str,
}

pub async fn list_users() -> Result<Vec<User>, MutationError> {
    call("list_users", &NoArgs {}).await
}

pub async fn create_user(name: &str) -> Result<User, MutationError> {
    call("create_user", &CreateUserArgs { name }).await
}

pub async fn delete_user(id: u32) -> Result<(), MutationError> {
    call("delete_user", &IdArgs { id }).await
}

pub async fn get_console_config() -> Result<UiConfig, MutationError> {
    call("get_console_config", &NoArgs {}).await
}
