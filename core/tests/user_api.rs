//! User endpoints against the live mock server.

mod common;

use petstore_core::assertions::*;
use petstore_core::{testdata, User, UserApi};

fn new_user() -> User {
    User::new(testdata::username(), testdata::email(), testdata::password())
}

#[test]
fn create_user_succeeds() {
    let exec = common::executor();
    let users = UserApi::new(&exec);

    let response = users
        .create_user(&new_user().with_names("John", "Doe"))
        .unwrap();

    assert_status_code(&response, 200).unwrap();
    assert_response_contains_key(&response, "message").unwrap();
}

#[test]
fn created_user_round_trips_by_username() {
    let exec = common::executor();
    let users = UserApi::new(&exec);
    let user = new_user();
    let username = user.username.clone().unwrap();
    users.create_user(&user).unwrap();

    let response = users.get_user_by_username(&username).unwrap();

    assert_status_code(&response, 200).unwrap();
    assert_json_path(&response, "username", username.as_str()).unwrap();
    assert_json_path(&response, "email", user.email.clone().unwrap()).unwrap();
}

#[test]
fn update_user_changes_names() {
    let exec = common::executor();
    let users = UserApi::new(&exec);
    let user = new_user().with_names("Jane", "Smith");
    let username = user.username.clone().unwrap();
    users.create_user(&user).unwrap();

    let updated = user.with_names("Janet", "Updated");
    let response = users.update_user(&username, &updated).unwrap();
    assert_status_code(&response, 200).unwrap();

    let fetched = users.get_user_by_username(&username).unwrap();
    assert_json_path(&fetched, "firstName", "Janet").unwrap();
    assert_json_path(&fetched, "lastName", "Updated").unwrap();
}

#[test]
fn delete_user_then_lookup_is_404() {
    let exec = common::executor();
    let users = UserApi::new(&exec);
    let user = new_user();
    let username = user.username.clone().unwrap();
    users.create_user(&user).unwrap();

    let response = users.delete_user(&username).unwrap();
    assert_status_code(&response, 200).unwrap();

    let missing = users.get_user_by_username(&username).unwrap();
    assert_status_code(&missing, 404).unwrap();
}

#[test]
fn usernames_with_reserved_characters_address_their_own_resource() {
    let exec = common::executor();
    let users = UserApi::new(&exec);

    for username in ["john doe", "who?me"] {
        let user = User::new(username, testdata::email(), testdata::password());
        users.create_user(&user).unwrap();

        let fetched = users.get_user_by_username(username).unwrap();
        assert_status_code(&fetched, 200).unwrap();
        assert_json_path(&fetched, "username", username).unwrap();

        let updated = user.with_names("Spacey", "Name");
        let response = users.update_user(username, &updated).unwrap();
        assert_status_code(&response, 200).unwrap();

        let response = users.delete_user(username).unwrap();
        assert_status_code(&response, 200).unwrap();
        let missing = users.get_user_by_username(username).unwrap();
        assert_status_code(&missing, 404).unwrap();
    }
}

#[test]
fn create_with_list_stores_every_user() {
    let exec = common::executor();
    let users = UserApi::new(&exec);
    let batch = vec![new_user(), new_user()];

    let response = users.create_users_with_list(&batch).unwrap();
    assert_status_code(&response, 200).unwrap();

    for user in &batch {
        let fetched = users
            .get_user_by_username(user.username.as_deref().unwrap())
            .unwrap();
        assert_status_code(&fetched, 200).unwrap();
    }
}

#[test]
fn login_returns_session_message_and_headers() {
    let exec = common::executor();
    let users = UserApi::new(&exec);
    let user = new_user();
    users.create_user(&user).unwrap();

    let response = users
        .login_user(
            user.username.as_deref().unwrap(),
            user.password.as_deref().unwrap(),
        )
        .unwrap();

    assert_status_code(&response, 200).unwrap();
    assert_response_contains_key(&response, "message").unwrap();
    assert_response_body_contains(&response, "logged in user session:").unwrap();
    assert_header_exists(&response, "x-rate-limit").unwrap();
    assert_header_value(&response, "X-Rate-Limit", "5000").unwrap();
    assert_header_exists(&response, "X-Expires-After").unwrap();
}

#[test]
fn login_with_unknown_credentials_is_still_success() {
    let exec = common::executor();
    let users = UserApi::new(&exec);

    let response = users.login_user("invalidUser", "invalidPass").unwrap();

    assert_response_success(&response).unwrap();
}

#[test]
fn logout_succeeds() {
    let exec = common::executor();
    let users = UserApi::new(&exec);

    let response = users.logout_user().unwrap();

    assert_status_code(&response, 200).unwrap();
    assert_json_path(&response, "message", "ok").unwrap();
}
