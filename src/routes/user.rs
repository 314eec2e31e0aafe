//! This file defines the routes for registering and managing user accounts.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
    state::UserState,
    stores::UserStore,
};

/// The fields of a user profile, as sent by clients when registering or
/// updating an account.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    /// The display name of the user.
    pub name: String,
    /// The email address to register the account under.
    pub email: String,
    /// The raw password. It is hashed before it reaches a store.
    pub password: String,
}

/// A route handler for registering a new user.
pub async fn create_user<U>(
    State(mut state): State<UserState<U>>,
    Json(data): Json<UserData>,
) -> Result<(StatusCode, Json<User>), Error>
where
    U: UserStore + Clone + Send + Sync,
{
    let password_hash = PasswordHash::new(&data.password)?;

    let user = state
        .user_store
        .create(&data.name, &data.email, password_hash)?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// A route handler for the authenticated user's own profile.
pub async fn get_user<U>(
    State(state): State<UserState<U>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<User>, Error>
where
    U: UserStore + Clone + Send + Sync,
{
    state.user_store.get(user_id).map(Json)
}

/// A route handler for replacing the authenticated user's profile.
///
/// All fields are replaced at once; the password is rehashed.
pub async fn update_user<U>(
    State(mut state): State<UserState<U>>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<UserData>,
) -> Result<StatusCode, Error>
where
    U: UserStore + Clone + Send + Sync,
{
    let password_hash = PasswordHash::new(&data.password)?;

    state
        .user_store
        .update(user_id, &data.name, &data.email, password_hash)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod user_route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        build_router,
        routes::endpoints,
        stores::sqlite::create_app_state,
    };

    use super::UserData;

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = create_app_state(connection, "42").expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    fn get_user_data() -> UserData {
        UserData {
            name: "Test".to_string(),
            email: "test@test.com".to_string(),
            password: "averysafeandsecurepassword".to_string(),
        }
    }

    async fn log_in(server: &TestServer, email: &str, password: &str) -> String {
        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({ "email": email, "password": password }))
            .await;

        response.assert_status_ok();

        response.json::<Value>()["token"]
            .as_str()
            .expect("expected a token in the log in response")
            .to_owned()
    }

    #[tokio::test]
    async fn create_user_returns_the_created_profile() {
        let server = get_test_server();

        let response = server.post(endpoints::USERS).json(&get_user_data()).await;

        response.assert_status(StatusCode::CREATED);

        let body = response.json::<Value>();

        assert_eq!(body["name"], "Test");
        assert_eq!(body["email"], "test@test.com");
        assert!(body["id"].as_i64().is_some_and(|id| id > 0));
        assert!(
            body.get("password_hash").is_none(),
            "the password hash must never be serialised"
        );
    }

    #[tokio::test]
    async fn create_user_fails_on_duplicate_email() {
        let server = get_test_server();
        server
            .post(endpoints::USERS)
            .json(&get_user_data())
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post(endpoints::USERS).json(&get_user_data()).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_user_returns_the_callers_profile() {
        let server = get_test_server();
        let data = get_user_data();
        server
            .post(endpoints::USERS)
            .json(&data)
            .await
            .assert_status(StatusCode::CREATED);
        let token = log_in(&server, &data.email, &data.password).await;

        let response = server.get(endpoints::ME).authorization_bearer(token).await;

        response.assert_status_ok();

        let body = response.json::<Value>();

        assert_eq!(body["email"], "test@test.com");
    }

    #[tokio::test]
    async fn get_user_without_token_returns_401() {
        let server = get_test_server();

        let response = server.get(endpoints::ME).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn update_user_replaces_the_profile_and_password() {
        let server = get_test_server();
        let data = get_user_data();
        server
            .post(endpoints::USERS)
            .json(&data)
            .await
            .assert_status(StatusCode::CREATED);
        let token = log_in(&server, &data.email, &data.password).await;

        let response = server
            .put(endpoints::ME)
            .authorization_bearer(token)
            .json(&UserData {
                name: "Renamed".to_string(),
                email: "renamed@test.com".to_string(),
                password: "anewverysecurepassword".to_string(),
            })
            .await;

        response.assert_status(StatusCode::NO_CONTENT);

        // The new credentials must work, and the old ones must not.
        log_in(&server, "renamed@test.com", "anewverysecurepassword").await;
        server
            .post(endpoints::LOG_IN)
            .json(&json!({ "email": &data.email, "password": &data.password }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
