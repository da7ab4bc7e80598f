//! A small user service: body decoding via the extractor, response
//! encoding per media type, a service-specific error catalog, and an
//! attachment download.
//!
//! Run with `cargo run --example users`, then:
//!
//! ```text
//! curl -d '{"name":"kim"}' -H 'Content-Type: application/json' localhost:3000/users
//! curl localhost:3000/users/export
//! ```

use std::sync::{Arc, LazyLock, Mutex};

use axum::Router;
use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use wirebody_axum::prelude::*;

const USER_EXISTS: Code = Code(Code::SERVICE_BASE.0);

static CATALOG: LazyLock<Catalog> =
    LazyLock::new(|| Catalog::new().with(USER_EXISTS, "User {} already exists"));

#[derive(Clone, Debug, Serialize, Deserialize)]
struct User {
    name: String,
}

type Users = Arc<Mutex<Vec<User>>>;

async fn create_user(State(users): State<Users>, Decoded(user): Decoded<User>) -> Response {
    let exists = {
        let mut users = users.lock().expect("user list lock");
        if users.iter().any(|existing| existing.name == user.name) {
            true
        } else {
            users.push(user.clone());
            false
        }
    };
    if exists {
        let err = Error::new(Some(&CATALOG), USER_EXISTS, &[&user.name]);
        return write_error(MediaType::Json, StatusCode::CONFLICT, &err).await;
    }
    write_response(
        MediaType::Json,
        StatusCode::CREATED,
        Some(Payload::Structured(user)),
    )
    .await
}

async fn export_users(State(users): State<Users>) -> Response {
    let csv = {
        let users = users.lock().expect("user list lock");
        let mut csv = String::from("name\n");
        for user in users.iter() {
            csv.push_str(&user.name);
            csv.push('\n');
        }
        csv
    };

    let path = std::env::temp_dir().join("users.csv");
    if let Err(err) = tokio::fs::write(&path, &csv).await {
        return write_error(
            MediaType::Json,
            StatusCode::INTERNAL_SERVER_ERROR,
            &Error::internal(err),
        )
        .await;
    }

    match Attachment::open(&path).await {
        Ok(attachment) => {
            write_response::<()>(
                MediaType::OctetStream,
                StatusCode::OK,
                Some(Payload::File(attachment)),
            )
            .await
        }
        Err(err) => {
            write_error(
                MediaType::Json,
                StatusCode::INTERNAL_SERVER_ERROR,
                &Error::internal(err),
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let users: Users = Users::default();
    let app = Router::new()
        .route("/users", post(create_user))
        .route("/users/export", get(export_users))
        .with_state(users);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .expect("bind 127.0.0.1:3000");
    tracing::info!("listening on http://127.0.0.1:3000");
    axum::serve(listener, app).await.expect("serve");
}
