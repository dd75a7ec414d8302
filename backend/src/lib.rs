pub mod models;
pub mod schema;

mod usersession;
pub use usersession::{UserSession, UserSessionData};

pub mod diesel_sessionstore;

pub mod api;
pub mod importer;
pub mod parser;
pub mod storage;
pub mod store;

pub async fn db_connection() -> diesel_async::AsyncPgConnection {
    use diesel_async::AsyncConnection;

    let database_url = std::env::var("DATABASE_URL").expect("'DATABASE_URL' must be set");

    diesel_async::AsyncPgConnection::establish(&database_url)
        .await
        .unwrap_or_else(|e| panic!("Error connecting to {} - {:?}", database_url, e))
}

/// Collects every file uploaded under the multipart field `name` as
/// `(file name, content)` pairs.
pub async fn demo_files_from_upload(
    name: &str,
    mut form: axum::extract::Multipart,
) -> Vec<(String, axum::body::Bytes)> {
    let mut files = Vec::new();

    while let Ok(Some(field)) = form.next_field().await {
        if field.name().map(|n| n != name).unwrap_or(true) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(f) => f.to_owned(),
            None => continue,
        };

        if let Ok(data) = field.bytes().await {
            files.push((file_name, data));
        }
    }

    files
}
