use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

use clap::Parser;

const MIGRATIONS: diesel_async_migrations::EmbeddedMigrations =
    diesel_async_migrations::embed_migrations!("../migrations/");

async fn run_migrations(connection: &mut diesel_async::AsyncPgConnection) {
    MIGRATIONS.run_pending_migrations(connection).await.unwrap();
}

#[derive(Debug, clap::Parser)]
struct Args {
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: String,
    /// Local folder for uploaded demos (spool folder when S3 is used)
    #[arg(long, default_value = "uploads/")]
    upload_folder: String,
    #[arg(long, default_value = "python3")]
    parser_command: String,
    #[arg(long, default_value = "parse_demo.py")]
    parser_script: std::path::PathBuf,
    /// Keep uploaded demos in this S3 bucket instead of the local folder
    #[arg(long)]
    s3_bucket: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("backend")
        }));
    tracing::subscriber::set_global_default(registry).unwrap();

    tracing::info!("Starting...");

    tracing::info!("Applying Migrations");
    run_migrations(&mut backend::db_connection().await).await;
    tracing::info!("Completed Migrations");

    let storage: Box<dyn backend::storage::DemoStorage> = match args.s3_bucket.as_deref() {
        Some(bucket) => {
            let region = s3::Region::Custom {
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "auto".to_owned()),
                endpoint: std::env::var("S3_ENDPOINT").expect("'S3_ENDPOINT' must be set"),
            };
            let credentials = s3::creds::Credentials::default().unwrap();

            Box::new(backend::storage::S3Storage::new(
                bucket,
                region,
                credentials,
                args.upload_folder.clone(),
            ))
        }
        None => Box::new(backend::storage::FileStorage::new(
            args.upload_folder.clone(),
        )),
    };

    let parser = backend::parser::ExternalParser::new(args.parser_command, args.parser_script);

    let (task_tx, task_rx) = tokio::sync::mpsc::unbounded_channel();
    let importer = backend::importer::Importer::new(storage.duplicate(), parser);
    tokio::task::spawn(importer.run(task_rx));

    let session_store = backend::diesel_sessionstore::DieselStore::new();
    let session_layer = tower_sessions::SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(tower_sessions::Expiry::OnInactivity(
            time::Duration::hours(48),
        ));

    let router = axum::Router::new()
        .nest("/api/", backend::api::router(storage, task_tx))
        .layer(session_layer)
        .nest_service("/", tower_http::services::ServeDir::new("frontend/dist/"));

    let listener = tokio::net::TcpListener::bind(&args.bind).await.unwrap();
    axum::serve(listener, router).await.unwrap();
}
