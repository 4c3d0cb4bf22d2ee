use rusty_golf_rounds::args;
use rusty_golf_rounds::cache::{CacheTag, QueryCache};
use rusty_golf_rounds::capture::{CaptureService, OpenAiVisionModel, VisionModel};
use rusty_golf_rounds::controller::{auth, capture, catalog_prefill, player, round};
use rusty_golf_rounds::model::execute_batch_sql;
use rusty_golf_rounds::model::schema::ensure_schema;
use rusty_golf_rounds::paths;
use rusty_golf_rounds::session::SessionStore;
use rusty_golf_rounds::session::otp::TracingMailer;
use rusty_golf_rounds::storage::{SqlStorage, Storage};
use rusty_golf_rounds::telemetry::init_tracing;
use sql_middleware::middleware::{
    ConfigAndPool, DatabaseType, PgConfig, PostgresOptions, SqliteOptions,
};

use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, web};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = match args::args_checks() {
        Ok(args) => args,
        Err(e) => {
            tracing::error!(error = %e, "invalid arguments");
            std::process::exit(1);
        }
    };

    let (config_and_pool, db_type) = init_config_and_pool(&args).await?;
    let cache = QueryCache::default();
    run_startup_tasks(&args, &config_and_pool, &db_type, &cache).await?;

    let storage: Arc<dyn Storage> = Arc::new(SqlStorage::new(config_and_pool, db_type));
    let storage = Data::from(storage);
    let cache = Data::new(cache);
    let sessions = Data::new(SessionStore::new(
        Arc::new(TracingMailer),
        chrono::Duration::minutes(args.otp_ttl_minutes),
        chrono::Duration::hours(args.session_ttl_hours),
    ));

    let capture_enabled = args.openai_api_key.is_some();
    if !capture_enabled {
        tracing::warn!("no vision model API key, scorecard capture is disabled");
    }
    let vision: Arc<dyn VisionModel> = Arc::new(OpenAiVisionModel::new(
        args.openai_api_key.clone(),
        args.openai_model.clone(),
        args.openai_endpoint.clone(),
    ));
    let capture_service = Data::new(CaptureService::new(vision, capture_enabled));

    let static_dir = args.static_dir.clone();
    let bind = (args.bind.clone(), args.port);
    tracing::info!(address = %bind.0, port = bind.1, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(storage.clone())
            .app_data(cache.clone())
            .app_data(sessions.clone())
            .app_data(capture_service.clone())
            .route(paths::HOME, web::get().to(round::rounds_page))
            .route(paths::LOGIN, web::get().to(auth::login_page))
            .route(paths::LOGIN_SEND_OTP, web::post().to(auth::send_otp))
            .route(paths::LOGIN_VERIFY_OTP, web::post().to(auth::verify_otp))
            .route(paths::LOGOUT, web::get().to(auth::logout))
            .route(paths::AUTH_CALLBACK, web::get().to(auth::auth_callback))
            .route(paths::PLAYERS, web::get().to(player::players_page))
            .route(paths::CREATE_PLAYER, web::get().to(player::create_player_form))
            .route(paths::CREATE_PLAYER, web::post().to(player::create_player))
            .route("/players/{id}", web::get().to(player::player_page))
            .route(paths::CREATE_ROUND, web::get().to(round::create_round_form))
            .route(paths::CREATE_ROUND, web::post().to(round::create_round))
            .route(paths::CAPTURE_ROUND, web::post().to(capture::capture_round))
            .service(
                web::resource(paths::CREATE_ROUND_AI)
                    .route(web::route().to(capture::create_round_ai)),
            )
            .route(paths::HEALTH, web::get().to(HttpResponse::Ok))
            .service(Files::new("/static", static_dir.clone()))
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}

async fn init_config_and_pool(
    args: &args::CleanArgs,
) -> Result<(ConfigAndPool, DatabaseType), Box<dyn std::error::Error>> {
    if args.db_type == DatabaseType::Postgres {
        let mut postgres_config = PgConfig::new();
        postgres_config.dbname = Some(args.db_name.clone());
        postgres_config.host.clone_from(&args.db_host);
        postgres_config.port = args.db_port;
        postgres_config.user.clone_from(&args.db_user);
        postgres_config.password.clone_from(&args.db_password);

        let postgres_options = PostgresOptions::new(postgres_config);
        let pool = ConfigAndPool::new_postgres(postgres_options).await?;
        Ok((pool, DatabaseType::Postgres))
    } else {
        let sqlite_options = SqliteOptions::new(args.db_name.clone());
        match ConfigAndPool::new_sqlite(sqlite_options).await {
            Ok(pool) => Ok((pool, DatabaseType::Sqlite)),
            Err(e) => {
                tracing::error!(error = %e, db = %args.db_name, "could not open sqlite database");
                std::process::exit(1);
            }
        }
    }
}

async fn run_startup_tasks(
    args: &args::CleanArgs,
    config_and_pool: &ConfigAndPool,
    db_type: &DatabaseType,
    cache: &QueryCache,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_schema(config_and_pool, db_type).await?;

    if args.db_startup_script.is_some() {
        execute_batch_sql(config_and_pool, &args.combined_sql_script).await?;
    }

    if let Some(json_data) = &args.db_populate_json {
        let inserted = catalog_prefill::catalog_prefill(json_data, config_and_pool, db_type).await?;
        if inserted > 0 {
            cache.invalidate(&[CacheTag::Courses]).await;
        }
        tracing::info!(inserted, "course catalog loaded");
    }

    Ok(())
}
