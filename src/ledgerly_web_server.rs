use crate::core::config::LogoStorageConfig;
use crate::core::{AppConfig, LogoStorage};
use crate::db::seed;
use crate::routes::ledgerly_routes;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{dev::Server, web::Data, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct LedgerlyWebServer {
    port: u16,
    server: Server,
}

impl LedgerlyWebServer {
    pub async fn build(configuration: AppConfig) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.ledgerly_server_config.host, configuration.ledgerly_server_config.port
        );

        let pg_pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect_lazy_with(configuration.postgres.connect());

        if configuration.postgres.migrate_on_startup {
            sqlx::migrate!("./migrations").run(&pg_pool).await?;
        }

        if configuration.postgres.seed_on_startup {
            seed::seed_database(&pg_pool)
                .await
                .map_err(|e| anyhow::anyhow!("database seeding failed: {}", e.message()))?;
        }

        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr().unwrap().port();

        let server = run(listener, pg_pool, configuration.storage).await?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub async fn run(
    listener: TcpListener,
    pg_pool: PgPool,
    storage_config: LogoStorageConfig,
) -> Result<Server, anyhow::Error> {
    // The static-files mount needs the directory to exist before the first
    // upload creates it.
    std::fs::create_dir_all(std::path::Path::new(&storage_config.root_dir).join("logos"))?;

    let pg_pool = Data::new(pg_pool);
    let logo_storage = Data::new(LogoStorage::new(&storage_config));

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
            ])
            .supports_credentials();
        App::new()
            .configure(ledgerly_routes)
            .app_data(pg_pool.clone())
            .app_data(logo_storage.clone())
            .wrap(TracingLogger::default())
            .wrap(cors)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
