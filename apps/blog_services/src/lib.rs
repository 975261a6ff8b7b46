use std::{path::PathBuf, sync::Arc};

use actix_multipart::form::MultipartFormConfig;
use actix_web::web::{FormConfig, QueryConfig, ServiceConfig};
use logger_libs::info_logger;
use pgsql_libs::{create_db_pool, run_migrations};
use redis_libs::redis_connect;

pub mod config_type;
pub mod error;
pub mod middlewares;
pub mod modules;
pub mod utils;

use config_type::{BlogAppConfig, Storage};
use error::BlogError;
use modules::{
    home::handler::home_config,
    memory_query::MemoryQuery,
    post::{
        handler::post_config,
        query::{PgPostQuery, PostQuery},
    },
    user::{
        handler::user_config,
        query::{PgUserQuery, UserQuery},
    },
};
use utils::session_utils::{MemorySessionStore, RedisSessionStore, SessionStore};

#[derive(Debug, Clone)]
pub struct Settings {
    pub session_secret: String,
    pub session_ttl: u64,
    pub remember_ttl: u64,
    pub secure_cookie: bool,
    pub photos_dir: PathBuf,
    pub posts_per_page: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_secret: String::from("secret_key"),
            session_ttl: 60 * 60 * 24,
            remember_ttl: 60 * 60 * 24 * 30,
            secure_cookie: false,
            photos_dir: PathBuf::from("static/photos"),
            posts_per_page: 5,
        }
    }
}

impl Settings {
    pub fn from_config(config: &BlogAppConfig) -> Self {
        Self {
            session_secret: config.session.secret.clone(),
            session_ttl: config.session.ttl,
            remember_ttl: config.session.remember_ttl,
            secure_cookie: config.session.secure_cookie,
            photos_dir: PathBuf::from(&config.apps.static_dir).join("photos"),
            posts_per_page: config.apps.posts_per_page.max(1),
        }
    }
}

pub struct AppState {
    pub users: Arc<dyn UserQuery>,
    pub posts: Arc<dyn PostQuery>,
    pub sessions: Arc<dyn SessionStore>,
    pub settings: Settings,
}

impl AppState {
    pub fn in_memory(settings: Settings) -> Self {
        let store = Arc::new(MemoryQuery::new());
        Self {
            users: store.clone(),
            posts: store,
            sessions: Arc::new(MemorySessionStore::new()),
            settings,
        }
    }

    pub async fn from_config(config: &BlogAppConfig) -> Result<Self, String> {
        let settings = Settings::from_config(config);

        match config.apps.storage {
            Storage::Memory => {
                info_logger("startup", "app_state", "memory_storage");
                Ok(Self::in_memory(settings))
            }
            Storage::Postgres => {
                let db_pool = create_db_pool(
                    config.database.url.clone(),
                    config.database.min_pool_connection,
                    config.database.max_pool_connection,
                )
                .await
                .map_err(|error| format!("database connection failed: {}", error))?;

                run_migrations(&db_pool)
                    .await
                    .map_err(|error| format!("database migration failed: {}", error))?;

                let redis_pool = redis_connect(config.redis.host.clone(), config.redis.password.clone())?;

                info_logger("startup", "app_state", "postgres_storage");
                Ok(Self {
                    users: Arc::new(PgUserQuery::new(db_pool.clone())),
                    posts: Arc::new(PgPostQuery::new(db_pool)),
                    sessions: Arc::new(RedisSessionStore::new(redis_pool)),
                    settings,
                })
            }
        }
    }
}

/// Registers every route of the blog on an `App` or `scope`.
pub fn app_config(config: &mut ServiceConfig) {
    config
        .app_data(
            FormConfig::default()
                .error_handler(|error, _req| BlogError::field("form", &error.to_string()).into()),
        )
        .app_data(QueryConfig::default().error_handler(|_error, _req| BlogError::NotFound("page").into()))
        .app_data(MultipartFormConfig::default().error_handler(|error, _req| {
            BlogError::field("picture", &format!("The upload could not be read: {}", error)).into()
        }))
        .configure(home_config)
        .configure(user_config)
        .configure(post_config);
}
