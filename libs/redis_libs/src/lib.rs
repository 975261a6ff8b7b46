use r2d2_redis::{r2d2::Pool, RedisConnectionManager};

pub type RedisPool = Pool<RedisConnectionManager>;

pub fn redis_connect(hostname: String, password: Option<String>) -> Result<RedisPool, String> {
    let conn_url = match password {
        Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}", pwd, hostname),
        _ => format!("redis://{}", hostname),
    };

    let manager: RedisConnectionManager = RedisConnectionManager::new(conn_url)
        .map_err(|error| format!("invalid redis url: {}", error))?;

    Pool::builder()
        .min_idle(Some(2))
        .max_size(20)
        .build(manager)
        .map_err(|error| format!("failed to create redis pool: {}", error))
}
