use serde::Deserialize;

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Database{
    pub url: String,
    pub min_pool_connection: u32,
    pub max_pool_connection: u32
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Storage{
    #[default]
    Postgres,
    Memory
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Apps{
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub storage: Storage,
    pub static_dir: String,
    pub posts_per_page: i64
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Redis{
    pub host: String,
    #[serde(default)]
    pub password: Option<String>
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Session{
    pub secret: String,
    pub ttl: u64,
    pub remember_ttl: u64,
    #[serde(default)]
    pub secure_cookie: bool
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Logger{
    pub log: String
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
pub struct BlogAppConfig{
    pub apps: Apps,
    pub database: Database,
    pub redis: Redis,
    pub session: Session,
    pub logger: Logger
}
