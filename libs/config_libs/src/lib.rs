use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;
use dotenv::dotenv;
use std::fmt::Debug;

/// Loads `config_path` (any format the `config` crate knows) and lets
/// `<PREFIX>_<SECTION>__<KEY>` environment variables override it.
pub fn libs_config<T>(config_path: &str, prefix: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Debug + Default + PartialEq + Eq,
{
    dotenv().ok();

    let settings = Config::builder()
        .add_source(File::with_name(config_path).required(false))
        .add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<T>()
}
