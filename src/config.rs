use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{config_error, Error};

pub struct Config {
    pub bind_addr: SocketAddr,
    pub unit_timeout: Duration,
    pub store: StoreConfig,
}

pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Spatial reference id stamped onto stored geometry.
    pub srid: i32,
    /// Name of the materialized view holding the derived shortest path.
    pub path_view: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let port: u16 = var_or("PORT", "3001")?;
        let max_connections: u32 = var_or("DB_MAX_CONNECTIONS", "5")?;
        let srid: i32 = var_or("SRID", "4326")?;
        let timeout_secs: u64 = var_or("TX_TIMEOUT_SECS", "10")?;
        let path_view =
            env::var("PATH_VIEW").unwrap_or_else(|_| "public.mv_short_path".to_string());

        Ok(Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            unit_timeout: Duration::from_secs(timeout_secs),
            store: StoreConfig {
                database_url,
                max_connections,
                srid,
                path_view,
            },
        })
    }
}

fn var_or<T>(name: &str, default: &str) -> Result<T, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Debug,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(config_error)
}
