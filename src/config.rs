//! Runtime Configuration
//!
//! Resolved from built-in defaults, then `CATALOG_BIND` / `CATALOG_DB` /
//! `CATALOG_POOL_SIZE`, then the `--bind` / `--db` / `--pool-size` command-line flags.

use crate::store::DEFAULT_POOL_SIZE;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_DB: &str = "catalog.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database: PathBuf,
    /// Number of store connections serving requests concurrently.
    pub pool_size: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::resolve(
            std::env::var("CATALOG_BIND").ok(),
            std::env::var("CATALOG_DB").ok(),
            std::env::var("CATALOG_POOL_SIZE").ok(),
            std::env::args().skip(1),
        )
    }

    /// Applies `args` (without the program name) on top of the environment values.
    pub fn resolve(
        env_bind: Option<String>,
        env_db: Option<String>,
        env_pool_size: Option<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        let mut bind = env_bind.unwrap_or_else(|| DEFAULT_BIND.to_string());
        let mut database = env_db.unwrap_or_else(|| DEFAULT_DB.to_string());
        let mut pool_size = env_pool_size;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bind" => {
                    bind = args.next().context("--bind requires <addr:port>")?;
                }
                "--db" => {
                    database = args.next().context("--db requires <path>")?;
                }
                "--pool-size" => {
                    pool_size = Some(args.next().context("--pool-size requires <count>")?);
                }
                other => {
                    tracing::warn!("Ignoring unknown argument {}", other);
                }
            }
        }

        let bind_addr = bind
            .parse()
            .with_context(|| format!("Invalid bind address {}", bind))?;

        let pool_size = match pool_size {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(size) if size >= 1 => size,
                _ => anyhow::bail!("Invalid pool size {} (expected a positive integer)", raw),
            },
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            bind_addr,
            database: PathBuf::from(database),
            pool_size,
        })
    }
}
