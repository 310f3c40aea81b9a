use std::net::SocketAddr;

use anyhow::Context;

use crate::catalog::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub site_url: String,
    pub image_base_url: String,
    pub page_size: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://martialmovies.db?mode=rwc".to_string());

        let database_max_connections: u32 = parse_or("DATABASE_MAX_CONNECTIONS", 5)?;

        let site_url = std::env::var("SITE_URL")
            .unwrap_or_else(|_| "https://martialmovies.com".to_string())
            .trim_end_matches('/')
            .to_string();

        let image_base_url = std::env::var("IMAGE_BASE_URL")
            .unwrap_or_else(|_| "https://image.tmdb.org/t/p".to_string())
            .trim_end_matches('/')
            .to_string();

        let page_size: u64 = parse_or("PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        anyhow::ensure!(page_size > 0, "PAGE_SIZE must be at least 1");

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            database_max_connections,
            site_url,
            image_base_url,
            page_size,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().with_context(|| key.to_string()),
        Err(_) => Ok(default),
    }
}
