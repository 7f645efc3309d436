use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub read_database_url: String,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_minutes: i64,
    pub jwt_issuer: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let read_database_url =
            env::var("READ_DATABASE_URL").unwrap_or_else(|_| database_url.clone());
        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let jwt_ttl_minutes = env::var("JWT_TTL_MINUTES")
            .ok()
            .and_then(|m| m.parse::<i64>().ok())
            .unwrap_or(60);
        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "commerce-api".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            database_url,
            read_database_url,
            max_connections,
            jwt_secret,
            jwt_ttl_minutes,
            jwt_issuer,
            host,
            port,
        })
    }
}
