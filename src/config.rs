use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub mongo: MongoConfig,
    pub host: String,
    pub port: u16,
    /// The single origin allowed to call the API with credentials.
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo = MongoConfig {
            uri: lookup("MONGODB_URI").unwrap_or_else(|| "mongodb://localhost:27017/".into()),
            database: lookup("MONGODB_DATABASE").unwrap_or_else(|| "MyBlog".into()),
        };
        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("APP_PORT must be a port number, got {raw:?}"))?,
            None => 8000,
        };
        Ok(Self {
            mongo,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".into()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
