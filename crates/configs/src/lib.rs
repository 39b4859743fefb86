use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3001,
            worker_threads: Some(4),
            api_prefix: default_api_prefix(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Token signing and lifetime settings for the session authenticator.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default)]
    pub refresh_token_secret: String,
    /// `<n>s|m|h|d` or bare seconds.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl: String,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl: String,
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            refresh_token_secret: String::new(),
            access_token_ttl: default_access_ttl(),
            refresh_token_ttl: default_refresh_ttl(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

fn default_api_prefix() -> String { "/api/v1".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_access_ttl() -> String { "24h".into() }
fn default_refresh_ttl() -> String { "7d".into() }
fn default_argon2_memory_kib() -> u32 { 19 * 1024 }
fn default_argon2_iterations() -> u32 { 2 }
fn default_argon2_parallelism() -> u32 { 1 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

/// Longest accepted token lifetime (ten years).
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Parse a lifetime such as `24h`, `7d`, `15m`, `30s` or `3600` into seconds.
pub fn parse_ttl(raw: &str) -> Result<u64> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(anyhow!("empty duration"));
    }
    let (digits, unit) = match s.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&s[..idx], c),
        _ => (s, 's'),
    };
    let n: u64 = digits.trim().parse().map_err(|_| anyhow!("invalid duration: {raw}"))?;
    let mult = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        _ => return Err(anyhow!("unknown duration unit in {raw}")),
    };
    n.checked_mul(mult).ok_or_else(|| anyhow!("duration overflow: {raw}"))
}

impl AppConfig {
    /// Load `config.toml` if present, otherwise start from defaults; then
    /// fill from the process environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.normalize_with(|k| std::env::var(k).ok())
    }

    /// Same as [`normalize_and_validate`](Self::normalize_and_validate) with an
    /// explicit variable lookup.
    pub fn normalize_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.server.normalize(&lookup)?;
        self.database.normalize_from(&lookup);
        self.database.validate()?;
        self.auth.normalize_from(&lookup);
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) -> Result<()> {
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(prefix) = lookup("API_PREFIX") {
            self.api_prefix = prefix;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        let prefix = self.api_prefix.trim().trim_end_matches('/');
        self.api_prefix = if prefix.is_empty() || prefix.starts_with('/') {
            prefix.to_string()
        } else {
            format!("/{prefix}")
        };
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    fn normalize_from<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if self.url.trim().is_empty() {
            if let Some(url) = lookup("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthSettings {
    fn normalize_from<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if self.jwt_secret.trim().is_empty() {
            if let Some(s) = lookup("JWT_SECRET") { self.jwt_secret = s; }
        }
        if self.refresh_token_secret.trim().is_empty() {
            if let Some(s) = lookup("REFRESH_TOKEN_SECRET") { self.refresh_token_secret = s; }
        }
        if let Some(ttl) = lookup("JWT_EXPIRES_IN") { self.access_token_ttl = ttl; }
        if let Some(ttl) = lookup("REFRESH_TOKEN_EXPIRES_IN") { self.refresh_token_ttl = ttl; }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        if self.refresh_token_secret.trim().is_empty() {
            return Err(anyhow!("auth.refresh_token_secret is empty; set it in config.toml or REFRESH_TOKEN_SECRET"));
        }
        if self.access_ttl_secs()? == 0 || self.refresh_ttl_secs()? == 0 {
            return Err(anyhow!("token lifetimes must be positive"));
        }
        if self.access_ttl_secs()? > MAX_TTL_SECS || self.refresh_ttl_secs()? > MAX_TTL_SECS {
            return Err(anyhow!("token lifetimes must not exceed {MAX_TTL_SECS} seconds"));
        }
        if self.argon2_iterations == 0 || self.argon2_parallelism == 0 {
            return Err(anyhow!("argon2 iterations and parallelism must be >= 1"));
        }
        Ok(())
    }

    pub fn access_ttl_secs(&self) -> Result<u64> { parse_ttl(&self.access_token_ttl) }

    pub fn refresh_ttl_secs(&self) -> Result<u64> { parse_ttl(&self.refresh_token_ttl) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn parse_ttl_units() {
        assert_eq!(parse_ttl("24h").unwrap(), 86_400);
        assert_eq!(parse_ttl("7d").unwrap(), 604_800);
        assert_eq!(parse_ttl("15m").unwrap(), 900);
        assert_eq!(parse_ttl("30s").unwrap(), 30);
        assert_eq!(parse_ttl("3600").unwrap(), 3600);
        assert!(parse_ttl("").is_err());
        assert!(parse_ttl("5w").is_err());
        assert!(parse_ttl("h").is_err());
    }

    #[test]
    fn toml_defaults_are_filled() {
        let cfg: AppConfig = toml::from_str("[database]\nurl = \"sqlite::memory:\"\n").unwrap();
        assert_eq!(cfg.server.api_prefix, "/api/v1");
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.auth.access_token_ttl, "24h");
        assert_eq!(cfg.auth.refresh_token_ttl, "7d");
    }

    #[test]
    fn environment_fills_missing_values() {
        let mut cfg = AppConfig::default();
        cfg.normalize_with(env(&[
            ("DATABASE_URL", "postgres://localhost/hotel"),
            ("JWT_SECRET", "a"),
            ("REFRESH_TOKEN_SECRET", "b"),
            ("JWT_EXPIRES_IN", "1h"),
            ("API_PREFIX", "api"),
            ("ALLOWED_ORIGINS", "http://localhost:3000, http://localhost:5173"),
        ]))
        .unwrap();
        assert_eq!(cfg.database.url, "postgres://localhost/hotel");
        assert_eq!(cfg.auth.access_ttl_secs().unwrap(), 3600);
        assert_eq!(cfg.auth.refresh_ttl_secs().unwrap(), 604_800);
        assert_eq!(cfg.server.api_prefix, "/api");
        assert_eq!(cfg.server.allowed_origins.len(), 2);
    }

    #[test]
    fn oversized_lifetimes_are_rejected() {
        let mut cfg = AppConfig::default();
        let err = cfg
            .normalize_with(env(&[
                ("DATABASE_URL", "sqlite::memory:"),
                ("JWT_SECRET", "a"),
                ("REFRESH_TOKEN_SECRET", "b"),
                ("JWT_EXPIRES_IN", "1000000000000000000"),
            ]))
            .unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
    }

    #[test]
    fn missing_secrets_are_rejected() {
        let mut cfg = AppConfig::default();
        let err = cfg.normalize_with(env(&[("DATABASE_URL", "sqlite::memory:")])).unwrap_err();
        assert!(err.to_string().contains("jwt_secret"));
    }

    #[test]
    fn unsupported_database_scheme_is_rejected() {
        let mut cfg = AppConfig::default();
        let res = cfg.normalize_with(env(&[
            ("DATABASE_URL", "mysql://localhost/hotel"),
            ("JWT_SECRET", "a"),
            ("REFRESH_TOKEN_SECRET", "b"),
        ]));
        assert!(res.is_err());
    }
}
