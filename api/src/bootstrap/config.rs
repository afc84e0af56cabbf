use std::env;

#[derive(Clone)]
pub struct Config {
    pub internal_port: u16,
    pub external_port: Option<u16>,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("internal_port", &self.internal_port)
            .field("external_port", &self.external_port)
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_name", &self.db_name)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = |key: &str| var(key).and_then(|s| s.trim().parse::<u16>().ok());

        let internal_port = port("API_INTERNAL_PORT").unwrap_or(2000);
        let external_port = port("API_EXTERNAL_PORT");
        let db_host = var("MYSQL_DB_HOST")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "localhost".into());
        let db_port = port("MYSQL_DB_INTERNAL_PORT").unwrap_or(3306);
        let db_user = var("MYSQL_DB_USER")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "root".into());
        let db_password = var("MYSQL_DB_PASSWORD").unwrap_or_default();
        let db_name = var("MYSQL_DB_NAME").filter(|s| !s.trim().is_empty());

        if db_port == 0 {
            anyhow::bail!("MYSQL_DB_INTERNAL_PORT must be greater than zero");
        }

        Ok(Self {
            internal_port,
            external_port,
            db_host,
            db_port,
            db_user,
            db_password,
            db_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_local_mysql() {
        let cfg = from_map(&[]).unwrap();
        assert_eq!(cfg.internal_port, 2000);
        assert_eq!(cfg.db_host, "localhost");
        assert_eq!(cfg.db_port, 3306);
        assert_eq!(cfg.db_user, "root");
        assert_eq!(cfg.db_password, "");
        assert!(cfg.db_name.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = from_map(&[
            ("API_INTERNAL_PORT", "4000"),
            ("API_EXTERNAL_PORT", "80"),
            ("MYSQL_DB_HOST", "db"),
            ("MYSQL_DB_INTERNAL_PORT", "3307"),
            ("MYSQL_DB_PASSWORD", "secret"),
            ("MYSQL_DB_NAME", "app"),
        ])
        .unwrap();
        assert_eq!(cfg.internal_port, 4000);
        assert_eq!(cfg.external_port, Some(80));
        assert_eq!(cfg.db_host, "db");
        assert_eq!(cfg.db_port, 3307);
        assert_eq!(cfg.db_name.as_deref(), Some("app"));
    }

    #[test]
    fn debug_output_hides_password() {
        let cfg = from_map(&[("MYSQL_DB_PASSWORD", "hunter2")]).unwrap();
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
