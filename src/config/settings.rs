// src/config/settings.rs

use std::env;

use anyhow::{bail, Context};

/// Onde as vendas ficam guardadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Só para desenvolvimento: some quando o processo termina.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub delete_password: String,
    pub server_addr: String,
}

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";

impl Settings {
    /// Lê o `.env` (se existir) e as variáveis de ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let store_backend = match lookup("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("STORE_BACKEND desconhecido: {other} (use postgres ou memory)"),
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL deve ser definida quando STORE_BACKEND=postgres");
        }

        let delete_password = lookup("DELETE_PASSWORD")
            .filter(|p| !p.is_empty())
            .context("DELETE_PASSWORD deve ser definida")?;

        let server_addr = lookup("SERVER_ADDR")
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());

        Ok(Self {
            store_backend,
            database_url,
            delete_password,
            server_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        let s = settings(&[("STORE_BACKEND", "memory"), ("DELETE_PASSWORD", "x")]).unwrap();
        assert_eq!(s.store_backend, StoreBackend::Memory);
        assert_eq!(s.server_addr, "0.0.0.0:3000");
        assert!(s.database_url.is_none());
    }

    #[test]
    fn test_postgres_is_default_and_requires_url() {
        assert!(settings(&[("DELETE_PASSWORD", "x")]).is_err());

        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/vendas"),
            ("DELETE_PASSWORD", "x"),
            ("SERVER_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();
        assert_eq!(s.store_backend, StoreBackend::Postgres);
        assert_eq!(s.server_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_missing_password_or_unknown_backend_fail() {
        assert!(settings(&[("STORE_BACKEND", "memory")]).is_err());
        assert!(settings(&[("STORE_BACKEND", "redis"), ("DELETE_PASSWORD", "x")]).is_err());
    }
}
