//! Service configuration with defaults matching the container deployment.

use std::path::PathBuf;

use crate::seed::SeedPaths;

/// Runtime configuration for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP listen address (host:port).
    pub listen_addr: String,

    /// MongoDB connection string.
    pub mongo_uri: String,

    /// Database holding the `clients`, `products` and `invoices` collections.
    pub database: String,

    /// Directory containing `customer.csv`, `products.csv` and `invoices.csv`.
    pub seed_dir: PathBuf,

    /// Directory served under `/static`; must contain `index.html`.
    pub static_dir: PathBuf,

    /// Use the in-memory store instead of MongoDB. Data is lost on exit.
    pub in_memory: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            mongo_uri: "mongodb://mongodb:27017/".to_string(),
            database: "gestion_clients".to_string(),
            seed_dir: PathBuf::from("CSV"),
            static_dir: PathBuf::from("static"),
            in_memory: false,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn seed_paths(&self) -> SeedPaths {
        SeedPaths::in_dir(&self.seed_dir)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    pub fn mongo_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.mongo_uri = uri.into();
        self
    }

    pub fn database(mut self, name: impl Into<String>) -> Self {
        self.config.database = name.into();
        self
    }

    pub fn seed_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.seed_dir = path.into();
        self
    }

    pub fn static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.static_dir = path.into();
        self
    }

    pub fn in_memory(mut self, enabled: bool) -> Self {
        self.config.in_memory = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
