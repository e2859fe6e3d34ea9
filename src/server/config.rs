//! Server CLI and configuration.

use clap::Parser;

use crate::config::{Config, FileStorageConfig, StorageConfig};

/// Command-line arguments for the fleet server.
#[derive(Debug, Parser)]
#[command(name = "fleet", about = "Fleet tracking HTTP/WebSocket server")]
pub struct CliArgs {
    /// Port to listen on.
    #[arg(long, env = "FLEET_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Path to the data file.
    #[arg(long, env = "FLEET_DB_PATH", default_value = "fleet.db")]
    pub db_path: String,

    /// Keep all reports in memory only (no persistence).
    #[arg(long, env = "FLEET_IN_MEMORY")]
    pub in_memory: bool,
}

impl CliArgs {
    /// Builds the store configuration from the arguments.
    pub fn to_store_config(&self) -> Config {
        let storage = if self.in_memory {
            StorageConfig::InMemory
        } else {
            StorageConfig::File(FileStorageConfig {
                path: self.db_path.clone(),
            })
        };
        Config { storage }
    }
}

/// Configuration for the HTTP server itself.
#[derive(Debug, Clone)]
pub struct FleetServerConfig {
    pub port: u16,
}

impl From<&CliArgs> for FleetServerConfig {
    fn from(args: &CliArgs) -> Self {
        Self { port: args.port }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_file_storage() {
        // given
        let args = CliArgs::parse_from(["fleet"]);

        // when
        let config = args.to_store_config();

        // then
        assert_eq!(
            config.storage,
            StorageConfig::File(FileStorageConfig {
                path: "fleet.db".to_string()
            })
        );
    }

    #[test]
    fn should_select_in_memory_storage() {
        // given
        let args = CliArgs::parse_from(["fleet", "--in-memory"]);

        // when
        let config = args.to_store_config();

        // then
        assert_eq!(config.storage, StorageConfig::InMemory);
    }

    #[test]
    fn should_parse_port() {
        // given / when
        let args = CliArgs::parse_from(["fleet", "--port", "9001"]);

        // then
        assert_eq!(FleetServerConfig::from(&args).port, 9001);
    }
}
