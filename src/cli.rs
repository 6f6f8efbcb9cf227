use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "kindergarten-rbac")]
#[command(about = "Page and button permission resolution service")]
#[command(version)]
pub struct Args {
    #[arg(long, help = "Port to listen on (overrides RBAC_API_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Disable the route cache; every request queries the database")]
    pub no_cache: bool,

    #[arg(long, help = "Seconds between route cache refreshes")]
    pub cache_refresh_secs: Option<u64>,
}

impl Args {
    /// Fold command-line flags over the environment configuration.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
        if let Some(secs) = self.cache_refresh_secs {
            config.cache.refresh_interval_secs = secs.max(1);
        }
        config
    }
}
