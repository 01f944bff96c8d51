use serde::{Deserialize, Serialize};

use self::batch::BatchConfig;
use self::network::NetworkConfig;

pub mod batch;
pub mod network;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub batch: BatchConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            network: NetworkConfig::from_env(),
            batch: BatchConfig::from_env(),
        }
    }
}
