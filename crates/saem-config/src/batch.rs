use std::env;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Worker-pool settings for batch downloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

impl BatchConfig {
    pub fn from_env() -> Self {
        let workers = env::var("SAEM_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&w| w > 0)
            .unwrap_or_else(default_workers);

        Self { workers }
    }
}

/// One worker per available core.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_workers_is_positive() {
        assert!(default_workers() >= 1);
        assert!(BatchConfig::default().workers >= 1);
    }
}
