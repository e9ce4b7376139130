use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const DATA_DIR_NAME: &str = ".drinklog";
pub const RECORDS_KEY: &str = "drink_records_2026";
pub const SHOPS_KEY: &str = "drink_shops_2026";

/// Where the two persisted collections live.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub records_key: String,
    pub shops_key: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            records_key: RECORDS_KEY.to_string(),
            shops_key: SHOPS_KEY.to_string(),
        }
    }

    /// Uses `data_dir` when given, otherwise `~/.drinklog`.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match data_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir()
                    .ok_or_else(|| anyhow!("Could not determine home directory"))?;
                home_dir.join(DATA_DIR_NAME)
            }
        };
        Ok(Self::new(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/drinks"))).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/drinks"));
        assert_eq!(config.records_key, RECORDS_KEY);
        assert_eq!(config.shops_key, SHOPS_KEY);
    }
}
