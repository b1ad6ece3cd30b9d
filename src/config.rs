use std::{env, path::PathBuf};

use crate::util::{DEFAULT_API_URL, DEFAULT_DATA_DIR, VAR_API_URL, VAR_DATA_DIR};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Config {
        let api_url = env::var(VAR_API_URL).unwrap_or(String::from(DEFAULT_API_URL));
        let data_dir = env::var(VAR_DATA_DIR).unwrap_or(String::from(DEFAULT_DATA_DIR));
        Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            data_dir: PathBuf::from(data_dir),
        }
    }
}
