use std::path::PathBuf;

use serde::Deserialize;

use crate::config::Config;
use crate::dataset::Dataset;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub dataset_path: Option<PathBuf>,
    pub dataset: Option<Dataset>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            dataset_path: None,
            dataset: None,
        }
    }
}
