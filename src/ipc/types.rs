use crate::config::Config;
use crate::workbook::LoadedWorkbook;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub workbook: Option<LoadedWorkbook>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            workbook: None,
        }
    }
}
