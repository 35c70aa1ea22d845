use crate::config::Config;
use crate::records::RecordTable;
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
    pub table: RecordTable,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            table: RecordTable::new(),
        }
    }
}
