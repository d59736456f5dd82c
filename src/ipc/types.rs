use serde::Deserialize;

use crate::config::Config;
use crate::group::GroupSelector;
use crate::ledger::Ledger;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub ledger: Ledger,
    pub groups: GroupSelector,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> Self {
        let ledger = if cfg.seed_blank_student {
            Ledger::with_blank_student(cfg.scheme)
        } else {
            Ledger::new(cfg.scheme)
        };
        Self {
            ledger,
            groups: GroupSelector::new(cfg.default_group),
        }
    }
}
