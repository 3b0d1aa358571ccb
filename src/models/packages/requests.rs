use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::query::optional_bool;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "package.ts")]
pub struct PackageListParams {
    #[serde(default, deserialize_with = "optional_bool")]
    pub active_only: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "package.ts")]
pub struct CreatePackageRequest {
    pub name: String,
    pub instrument_id: Option<i64>,
    pub classes_count: i32,
    pub price: i64,
    pub validity_days: i32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "package.ts")]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub instrument_id: Option<i64>,
    pub classes_count: Option<i32>,
    pub price: Option<i64>,
    pub validity_days: Option<i32>,
    pub is_active: Option<bool>,
}
