use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::{PaginationQuery, query::optional_bool};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct NotificationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "optional_bool")]
    pub unread_only: Option<bool>,
}
