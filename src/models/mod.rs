//! 业务数据模型
//!
//! 每个领域按 `entities`（业务实体）、`requests`（请求参数）、`responses`（响应体）拆分。

#[macro_use]
mod macros;

pub mod attendance;
pub mod auth;
pub mod batches;
pub mod common;
pub mod enrollments;
pub mod evaluations;
pub mod finance;
pub mod instruments;
pub mod notifications;
pub mod packages;
pub mod payments;
pub mod prospects;
pub mod students;
pub mod system;
pub mod teachers;
pub mod users;

pub use common::{
    ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery,
};
pub use system::entities::AppStartTime;
