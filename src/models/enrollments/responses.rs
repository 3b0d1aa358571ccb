use serde::Serialize;
use ts_rs::TS;

use super::entities::{CreditSummary, Enrollment};
use crate::models::batches::entities::Batch;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentDetailResponse {
    pub enrollment: Enrollment,
    pub batches: Vec<Batch>,
    pub credits: CreditSummary,
}
