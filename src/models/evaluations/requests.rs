use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{MAX_SCORE, MIN_SCORE};

// teacher_id 仅管理员代为录入时需要，教师账号使用自己关联的档案
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct CreateEvaluationRequest {
    pub teacher_id: Option<i64>,
    pub enrollment_id: Option<i64>,
    pub evaluated_on: Option<NaiveDate>,
    pub technique: i32,
    pub theory: i32,
    pub rhythm: i32,
    pub performance: i32,
    pub remarks: Option<String>,
}

impl CreateEvaluationRequest {
    pub fn scores_valid(&self) -> bool {
        [self.technique, self.theory, self.rhythm, self.performance]
            .iter()
            .all(|s| (MIN_SCORE..=MAX_SCORE).contains(s))
    }
}
