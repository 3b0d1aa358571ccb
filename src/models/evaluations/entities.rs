use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 评分范围
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

// 学生阶段评估
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "evaluation.ts")]
pub struct StudentEvaluation {
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub enrollment_id: Option<i64>,
    pub evaluated_on: NaiveDate,
    pub technique: i32,
    pub theory: i32,
    pub rhythm: i32,
    pub performance: i32,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 新建评估（存储层入参）
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub student_id: i64,
    pub teacher_id: i64,
    pub enrollment_id: Option<i64>,
    pub evaluated_on: NaiveDate,
    pub technique: i32,
    pub theory: i32,
    pub rhythm: i32,
    pub performance: i32,
    pub remarks: Option<String>,
}
