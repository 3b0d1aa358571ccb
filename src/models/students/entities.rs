use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 学生状态，prospect 为潜在学员
    StudentStatus("学生状态", "student.ts") {
        Prospect => "prospect",
        Active => "active",
        Paused => "paused",
        Left => "left",
    }
}

/// metadata 中记录手工课时调整的键
pub const CREDIT_ADJUSTMENT_KEY: &str = "credit_adjustment";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: StudentStatus,
    /// 来源渠道（转介绍、广告等）
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// 手工课时调整，缺省或类型不符时为 0
    pub fn credit_adjustment(&self) -> i64 {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(CREDIT_ADJUSTMENT_KEY))
            .and_then(|v| v.as_i64())
            .unwrap_or(0)
    }
}

// 监护人
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Guardian {
    pub id: i64,
    pub student_id: i64,
    pub name: String,
    pub relation: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

// 学生文档（身份证明、报名表等）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentDocument {
    pub id: i64,
    pub student_id: i64,
    pub doc_type: String,
    pub file_name: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_by: i64,
    pub created_at: DateTime<Utc>,
}

/// 新建文档记录（存储层入参）
#[derive(Debug, Clone)]
pub struct NewStudentDocument {
    pub student_id: i64,
    pub doc_type: String,
    pub file_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub uploaded_by: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(metadata: Option<serde_json::Value>) -> Student {
        Student {
            id: 1,
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            date_of_birth: None,
            email: None,
            phone: None,
            status: StudentStatus::Active,
            source: None,
            metadata,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_credit_adjustment() {
        assert_eq!(student(None).credit_adjustment(), 0);
        assert_eq!(
            student(Some(serde_json::json!({"credit_adjustment": -2}))).credit_adjustment(),
            -2
        );
        assert_eq!(
            student(Some(serde_json::json!({"credit_adjustment": "3"}))).credit_adjustment(),
            0
        );
    }

    #[test]
    fn test_full_name() {
        assert_eq!(student(None).full_name(), "Asha Rao");
    }
}
