use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    /// 教师结算方式
    PayoutType("结算方式", "teacher.ts") {
        PerClass => "per_class",         // 按课时
        FixedMonthly => "fixed_monthly", // 固定月薪
    }
}

define_string_enum! {
    TeacherStatus("教师状态", "teacher.ts") {
        Active => "active",
        Inactive => "inactive",
    }
}

define_string_enum! {
    /// 教师出勤状态，present 与 substituted 计入实际课时
    TeacherAttendanceStatus("教师出勤状态", "teacher.ts") {
        Present => "present",
        Absent => "absent",
        Substituted => "substituted",
    }
}

impl TeacherAttendanceStatus {
    pub fn counts_as_session(&self) -> bool {
        matches!(self, Self::Present | Self::Substituted)
    }
}

define_string_enum! {
    PayoutStatus("结算状态", "teacher.ts") {
        Pending => "pending",
        Paid => "paid",
    }
}

// 教师档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub payout_type: PayoutType,
    /// 课时费或月薪（最小货币单位）
    pub rate: i64,
    pub status: TeacherStatus,
    pub joined_on: Option<NaiveDate>,
    pub notes: Option<String>,
    /// 关联的登录账号
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 教师出勤
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherAttendance {
    pub id: i64,
    pub teacher_id: i64,
    pub batch_id: i64,
    pub date: NaiveDate,
    pub status: TeacherAttendanceStatus,
    pub marked_by: i64,
    pub created_at: DateTime<Utc>,
}

// 教师月度结算
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "teacher.ts")]
pub struct TeacherPayout {
    pub id: i64,
    pub teacher_id: i64,
    /// YYYY-MM
    pub period: String,
    pub sessions: i32,
    pub amount: i64,
    pub status: PayoutStatus,
    pub paid_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
