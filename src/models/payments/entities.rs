use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    PaymentMethod("支付方式", "payment.ts") {
        Cash => "cash",
        Card => "card",
        Upi => "upi",
        BankTransfer => "bank_transfer",
        Other => "other",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "payment.ts")]
pub struct Payment {
    pub id: i64,
    pub student_id: i64,
    pub enrollment_id: Option<i64>,
    pub package_id: Option<i64>,
    pub amount: i64,
    /// 购买的课时数
    pub credits: i32,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: i64,
    pub created_at: DateTime<Utc>,
}

/// 新建收款（存储层入参，课时数已确定）
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub student_id: i64,
    pub enrollment_id: Option<i64>,
    pub package_id: Option<i64>,
    pub amount: i64,
    pub credits: i32,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: i64,
}
