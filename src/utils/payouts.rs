use chrono::NaiveDate;

use crate::models::teachers::entities::{PayoutType, TeacherAttendanceStatus};
use crate::utils::recurrence::Recurrence;

/// 计划课时：各班次在 [first, last] 内的上课日数之和
pub fn scheduled_sessions(recurrences: &[Recurrence], first: NaiveDate, last: NaiveDate) -> i64 {
    recurrences
        .iter()
        .map(|r| r.count_between(first, last))
        .sum()
}

/// 实际课时：present 与 substituted 的出勤记录数
pub fn delivered_sessions<I>(attendance: I) -> i64
where
    I: IntoIterator<Item = TeacherAttendanceStatus>,
{
    attendance
        .into_iter()
        .filter(TeacherAttendanceStatus::counts_as_session)
        .count() as i64
}

/// 结算金额：按课时计费为 课时 × 单价，固定月薪与课时无关。溢出时返回 None
pub fn payout_amount(payout_type: PayoutType, rate: i64, sessions: i64) -> Option<i64> {
    match payout_type {
        PayoutType::PerClass => sessions.checked_mul(rate),
        PayoutType::FixedMonthly => Some(rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TeacherAttendanceStatus::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_projection_counts_matching_weekdays() {
        let batches: Vec<Recurrence> = ["MON,WED 17:00-18:00", "MON"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        // 2024-09: 5 个周一、4 个周三
        let sessions = scheduled_sessions(&batches, date(2024, 9, 1), date(2024, 9, 30));
        assert_eq!(sessions, 9 + 5);
        assert_eq!(payout_amount(PayoutType::PerClass, 500, sessions), Some(7000));
    }

    #[test]
    fn test_fixed_monthly_ignores_sessions() {
        assert_eq!(payout_amount(PayoutType::FixedMonthly, 30000, 0), Some(30000));
        assert_eq!(payout_amount(PayoutType::FixedMonthly, 30000, 40), Some(30000));
    }

    #[test]
    fn test_per_class_overflow_is_none() {
        assert_eq!(payout_amount(PayoutType::PerClass, i64::MAX / 2 + 1, 2), None);
        assert_eq!(
            payout_amount(PayoutType::FixedMonthly, i64::MAX, 2),
            Some(i64::MAX)
        );
    }

    #[test]
    fn test_delivered_sessions() {
        assert_eq!(delivered_sessions([Present, Absent, Substituted, Present]), 3);
        assert_eq!(delivered_sessions([]), 0);
    }
}
