use crate::models::attendance::entities::AttendanceStatus;
use crate::models::enrollments::entities::CreditSummary;

/// 计算课时余额
///
/// `remaining = purchased - consumed + adjustment`，允许为负。
/// present 与 absent 各消耗一节，excused 不消耗。
pub fn compute_credits<P, A>(payment_credits: P, attendance: A, adjustment: i64) -> CreditSummary
where
    P: IntoIterator<Item = i64>,
    A: IntoIterator<Item = AttendanceStatus>,
{
    let purchased: i64 = payment_credits.into_iter().sum();
    let consumed = attendance
        .into_iter()
        .filter(AttendanceStatus::consumes_credit)
        .count() as i64;

    CreditSummary {
        purchased,
        consumed,
        adjustment,
        remaining: purchased - consumed + adjustment,
    }
}

/// 是否需要发出课时不足提醒
pub fn is_low_balance(summary: &CreditSummary, threshold: i64) -> bool {
    summary.remaining <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttendanceStatus::*;

    #[test]
    fn test_remaining_is_purchased_minus_consumed_plus_adjustment() {
        let summary = compute_credits([8, 4], [Present, Absent, Excused, Present], 1);
        assert_eq!(summary.purchased, 12);
        assert_eq!(summary.consumed, 3);
        assert_eq!(summary.adjustment, 1);
        assert_eq!(summary.remaining, 10);
    }

    #[test]
    fn test_balance_may_go_negative() {
        let summary = compute_credits([], [Present, Present], 0);
        assert_eq!(summary.remaining, -2);
        assert!(is_low_balance(&summary, 0));
    }

    #[test]
    fn test_excused_only_consumes_nothing() {
        let summary = compute_credits([4], [Excused, Excused], -1);
        assert_eq!(summary.consumed, 0);
        assert_eq!(summary.remaining, 3);
        assert!(!is_low_balance(&summary, 2));
        assert!(is_low_balance(&summary, 3));
    }
}
