use chrono::{Datelike, Months, NaiveDate};

/// 解析 `YYYY-MM`，返回该月第一天与最后一天（闭区间）
pub fn parse_month(month: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (year, mon) = month.trim().split_once('-')?;
    if year.len() != 4 || mon.len() != 2 {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year.parse().ok()?, mon.parse().ok()?, 1)?;
    Some((first, last_day_of_month(first)?))
}

pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let first = date.with_day(1)?;
    first.checked_add_months(Months::new(1))?.pred_opt()
}

pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_bounds() {
        let (first, last) = parse_month("2024-02").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (_, last) = parse_month("2025-12").unwrap();
        assert_eq!(last, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_parse_month_rejects_bad_input() {
        for bad in ["2024-13", "2024-2", "24-02", "2024/02", "", "2024-00"] {
            assert!(parse_month(bad).is_none(), "{bad}");
        }
    }

    #[test]
    fn test_format_month() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();
        assert_eq!(format_month(date), "2026-03");
    }
}
