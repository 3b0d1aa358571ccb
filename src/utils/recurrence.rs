//! 班次排课规则
//!
//! 格式为 `DAYS[ HH:MM-HH:MM]`，DAYS 为逗号分隔的 `MON`..`SUN`（不区分大小写，
//! 重复项忽略），例如 `MON,WED 17:00-18:00` 或 `sat`。

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recurrence {
    /// 按周一到周日排序，无重复
    pub days: Vec<Weekday>,
    pub time: Option<(NaiveTime, NaiveTime)>,
}

fn parse_weekday(token: &str) -> Option<Weekday> {
    match token.to_ascii_uppercase().as_str() {
        "MON" => Some(Weekday::Mon),
        "TUE" => Some(Weekday::Tue),
        "WED" => Some(Weekday::Wed),
        "THU" => Some(Weekday::Thu),
        "FRI" => Some(Weekday::Fri),
        "SAT" => Some(Weekday::Sat),
        "SUN" => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let days_part = parts
            .next()
            .ok_or_else(|| "Recurrence must list at least one weekday".to_string())?;
        let time_part = parts.next();
        if parts.next().is_some() {
            return Err(format!("Unexpected trailing text in recurrence '{s}'"));
        }

        let mut days = Vec::new();
        for token in days_part.split(',').filter(|t| !t.is_empty()) {
            let day =
                parse_weekday(token).ok_or_else(|| format!("Unknown weekday '{token}'"))?;
            if !days.contains(&day) {
                days.push(day);
            }
        }
        if days.is_empty() {
            return Err("Recurrence must list at least one weekday".to_string());
        }
        days.sort_by_key(|d| d.num_days_from_monday());

        let time = match time_part {
            None => None,
            Some(range) => {
                let (start, end) = range
                    .split_once('-')
                    .ok_or_else(|| format!("Time range '{range}' must look like HH:MM-HH:MM"))?;
                let start = NaiveTime::parse_from_str(start, "%H:%M")
                    .map_err(|_| format!("Invalid start time '{start}'"))?;
                let end = NaiveTime::parse_from_str(end, "%H:%M")
                    .map_err(|_| format!("Invalid end time '{end}'"))?;
                if end <= start {
                    return Err("End time must be after start time".to_string());
                }
                Some((start, end))
            }
        };

        Ok(Self { days, time })
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<&str> = self.days.iter().map(|d| weekday_code(*d)).collect();
        write!(f, "{}", days.join(","))?;
        if let Some((start, end)) = self.time {
            write!(f, " {}-{}", start.format("%H:%M"), end.format("%H:%M"))?;
        }
        Ok(())
    }
}

impl Recurrence {
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.days.contains(&date.weekday())
    }

    /// 闭区间 [from, to] 内的上课次数
    pub fn count_between(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        from.iter_days()
            .take_while(|d| *d <= to)
            .filter(|d| self.occurs_on(*d))
            .count() as i64
    }
}

/// 校验并返回规范化后的排课字符串
pub fn normalize_recurrence(input: &str) -> Result<String, String> {
    input.parse::<Recurrence>().map(|r| r.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_with_time() {
        let r: Recurrence = "wed,MON,mon 17:00-18:30".parse().unwrap();
        assert_eq!(r.days, vec![Weekday::Mon, Weekday::Wed]);
        assert_eq!(r.to_string(), "MON,WED 17:00-18:30");
    }

    #[test]
    fn test_parse_days_only() {
        let r: Recurrence = "sat".parse().unwrap();
        assert_eq!(r.days, vec![Weekday::Sat]);
        assert!(r.time.is_none());
        assert_eq!(r.to_string(), "SAT");
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Recurrence>().is_err());
        assert!("FUNDAY".parse::<Recurrence>().is_err());
        assert!("MON 18:00-17:00".parse::<Recurrence>().is_err());
        assert!("MON 1700-1800".parse::<Recurrence>().is_err());
        assert!("MON 17:00-18:00 extra".parse::<Recurrence>().is_err());
    }

    #[test]
    fn test_count_matching_weekdays_in_month() {
        // 2024-09 起始于周日，共 5 个周一、4 个周三
        let r: Recurrence = "MON,WED".parse().unwrap();
        assert_eq!(r.count_between(date(2024, 9, 1), date(2024, 9, 30)), 9);

        let sat: Recurrence = "SAT".parse().unwrap();
        assert_eq!(sat.count_between(date(2024, 2, 1), date(2024, 2, 29)), 4);
        assert!(sat.occurs_on(date(2024, 2, 3)));
    }
}
