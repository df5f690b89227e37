// src/records/title.rs

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})(?:\s+(\p{L}+))?").expect("date regex")
});
static WEEK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bwoche\s+([^\s,]+)").expect("week regex"));

/// What the plan title says about its day, e.g. `20.10.2026 Dienstag, Woche B`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDay {
    pub date: Option<NaiveDate>,
    pub weekday: Option<String>,
    pub week: Option<String>,
}

impl PlanDay {
    pub fn parse(title: &str) -> Self {
        let mut day = PlanDay::default();

        if let Some(caps) = DATE_RE.captures(title) {
            let d = caps[1].parse().ok();
            let m = caps[2].parse().ok();
            let y = caps[3].parse().ok();
            if let (Some(d), Some(m), Some(y)) = (d, m, y) {
                day.date = NaiveDate::from_ymd_opt(y, m, d);
            }
            day.weekday = caps.get(4).map(|w| w.as_str().to_string());
        }
        day.week = WEEK_RE.captures(title).map(|c| c[1].to_string());
        day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_title() {
        let day = PlanDay::parse("20.10.2026 Dienstag, Woche B");
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert_eq!(day.weekday.as_deref(), Some("Dienstag"));
        assert_eq!(day.week.as_deref(), Some("B"));
    }

    #[test]
    fn date_only() {
        let day = PlanDay::parse("3.2.2027");
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2027, 2, 3));
        assert_eq!(day.weekday, None);
        assert_eq!(day.week, None);
    }

    #[test]
    fn impossible_date_is_dropped() {
        let day = PlanDay::parse("31.02.2026 Freitag");
        assert_eq!(day.date, None);
        assert_eq!(day.weekday.as_deref(), Some("Freitag"));
    }

    #[test]
    fn empty_title() {
        assert_eq!(PlanDay::parse(""), PlanDay::default());
    }
}
