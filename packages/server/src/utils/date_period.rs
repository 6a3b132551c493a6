use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;

/// An attendance slot reference of the form `YYYY-MM-DD_PERIOD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatePeriod {
    pub date: NaiveDate,
    pub period: String,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DatePeriodError {
    #[error("'{0}' must look like YYYY-MM-DD_PERIOD")]
    MissingSeparator(String),
    #[error("'{0}' does not start with a valid YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("'{0}' has an empty period")]
    EmptyPeriod(String),
}

impl FromStr for DatePeriod {
    type Err = DatePeriodError;

    /// Splits on the first `_`, so periods may themselves contain underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let (date, period) = raw
            .split_once('_')
            .ok_or_else(|| DatePeriodError::MissingSeparator(raw.to_string()))?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| DatePeriodError::InvalidDate(raw.to_string()))?;
        let period = period.trim();
        if period.is_empty() {
            return Err(DatePeriodError::EmptyPeriod(raw.to_string()));
        }
        Ok(Self {
            date,
            period: period.to_string(),
        })
    }
}

/// Parse every entry, dropping repeats while keeping first-seen order.
pub fn parse_date_periods<S: AsRef<str>>(items: &[S]) -> Result<Vec<DatePeriod>, DatePeriodError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let dp: DatePeriod = item.as_ref().parse()?;
        if seen.insert(dp.clone()) {
            out.push(dp);
        }
    }
    Ok(out)
}
