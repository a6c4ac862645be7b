//! Wellness statistics exposed under `/oura/<stat>` and `/fitbit/<stat>`.
//!
//! Path segments parse into these enums; anything else is `None` and the
//! route answers with an empty body.

use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;

/// Oura daily summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OuraStat {
    Readiness,
    Sleep,
    Bedtime,
    Activity,
}

impl OuraStat {
    pub const ALL: [OuraStat; 4] = [
        OuraStat::Readiness,
        OuraStat::Sleep,
        OuraStat::Bedtime,
        OuraStat::Activity,
    ];

    pub fn parse(stat: &str) -> Option<Self> {
        stat.parse().ok()
    }

    /// Path of the upstream summary endpoint, relative to the API base.
    pub fn endpoint(self) -> &'static str {
        match self {
            OuraStat::Readiness => "/readiness",
            OuraStat::Sleep => "/sleep",
            OuraStat::Bedtime => "/bedtime",
            OuraStat::Activity => "/activity",
        }
    }
}

impl FromStr for OuraStat {
    type Err = UnknownStat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "readiness" => Ok(OuraStat::Readiness),
            "sleep" => Ok(OuraStat::Sleep),
            "bedtime" => Ok(OuraStat::Bedtime),
            "activity" => Ok(OuraStat::Activity),
            other => Err(UnknownStat(other.to_string())),
        }
    }
}

/// Fitbit statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitbitStat {
    Sleep,
}

impl FitbitStat {
    pub fn parse(stat: &str) -> Option<Self> {
        stat.parse().ok()
    }
}

impl FromStr for FitbitStat {
    type Err = UnknownStat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sleep" => Ok(FitbitStat::Sleep),
            other => Err(UnknownStat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stat: {0}")]
pub struct UnknownStat(pub String);

/// Optional `start`/`end` window for Oura summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Query pairs for the upstream request (omitted bounds are left out).
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start {
            pairs.push(("start", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("end", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oura_stat_parse() {
        assert_eq!(OuraStat::parse("readiness"), Some(OuraStat::Readiness));
        assert_eq!(OuraStat::parse("sleep"), Some(OuraStat::Sleep));
        assert_eq!(OuraStat::parse("bedtime"), Some(OuraStat::Bedtime));
        assert_eq!(OuraStat::parse("activity"), Some(OuraStat::Activity));
        assert_eq!(OuraStat::parse("Sleep"), None);
        assert_eq!(OuraStat::parse("heartrate"), None);
        assert_eq!(OuraStat::parse(""), None);
    }

    #[test]
    fn test_oura_endpoints_are_distinct() {
        let mut endpoints: Vec<_> = OuraStat::ALL.iter().map(|s| s.endpoint()).collect();
        endpoints.sort();
        endpoints.dedup();
        assert_eq!(endpoints.len(), OuraStat::ALL.len());
    }

    #[test]
    fn test_fitbit_stat_parse() {
        assert_eq!(FitbitStat::parse("sleep"), Some(FitbitStat::Sleep));
        assert_eq!(FitbitStat::parse("readiness"), None);
    }

    #[test]
    fn test_date_range_query_pairs() {
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2026, 1, 2),
            end: None,
        };
        assert_eq!(range.query_pairs(), vec![("start", "2026-01-02".to_string())]);
        assert!(DateRange::default().query_pairs().is_empty());
    }
}
