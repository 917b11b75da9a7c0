//! Session timestamps in the export format (`4 Feb 2025, 16:21`).
//!
//! Month names depend on the locale of the exporting device, so parsing
//! tries each configured [`DateLocale`] in order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Month-name spelling used by an exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateLocale {
    /// Turkish (`Şub`, `Ağu`, ...)
    Tr,
    /// US English
    EnUs,
    /// British English (accepts `Sept`)
    EnGb,
}

impl DateLocale {
    /// Default lookup order.
    pub fn defaults() -> Vec<DateLocale> {
        vec![DateLocale::Tr, DateLocale::EnUs, DateLocale::EnGb]
    }

    /// Month names, lowercase. Each entry lists the spellings for that month.
    fn months(self) -> &'static [&'static [&'static str]; 12] {
        match self {
            DateLocale::Tr => &TR_MONTHS,
            DateLocale::EnUs => &EN_US_MONTHS,
            DateLocale::EnGb => &EN_GB_MONTHS,
        }
    }

    /// Month number (1-12) for a spelled month.
    pub fn month_number(self, name: &str) -> Option<u32> {
        let name = name.trim().trim_end_matches('.').to_lowercase();
        self.months()
            .iter()
            .position(|spellings| spellings.contains(&name.as_str()))
            .map(|i| i as u32 + 1)
    }
}

impl std::fmt::Display for DateLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateLocale::Tr => write!(f, "tr_TR"),
            DateLocale::EnUs => write!(f, "en_US"),
            DateLocale::EnGb => write!(f, "en_GB"),
        }
    }
}

const TR_MONTHS: [&[&str]; 12] = [
    &["oca", "ocak"],
    &["şub", "şubat"],
    &["mar", "mart"],
    &["nis", "nisan"],
    &["may", "mayıs"],
    &["haz", "haziran"],
    &["tem", "temmuz"],
    &["ağu", "ağustos"],
    &["eyl", "eylül"],
    &["eki", "ekim"],
    &["kas", "kasım"],
    &["ara", "aralık"],
];

const EN_US_MONTHS: [&[&str]; 12] = [
    &["jan", "january"],
    &["feb", "february"],
    &["mar", "march"],
    &["apr", "april"],
    &["may"],
    &["jun", "june"],
    &["jul", "july"],
    &["aug", "august"],
    &["sep", "september"],
    &["oct", "october"],
    &["nov", "november"],
    &["dec", "december"],
];

const EN_GB_MONTHS: [&[&str]; 12] = [
    &["jan", "january"],
    &["feb", "february"],
    &["mar", "march"],
    &["apr", "april"],
    &["may"],
    &["jun", "june"],
    &["jul", "july"],
    &["aug", "august"],
    &["sep", "sept", "september"],
    &["oct", "october"],
    &["nov", "november"],
    &["dec", "december"],
];

/// Parse `d MMM yyyy, HH:mm` trying each locale in order.
pub fn parse_workout_time(value: &str, locales: &[DateLocale]) -> Option<NaiveDateTime> {
    let (date_part, time_part) = value.trim().split_once(',')?;
    let time = NaiveTime::parse_from_str(time_part.trim(), "%H:%M").ok()?;

    let mut tokens = date_part.split_whitespace();
    let day: u32 = tokens.next()?.parse().ok()?;
    let month_name = tokens.next()?;
    let year: i32 = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }

    locales.iter().find_map(|locale| {
        let month = locale.month_number(month_name)?;
        NaiveDate::from_ymd_opt(year, month, day).map(|date| date.and_time(time))
    })
}

/// Parse a timestamp as UTC. `None` if no locale understands it.
pub fn parse_workout_time_utc(value: &str, locales: &[DateLocale]) -> Option<DateTime<Utc>> {
    parse_workout_time(value, locales).map(|naive| naive.and_utc())
}

/// Render a timestamp in the export format with English month names.
pub fn format_workout_time(time: &DateTime<Utc>) -> String {
    time.format("%-d %b %Y, %H:%M").to_string()
}
