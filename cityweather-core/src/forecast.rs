//! Bucketing of 3-hour forecast entries into calendar days.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::WeatherData;

/// All forecast entries that fall on one calendar day of the city.
///
/// Only built by [`group_by_day`], which never yields a day without entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast<'a> {
    date: NaiveDate,
    entries: Vec<&'a WeatherData>,
}

impl<'a> DayForecast<'a> {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Entries of the day in input order.
    pub fn entries(&self) -> &[&'a WeatherData] {
        &self.entries
    }

    /// Entry used to summarize the day: the middle one, rounding the index down.
    pub fn representative(&self) -> &'a WeatherData {
        self.entries[self.entries.len() / 2]
    }

    /// Full weekday name, e.g. "Monday".
    pub fn weekday(&self) -> String {
        self.date.format("%A").to_string()
    }
}

/// Group entries by the date of their local observation time.
///
/// Days are returned in order of first appearance. Every input entry lands in
/// exactly one day.
pub fn group_by_day(entries: &[WeatherData]) -> Vec<DayForecast<'_>> {
    let mut days: Vec<DayForecast<'_>> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for entry in entries {
        let date = entry.local_time().date_naive();
        match index.get(&date) {
            Some(&i) => days[i].entries.push(entry),
            None => {
                index.insert(date, days.len());
                days.push(DayForecast {
                    date,
                    entries: vec![entry],
                });
            }
        }
    }

    days
}
