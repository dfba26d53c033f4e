//! Plain-text rendering of the weather card and the forecast list.

use std::fmt::Write;

use cityweather_core::{DayForecast, WeatherData};

/// Round half away from zero, matching how temperatures are usually shown.
fn degrees(temp: f64) -> i64 {
    temp.round() as i64
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn place(weather: &WeatherData) -> String {
    if weather.country.is_empty() {
        weather.city.clone()
    } else {
        format!("{}, {}", weather.city, weather.country)
    }
}

pub fn weather_card(weather: &WeatherData) -> String {
    let mut out = String::new();
    let date = weather.local_time().format("%A, %B %-d, %Y");

    let _ = writeln!(out, "{}", place(weather));
    let _ = writeln!(out, "{date}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {}°C ({})   Feels like {}°C",
        degrees(weather.temperature_c),
        weather.temperature_band().as_str(),
        degrees(weather.feels_like_c),
    );
    let _ = writeln!(out, "  {}", capitalize(&weather.description));
    if !weather.icon.is_empty() {
        let _ = writeln!(out, "  {}", weather.icon_url());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  Humidity    {}%", weather.humidity_pct);
    let _ = write!(out, "  Wind Speed  {} m/s", weather.wind_speed_mps);

    out
}

/// Column where the detail lines under each day start.
const DETAIL_INDENT: usize = 19;

pub fn forecast_list(days: &[DayForecast<'_>]) -> String {
    let rows: Vec<String> = days
        .iter()
        .map(|day| {
            let item = day.representative();
            let mut row = format!(
                "{:<10} {:<7} {:>4}°C  {}\n{:DETAIL_INDENT$}Humidity: {}% | Wind: {} m/s",
                day.weekday(),
                day.date().format("%b %-d").to_string(),
                degrees(item.temperature_c),
                capitalize(&item.description),
                "",
                item.humidity_pct,
                item.wind_speed_mps,
            );
            if !item.icon.is_empty() {
                let _ = write!(row, "\n{:DETAIL_INDENT$}{}", "", item.icon_url());
            }
            row
        })
        .collect();

    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use cityweather_core::group_by_day;

    // 2024-03-04T12:00:00Z, a Monday.
    const NOON: i64 = 1_709_553_600;

    fn weather(ts: i64, temp: f64) -> WeatherData {
        WeatherData {
            city: "Lisbon".into(),
            country: "PT".into(),
            temperature_c: temp,
            feels_like_c: temp - 1.5,
            description: "broken clouds".into(),
            icon: "04d".into(),
            humidity_pct: 72,
            wind_speed_mps: 5.1,
            observed_at: DateTime::from_timestamp(ts, 0).expect("valid timestamp"),
            utc_offset_secs: 0,
        }
    }

    #[test]
    fn degrees_round_half_away_from_zero() {
        assert_eq!(degrees(2.5), 3);
        assert_eq!(degrees(-2.5), -3);
        assert_eq!(degrees(-0.4), 0);
    }

    #[test]
    fn capitalize_handles_empty_and_unicode() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("light rain"), "Light rain");
        assert_eq!(capitalize("éclaircies"), "Éclaircies");
    }

    #[test]
    fn card_shows_all_fields() {
        let card = weather_card(&weather(NOON, 18.6));

        assert!(card.starts_with("Lisbon, PT\nMonday, March 4, 2024\n"));
        assert!(card.contains("19°C (mild)"));
        assert!(card.contains("Feels like 17°C"));
        assert!(card.contains("Broken clouds"));
        assert!(card.contains("https://openweathermap.org/img/wn/04d@2x.png"));
        assert!(card.contains("Humidity    72%"));
        assert!(card.contains("Wind Speed  5.1 m/s"));
    }

    #[test]
    fn card_omits_missing_country_and_icon() {
        let mut w = weather(NOON, 5.0);
        w.country.clear();
        w.icon.clear();

        let card = weather_card(&w);

        assert!(card.starts_with("Lisbon\n"));
        assert!(!card.contains("openweathermap.org"));
    }

    #[test]
    fn forecast_rows_use_representative_entry() {
        let entries = vec![
            weather(NOON - 3 * 3600, 10.0),
            weather(NOON, 14.0),
            weather(NOON + 3 * 3600, 12.0),
            weather(NOON + 86_400, 20.0),
        ];
        let days = group_by_day(&entries);

        let text = forecast_list(&days);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Monday     Mar 4"));
        assert!(lines[0].contains("14°C"));
        assert!(lines[1].trim_start().starts_with("Humidity: 72% | Wind: 5.1 m/s"));
        assert_eq!(lines[2].trim_start(), "https://openweathermap.org/img/wn/04d@2x.png");
        assert!(lines[3].starts_with("Tuesday    Mar 5"));
        assert!(lines[3].contains("20°C"));
    }

    #[test]
    fn forecast_row_icon_comes_from_representative() {
        let mut entries = vec![weather(NOON - 3 * 3600, 10.0), weather(NOON, 14.0)];
        entries[0].icon = "01n".into();
        entries[1].icon = "10d".into();
        let days = group_by_day(&entries);

        let text = forecast_list(&days);

        assert!(text.contains("https://openweathermap.org/img/wn/10d@2x.png"));
        assert!(!text.contains("01n"));
    }

    #[test]
    fn forecast_row_without_icon_has_no_icon_line() {
        let mut entries = vec![weather(NOON, 14.0)];
        entries[0].icon.clear();
        let days = group_by_day(&entries);

        let text = forecast_list(&days);

        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("openweathermap.org"));
    }

    #[test]
    fn empty_forecast_renders_nothing() {
        assert_eq!(forecast_list(&[]), "");
    }
}
