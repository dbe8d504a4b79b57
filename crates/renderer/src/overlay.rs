//! Text content and styling of the greeting and clock overlays.

use chrono::NaiveDateTime;

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// White at 90% opacity.
pub const OVERLAY_COLOR: TextColor = TextColor {
    r: 255,
    g: 255,
    b: 255,
    a: 230,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels; the face is always bold sans-serif.
    pub size: f32,
    pub color: TextColor,
}

pub const WELCOME_STYLE: TextStyle = TextStyle {
    size: 50.0,
    color: OVERLAY_COLOR,
};

pub const CLOCK_STYLE: TextStyle = TextStyle {
    size: 72.0,
    color: OVERLAY_COLOR,
};

pub const DATE_STYLE: TextStyle = TextStyle {
    size: 28.0,
    color: OVERLAY_COLOR,
};

/// Distance the clock line is raised above the vertical center.
pub const CLOCK_LIFT: f32 = 300.0;
/// Distance the date line is raised above the vertical center.
pub const DATE_LIFT: f32 = 250.0;

/// Greeting shown until the welcome timer fires. A missing user name
/// renders as the empty string.
pub fn greeting(user: Option<&str>) -> String {
    format!("Bem Vindo, {}!", user.unwrap_or(""))
}

pub fn clock_text(now: &NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}

pub fn date_text(now: &NaiveDateTime) -> String {
    now.format("%A, %d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

    #[test]
    fn greeting_includes_user() {
        assert_eq!(greeting(Some("maria")), "Bem Vindo, maria!");
    }

    #[test]
    fn greeting_without_user_is_empty_name() {
        assert_eq!(greeting(None), "Bem Vindo, !");
    }

    #[test]
    fn clock_is_zero_padded_for_every_second_of_the_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        for second in 0..86_400u32 {
            let time = NaiveTime::from_num_seconds_from_midnight_opt(second, 0).unwrap();
            let now = date.and_time(time);
            let text = clock_text(&now);
            let bytes = text.as_bytes();
            assert_eq!(bytes.len(), 8, "{text}");
            assert_eq!(bytes[2], b':');
            assert_eq!(bytes[5], b':');
            for index in [0, 1, 3, 4, 6, 7] {
                assert!(bytes[index].is_ascii_digit(), "{text}");
            }
            let expected = format!(
                "{:02}:{:02}:{:02}",
                time.hour(),
                time.minute(),
                time.second()
            );
            assert_eq!(text, expected);
        }
    }

    #[test]
    fn date_weekday_matches_numeric_date() {
        let mut day = NaiveDate::from_ymd_opt(1999, 12, 25).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        for _ in 0..800 {
            let text = date_text(&day.and_time(noon));
            let parsed = NaiveDate::parse_from_str(&text, "%A, %d/%m/%Y")
                .unwrap_or_else(|err| panic!("{text}: {err}"));
            assert_eq!(parsed, day);
            assert_eq!(parsed.weekday(), day.weekday());
            day += Duration::days(1);
        }
    }

    #[test]
    fn date_uses_full_weekday_and_slashes() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(date_text(&now), "Friday, 01/03/2024");
        assert_eq!(clock_text(&now), "09:05:07");
    }
}
