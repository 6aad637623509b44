//! Transaction Record Module
//! One row of a source table plus its categorical codes.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Season code as stored in the rental tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Season::Spring),
            2 => Some(Season::Summer),
            3 => Some(Season::Fall),
            4 => Some(Season::Winter),
            _ => None,
        }
    }

    /// Parse either the numeric code or the English name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(code) = raw.parse::<i64>() {
            return Self::from_code(code);
        }
        match raw.to_ascii_lowercase().as_str() {
            "spring" | "springer" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" | "autumn" => Some(Season::Fall),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weather situation, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum WeatherSituation {
    Clear,
    Mist,
    LightPrecipitation,
    HeavyPrecipitation,
}

impl WeatherSituation {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(WeatherSituation::Clear),
            2 => Some(WeatherSituation::Mist),
            3 => Some(WeatherSituation::LightPrecipitation),
            4 => Some(WeatherSituation::HeavyPrecipitation),
            _ => None,
        }
    }

    /// Parse either the numeric code or a descriptive name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(code) = raw.parse::<i64>() {
            return Self::from_code(code);
        }
        match raw.to_ascii_lowercase().as_str() {
            "clear" => Some(WeatherSituation::Clear),
            "mist" | "misty" | "cloudy" => Some(WeatherSituation::Mist),
            "light rain" | "light snow" | "light rain/snow" => {
                Some(WeatherSituation::LightPrecipitation)
            }
            "heavy rain" | "heavy snow" | "heavy rain/snow" => {
                Some(WeatherSituation::HeavyPrecipitation)
            }
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            WeatherSituation::Clear => 1,
            WeatherSituation::Mist => 2,
            WeatherSituation::LightPrecipitation => 3,
            WeatherSituation::HeavyPrecipitation => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeatherSituation::Clear => "Clear",
            WeatherSituation::Mist => "Mist",
            WeatherSituation::LightPrecipitation => "Light Rain/Snow",
            WeatherSituation::HeavyPrecipitation => "Heavy Rain/Snow",
        }
    }
}

impl fmt::Display for WeatherSituation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single day of rental transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub count: u64,
    pub casual_count: u64,
    pub registered_count: u64,
    pub season: Season,
    pub weather_situation: WeatherSituation,
}

impl TransactionRecord {
    /// Build a record whose `count` is the sum of both customer types.
    pub fn new(
        date: NaiveDate,
        casual_count: u64,
        registered_count: u64,
        season: Season,
        weather_situation: WeatherSituation,
    ) -> Self {
        Self {
            date,
            count: casual_count + registered_count,
            casual_count,
            registered_count,
            season,
            weather_situation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_parse_codes_and_names() {
        assert_eq!(Season::parse("1"), Some(Season::Spring));
        assert_eq!(Season::parse(" 4 "), Some(Season::Winter));
        assert_eq!(Season::parse("Fall"), Some(Season::Fall));
        assert_eq!(Season::parse("springer"), Some(Season::Spring));
        assert_eq!(Season::parse("5"), None);
        assert_eq!(Season::parse("monsoon"), None);
    }

    #[test]
    fn test_weather_is_ordered_by_severity() {
        assert!(WeatherSituation::Clear < WeatherSituation::Mist);
        assert!(WeatherSituation::Mist < WeatherSituation::HeavyPrecipitation);
        assert_eq!(WeatherSituation::parse("3"), Some(WeatherSituation::LightPrecipitation));
        assert_eq!(WeatherSituation::parse("0"), None);
    }

    #[test]
    fn test_record_count_is_split_sum() {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let record = TransactionRecord::new(date, 331, 654, Season::Spring, WeatherSituation::Mist);
        assert_eq!(record.count, 985);
    }
}
