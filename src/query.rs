//! Trip parameters and prompt construction
//!
//! Holds the six selection fields collected by the page, the fixed
//! enumerations backing the dropdowns, and the prompt template sent to the
//! generation API.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PlannerError, Result};

/// Horizon for the date pickers: ten years from today
const DATE_HORIZON_DAYS: i64 = 365 * 10;

/// How the user wants to travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelMode {
    #[default]
    All,
    Train,
    Bus,
    Flight,
    Car,
}

impl TravelMode {
    pub const ALL: [TravelMode; 5] = [
        TravelMode::All,
        TravelMode::Train,
        TravelMode::Bus,
        TravelMode::Flight,
        TravelMode::Car,
    ];
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TravelMode::All => "All",
            TravelMode::Train => "Train",
            TravelMode::Bus => "Bus",
            TravelMode::Flight => "Flight",
            TravelMode::Car => "Car",
        };
        write!(f, "{label}")
    }
}

/// What to optimize the recommendations for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelPreference {
    #[default]
    Budget,
    Fastest,
    #[serde(rename = "Most Comfortable")]
    MostComfortable,
}

impl TravelPreference {
    pub const ALL: [TravelPreference; 3] = [
        TravelPreference::Budget,
        TravelPreference::Fastest,
        TravelPreference::MostComfortable,
    ];
}

impl fmt::Display for TravelPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TravelPreference::Budget => "Budget",
            TravelPreference::Fastest => "Fastest",
            TravelPreference::MostComfortable => "Most Comfortable",
        };
        write!(f, "{label}")
    }
}

/// Sort key for the returned options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    Price,
    Duration,
    #[serde(rename = "Departure Time")]
    DepartureTime,
}

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::Price, SortBy::Duration, SortBy::DepartureTime];
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortBy::Price => "Price",
            SortBy::Duration => "Duration",
            SortBy::DepartureTime => "Departure Time",
        };
        write!(f, "{label}")
    }
}

/// Language the model should answer in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
    Telugu,
    Kannada,
    Marathi,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
        Language::Marathi,
    ];
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
            Language::Marathi => "Marathi",
        };
        write!(f, "{label}")
    }
}

/// Date picker bounds: today through the ten-year horizon
#[must_use]
pub fn date_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::days(DATE_HORIZON_DAYS))
}

/// All trip parameters for one search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelQuery {
    pub start_location: String,
    pub end_location: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub travel_mode: TravelMode,
    pub travel_preference: TravelPreference,
    pub sort_by: SortBy,
    pub language: Language,
}

impl TravelQuery {
    /// Check the query before any network call is made.
    ///
    /// An empty location pair is the user-correctable warning case; the date
    /// checks back up the bounds the page widgets already enforce.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.start_location.trim().is_empty() || self.end_location.trim().is_empty() {
            return Err(PlannerError::validation(
                "Please enter both starting and destination locations.",
            ));
        }

        let (min_date, max_date) = date_bounds(today);
        if self.departure_date < min_date {
            return Err(PlannerError::validation(
                "Departure date cannot be in the past.",
            ));
        }
        if self.departure_date > max_date {
            return Err(PlannerError::validation(
                "Departure date cannot be more than ten years ahead.",
            ));
        }
        if self.return_date < self.departure_date {
            return Err(PlannerError::validation(
                "Return date cannot be earlier than the departure date.",
            ));
        }

        Ok(())
    }

    /// Build the natural-language request sent to the generation API.
    ///
    /// All field values are interpolated verbatim; the template provides no
    /// escaping beyond plain string formatting.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Find and suggest the best travel options from {start} to {end} using {mode}.\n\
             \n\
             Travel dates: departing {departure}, returning {ret}.\n\
             Prioritize options based on {preference} (e.g., fastest, cheapest, most comfortable).\n\
             Sort the results by {sort} (e.g., price, duration, user ratings).\n\
             Provide the response in {language}.\n\
             Include estimated cost, duration, departure and arrival times, and available service providers.\n\
             If multiple options exist, suggest at least three alternatives with key details.\n\
             Mention any applicable discounts, offers, or special conditions if available.\n\
             Highlight the best recommendation based on the given preference.",
            start = self.start_location,
            end = self.end_location,
            mode = self.travel_mode,
            departure = self.departure_date,
            ret = self.return_date,
            preference = self.travel_preference,
            sort = self.sort_by,
            language = self.language,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_query() -> TravelQuery {
        TravelQuery {
            start_location: "Pune".to_string(),
            end_location: "Mumbai".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2026, 9, 5).unwrap(),
            travel_mode: TravelMode::Train,
            travel_preference: TravelPreference::MostComfortable,
            sort_by: SortBy::DepartureTime,
            language: Language::Marathi,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[test]
    fn test_prompt_contains_all_values_verbatim() {
        let prompt = sample_query().prompt();
        assert!(prompt.contains("from Pune to Mumbai"));
        assert!(prompt.contains("using Train"));
        assert!(prompt.contains("based on Most Comfortable"));
        assert!(prompt.contains("Sort the results by Departure Time"));
        assert!(prompt.contains("response in Marathi"));
        assert!(prompt.contains("departing 2026-09-01"));
        assert!(prompt.contains("returning 2026-09-05"));
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_query().validate(today()).is_ok());
    }

    #[rstest]
    #[case("", "Mumbai")]
    #[case("Pune", "")]
    #[case("   ", "Mumbai")]
    #[case("", "")]
    fn test_validate_rejects_empty_locations(#[case] start: &str, #[case] end: &str) {
        let mut query = sample_query();
        query.start_location = start.to_string();
        query.end_location = end.to_string();

        let err = query.validate(today()).unwrap_err();
        assert!(matches!(err, PlannerError::Validation { .. }));
        assert_eq!(
            err.user_message(),
            "Please enter both starting and destination locations."
        );
    }

    #[test]
    fn test_validate_rejects_return_before_departure() {
        let mut query = sample_query();
        query.return_date = query.departure_date - Duration::days(1);

        let err = query.validate(today()).unwrap_err();
        assert!(err.user_message().contains("Return date"));
    }

    #[test]
    fn test_validate_rejects_past_departure() {
        let mut query = sample_query();
        query.departure_date = today() - Duration::days(1);
        query.return_date = query.departure_date;

        assert!(query.validate(today()).is_err());
    }

    #[test]
    fn test_validate_rejects_departure_beyond_horizon() {
        let mut query = sample_query();
        query.departure_date = today() + Duration::days(DATE_HORIZON_DAYS + 1);
        query.return_date = query.departure_date;

        assert!(query.validate(today()).is_err());
    }

    #[test]
    fn test_date_bounds_span_ten_years() {
        let (min, max) = date_bounds(today());
        assert_eq!(min, today());
        assert_eq!(max - min, Duration::days(3650));
    }

    #[rstest]
    #[case(serde_json::json!("Most Comfortable"), TravelPreference::MostComfortable)]
    #[case(serde_json::json!("Budget"), TravelPreference::Budget)]
    fn test_preference_labels_round_trip(
        #[case] label: serde_json::Value,
        #[case] expected: TravelPreference,
    ) {
        let parsed: TravelPreference = serde_json::from_value(label.clone()).unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(serde_json::to_value(expected).unwrap(), label);
    }

    #[test]
    fn test_display_matches_page_labels() {
        assert_eq!(SortBy::DepartureTime.to_string(), "Departure Time");
        assert_eq!(TravelMode::All.to_string(), "All");
        assert_eq!(Language::Telugu.to_string(), "Telugu");
    }
}
