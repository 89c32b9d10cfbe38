//! Timetable leg records.
//!
//! A `LegRecord` is one scheduled point-to-point service: where it runs,
//! when, on which weekdays, and at what price. Records are validated once at
//! construction and never mutated, so the planner shares them as
//! `Arc<LegRecord>` between the flat catalog, the route index, and results.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{ClockTime, DomainError, Fare, OperatingDays, minutes_between};

/// Normalised form of a location name used for all matching.
///
/// Location names compare case-insensitively.
pub fn location_key(name: &str) -> String {
    name.to_lowercase()
}

/// True when two free-text names are equal ignoring case.
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Unvalidated leg fields, as read from a timetable source.
///
/// Convert with `LegRecord::try_from` to get a validated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLeg {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departure: ClockTime,
    pub arrival: ClockTime,
    pub carrier: String,
    pub days: OperatingDays,
    pub fare_a: Fare,
    pub fare_b: Fare,
}

/// One scheduled service between two locations.
///
/// # Invariants
///
/// - `id`, `origin`, `destination` and `carrier` are non-blank
/// - `days` is never empty
/// - Fares are non-negative (guaranteed by [`Fare`])
///
/// # Examples
///
/// ```
/// use route_planner::domain::{ClockTime, Fare, LegRecord, OperatingDays, RawLeg};
///
/// let leg = LegRecord::try_from(RawLeg {
///     id: "R1".into(),
///     origin: "Amsterdam".into(),
///     destination: "Brussels".into(),
///     departure: ClockTime::parse_hhmm("23:30").unwrap(),
///     arrival: ClockTime::parse_hhmm("01:15").unwrap(),
///     carrier: "Night".into(),
///     days: OperatingDays::parse("Fri,Sat").unwrap(),
///     fare_a: Fare::new(80.0).unwrap(),
///     fare_b: Fare::new(45.0).unwrap(),
/// })
/// .unwrap();
///
/// assert!(leg.crosses_midnight());
/// assert_eq!(leg.duration_mins(), 105);
/// assert!(leg.departs_from("amsterdam"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLeg", into = "RawLeg")]
pub struct LegRecord {
    id: String,
    origin: String,
    destination: String,
    departure: ClockTime,
    arrival: ClockTime,
    carrier: String,
    days: OperatingDays,
    fare_a: Fare,
    fare_b: Fare,
    // Cached lower-cased location names
    origin_key: String,
    destination_key: String,
}

impl TryFrom<RawLeg> for LegRecord {
    type Error = DomainError;

    fn try_from(raw: RawLeg) -> Result<Self, Self::Error> {
        let invalid = |reason| DomainError::InvalidLeg {
            id: raw.id.clone(),
            reason,
        };

        if raw.id.trim().is_empty() {
            return Err(invalid("id must not be blank"));
        }
        if raw.origin.trim().is_empty() {
            return Err(invalid("origin must not be blank"));
        }
        if raw.destination.trim().is_empty() {
            return Err(invalid("destination must not be blank"));
        }
        if same_name(&raw.origin, &raw.destination) {
            return Err(invalid("origin and destination must differ"));
        }
        if raw.carrier.trim().is_empty() {
            return Err(invalid("carrier type must not be blank"));
        }
        if raw.days.is_empty() {
            return Err(invalid("operating days must not be empty"));
        }

        Ok(LegRecord {
            origin_key: location_key(&raw.origin),
            destination_key: location_key(&raw.destination),
            id: raw.id,
            origin: raw.origin,
            destination: raw.destination,
            departure: raw.departure,
            arrival: raw.arrival,
            carrier: raw.carrier,
            days: raw.days,
            fare_a: raw.fare_a,
            fare_b: raw.fare_b,
        })
    }
}

impl From<LegRecord> for RawLeg {
    fn from(leg: LegRecord) -> Self {
        RawLeg {
            id: leg.id,
            origin: leg.origin,
            destination: leg.destination,
            departure: leg.departure,
            arrival: leg.arrival,
            carrier: leg.carrier,
            days: leg.days,
            fare_a: leg.fare_a,
            fare_b: leg.fare_b,
        }
    }
}

impl LegRecord {
    /// Returns the leg identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the departure location as given.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the arrival location as given.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Returns the lower-cased departure location.
    pub fn origin_key(&self) -> &str {
        &self.origin_key
    }

    /// Returns the lower-cased arrival location.
    pub fn destination_key(&self) -> &str {
        &self.destination_key
    }

    pub fn departure(&self) -> ClockTime {
        self.departure
    }

    pub fn arrival(&self) -> ClockTime {
        self.arrival
    }

    /// Returns the carrier type (e.g. "Express").
    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    /// Returns the weekdays this leg departs on.
    pub fn days(&self) -> OperatingDays {
        self.days
    }

    /// Returns the primary-class fare.
    pub fn fare_a(&self) -> Fare {
        self.fare_a
    }

    /// Returns the secondary-class fare.
    pub fn fare_b(&self) -> Fare {
        self.fare_b
    }

    /// Travel time in minutes, wrapping past midnight.
    pub fn duration_mins(&self) -> i64 {
        minutes_between(self.departure, self.arrival)
    }

    /// Returns the travel time.
    pub fn duration(&self) -> Duration {
        Duration::minutes(self.duration_mins())
    }

    /// True when the leg arrives on the day after it departs.
    pub fn crosses_midnight(&self) -> bool {
        self.arrival < self.departure
    }

    /// Weekdays on which this leg arrives.
    pub fn arrival_days(&self) -> OperatingDays {
        if self.crosses_midnight() {
            self.days.shifted_forward()
        } else {
            self.days
        }
    }

    /// True if the leg departs from `location` (case-insensitive).
    pub fn departs_from(&self, location: &str) -> bool {
        same_name(&self.origin, location)
    }

    /// True if the leg arrives at `location` (case-insensitive).
    pub fn arrives_at(&self, location: &str) -> bool {
        same_name(&self.destination, location)
    }

    /// True if the carrier type matches `carrier` (case-insensitive).
    pub fn has_carrier(&self, carrier: &str) -> bool {
        same_name(&self.carrier, carrier)
    }
}

impl fmt::Display for LegRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {} | Departs: {} | Arrives: {} | Carrier: {} | Operates: {}",
            self.origin, self.destination, self.departure, self.arrival, self.carrier, self.days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn raw(id: &str, from: &str, to: &str, dep: &str, arr: &str, days: &str) -> RawLeg {
        RawLeg {
            id: id.into(),
            origin: from.into(),
            destination: to.into(),
            departure: ClockTime::parse_hhmm(dep).unwrap(),
            arrival: ClockTime::parse_hhmm(arr).unwrap(),
            carrier: "Express".into(),
            days: OperatingDays::parse(days).unwrap(),
            fare_a: Fare::new(10.0).unwrap(),
            fare_b: Fare::new(5.0).unwrap(),
        }
    }

    #[test]
    fn construction_valid() {
        let leg = LegRecord::try_from(raw("R1", "Paris", "Lyon", "08:00", "10:00", "Mon-Fri"))
            .unwrap();

        assert_eq!(leg.id(), "R1");
        assert_eq!(leg.origin(), "Paris");
        assert_eq!(leg.origin_key(), "paris");
        assert_eq!(leg.destination_key(), "lyon");
        assert_eq!(leg.duration_mins(), 120);
        assert_eq!(leg.duration(), Duration::minutes(120));
        assert!(!leg.crosses_midnight());
        assert_eq!(leg.arrival_days(), leg.days());
    }

    #[test]
    fn rejects_empty_days() {
        let mut r = raw("R1", "Paris", "Lyon", "08:00", "10:00", "Daily");
        r.days = OperatingDays::EMPTY;

        let err = LegRecord::try_from(r).unwrap_err();
        assert_eq!(err, DomainError::InvalidLeg {
            id: "R1".into(),
            reason: "operating days must not be empty",
        });
    }

    #[test]
    fn rejects_blank_fields() {
        assert!(LegRecord::try_from(raw(" ", "Paris", "Lyon", "08:00", "10:00", "Daily")).is_err());
        assert!(LegRecord::try_from(raw("R1", "", "Lyon", "08:00", "10:00", "Daily")).is_err());
        assert!(LegRecord::try_from(raw("R1", "Paris", " ", "08:00", "10:00", "Daily")).is_err());

        let mut r = raw("R1", "Paris", "Lyon", "08:00", "10:00", "Daily");
        r.carrier = String::new();
        assert!(LegRecord::try_from(r).is_err());
    }

    #[test]
    fn rejects_loop_leg() {
        let err = LegRecord::try_from(raw("R1", "Paris", "PARIS", "08:00", "10:00", "Daily"))
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidLeg {
            id: "R1".into(),
            reason: "origin and destination must differ",
        });
    }

    #[test]
    fn overnight_leg() {
        let leg = LegRecord::try_from(raw("N1", "X", "Y", "23:30", "00:30", "Sat")).unwrap();

        assert!(leg.crosses_midnight());
        assert_eq!(leg.duration_mins(), 60);
        assert_eq!(leg.arrival_days(), OperatingDays::single(Weekday::Sun));
    }

    #[test]
    fn case_insensitive_matching() {
        let mut r = raw("R1", "Paris", "Lyon", "08:00", "10:00", "Daily");
        r.carrier = "Express".into();
        let leg = LegRecord::try_from(r).unwrap();

        assert!(leg.departs_from("PARIS"));
        assert!(leg.arrives_at("lyon"));
        assert!(!leg.arrives_at("Lille"));
        assert!(leg.has_carrier("express"));
    }

    #[test]
    fn display_format() {
        let leg = LegRecord::try_from(raw("R1", "Paris", "Lyon", "08:00", "10:00", "Daily")).unwrap();
        assert_eq!(
            leg.to_string(),
            "Paris to Lyon | Departs: 08:00 | Arrives: 10:00 | Carrier: Express | Operates: Daily"
        );
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let json = r#"{
            "id": "R9",
            "origin": "Berlin",
            "destination": "Hamburg",
            "departure": "06:15",
            "arrival": "08:05",
            "carrier": "Regional",
            "days": "Mon-Sat",
            "fare_a": 49.0,
            "fare_b": 29.5
        }"#;

        let leg: LegRecord = serde_json::from_str(json).unwrap();
        assert_eq!(leg.destination_key(), "hamburg");
        assert_eq!(leg.days().len(), 6);

        let back = serde_json::to_value(&leg).unwrap();
        assert_eq!(back["days"], "Mon, Tue, Wed, Thu, Fri, Sat");
        assert!(back.get("origin_key").is_none());

        let bad = json.replace("49.0", "-1.0");
        assert!(serde_json::from_str::<LegRecord>(&bad).is_err());
    }
}
