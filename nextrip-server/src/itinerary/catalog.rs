//! Built-in journey catalog.
//!
//! Used when no `JOURNEYS_FILE` is configured. The same file doubles as an
//! example of the configuration format.

use super::{ConfigError, JourneyCatalog};

const BUILTIN_JOURNEYS: &str = include_str!("../../data/journeys.json");

/// The built-in Minneapolis commute journeys.
pub fn builtin() -> Result<JourneyCatalog, ConfigError> {
    JourneyCatalog::from_json(BUILTIN_JOURNEYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let catalog = builtin().unwrap();
        let ids: Vec<&str> = catalog.journeys().iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["home_to_work", "work_to_home"]);
    }

    #[test]
    fn home_to_work_shares_destination_stop() {
        let journey = builtin().unwrap().select("home_to_work").unwrap();

        // Both transfer trips end at Government Plaza (51424).
        let plaza = journey
            .unique_stops()
            .iter()
            .filter(|s| s.as_str() == "51424")
            .count();
        assert_eq!(plaza, 1);
        assert_eq!(journey.unique_stops().len(), 9);
    }

    #[test]
    fn work_to_home_unions_routes_at_shared_stops() {
        let journey = builtin().unwrap().select("work_to_home").unwrap();
        let stops = journey.stops();

        // 18011 is the origin of both the 7 and the 22.
        let downtown = stops
            .get(&crate::domain::StopId::parse("18011").unwrap())
            .unwrap();
        assert_eq!(downtown.allowed_routes().to_string(), "22, 7");

        // 16583 is reached by the 7 directly and by the 2/7 connection.
        let home = stops
            .get(&crate::domain::StopId::parse("16583").unwrap())
            .unwrap();
        assert_eq!(home.allowed_routes().to_string(), "2, 7");
    }
}
