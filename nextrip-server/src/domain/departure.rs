//! Departures and per-stop departure boards.

use std::sync::Arc;

use serde::Serialize;

use super::{EpochMillis, RouteId, RouteSet};

/// One upcoming vehicle departure at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Departure {
    /// Route the vehicle is running on.
    pub route: RouteId,
    /// Human-readable countdown or clock time, as shown on the board ("5 Min", "10:42").
    pub text: String,
    /// Departure time.
    pub time: EpochMillis,
    /// True if the time comes from GPS tracking rather than the schedule.
    pub actual: bool,
}

impl Departure {
    /// Creates a new departure.
    pub fn new(route: RouteId, text: impl Into<String>, time: EpochMillis, actual: bool) -> Self {
        Self {
            route,
            text: text.into(),
            time,
            actual,
        }
    }
}

/// The departures at one stop from a single poll.
///
/// Departures are kept in the order the upstream returned them, which is
/// ascending by time; the order is not re-verified. A board is immutable and
/// cheap to clone: a refresh replaces it wholesale rather than merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartureBoard {
    departures: Arc<[Departure]>,
}

impl DepartureBoard {
    /// Creates a board from departures in upstream order.
    pub fn new(departures: Vec<Departure>) -> Self {
        Self {
            departures: departures.into(),
        }
    }

    /// An empty board.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All departures, in upstream order.
    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    /// Number of departures on the board.
    pub fn len(&self) -> usize {
        self.departures.len()
    }

    /// Returns true if the board has no departures.
    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    /// Iterate the departures whose route is in `routes`, preserving order.
    pub fn on_routes<'a, 'r>(
        &'a self,
        routes: &'r RouteSet,
    ) -> impl Iterator<Item = &'a Departure> + use<'a, 'r> {
        self.departures.iter().filter(move |d| routes.contains(&d.route))
    }

    /// Returns a new board holding only departures on `routes`.
    ///
    /// Relative order is preserved. Returns an empty board if nothing
    /// matches.
    pub fn filter_routes(&self, routes: &RouteSet) -> DepartureBoard {
        DepartureBoard::new(self.on_routes(routes).cloned().collect())
    }

    /// The earliest departure on `routes`, if any.
    pub fn next_on(&self, routes: &RouteSet) -> Option<&Departure> {
        self.on_routes(routes).next()
    }

    /// The first departure on `routes` strictly after `after`.
    ///
    /// Never falls back to an earlier departure.
    pub fn next_on_after(&self, routes: &RouteSet, after: EpochMillis) -> Option<&Departure> {
        self.on_routes(routes).find(|d| d.time > after)
    }
}

/// A board together with the time it left upstream.
///
/// A cached board keeps the time of the request that produced it, so
/// estimates built from it are never reported as newer than the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBoard {
    pub board: DepartureBoard,
    pub fetched_at: EpochMillis,
}

impl FetchedBoard {
    /// Pairs `board` with the time it was fetched.
    pub fn new(board: DepartureBoard, fetched_at: EpochMillis) -> Self {
        Self { board, fetched_at }
    }

    /// Stamps a board that was fetched just now.
    pub fn now(board: DepartureBoard) -> Self {
        Self::new(board, EpochMillis::now())
    }
}

impl FromIterator<Departure> for DepartureBoard {
    fn from_iter<I: IntoIterator<Item = Departure>>(iter: I) -> Self {
        DepartureBoard::new(iter.into_iter().collect())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const ROUTES: [&str; 4] = ["2", "7", "67", "Blue"];

    prop_compose! {
        fn departure()(route in 0usize..ROUTES.len(), ms in 0i64..10_000) -> Departure {
            Departure::new(RouteId::parse(ROUTES[route]).unwrap(), "", EpochMillis::new(ms), false)
        }
    }

    prop_compose! {
        fn sorted_board()(mut deps in proptest::collection::vec(departure(), 0..20)) -> DepartureBoard {
            deps.sort_by_key(|d| d.time);
            DepartureBoard::new(deps)
        }
    }

    prop_compose! {
        fn route_set()(mask in 0u8..16) -> RouteSet {
            ROUTES
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, r)| RouteId::parse(r).unwrap())
                .collect()
        }
    }

    proptest! {
        /// Every filtered departure is on a permitted route
        #[test]
        fn filter_only_permitted(board in sorted_board(), set in route_set()) {
            for d in board.filter_routes(&set).departures() {
                prop_assert!(set.contains(&d.route));
            }
        }

        /// Filtering is a stable subsequence of the original board
        #[test]
        fn filter_is_stable_subsequence(board in sorted_board(), set in route_set()) {
            let filtered = board.filter_routes(&set);
            let expected: Vec<&Departure> = board
                .departures()
                .iter()
                .filter(|d| set.contains(&d.route))
                .collect();
            let actual: Vec<&Departure> = filtered.departures().iter().collect();
            prop_assert_eq!(actual, expected);
        }

        /// The result is after `t` and nothing permitted lies strictly between
        #[test]
        fn next_after_is_minimal(board in sorted_board(), set in route_set(), t in 0i64..10_000) {
            let t = EpochMillis::new(t);
            match board.next_on_after(&set, t) {
                Some(found) => {
                    prop_assert!(found.time > t);
                    for d in board.filter_routes(&set).departures() {
                        prop_assert!(!(d.time > t && d.time < found.time));
                    }
                }
                None => {
                    for d in board.filter_routes(&set).departures() {
                        prop_assert!(d.time <= t);
                    }
                }
            }
        }
    }
}
