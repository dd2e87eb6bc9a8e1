//! Board snapshots from one refresh cycle.

use crate::domain::{DepartureBoard, EpochMillis, StopId};

/// The departure boards fetched in one refresh cycle.
///
/// Each board is paired with the stop it was fetched for, so installing a
/// snapshot never depends on two collections happening to share an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    boards: Vec<(StopId, DepartureBoard)>,
    fetched_at: EpochMillis,
}

impl BoardSnapshot {
    /// Create an empty snapshot taken at `fetched_at`.
    pub fn new(fetched_at: EpochMillis) -> Self {
        Self {
            boards: Vec::new(),
            fetched_at,
        }
    }

    /// Create a snapshot from `(stop, board)` pairs.
    pub fn from_pairs(
        fetched_at: EpochMillis,
        boards: impl IntoIterator<Item = (StopId, DepartureBoard)>,
    ) -> Self {
        Self {
            boards: boards.into_iter().collect(),
            fetched_at,
        }
    }

    /// Add a board, builder style.
    pub fn with_board(mut self, stop: StopId, board: DepartureBoard) -> Self {
        self.boards.push((stop, board));
        self
    }

    /// When the boards were fetched.
    pub fn fetched_at(&self) -> EpochMillis {
        self.fetched_at
    }

    /// The board for `stop`, if present. Later entries win over earlier ones.
    pub fn get(&self, stop: &StopId) -> Option<&DepartureBoard> {
        self.boards
            .iter()
            .rev()
            .find(|(id, _)| id == stop)
            .map(|(_, board)| board)
    }

    /// Iterate `(stop, board)` pairs in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = (&StopId, &DepartureBoard)> {
        self.boards.iter().map(|(id, board)| (id, board))
    }

    /// Number of boards.
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Returns true if the snapshot holds no boards.
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Departure, RouteId};

    fn stop(s: &str) -> StopId {
        StopId::parse(s).unwrap()
    }

    fn board(ms: i64) -> DepartureBoard {
        DepartureBoard::new(vec![Departure::new(
            RouteId::parse("2").unwrap(),
            "",
            EpochMillis::new(ms),
            false,
        )])
    }

    #[test]
    fn lookup_by_stop() {
        let snapshot = BoardSnapshot::new(EpochMillis::new(0))
            .with_board(stop("1"), board(10))
            .with_board(stop("2"), board(20));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(&stop("2")), Some(&board(20)));
        assert!(snapshot.get(&stop("3")).is_none());
    }

    #[test]
    fn later_entry_wins() {
        let snapshot = BoardSnapshot::from_pairs(
            EpochMillis::new(0),
            [(stop("1"), board(10)), (stop("1"), board(99))],
        );

        assert_eq!(snapshot.get(&stop("1")), Some(&board(99)));
    }

    #[test]
    fn iter_keeps_fetch_order() {
        let snapshot = BoardSnapshot::new(EpochMillis::new(5))
            .with_board(stop("9"), board(1))
            .with_board(stop("3"), board(2));

        let order: Vec<&str> = snapshot.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, vec!["9", "3"]);
        assert_eq!(snapshot.fetched_at(), EpochMillis::new(5));
    }
}
