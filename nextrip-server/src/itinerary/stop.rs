//! Stops and the per-journey stop registry.
//!
//! A journey polls each physical stop once even when several legs use it.
//! The registry holds one `Stop` per identifier; its route set is the union
//! of every referencing leg's routes, and each leg narrows further to its
//! own routes when estimating.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{DepartureBoard, EpochMillis, RouteSet, StopId};

use super::BoardSnapshot;

/// How current a stop's board is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Never refreshed.
    Pending,
    /// Installed from the most recent snapshot.
    Fresh { at: EpochMillis },
    /// The most recent snapshot had no board for this stop; the previous
    /// board, if any, is kept.
    Stale { last_fresh: Option<EpochMillis> },
}

impl Freshness {
    /// Returns true if the board did not come from the latest snapshot.
    pub fn is_stale(&self) -> bool {
        matches!(self, Freshness::Stale { .. })
    }
}

/// A physical stop and its current departure board.
#[derive(Debug, Clone)]
pub struct Stop {
    id: StopId,
    allowed_routes: RouteSet,
    board: DepartureBoard,
    freshness: Freshness,
}

impl Stop {
    /// Create a stop with an empty board.
    pub fn new(id: StopId, allowed_routes: RouteSet) -> Self {
        Self {
            id,
            allowed_routes,
            board: DepartureBoard::empty(),
            freshness: Freshness::Pending,
        }
    }

    /// The stop identifier.
    pub fn id(&self) -> &StopId {
        &self.id
    }

    /// Union of the routes of every leg that uses this stop.
    pub fn allowed_routes(&self) -> &RouteSet {
        &self.allowed_routes
    }

    /// Current board, narrowed to `allowed_routes`.
    pub fn board(&self) -> &DepartureBoard {
        &self.board
    }

    /// How current the board is.
    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    /// Replace the board wholesale.
    fn install(&mut self, board: &DepartureBoard, at: EpochMillis) {
        self.board = board.filter_routes(&self.allowed_routes);
        self.freshness = Freshness::Fresh { at };
    }

    /// Keep the current board but record that it was not refreshed.
    fn mark_stale(&mut self) {
        let last_fresh = match self.freshness {
            Freshness::Pending => None,
            Freshness::Fresh { at } => Some(at),
            Freshness::Stale { last_fresh } => last_fresh,
        };
        self.freshness = Freshness::Stale { last_fresh };
    }
}

/// What a snapshot install changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Stops whose board was replaced.
    pub installed: usize,
    /// Stops missing from the snapshot; their previous board was kept.
    pub retained: Vec<StopId>,
    /// Snapshot entries for stops this journey does not use.
    pub ignored: Vec<StopId>,
}

/// The stops of one journey, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct StopRegistry {
    stops: BTreeMap<StopId, Stop>,
    /// Identifiers in first-reference order.
    order: Vec<StopId>,
}

impl StopRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a use of `id` by a leg permitted on `routes`.
    ///
    /// The stop's allowed routes grow to include `routes`.
    pub fn register(&mut self, id: &StopId, routes: &RouteSet) {
        match self.stops.get_mut(id) {
            Some(stop) => stop.allowed_routes.extend_from(routes),
            None => {
                self.stops
                    .insert(id.clone(), Stop::new(id.clone(), routes.clone()));
                self.order.push(id.clone());
            }
        }
    }

    /// Look up a stop.
    pub fn get(&self, id: &StopId) -> Option<&Stop> {
        self.stops.get(id)
    }

    /// The board for `id`, if the stop is registered.
    pub fn board(&self, id: &StopId) -> Option<&DepartureBoard> {
        self.stops.get(id).map(Stop::board)
    }

    /// Returns true if the stop exists and its board is stale.
    pub fn is_stale(&self, id: &StopId) -> bool {
        self.stops.get(id).is_some_and(|s| s.freshness.is_stale())
    }

    /// Distinct stop identifiers, in first-reference order.
    pub fn unique_stops(&self) -> &[StopId] {
        &self.order
    }

    /// Number of distinct stops.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no stop is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate stops in first-reference order.
    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.order.iter().filter_map(|id| self.stops.get(id))
    }

    /// Install the boards of a snapshot into the matching stops.
    ///
    /// A stop with no board in the snapshot keeps its previous departures
    /// and is marked stale rather than cleared.
    pub fn install(&mut self, snapshot: &BoardSnapshot) -> UpdateSummary {
        let mut summary = UpdateSummary::default();

        for id in &self.order {
            let Some(stop) = self.stops.get_mut(id) else {
                continue;
            };

            match snapshot.get(id) {
                Some(board) => {
                    stop.install(board, snapshot.fetched_at());
                    summary.installed += 1;
                }
                None => {
                    stop.mark_stale();
                    summary.retained.push(id.clone());
                }
            }
        }

        for (id, _) in snapshot.iter() {
            if !self.stops.contains_key(id) && !summary.ignored.contains(id) {
                summary.ignored.push(id.clone());
            }
        }

        if !summary.retained.is_empty() || !summary.ignored.is_empty() {
            debug!(
                retained = ?summary.retained,
                ignored = ?summary.ignored,
                "snapshot did not match journey stops exactly"
            );
        }

        summary
    }
}
