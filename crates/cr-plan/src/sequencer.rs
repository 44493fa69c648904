//! Tour ordering.
//!
//! A [`Sequencer`] decides the order in which destinations are visited.  The
//! default [`NearestNeighbor`] is the classic greedy heuristic: O(n²), fast,
//! and usually within a modest factor of optimal.  It does no backtracking or
//! local-search refinement.
//!
//! Tour lengths reported here are straight-line ("crow") miles between
//! consecutive destinations.  They are a cheap quality proxy, not the distance
//! actually driven, and they exclude the depot legs.

use tracing::debug;

use cr_core::{DeliveryRequest, Location};

/// An ordered tour plus its crow-distance before and after reordering.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourOrder {
    pub requests: Vec<DeliveryRequest>,
    /// Crow miles of the input order.
    pub original_miles: f64,
    /// Crow miles of `requests`.
    pub optimized_miles: f64,
}

/// Pluggable tour-ordering strategy.
pub trait Sequencer: Send + Sync {
    /// Reorder `requests` into a visiting sequence starting from `depot`.
    ///
    /// Implementations must return a permutation of `requests`.
    fn order(&self, depot: &Location, requests: &[DeliveryRequest]) -> TourOrder;
}

/// Sum of straight-line miles between consecutive destinations.
pub fn crow_miles(requests: &[DeliveryRequest]) -> f64 {
    requests
        .windows(2)
        .map(|w| w[0].location.distance_miles(&w[1].location))
        .sum()
}

// ── NearestNeighbor ───────────────────────────────────────────────────────────

/// Greedy nearest-neighbor construction.
///
/// The first stop is the destination closest to the depot; each following
/// stop is the closest destination not yet placed.  On an exact distance
/// tie the destination that appears earlier in the input wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl Sequencer for NearestNeighbor {
    fn order(&self, depot: &Location, requests: &[DeliveryRequest]) -> TourOrder {
        let mut remaining: Vec<&DeliveryRequest> = requests.iter().collect();
        let mut ordered: Vec<DeliveryRequest> = Vec::with_capacity(requests.len());
        let mut current = depot;

        while !remaining.is_empty() {
            let mut best = 0;
            let mut best_miles = f64::INFINITY;
            for (i, request) in remaining.iter().enumerate() {
                let miles = current.distance_miles(&request.location);
                if miles < best_miles {
                    best = i;
                    best_miles = miles;
                }
            }
            // `remove` preserves input order for the tie-break.
            let next = remaining.remove(best);
            current = &next.location;
            ordered.push(next.clone());
        }

        let tour = TourOrder {
            original_miles:  crow_miles(requests),
            optimized_miles: crow_miles(&ordered),
            requests:        ordered,
        };
        debug!(
            stops = tour.requests.len(),
            original = tour.original_miles,
            optimized = tour.optimized_miles,
            "tour ordered"
        );
        tour
    }
}

// ── InputOrder ────────────────────────────────────────────────────────────────

/// Keeps the caller's order.  Use when the stops are already sequenced.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputOrder;

impl Sequencer for InputOrder {
    fn order(&self, _depot: &Location, requests: &[DeliveryRequest]) -> TourOrder {
        let miles = crow_miles(requests);
        TourOrder {
            requests:        requests.to_vec(),
            original_miles:  miles,
            optimized_miles: miles,
        }
    }
}
