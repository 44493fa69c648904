//! Street graph representation and builder.
//!
//! # Data layout
//!
//! The graph is an adjacency map keyed by [`Location`]:
//!
//! ```text
//! adjacency: ExpandableMap<Location, Vec<StreetLink>>
//! ```
//!
//! Each entry lists the directed links that *start* at that location, in the
//! order they were added.  A two-way street contributes one link per
//! direction.  A location that only ever appears as a link's end (the tip of
//! a one-way street) is not a key and has no outgoing links.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest known location.
//! Used to suggest the closest street point when a delivery coordinate does
//! not match the map text exactly.

use std::sync::Arc;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use cr_core::{ExpandableMap, Location, PlannerConfig};

// ── StreetLink ────────────────────────────────────────────────────────────────

/// One directed, traversable piece of a named street.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreetLink {
    pub start: Location,
    pub end:   Location,
    pub name:  Arc<str>,
}

impl StreetLink {
    pub fn new(start: Location, end: Location, name: impl Into<Arc<str>>) -> Self {
        Self { start, end, name: name.into() }
    }

    /// Great-circle length in miles.
    #[inline]
    pub fn length_miles(&self) -> f64 {
        self.start.distance_miles(&self.end)
    }

    /// Bearing of `start → end` in degrees, `[0, 360)`, 0° = east.
    #[inline]
    pub fn bearing_deg(&self) -> f64 {
        self.start.bearing_deg(&self.end)
    }

    /// The same street piece travelled the other way.
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end.clone(),
            end:   self.start.clone(),
            name:  Arc::clone(&self.name),
        }
    }
}

// ── R-tree location entry ─────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[lat, lon]` point with its location.
struct LocationEntry {
    point:    [f64; 2], // [lat, lon]
    location: Location,
}

impl RTreeObject for LocationEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for LocationEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough for picking
    /// the nearest point within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── StreetMap ─────────────────────────────────────────────────────────────────

/// Read-only directed street graph plus a spatial index for snapping.
///
/// Built once by [`StreetMapBuilder`] (or the [`loader`](crate::loader)) and
/// never mutated afterwards, so a single map can be shared by reference
/// across threads planning independent requests.
pub struct StreetMap {
    adjacency:   ExpandableMap<Location, Vec<StreetLink>>,
    link_count:  usize,
    spatial_idx: RTree<LocationEntry>,
}

impl StreetMap {
    /// A map with no streets.  Every routing request against it fails with
    /// [`SpatialError::InvalidCoordinate`](crate::SpatialError::InvalidCoordinate).
    pub fn empty() -> Self {
        StreetMapBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    /// Number of locations with at least one outgoing link.
    pub fn location_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// `true` if `location` has at least one outgoing link.
    #[inline]
    pub fn contains(&self, location: &Location) -> bool {
        self.adjacency.contains_key(location)
    }

    /// Outgoing links of `location` in insertion order.  Empty for unknown
    /// locations.
    #[inline]
    pub fn links_from(&self, location: &Location) -> &[StreetLink] {
        self.adjacency.get(location).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first link (in insertion order) running directly `from → to`.
    pub fn link_between(&self, from: &Location, to: &Location) -> Option<&StreetLink> {
        self.links_from(from).iter().find(|l| l.end == *to)
    }

    /// Iterator over every known location (keys of the adjacency map).
    pub fn locations(&self) -> impl Iterator<Item = &Location> + '_ {
        self.adjacency.keys()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The known location closest to `(lat, lon)`.
    ///
    /// Returns `None` only if the map is empty.
    pub fn nearest_location(&self, lat: f64, lon: f64) -> Option<&Location> {
        self.spatial_idx
            .nearest_neighbor(&[lat, lon])
            .map(|e| &e.location)
    }

    /// Up to `k` known locations nearest to `(lat, lon)`, closest first.
    pub fn k_nearest_locations(&self, lat: f64, lon: f64, k: usize) -> Vec<&Location> {
        self.spatial_idx
            .nearest_neighbor_iter(&[lat, lon])
            .take(k)
            .map(|e| &e.location)
            .collect()
    }
}

// ── StreetMapBuilder ──────────────────────────────────────────────────────────

/// Construct a [`StreetMap`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use cr_core::Location;
/// use cr_spatial::StreetMapBuilder;
///
/// let a = Location::parse("34.0625329", "-118.4470263").unwrap();
/// let b = Location::parse("34.0632405", "-118.4470467").unwrap();
/// let mut builder = StreetMapBuilder::new();
/// builder.add_street("Broxton Avenue", &[a.clone(), b]);
/// let map = builder.build();
/// assert_eq!(map.location_count(), 2);
/// assert_eq!(map.link_count(), 2); // both directions
/// ```
pub struct StreetMapBuilder {
    adjacency:  ExpandableMap<Location, Vec<StreetLink>>,
    link_count: usize,
}

impl StreetMapBuilder {
    pub fn new() -> Self {
        Self::with_config(&PlannerConfig::default())
    }

    /// Use the config's load factor for the adjacency map.
    pub fn with_config(config: &PlannerConfig) -> Self {
        Self {
            adjacency:  ExpandableMap::with_max_load_factor(config.max_load_factor),
            link_count: 0,
        }
    }

    /// Add a single **directed** link, appended after any links already
    /// leaving `link.start`.
    pub fn add_link(&mut self, link: StreetLink) {
        self.adjacency
            .get_or_insert_with(link.start.clone(), Vec::new)
            .push(link);
        self.link_count += 1;
    }

    /// Add a two-way street made of consecutive `(start, end)` segments.
    ///
    /// Every segment gets its forward and reverse link.  At each shared
    /// point the reverse of the previous segment is listed before the
    /// forward link of the next one.
    pub fn add_segments<I>(&mut self, name: &str, segments: I)
    where
        I: IntoIterator<Item = (Location, Location)>,
    {
        let name: Arc<str> = Arc::from(name);
        let mut previous: Option<StreetLink> = None;
        for (start, end) in segments {
            let link = StreetLink::new(start, end, Arc::clone(&name));
            if let Some(prev) = previous.take() {
                self.add_link(prev.reversed());
            }
            self.add_link(link.clone());
            previous = Some(link);
        }
        if let Some(last) = previous {
            self.add_link(last.reversed());
        }
    }

    /// Add a two-way street through `points` in order (N points → N−1
    /// segments → 2(N−1) links).
    pub fn add_street(&mut self, name: &str, points: &[Location]) {
        self.add_segments(
            name,
            points.windows(2).map(|w| (w[0].clone(), w[1].clone())),
        );
    }

    pub fn location_count(&self) -> usize { self.adjacency.len() }
    pub fn link_count(&self) -> usize { self.link_count }

    /// Consume the builder and produce a [`StreetMap`].
    ///
    /// Time complexity: O(N log N) for the R-tree bulk load, N = locations.
    pub fn build(self) -> StreetMap {
        let entries: Vec<LocationEntry> = self
            .adjacency
            .keys()
            .map(|loc| LocationEntry {
                point:    [loc.lat(), loc.lon()],
                location: loc.clone(),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        StreetMap {
            adjacency:  self.adjacency,
            link_count: self.link_count,
            spatial_idx,
        }
    }
}

impl Default for StreetMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
