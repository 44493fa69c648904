//! `cr-core`: foundational types for the `courier` delivery planner.
//!
//! This crate is a dependency of every other `cr-*` crate.  It intentionally
//! has no `cr-*` dependencies and minimal external ones (only `rustc-hash`
//! and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`geo`]      | `Location`, haversine distance, bearings               |
//! | [`delivery`] | `DeliveryRequest`                                      |
//! | [`map`]      | `ExpandableMap`, a chained hash map with resizing     |
//! | [`config`]   | `PlannerConfig`                                        |
//! | [`error`]    | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod config;
pub mod delivery;
pub mod error;
pub mod geo;
pub mod map;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::PlannerConfig;
pub use delivery::DeliveryRequest;
pub use error::{CoreError, CoreResult};
pub use geo::{Location, normalize_degrees};
pub use map::ExpandableMap;
