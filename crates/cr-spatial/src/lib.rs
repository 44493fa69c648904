//! `cr-spatial`: street graph, spatial snapping, map loading, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `StreetLink`, `StreetMap` (adjacency + R-tree), builder     |
//! | [`router`]  | `Router` trait, `Route`, `AStarRouter`                      |
//! | [`loader`]  | `load_map` / `load_map_reader` for the street text format   |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use loader::{load_map, load_map_reader};
pub use network::{StreetLink, StreetMap, StreetMapBuilder};
pub use router::{AStarRouter, Route, Router};
