//! Street map text loader.
//!
//! # File format
//!
//! Streets follow one another with no separator:
//!
//! ```text
//! Broxton Avenue
//! 2
//! 34.0625329 -118.4470263 34.0632405 -118.4470467
//! 34.0632405 -118.4470467 34.0636533 -118.4470480
//! Weyburn Avenue
//! 1
//! 34.0636533 -118.4470480 34.0637367 -118.4461780
//! ```
//!
//! - line 1: street name (taken verbatim, surrounding whitespace trimmed)
//! - line 2: number of segments `n`
//! - next `n` lines: `startLat startLon endLat endLon`
//!
//! Every segment is two-way.  Coordinate text is kept exactly as written and
//! becomes the [`Location`] identity, so delivery files must spell shared
//! points the same way.  Blank lines between streets are ignored.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::info;

use cr_core::{Location, PlannerConfig};

use crate::network::{StreetMap, StreetMapBuilder};
use crate::SpatialError;

/// Load a street map from a file.
///
/// # Errors
///
/// [`SpatialError::Io`] if the file cannot be read,
/// [`SpatialError::Malformed`] on format errors.
pub fn load_map(path: &Path, config: &PlannerConfig) -> Result<StreetMap, SpatialError> {
    let file = std::fs::File::open(path)?;
    load_map_reader(file, config)
}

/// Like [`load_map`] but accepts any `Read` source.
///
/// Useful for testing (pass a `&[u8]` or `std::io::Cursor`).
pub fn load_map_reader<R: Read>(reader: R, config: &PlannerConfig) -> Result<StreetMap, SpatialError> {
    let mut lines = BufReader::new(reader).lines().enumerate();
    let mut builder = StreetMapBuilder::with_config(config);
    let mut streets = 0usize;

    while let Some((idx, name)) = lines.next() {
        let name = name?;
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let (count_idx, count_line) = next_line(&mut lines, idx + 1, "segment count")?;
        let count: usize = count_line.trim().parse().map_err(|_| SpatialError::Malformed {
            line:   count_idx + 1,
            reason: format!("expected a segment count for {name:?}, got {:?}", count_line.trim()),
        })?;

        let mut segments = Vec::new();
        let mut last_idx = count_idx;
        for _ in 0..count {
            let (seg_idx, seg_line) = next_line(&mut lines, last_idx + 1, "segment")?;
            segments.push(parse_segment(&seg_line, seg_idx + 1)?);
            last_idx = seg_idx;
        }

        builder.add_segments(name, segments);
        streets += 1;
    }

    info!(
        streets,
        locations = builder.location_count(),
        links = builder.link_count(),
        "street map loaded"
    );
    Ok(builder.build())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn next_line<I>(lines: &mut I, expected_line: usize, what: &str) -> Result<(usize, String), SpatialError>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
{
    match lines.next() {
        Some((idx, line)) => Ok((idx, line?)),
        None => Err(SpatialError::Malformed {
            line:   expected_line + 1,
            reason: format!("unexpected end of input, expected {what}"),
        }),
    }
}

fn parse_segment(line: &str, line_no: usize) -> Result<(Location, Location), SpatialError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [start_lat, start_lon, end_lat, end_lon] = fields[..] else {
        return Err(SpatialError::Malformed {
            line:   line_no,
            reason: format!("expected 4 coordinates, found {}", fields.len()),
        });
    };
    let malformed = |e: cr_core::CoreError| SpatialError::Malformed {
        line:   line_no,
        reason: e.to_string(),
    };
    let start = Location::parse(start_lat, start_lon).map_err(malformed)?;
    let end = Location::parse(end_lat, end_lon).map_err(malformed)?;
    Ok((start, end))
}
