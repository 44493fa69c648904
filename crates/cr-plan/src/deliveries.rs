//! Delivery request loader.
//!
//! # File format
//!
//! ```text
//! 34.0625329 -118.4470263
//! 34.0712323 -118.4505969:Chicken tenders
//! 34.0687443 -118.4449195:B-Plate salmon
//! ```
//!
//! The first line is the depot (`lat lon`; anything after the two numbers is
//! ignored).  Each following line is `lat lon:item`.  A request line without a
//! colon, without two coordinates, or with an empty item is skipped with a
//! warning; blank lines are skipped silently.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{info, warn};

use cr_core::{DeliveryRequest, Location};

use crate::{PlanError, PlanResult};

/// Depot plus the requests read from a deliveries file.
#[derive(Debug, Clone)]
pub struct DeliveryFile {
    pub depot:    Location,
    pub requests: Vec<DeliveryRequest>,
}

pub fn load_deliveries(path: &Path) -> PlanResult<DeliveryFile> {
    let file = std::fs::File::open(path)?;
    load_deliveries_reader(file)
}

/// Like [`load_deliveries`] but accepts any `Read` source.
///
/// # Errors
///
/// [`PlanError::Malformed`] if the depot line is missing or unparsable;
/// [`PlanError::Io`] on read failure.
pub fn load_deliveries_reader<R: Read>(reader: R) -> PlanResult<DeliveryFile> {
    let mut lines = BufReader::new(reader).lines();

    let depot_line = lines.next().transpose()?.ok_or_else(|| PlanError::Malformed {
        line:   1,
        reason: "missing depot line".into(),
    })?;
    let mut fields = depot_line.split_whitespace();
    let (Some(lat), Some(lon)) = (fields.next(), fields.next()) else {
        return Err(PlanError::Malformed {
            line:   1,
            reason: format!("expected depot `lat lon`, got {depot_line:?}"),
        });
    };
    let depot = Location::parse(lat, lon).map_err(|e| PlanError::Malformed {
        line:   1,
        reason: e.to_string(),
    })?;

    let mut requests = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_request(&line) {
            Ok(request) => requests.push(request),
            Err(reason) => warn!(line = idx + 2, %reason, text = %line, "skipping delivery line"),
        }
    }

    info!(%depot, requests = requests.len(), "deliveries loaded");
    Ok(DeliveryFile { depot, requests })
}

fn parse_request(line: &str) -> Result<DeliveryRequest, String> {
    let (coords, item) = line.split_once(':').ok_or("missing colon")?;
    let mut fields = coords.split_whitespace();
    let (Some(lat), Some(lon)) = (fields.next(), fields.next()) else {
        return Err("bad format".into());
    };
    if item.is_empty() {
        return Err("missing item".into());
    }
    let location = Location::parse(lat, lon).map_err(|e| e.to_string())?;
    Ok(DeliveryRequest::new(item, location))
}
