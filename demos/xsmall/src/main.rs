//! xsmall: smallest end-to-end run of the courier delivery planner.
//!
//! Usage:
//!
//! ```text
//! xsmall                                  # embedded Westwood sample
//! xsmall MAP DELIVERIES [INSTRUCTIONS.csv]
//! ```
//!
//! Loads a street map and a deliveries file, orders the stops, and prints
//! turn-by-turn directions.  Set `RUST_LOG=debug` to see per-leg routing.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::warn;

use cr_core::PlannerConfig;
use cr_plan::{
    DeliveryFile, DeliveryPlanner, DeliveryResult, PlanError, load_deliveries, load_deliveries_reader,
    write_instructions_csv_file,
};
use cr_spatial::{SpatialError, StreetMap, load_map, load_map_reader};

// ── Embedded sample ───────────────────────────────────────────────────────────

// Five blocks around Le Conte and Broxton.  Coordinates are written
// identically wherever streets meet; that text is what joins them.
const SAMPLE_MAP: &str = "\
Le Conte Avenue
2
34.0630 -118.4480 34.0630 -118.4470
34.0630 -118.4470 34.0630 -118.4460
Weyburn Avenue
2
34.0640 -118.4480 34.0640 -118.4470
34.0640 -118.4470 34.0640 -118.4460
Gayley Avenue
1
34.0630 -118.4480 34.0640 -118.4480
Broxton Avenue
1
34.0630 -118.4470 34.0640 -118.4470
Tiverton Avenue
1
34.0630 -118.4460 34.0640 -118.4460
";

const SAMPLE_DELIVERIES: &str = "\
34.0630 -118.4470
34.0640 -118.4480:Chicken tenders
34.0640 -118.4460:B-Plate salmon
34.0630 -118.4460:Pabst Blue Ribbon beer
";

// ── Exit codes ────────────────────────────────────────────────────────────────

fn exit_code(result: DeliveryResult) -> u8 {
    match result {
        DeliveryResult::Success           => 0,
        DeliveryResult::MalformedInput    => 1,
        DeliveryResult::InvalidCoordinate => 2,
        DeliveryResult::NoRoute           => 3,
        DeliveryResult::ResourceExhausted => 4,
    }
}

fn report_failure(map: &StreetMap, err: &PlanError) {
    match err {
        PlanError::Spatial(SpatialError::InvalidCoordinate(at)) => {
            eprintln!("One or more addresses are invalid: {at} is not on the map.");
            if let Some(near) = map.nearest_location(at.lat(), at.lon()) {
                eprintln!("  closest street point: {near}");
            }
        }
        PlanError::Spatial(SpatialError::NoRoute { .. }) => {
            eprintln!("No route can be found to deliver all items: {err}");
        }
        PlanError::Spatial(SpatialError::ResourceExhausted { .. }) => {
            eprintln!("Route search gave up: {err}");
        }
        _ => eprintln!("error: {err}"),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = PlannerConfig::default();

    // 1. Load inputs.
    let (map, deliveries, csv_out): (StreetMap, DeliveryFile, Option<&str>) = match args.as_slice() {
        [] => {
            println!("=== xsmall: courier (embedded Westwood sample) ===");
            let map = load_map_reader(SAMPLE_MAP.as_bytes(), &config)?;
            let deliveries = load_deliveries_reader(SAMPLE_DELIVERIES.as_bytes())?;
            (map, deliveries, None)
        }
        [map_path, deliveries_path, rest @ ..] => {
            println!("=== xsmall: courier ===");
            let map = load_map(Path::new(map_path), &config)
                .with_context(|| format!("loading street map {map_path}"))?;
            let deliveries = load_deliveries(Path::new(deliveries_path))
                .with_context(|| format!("loading deliveries {deliveries_path}"))?;
            (map, deliveries, rest.first().map(String::as_str))
        }
        [_] => bail!("usage: xsmall [MAP DELIVERIES [INSTRUCTIONS.csv]]"),
    };
    println!(
        "Street map: {} locations, {} links  |  Depot: {}  |  Deliveries: {}",
        map.location_count(),
        map.link_count(),
        deliveries.depot,
        deliveries.requests.len(),
    );
    if deliveries.requests.is_empty() {
        warn!("no deliveries to make");
    }
    println!();

    // 2. Plan.
    let planner = DeliveryPlanner::with_config(&map, &config)?;
    let t0 = Instant::now();
    let outcome = planner.plan(&deliveries.depot, &deliveries.requests);
    let elapsed = t0.elapsed();

    let plan = match outcome {
        Ok(plan) => plan,
        Err(err) => {
            report_failure(&map, &err);
            return Ok(ExitCode::from(exit_code(err.result())));
        }
    };

    // 3. Directions.
    print!("{}", plan.describe());
    println!();
    println!(
        "Crow-flies tour: {:.2} miles as given, {:.2} miles reordered",
        plan.tour.original_miles, plan.tour.optimized_miles
    );
    println!("Planned in {:.3} ms", elapsed.as_secs_f64() * 1_000.0);

    // 4. Optional CSV export.
    if let Some(path) = csv_out {
        write_instructions_csv_file(Path::new(path), plan.instructions())
            .with_context(|| format!("writing {path}"))?;
        println!("Instructions written to {path}");
    }

    Ok(ExitCode::SUCCESS)
}
