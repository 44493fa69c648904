//! Unit tests for cr-plan.

#[cfg(test)]
mod helpers {
    use cr_core::{DeliveryRequest, Location, PlannerConfig};
    use cr_spatial::{StreetMap, load_map_reader};

    pub fn loc(lat: &str, lon: &str) -> Location {
        Location::parse(lat, lon).unwrap()
    }

    /// Two parallel east-west streets joined at both ends:
    ///
    /// ```text
    ///   (0.01,0.00) ── Oak Ave ── (0.01,0.01) ── Oak Ave ── (0.01,0.02)
    ///        │ First St                                          │ Second St
    ///   (0.00,0.00) ── Main St ── (0.00,0.01) ── Main St ── (0.00,0.02)
    /// ```
    pub const GRID: &str = "\
Main St
2
0.00 0.00 0.00 0.01
0.00 0.01 0.00 0.02
Oak Ave
2
0.01 0.00 0.01 0.01
0.01 0.01 0.01 0.02
First St
1
0.00 0.00 0.01 0.00
Second St
1
0.00 0.02 0.01 0.02
";

    pub fn grid() -> StreetMap {
        load_map_reader(GRID.as_bytes(), &PlannerConfig::default()).unwrap()
    }

    pub fn depot() -> Location {
        loc("0.00", "0.01")
    }

    /// pizza, books, flowers in that input order.
    pub fn grid_requests() -> Vec<DeliveryRequest> {
        vec![
            DeliveryRequest::new("pizza", loc("0.01", "0.00")),
            DeliveryRequest::new("books", loc("0.00", "0.02")),
            DeliveryRequest::new("flowers", loc("0.01", "0.02")),
        ]
    }

    pub fn items(requests: &[DeliveryRequest]) -> Vec<&str> {
        requests.iter().map(|r| r.item.as_str()).collect()
    }
}

// ── Instructions ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod instruction {
    use std::sync::Arc;

    use crate::{Compass, Instruction, TurnSide};

    #[test]
    fn compass_sectors() {
        assert_eq!(Compass::from_bearing(0.0), Compass::East);
        assert_eq!(Compass::from_bearing(22.4), Compass::East);
        assert_eq!(Compass::from_bearing(22.5), Compass::Northeast);
        assert_eq!(Compass::from_bearing(90.0), Compass::North);
        assert_eq!(Compass::from_bearing(135.0), Compass::Northwest);
        assert_eq!(Compass::from_bearing(180.0), Compass::West);
        assert_eq!(Compass::from_bearing(225.0), Compass::Southwest);
        assert_eq!(Compass::from_bearing(270.0), Compass::South);
        assert_eq!(Compass::from_bearing(292.5), Compass::Southeast);
        assert_eq!(Compass::from_bearing(337.5), Compass::East);
        assert_eq!(Compass::from_bearing(359.9), Compass::East);
    }

    #[test]
    fn compass_wraps_out_of_range() {
        assert_eq!(Compass::from_bearing(-90.0), Compass::South);
        assert_eq!(Compass::from_bearing(450.0), Compass::North);
    }

    #[test]
    fn turn_band() {
        let eps = 1.0;
        assert_eq!(TurnSide::classify(0.0, eps), None);
        assert_eq!(TurnSide::classify(0.5, eps), None);
        assert_eq!(TurnSide::classify(1.0, eps), Some(TurnSide::Left));
        assert_eq!(TurnSide::classify(90.0, eps), Some(TurnSide::Left));
        assert_eq!(TurnSide::classify(179.9, eps), Some(TurnSide::Left));
        assert_eq!(TurnSide::classify(180.0, eps), Some(TurnSide::Right));
        assert_eq!(TurnSide::classify(270.0, eps), Some(TurnSide::Right));
        assert_eq!(TurnSide::classify(359.0, eps), Some(TurnSide::Right));
        assert_eq!(TurnSide::classify(359.5, eps), None);
    }

    #[test]
    fn zero_epsilon_only_skips_exact_straight() {
        assert_eq!(TurnSide::classify(0.0, 0.0), None);
        assert_eq!(TurnSide::classify(360.0, 0.0), None);
        assert_eq!(TurnSide::classify(0.5, 0.0), Some(TurnSide::Left));
        assert_eq!(TurnSide::classify(359.5, 0.0), Some(TurnSide::Right));
    }

    #[test]
    fn display_text() {
        let proceed = Instruction::Proceed {
            direction: Compass::Northeast,
            street:    Arc::from("Broxton Avenue"),
            miles:     0.126,
        };
        let turn = Instruction::Turn { side: TurnSide::Right, street: Arc::from("Weyburn Avenue") };
        let deliver = Instruction::Deliver { item: "Chicken tenders".into() };

        assert_eq!(proceed.to_string(), "Proceed northeast on Broxton Avenue for 0.13 miles");
        assert_eq!(turn.to_string(), "Turn right on Weyburn Avenue");
        assert_eq!(deliver.to_string(), "Deliver Chicken tenders");

        assert_eq!(proceed.miles(), 0.126);
        assert_eq!(turn.miles(), 0.0);
        assert!(deliver.is_deliver());
        assert!(!turn.is_deliver());
    }
}

// ── Sequencing ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sequencer {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use cr_core::{DeliveryRequest, Location};

    use super::helpers::{depot, grid_requests, items, loc};
    use crate::{InputOrder, NearestNeighbor, Sequencer, crow_miles};

    #[test]
    fn empty_and_single() {
        let tour = NearestNeighbor.order(&depot(), &[]);
        assert!(tour.requests.is_empty());
        assert_eq!(tour.original_miles, 0.0);
        assert_eq!(tour.optimized_miles, 0.0);

        let one = vec![DeliveryRequest::new("books", loc("0.00", "0.02"))];
        let tour = NearestNeighbor.order(&depot(), &one);
        assert_eq!(tour.requests, one);
        assert_eq!(tour.optimized_miles, 0.0);
    }

    #[test]
    fn grid_order_and_crow_lengths() {
        let requests = grid_requests();
        let tour = NearestNeighbor.order(&depot(), &requests);
        assert_eq!(items(&tour.requests), ["books", "flowers", "pizza"]);

        let (pizza, books, flowers) = (&requests[0].location, &requests[1].location, &requests[2].location);
        let before = pizza.distance_miles(books) + books.distance_miles(flowers);
        let after = books.distance_miles(flowers) + flowers.distance_miles(pizza);
        assert!((tour.original_miles - before).abs() < 1e-12);
        assert!((tour.optimized_miles - after).abs() < 1e-12);
        assert!(tour.optimized_miles < tour.original_miles);
    }

    #[test]
    fn exact_tie_keeps_input_order() {
        let spot = loc("0.00", "0.01");
        let requests = vec![
            DeliveryRequest::new("far", loc("0.05", "0.05")),
            DeliveryRequest::new("first", spot.clone()),
            DeliveryRequest::new("second", spot),
        ];
        let tour = NearestNeighbor.order(&loc("0.00", "0.00"), &requests);
        assert_eq!(items(&tour.requests), ["first", "second", "far"]);
    }

    #[test]
    fn input_order_is_identity() {
        let requests = grid_requests();
        let tour = InputOrder.order(&depot(), &requests);
        assert_eq!(tour.requests, requests);
        assert_eq!(tour.original_miles, tour.optimized_miles);
    }

    /// On random inputs the result is a permutation, each pick is the
    /// closest remaining stop, and the reported lengths match the orders.
    #[test]
    fn random_tours_are_greedy_permutations() {
        let mut rng = SmallRng::seed_from_u64(7);
        for round in 0..50 {
            let n = rng.gen_range(0..20);
            let depot = Location::from_degrees(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            let requests: Vec<DeliveryRequest> = (0..n)
                .map(|i| {
                    let at = Location::from_degrees(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
                    DeliveryRequest::new(format!("item-{i}"), at)
                })
                .collect();

            let tour = NearestNeighbor.order(&depot, &requests);

            let mut got: Vec<&str> = items(&tour.requests);
            let mut want: Vec<&str> = items(&requests);
            got.sort_unstable();
            want.sort_unstable();
            assert_eq!(got, want, "round {round}");

            let mut current = &depot;
            for (k, picked) in tour.requests.iter().enumerate() {
                let chosen = current.distance_miles(&picked.location);
                for other in &tour.requests[k..] {
                    assert!(chosen <= current.distance_miles(&other.location), "round {round} step {k}");
                }
                current = &picked.location;
            }

            assert_eq!(tour.original_miles, crow_miles(&requests));
            assert_eq!(tour.optimized_miles, crow_miles(&tour.requests));
        }
    }
}

// ── Route compiler ────────────────────────────────────────────────────────────

#[cfg(test)]
mod compiler {
    use cr_core::DeliveryRequest;
    use cr_spatial::{AStarRouter, StreetLink};

    use super::helpers::{depot, grid, loc};
    use crate::{Compass, Instruction, PlanError, RouteCompiler, TurnSide, fold_leg};

    fn link(a: (&str, &str), b: (&str, &str), name: &str) -> StreetLink {
        StreetLink::new(loc(a.0, a.1), loc(b.0, b.1), name)
    }

    #[test]
    fn empty_leg_emits_nothing() {
        let mut out = Vec::new();
        fold_leg(&[], 1.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn same_street_links_merge() {
        let links = [
            link(("0.00", "0.00"), ("0.00", "0.01"), "Main St"),
            link(("0.00", "0.01"), ("0.00", "0.02"), "Main St"),
            link(("0.00", "0.02"), ("0.00", "0.03"), "Main St"),
        ];
        let mut out = Vec::new();
        fold_leg(&links, 1.0, &mut out);

        assert_eq!(out.len(), 1);
        let Instruction::Proceed { direction, street, miles } = &out[0] else {
            panic!("expected Proceed, got {:?}", out[0]);
        };
        assert_eq!(*direction, Compass::East);
        assert_eq!(&**street, "Main St");
        let total: f64 = links.iter().map(StreetLink::length_miles).sum();
        assert!((miles - total).abs() < 1e-12);
    }

    #[test]
    fn straight_name_change_has_no_turn() {
        let links = [
            link(("0.00", "0.00"), ("0.00", "0.01"), "Main St"),
            link(("0.00", "0.01"), ("0.00", "0.02"), "Main Blvd"),
        ];
        let mut out = Vec::new();
        fold_leg(&links, 1.0, &mut out);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|i| matches!(i, Instruction::Proceed { .. })));
    }

    #[test]
    fn east_then_south_turns_right() {
        let links = [
            link(("0.01", "0.00"), ("0.01", "0.01"), "Oak Ave"),
            link(("0.01", "0.01"), ("0.00", "0.01"), "Cross St"),
        ];
        let mut out = Vec::new();
        fold_leg(&links, 1.0, &mut out);

        assert_eq!(
            out[1],
            Instruction::Turn { side: TurnSide::Right, street: "Cross St".into() }
        );
        assert_eq!(out[2].to_string(), "Proceed south on Cross St for 0.69 miles");
    }

    #[test]
    fn empty_tour_compiles_to_nothing() {
        let map = grid();
        let compiler = RouteCompiler::new(&map, AStarRouter::new());
        let compiled = compiler.compile(&depot(), &[]).unwrap();
        assert!(compiled.instructions.is_empty());
        assert!(compiled.legs.is_empty());
        assert_eq!(compiled.total_miles, 0.0);
    }

    #[test]
    fn delivery_at_depot_is_just_a_handover() {
        let map = grid();
        let compiler = RouteCompiler::new(&map, AStarRouter::new());
        let compiled = compiler
            .compile(&depot(), &[DeliveryRequest::new("coffee", depot())])
            .unwrap();
        assert_eq!(compiled.instructions, [Instruction::Deliver { item: "coffee".into() }]);
        assert_eq!(compiled.legs.len(), 2);
        assert!(compiled.legs.iter().all(|leg| leg.route.is_trivial()));
    }

    #[test]
    fn failing_leg_aborts() {
        let map = grid();
        let compiler = RouteCompiler::new(&map, AStarRouter::new());
        let err = compiler
            .compile(&depot(), &[DeliveryRequest::new("lost", loc("5.0", "5.0"))])
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::Spatial(cr_spatial::SpatialError::InvalidCoordinate(_))
        ));
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use cr_core::{DeliveryRequest, PlannerConfig};
    use cr_spatial::{AStarRouter, StreetMapBuilder};

    use super::helpers::{depot, grid, grid_requests, items, loc};
    use crate::{DeliveryPlanner, DeliveryResult, InputOrder, Instruction, PlanError};

    #[test]
    fn grid_end_to_end() {
        let map = grid();
        let planner = DeliveryPlanner::new(&map);
        let outcome = planner.plan(&depot(), &grid_requests());
        assert_eq!(DeliveryResult::of(&outcome), DeliveryResult::Success);
        let plan = outcome.unwrap();

        assert_eq!(items(&plan.tour.requests), ["books", "flowers", "pizza"]);

        let lines: Vec<String> = plan.instructions().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            [
                "Proceed east on Main St for 0.69 miles",
                "Deliver books",
                "Proceed north on Second St for 0.69 miles",
                "Deliver flowers",
                "Proceed west on Oak Ave for 1.38 miles",
                "Deliver pizza",
                "Proceed south on First St for 0.69 miles",
                "Turn left on Main St",
                "Proceed east on Main St for 0.69 miles",
            ]
        );

        let leg_sum: f64 = plan.route.legs.iter().map(|l| l.route.distance_miles).sum();
        let proceed_sum: f64 = plan.instructions().iter().map(Instruction::miles).sum();
        assert_eq!(plan.route.legs.len(), 4);
        assert!((plan.total_miles() - leg_sum).abs() < 1e-9);
        assert!((plan.total_miles() - proceed_sum).abs() < 1e-9);

        let text = plan.describe();
        assert!(text.starts_with("Starting at the depot...\n"));
        assert!(text.ends_with("4.15 miles travelled for all deliveries.\n"));
    }

    #[test]
    fn one_deliver_per_request_in_tour_order() {
        let map = grid();
        let plan = DeliveryPlanner::new(&map).plan(&depot(), &grid_requests()).unwrap();
        let delivered: Vec<&str> = plan
            .instructions()
            .iter()
            .filter_map(|i| match i {
                Instruction::Deliver { item } => Some(item.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(delivered, items(&plan.tour.requests));
    }

    #[test]
    fn input_order_sequencer() {
        let map = grid();
        let config = PlannerConfig::default();
        let planner = DeliveryPlanner::with_parts(&map, AStarRouter::new(), InputOrder, &config);
        let plan = planner.plan(&depot(), &grid_requests()).unwrap();
        assert_eq!(items(&plan.tour.requests), ["pizza", "books", "flowers"]);
        assert_eq!(plan.instructions().iter().filter(|i| i.is_deliver()).count(), 3);
    }

    #[test]
    fn unknown_destination_is_invalid_coordinate() {
        let map = grid();
        let mut requests = grid_requests();
        requests.push(DeliveryRequest::new("nowhere", loc("0.005", "0.005")));

        let outcome = DeliveryPlanner::new(&map).plan(&depot(), &requests);
        assert_eq!(DeliveryResult::of(&outcome), DeliveryResult::InvalidCoordinate);
        match outcome.unwrap_err() {
            PlanError::Spatial(cr_spatial::SpatialError::InvalidCoordinate(at)) => {
                assert_eq!(at, loc("0.005", "0.005"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_depot_fails_even_without_requests() {
        let map = grid();
        let outcome = DeliveryPlanner::new(&map).plan(&loc("9.0", "9.0"), &[]);
        assert_eq!(DeliveryResult::of(&outcome), DeliveryResult::InvalidCoordinate);
    }

    #[test]
    fn empty_request_list_is_empty_plan() {
        let map = grid();
        let plan = DeliveryPlanner::new(&map).plan(&depot(), &[]).unwrap();
        assert!(plan.instructions().is_empty());
        assert_eq!(plan.total_miles(), 0.0);
    }

    #[test]
    fn disconnected_destination_is_no_route() {
        let mut builder = StreetMapBuilder::new();
        builder.add_street("Main St", &[loc("0.00", "0.00"), loc("0.00", "0.01")]);
        builder.add_street("Island Rd", &[loc("1.00", "1.00"), loc("1.00", "1.01")]);
        let map = builder.build();

        let requests = [DeliveryRequest::new("boat", loc("1.00", "1.01"))];
        let outcome = DeliveryPlanner::new(&map).plan(&loc("0.00", "0.00"), &requests);
        assert_eq!(DeliveryResult::of(&outcome), DeliveryResult::NoRoute);
    }

    #[test]
    fn expansion_bound_is_resource_exhausted() {
        let map = grid();
        let config = PlannerConfig { max_expansions: Some(1), ..PlannerConfig::default() };
        let planner = DeliveryPlanner::with_config(&map, &config).unwrap();
        let outcome = planner.plan(&depot(), &grid_requests());
        assert_eq!(DeliveryResult::of(&outcome), DeliveryResult::ResourceExhausted);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let map = grid();
        let config = PlannerConfig { turn_epsilon_deg: 200.0, ..PlannerConfig::default() };
        let err = DeliveryPlanner::with_config(&map, &config).err().unwrap();
        assert!(matches!(err, PlanError::Core(_)));
        assert_eq!(err.result(), DeliveryResult::MalformedInput);
    }

    #[test]
    fn batch_results_keep_input_order() {
        let map = grid();
        let planner = DeliveryPlanner::new(&map);
        let runs = vec![
            (depot(), grid_requests()),
            (depot(), vec![DeliveryRequest::new("nowhere", loc("3.0", "3.0"))]),
            (loc("0.00", "0.00"), vec![DeliveryRequest::new("books", loc("0.00", "0.02"))]),
        ];
        let results = planner.plan_batch(&runs);
        let codes: Vec<DeliveryResult> = results.iter().map(DeliveryResult::of).collect();
        assert_eq!(
            codes,
            [DeliveryResult::Success, DeliveryResult::InvalidCoordinate, DeliveryResult::Success]
        );
        let last = results[2].as_ref().unwrap();
        assert_eq!(last.instructions()[0].to_string(), "Proceed east on Main St for 1.38 miles");
    }
}

// ── Deliveries loader ─────────────────────────────────────────────────────────

#[cfg(test)]
mod deliveries {
    use super::helpers::loc;
    use crate::{PlanError, load_deliveries_reader};

    #[test]
    fn depot_and_requests() {
        let text = "\
34.0625329 -118.4470263 depot notes are ignored
34.0712323 -118.4505969:Chicken tenders

34.0687443 -118.4449195:B-Plate salmon
";
        let file = load_deliveries_reader(text.as_bytes()).unwrap();
        assert_eq!(file.depot, loc("34.0625329", "-118.4470263"));
        assert_eq!(file.requests.len(), 2);
        assert_eq!(file.requests[0].item, "Chicken tenders");
        assert_eq!(file.requests[0].location, loc("34.0712323", "-118.4505969"));
        assert_eq!(file.requests[1].item, "B-Plate salmon");
    }

    #[test]
    fn bad_request_lines_are_skipped() {
        let text = "\
0.00 0.01
0.01 0.00 no colon here
0.01 0.00:
north 0.00:pizza
0.01:lonely
0.00 0.02:  books: signed copy
";
        let file = load_deliveries_reader(text.as_bytes()).unwrap();
        assert_eq!(file.requests.len(), 1);
        // Item text is kept exactly, colons and padding included.
        assert_eq!(file.requests[0].item, "  books: signed copy");
    }

    #[test]
    fn missing_depot_is_malformed() {
        let err = load_deliveries_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, PlanError::Malformed { line: 1, .. }));
    }

    #[test]
    fn bad_depot_is_malformed() {
        for text in ["0.00\n", "north south\n", "95.0 0.0\n"] {
            let err = load_deliveries_reader(text.as_bytes()).unwrap_err();
            assert!(matches!(err, PlanError::Malformed { line: 1, .. }), "{text:?}");
        }
    }
}

// ── CSV report ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod report {
    use std::sync::Arc;

    use crate::{Compass, Instruction, TurnSide, write_instructions_csv};

    #[test]
    fn rows_and_header() {
        let instructions = [
            Instruction::Proceed { direction: Compass::East, street: Arc::from("Main St"), miles: 0.5 },
            Instruction::Turn { side: TurnSide::Left, street: Arc::from("Oak Ave") },
            Instruction::Deliver { item: "books".into() },
        ];
        let mut buf = Vec::new();
        write_instructions_csv(&mut buf, &instructions).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "step,kind,direction,street,miles,item\n\
             0,proceed,east,Main St,0.5,\n\
             1,turn,left,Oak Ave,,\n\
             2,deliver,,,,books\n"
        );
    }

    #[test]
    fn empty_list_still_has_header() {
        let mut buf = Vec::new();
        write_instructions_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "step,kind,direction,street,miles,item\n");
    }

    #[test]
    fn miles_are_not_rounded() {
        let instructions = [Instruction::Proceed {
            direction: Compass::North,
            street:    Arc::from("Second St"),
            miles:     0.691,
        }];
        let mut buf = Vec::new();
        write_instructions_csv(&mut buf, &instructions).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("0,proceed,north,Second St,0.691,\n"), "{text}");
    }
}

// ── File round trip ───────────────────────────────────────────────────────────

#[cfg(test)]
mod files {
    use tempfile::TempDir;

    use cr_core::PlannerConfig;
    use cr_spatial::load_map;

    use super::helpers::{GRID, depot};
    use crate::{DeliveryPlanner, load_deliveries, write_instructions_csv_file};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn plan_from_files_and_export_csv() {
        let dir = tmp();
        let map_path = dir.path().join("mapdata.txt");
        let deliveries_path = dir.path().join("deliveries.txt");
        let csv_path = dir.path().join("instructions.csv");

        std::fs::write(&map_path, GRID).unwrap();
        std::fs::write(&deliveries_path, "0.00 0.01\n0.00 0.02:books\n0.01 0.02:flowers\n").unwrap();

        let map = load_map(&map_path, &PlannerConfig::default()).unwrap();
        let file = load_deliveries(&deliveries_path).unwrap();
        assert_eq!(file.depot, depot());

        let plan = DeliveryPlanner::new(&map).plan(&file.depot, &file.requests).unwrap();
        write_instructions_csv_file(&csv_path, plan.instructions()).unwrap();

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, vec!["step", "kind", "direction", "street", "miles", "item"]);
        let kinds: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[1].to_string())
            .collect();
        assert_eq!(kinds.len(), plan.instructions().len());
        assert_eq!(kinds.iter().filter(|k| *k == "deliver").count(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tmp();
        let err = load_deliveries(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, crate::PlanError::Io(_)));
    }
}
