// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

mod utils;

use massilia::modelbuilder::NetworkBuilder;
use massilia::{BadRequest, Solver, DEFAULT_MAX_ROUNDS};
use utils::{init_logger, time};

#[test]
fn test_simple_routing() -> Result<(), BadRequest> {
    init_logger();

    let network = NetworkBuilder::new()
        .route(1, "1", &["A", "B", "C"], |route| {
            route
                .trip(&["10:00:00", "10:05:00", "10:10:00"])
                .trip(&["10:30:00", "10:35:00", "10:40:00"]);
        })
        .build();
    let mut solver = Solver::new();
    solver.add_period("default", network);

    let journeys =
        solver.forward_query_by_names("A", "B", time("08:59:00"), DEFAULT_MAX_ROUNDS, None)?;

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(journey.nb_of_legs(), 1);
    assert_eq!(journey.nb_of_transfers(), 0);
    assert_eq!(journey.departure_time(), time("10:00:00"));
    assert_eq!(journey.arrival_time(), time("10:05:00"));
    assert_eq!(journey.legs[0].route_name(), Some("1"));
    Ok(())
}

#[test]
fn test_routing_with_transfers() -> Result<(), BadRequest> {
    init_logger();

    let network = NetworkBuilder::new()
        .route(1, "1", &["A", "B", "C"], |route| {
            route.trip(&["10:00:00", "10:05:00", "10:10:00"]);
        })
        .route(2, "2", &["E", "F", "G"], |route| {
            route.trip(&["10:05:00", "10:20:00", "10:30:00"]);
        })
        .transfer("B", "F", "00:02:00")
        .build();
    let mut solver = Solver::new();
    solver.add_period("default", network);

    let journeys =
        solver.forward_query_by_names("A", "G", time("08:59:00"), DEFAULT_MAX_ROUNDS, None)?;

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(journey.nb_of_legs(), 3);
    assert_eq!(journey.nb_of_transit_legs(), 2);
    assert_eq!(journey.nb_of_transfers(), 1);

    let first_leg = &journey.legs[0];
    assert!(!first_leg.is_transfer());
    assert_eq!(first_leg.departure_time, time("10:00:00"));
    assert_eq!(first_leg.arrival_time, time("10:05:00"));

    let walk = &journey.legs[1];
    assert!(walk.is_transfer());
    assert_eq!(walk.departure_time, time("10:05:00"));
    assert_eq!(walk.arrival_time, time("10:07:00"));

    let last_leg = &journey.legs[2];
    assert_eq!(last_leg.route_name(), Some("2"));
    assert_eq!(last_leg.departure_time, time("10:20:00"));
    assert_eq!(last_leg.arrival_time, time("10:30:00"));

    assert_eq!(journey.arrival_time(), time("10:30:00"));
    Ok(())
}

#[test]
fn test_same_name_stops_are_walkable_at_fixed_cost() -> Result<(), BadRequest> {
    init_logger();

    // two platforms named X, one per line, no explicit transfer
    let network = NetworkBuilder::new()
        .route(1, "1", &["A", "X@1"], |route| {
            route.trip(&["10:00:00", "10:10:00"]);
        })
        .route(2, "2", &["X@2", "B"], |route| {
            route.trip(&["10:15:00", "10:25:00"]);
        })
        .build();
    let mut solver = Solver::new();
    solver.add_period("default", network);

    let journeys =
        solver.forward_query_by_names("A", "B", time("09:00:00"), DEFAULT_MAX_ROUNDS, None)?;

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(journey.nb_of_legs(), 3);
    let walk = &journey.legs[1];
    assert!(walk.is_transfer());
    // implicit same-name transfers always cost 120 seconds
    assert_eq!(
        walk.arrival_time.total_seconds() - walk.departure_time.total_seconds(),
        120
    );
    Ok(())
}

#[test]
fn test_intermediate_stops_and_direction() -> Result<(), BadRequest> {
    init_logger();

    let network = NetworkBuilder::new()
        .route(1, "1", &["A", "B", "C", "D"], |route| {
            route.trip(&["10:00:00", "10:05:00", "10:10:00", "10:15:00"]);
        })
        .build();
    let mut solver = Solver::new();
    solver.add_period("default", network);

    let journeys =
        solver.forward_query_by_names("A", "D", time("09:00:00"), DEFAULT_MAX_ROUNDS, None)?;

    assert_eq!(journeys.len(), 1);
    let journey = &journeys[0];
    assert_eq!(journey.nb_of_legs(), 1);
    match &journey.legs[0].kind {
        massilia::LegKind::Transit {
            direction,
            intermediate_stops,
            ..
        } => {
            assert_eq!(direction, "D");
            assert_eq!(intermediate_stops.len(), 2);
            assert_eq!(intermediate_stops[0].1, time("10:05:00"));
            assert_eq!(intermediate_stops[1].1, time("10:10:00"));
        }
        massilia::LegKind::Transfer => panic!("expected a transit leg"),
    }
    Ok(())
}

#[test]
fn test_journey_write_is_readable() -> Result<(), BadRequest> {
    init_logger();

    let network = NetworkBuilder::new()
        .route(7, "T1", &["A", "B"], |route| {
            route.trip(&["10:00:00", "10:05:00"]);
        })
        .build();
    let mut solver = Solver::new();
    solver.add_period("default", network);

    let journeys =
        solver.forward_query_by_names("A", "B", time("09:00:00"), DEFAULT_MAX_ROUNDS, None)?;
    let mut output = String::new();
    journeys[0]
        .write(solver.network().unwrap(), &mut output)
        .unwrap();
    assert!(output.contains("T1"));
    assert!(output.contains("10:00:00"));
    assert!(output.contains("10:05:00"));
    Ok(())
}
