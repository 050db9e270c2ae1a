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
use massilia::{Journey, Solver, DEFAULT_MAX_ROUNDS};
use utils::{init_logger, marseille_solver, time};

fn assert_temporally_consistent(journey: &Journey) {
    for leg in &journey.legs {
        assert!(leg.departure_time <= leg.arrival_time);
    }
    for pair in journey.legs.windows(2) {
        assert!(pair[0].arrival_time <= pair[1].departure_time);
    }
}

#[test]
fn test_repeated_queries_are_identical() {
    init_logger();
    let mut solver = marseille_solver();

    let run = |solver: &mut Solver| {
        solver
            .forward_query_by_names(
                "Vieux-Port",
                "Bougainville",
                time("08:00:00"),
                DEFAULT_MAX_ROUNDS,
                None,
            )
            .unwrap()
            .iter()
            .map(|journey| journey.signature())
            .collect::<Vec<_>>()
    };
    let first = run(&mut solver);
    let second = run(&mut solver);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_pareto_set_is_non_dominated_and_consistent() {
    init_logger();

    // a slow direct line, and a faster two-legged alternative
    let network = NetworkBuilder::new()
        .route(1, "slow", &["A", "B"], |route| {
            route.trip(&["08:00:00", "09:00:00"]);
        })
        .route(2, "fast1", &["A", "X"], |route| {
            route.trip(&["08:05:00", "08:15:00"]);
        })
        .route(3, "fast2", &["X", "B"], |route| {
            route.trip(&["08:20:00", "08:35:00"]);
        })
        .build();
    let mut solver = Solver::new();
    solver.add_period("default", network);

    let departure = time("07:30:00");
    let journeys = solver
        .forward_query_by_names("A", "B", departure, DEFAULT_MAX_ROUNDS, None)
        .unwrap();

    assert_eq!(journeys.len(), 2);
    // most transfers first, arrival increasing, transfer count decreasing
    assert_eq!(journeys[0].nb_of_transfers(), 1);
    assert_eq!(journeys[0].arrival_time(), time("08:35:00"));
    assert_eq!(journeys[1].nb_of_transfers(), 0);
    assert_eq!(journeys[1].arrival_time(), time("09:00:00"));

    for journey in &journeys {
        assert_temporally_consistent(journey);
        assert!(journey.departure_time() >= departure);
    }
    // no pair where one weakly dominates the other
    for (i, journey) in journeys.iter().enumerate() {
        for other in &journeys[i + 1..] {
            let dominated = journey.arrival_time() <= other.arrival_time()
                && journey.nb_of_transfers() <= other.nb_of_transfers();
            let dominates = other.arrival_time() <= journey.arrival_time()
                && other.nb_of_transfers() <= journey.nb_of_transfers();
            assert!(!dominated && !dominates);
        }
    }
}

#[test]
fn test_trip_departing_exactly_at_query_time_is_boardable() {
    init_logger();
    let network = NetworkBuilder::new()
        .route(1, "1", &["A", "B"], |route| {
            route.trip(&["08:00:00", "08:10:00"]);
        })
        .build();
    let mut solver = Solver::new();
    solver.add_period("default", network);

    let journeys = solver
        .forward_query_by_names("A", "B", time("08:00:00"), DEFAULT_MAX_ROUNDS, None)
        .unwrap();
    assert_eq!(journeys.len(), 1);
    assert_eq!(journeys[0].departure_time(), time("08:00:00"));
}

#[test]
fn test_origin_equal_to_destination_yields_no_journey() {
    init_logger();
    let mut solver = marseille_solver();
    let stop_id = {
        let network = solver.network().unwrap();
        let index = massilia::stop_search::stops_matching(network, "La Timone")
            .next()
            .unwrap();
        network.stop(index).id
    };

    let journeys = solver
        .forward_query(&[stop_id], &[stop_id], time("08:00:00"), DEFAULT_MAX_ROUNDS, None)
        .unwrap();
    assert!(journeys.is_empty());
}

#[test]
fn test_unknown_stop_ids_give_empty_result() {
    init_logger();
    let mut solver = marseille_solver();
    let journeys = solver
        .forward_query(&[9999], &[8888], time("08:00:00"), DEFAULT_MAX_ROUNDS, None)
        .unwrap();
    assert!(journeys.is_empty());
}

#[test]
fn test_empty_inputs_are_rejected() {
    init_logger();
    let mut solver = marseille_solver();
    assert!(solver
        .forward_query(&[], &[1], time("08:00:00"), DEFAULT_MAX_ROUNDS, None)
        .is_err());
    assert!(solver
        .forward_query(&[1], &[], time("08:00:00"), DEFAULT_MAX_ROUNDS, None)
        .is_err());
}

#[test]
fn test_period_switching() {
    init_logger();
    let mut solver = Solver::new();
    solver.add_period(
        "winter",
        NetworkBuilder::new()
            .route(1, "1", &["A", "B"], |route| {
                route.trip(&["08:00:00", "08:10:00"]);
            })
            .build(),
    );
    solver.add_period(
        "summer",
        NetworkBuilder::new()
            .route(1, "1", &["A", "B"], |route| {
                route.trip(&["09:00:00", "09:10:00"]);
            })
            .build(),
    );

    assert_eq!(solver.current_period(), Some("winter"));
    assert_eq!(solver.available_periods(), vec!["summer", "winter"]);

    let winter = solver
        .forward_query_by_names("A", "B", time("07:00:00"), DEFAULT_MAX_ROUNDS, None)
        .unwrap();
    assert_eq!(winter[0].departure_time(), time("08:00:00"));

    solver.set_period("summer").unwrap();
    assert_eq!(solver.current_period(), Some("summer"));
    let summer = solver
        .forward_query_by_names("A", "B", time("07:00:00"), DEFAULT_MAX_ROUNDS, None)
        .unwrap();
    assert_eq!(summer[0].departure_time(), time("09:00:00"));

    assert!(solver.set_period("spring").is_err());
    // a failed switch leaves the active period untouched
    assert_eq!(solver.current_period(), Some("summer"));
}
