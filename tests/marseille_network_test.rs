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

//! End-to-end scenarios over the Marseille-shaped fixture network.

mod utils;

use massilia::filters::parse_filters;
use massilia::DEFAULT_MAX_ROUNDS;
use utils::{init_logger, marseille_solver, time};

#[test]
fn test_vieux_port_to_la_rose_morning() {
    init_logger();
    let mut solver = marseille_solver();
    let journeys = solver
        .forward_query_by_names(
            "Vieux-Port",
            "La Rose",
            time("08:00:00"),
            DEFAULT_MAX_ROUNDS,
            None,
        )
        .unwrap();

    assert!(!journeys.is_empty());
    for journey in &journeys {
        assert!(journey.arrival_time() > time("08:00:00"));
    }
    // transfer counts strictly decrease along the list
    for pair in journeys.windows(2) {
        assert!(pair[0].nb_of_transfers() > pair[1].nb_of_transfers());
    }
    assert!(journeys
        .iter()
        .any(|journey| journey.legs.iter().any(|leg| leg.route_name() == Some("M1"))));
}

#[test]
fn test_castellane_to_bougainville_same_day() {
    init_logger();
    let mut solver = marseille_solver();
    let journeys = solver
        .forward_query_by_names(
            "Castellane",
            "Bougainville",
            time("08:00:00"),
            DEFAULT_MAX_ROUNDS,
            None,
        )
        .unwrap();

    assert!(!journeys.is_empty());
    for journey in &journeys {
        assert!(journey.arrival_time() < time("24:00:00"));
    }
}

#[test]
fn test_saint_charles_to_prado_is_a_direct_metro() {
    init_logger();
    let mut solver = marseille_solver();
    let journeys = solver
        .forward_query_by_names(
            "Gare Saint-Charles",
            "Rond-Point du Prado",
            time("08:00:00"),
            DEFAULT_MAX_ROUNDS,
            None,
        )
        .unwrap();

    assert!(journeys
        .iter()
        .any(|journey| journey.nb_of_transit_legs() == 1
            && journey.legs[0].route_name() == Some("M2")));
}

#[test]
fn test_line_change_pays_the_same_name_transfer() {
    init_logger();
    let mut solver = marseille_solver();
    let journeys = solver
        .forward_query_by_names(
            "Vieux-Port",
            "Bougainville",
            time("08:00:00"),
            DEFAULT_MAX_ROUNDS,
            None,
        )
        .unwrap();

    assert!(!journeys.is_empty());
    let journey = &journeys[0];
    assert_eq!(journey.nb_of_transit_legs(), 2);
    let walk = journey
        .legs
        .iter()
        .find(|leg| leg.is_transfer())
        .expect("a line change needs a platform walk");
    assert_eq!(
        walk.arrival_time.total_seconds() - walk.departure_time.total_seconds(),
        120
    );
}

#[test]
fn test_blocking_every_serving_line_gives_no_journey() {
    init_logger();
    let mut solver = marseille_solver();
    let filter = parse_filters(&[] as &[&str], &["name:M1", "name:B52"]).unwrap();
    let journeys = solver
        .forward_query_by_names(
            "Vieux-Port",
            "La Rose",
            time("08:00:00"),
            DEFAULT_MAX_ROUNDS,
            Some(&filter),
        )
        .unwrap();
    assert!(journeys.is_empty());
}

#[test]
fn test_journey_structure_is_stable_across_runs() {
    init_logger();
    let signatures = |solver: &mut massilia::Solver| {
        solver
            .forward_query_by_names(
                "Vieux-Port",
                "La Rose",
                time("08:00:00"),
                DEFAULT_MAX_ROUNDS,
                None,
            )
            .unwrap()
            .iter()
            .map(|journey| journey.signature())
            .collect::<Vec<_>>()
    };
    let mut first_solver = marseille_solver();
    let mut second_solver = marseille_solver();
    let first = signatures(&mut first_solver);
    let again = signatures(&mut first_solver);
    let other_instance = signatures(&mut second_solver);
    assert!(!first.is_empty());
    assert_eq!(first, again);
    assert_eq!(first, other_instance);
}
