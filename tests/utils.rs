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

#![allow(dead_code)]

use massilia::modelbuilder::{NetworkBuilder, RouteBuilder};
use massilia::{SecondsSinceDayStart, Solver};

pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .try_init();
}

/// Adds `nb_of_trips` trips at a fixed headway. `minutes_from_start[p]`
/// is the offset of the p-th pattern stop from the trip's departure.
pub fn add_trips(
    route: &mut RouteBuilder<'_>,
    first_departure: &str,
    headway_minutes: i32,
    nb_of_trips: usize,
    minutes_from_start: &[i32],
) {
    let first: SecondsSinceDayStart = first_departure.parse().unwrap();
    for trip in 0..nb_of_trips {
        let departure = first.total_seconds() + (trip as i32) * headway_minutes * 60;
        let times: Vec<String> = minutes_from_start
            .iter()
            .map(|&offset| SecondsSinceDayStart::from_seconds(departure + offset * 60).to_string())
            .collect();
        let times: Vec<&str> = times.iter().map(String::as_str).collect();
        route.trip(&times);
    }
}

/// A small network shaped like the Marseille metro : two metro lines
/// crossing at Gare Saint-Charles and Castellane (one platform per
/// line, linked by the implicit same-name transfer), and a slow bus
/// doubling the Vieux-Port -> La Rose link.
pub fn marseille() -> NetworkBuilder {
    const M1_OFFSETS: &[i32] = &[0, 3, 6, 9, 12, 15];
    const M2_OFFSETS: &[i32] = &[0, 4, 8, 12, 15, 18];
    const B52_OFFSETS: &[i32] = &[0, 12, 25, 40];

    NetworkBuilder::new()
        .route(
            1,
            "M1",
            &[
                "La Rose@M1",
                "Cinq Avenues@M1",
                "Gare Saint-Charles@M1",
                "Vieux-Port@M1",
                "Castellane@M1",
                "La Timone@M1",
            ],
            |route| add_trips(route, "07:00:00", 10, 18, M1_OFFSETS),
        )
        .route(
            1,
            "M1",
            &[
                "La Timone@M1",
                "Castellane@M1",
                "Vieux-Port@M1",
                "Gare Saint-Charles@M1",
                "Cinq Avenues@M1",
                "La Rose@M1",
            ],
            |route| add_trips(route, "07:05:00", 10, 18, M1_OFFSETS),
        )
        .route(
            2,
            "M2",
            &[
                "Bougainville@M2",
                "Joliette@M2",
                "Gare Saint-Charles@M2",
                "Castellane@M2",
                "Rond-Point du Prado@M2",
                "Sainte-Marguerite Dromel@M2",
            ],
            |route| add_trips(route, "07:02:00", 10, 18, M2_OFFSETS),
        )
        .route(
            2,
            "M2",
            &[
                "Sainte-Marguerite Dromel@M2",
                "Rond-Point du Prado@M2",
                "Castellane@M2",
                "Gare Saint-Charles@M2",
                "Joliette@M2",
                "Bougainville@M2",
            ],
            |route| add_trips(route, "07:03:00", 10, 18, M2_OFFSETS),
        )
        .route(
            52,
            "B52",
            &[
                "Vieux-Port@B52",
                "Longchamp@B52",
                "Saint-Just@B52",
                "La Rose@B52",
            ],
            |route| add_trips(route, "07:10:00", 20, 7, B52_OFFSETS),
        )
}

pub fn marseille_solver() -> Solver {
    let mut solver = Solver::new();
    solver.add_period("winter_2020", marseille().build());
    solver
}

pub fn time(s: &str) -> SecondsSinceDayStart {
    s.parse().unwrap()
}
