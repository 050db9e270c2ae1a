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

//! Builder used by tests and examples to assemble a small [`Network`]
//! without going through binary files, and to serialize the very same
//! description to the binary formats when a test wants to exercise the
//! loader on real bytes.

use std::collections::HashMap;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::model::{Route, Stop};
use crate::network::Network;
use crate::time::{PositiveDuration, SecondsSinceDayStart};

/// Builder used to easily create a `Network`.
///
/// Stops are created on first mention and keyed by their full reference
/// string. A reference of the form `"name@platform"` creates a stop
/// whose display name is only the part before the `@` : this is how two
/// distinct stops sharing a display name (one platform per line, linked
/// by the implicit same-name transfer) are described.
/// Trips may be declared in any order : `build()` sorts them by
/// first-stop time, as the loader does.
///
/// ```
/// # use massilia::modelbuilder::NetworkBuilder;
/// let network = NetworkBuilder::new()
///     .route(1, "M1", &["A", "B", "C"], |route| {
///         route
///             .trip(&["10:00:00", "10:05:00", "10:10:00"])
///             .trip(&["10:10:00", "10:15:00", "10:20:00"]);
///     })
///     .transfer("B", "C", "00:02:00")
///     .build();
/// assert_eq!(network.nb_of_stops(), 3);
/// ```
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    stops: Vec<StopDef>,
    stop_by_reference: HashMap<String, usize>,
    routes: Vec<RouteDef>,
}

#[derive(Debug)]
struct StopDef {
    id: u32,
    name: String,
    lat: f64,
    lon: f64,
    route_ids: Vec<u32>,
    transfers: Vec<(usize, PositiveDuration)>,
}

#[derive(Debug)]
struct RouteDef {
    id: u32,
    name: String,
    pattern: Vec<usize>,
    trips: Vec<Vec<SecondsSinceDayStart>>,
}

pub struct RouteBuilder<'a> {
    nb_of_positions: usize,
    trips: &'a mut Vec<Vec<SecondsSinceDayStart>>,
}

impl<'a> RouteBuilder<'a> {
    /// Adds one trip, as "HH:MM:SS" times, one per pattern stop.
    pub fn trip(&mut self, times: &[&str]) -> &mut Self {
        assert_eq!(
            times.len(),
            self.nb_of_positions,
            "a trip must give one time per stop of the pattern"
        );
        let row = times
            .iter()
            .map(|time| {
                time.parse::<SecondsSinceDayStart>()
                    .unwrap_or_else(|err| panic!("{}", err))
            })
            .collect();
        self.trips.push(row);
        self
    }
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a stop explicitly, with coordinates. Only needed when
    /// the coordinates matter : stops referenced by routes or transfers
    /// are otherwise created on the fly.
    pub fn stop(mut self, name: &str, lat: f64, lon: f64) -> Self {
        let index = self.ensure_stop(name);
        self.stops[index].lat = lat;
        self.stops[index].lon = lon;
        self
    }

    /// Adds a route and its trips.
    ///
    /// Several routes may share an `id` : this is how directional
    /// variants of one line are described.
    pub fn route<F>(mut self, id: u32, name: &str, pattern: &[&str], mut route_initer: F) -> Self
    where
        F: FnMut(&mut RouteBuilder<'_>),
    {
        let pattern: Vec<usize> = pattern.iter().map(|name| self.ensure_stop(name)).collect();
        for &stop in &pattern {
            let route_ids = &mut self.stops[stop].route_ids;
            if !route_ids.contains(&id) {
                route_ids.push(id);
            }
        }
        let mut trips = Vec::new();
        let mut builder = RouteBuilder {
            nb_of_positions: pattern.len(),
            trips: &mut trips,
        };
        route_initer(&mut builder);
        self.routes.push(RouteDef {
            id,
            name: name.to_string(),
            pattern,
            trips,
        });
        self
    }

    /// Adds a directed walking transfer between two stops.
    pub fn transfer(mut self, from: &str, to: &str, duration: &str) -> Self {
        let walk = duration
            .parse::<PositiveDuration>()
            .unwrap_or_else(|err| panic!("{}", err));
        let from = self.ensure_stop(from);
        let to = self.ensure_stop(to);
        self.stops[from].transfers.push((to, walk));
        self
    }

    pub fn build(self) -> Network {
        let ids: Vec<u32> = self.stops.iter().map(|stop| stop.id).collect();
        let stops = self
            .stops
            .into_iter()
            .map(|def| Stop {
                id: def.id,
                name: def.name,
                lat: def.lat,
                lon: def.lon,
                route_ids: def.route_ids,
                transfers: def
                    .transfers
                    .into_iter()
                    .map(|(target, walk)| (ids[target], walk))
                    .collect(),
            })
            .collect();
        let routes = self
            .routes
            .into_iter()
            .map(|def| {
                let stop_ids = def.pattern.iter().map(|&stop| ids[stop]).collect();
                let mut trips = def.trips;
                trips.sort_by_key(|row| row.first().copied().unwrap_or(SecondsSinceDayStart::MAX));
                Route::new(def.id, def.name, stop_ids, trips)
            })
            .collect();
        Network::new(stops, routes)
    }

    /// Serializes the stops to the binary stops format (`version` 1
    /// or 2 ; the stop-level layout is the same in both).
    pub fn write_stops(&self, version: u16) -> Vec<u8> {
        assert!(version == 1 || version == 2);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(if version == 1 { b"RSTS" } else { b"RST2" });
        bytes.write_u16::<LittleEndian>(version).unwrap();
        bytes.write_u32::<LittleEndian>(self.stops.len() as u32).unwrap();
        for stop in &self.stops {
            bytes.write_u32::<LittleEndian>(stop.id).unwrap();
            write_name(&mut bytes, &stop.name);
            bytes.write_f64::<LittleEndian>(stop.lat).unwrap();
            bytes.write_f64::<LittleEndian>(stop.lon).unwrap();
            bytes
                .write_u32::<LittleEndian>(stop.route_ids.len() as u32)
                .unwrap();
            for &route_id in &stop.route_ids {
                bytes.write_u32::<LittleEndian>(route_id).unwrap();
            }
            bytes
                .write_u32::<LittleEndian>(stop.transfers.len() as u32)
                .unwrap();
            for &(target, walk) in &stop.transfers {
                bytes
                    .write_u32::<LittleEndian>(self.stops[target].id)
                    .unwrap();
                bytes
                    .write_i32::<LittleEndian>(walk.total_seconds() as i32)
                    .unwrap();
            }
        }
        bytes
    }

    /// Serializes the routes to the binary routes format.
    ///
    /// In v1 the trips are written in declaration order (the loader must
    /// sort them) ; in v2 they are written sorted by first-stop time, as
    /// the format requires.
    pub fn write_routes(&self, version: u16) -> Vec<u8> {
        assert!(version == 1 || version == 2);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(if version == 1 { b"RRTS" } else { b"RRT2" });
        bytes.write_u16::<LittleEndian>(version).unwrap();
        bytes.write_u32::<LittleEndian>(self.routes.len() as u32).unwrap();
        for route in &self.routes {
            bytes.write_u32::<LittleEndian>(route.id).unwrap();
            write_name(&mut bytes, &route.name);
            bytes
                .write_u32::<LittleEndian>(route.pattern.len() as u32)
                .unwrap();
            bytes.write_u32::<LittleEndian>(route.trips.len() as u32).unwrap();
            for &stop in &route.pattern {
                bytes.write_u32::<LittleEndian>(self.stops[stop].id).unwrap();
            }
            match version {
                1 => {
                    for (trip_id, row) in route.trips.iter().enumerate() {
                        bytes.write_u32::<LittleEndian>(trip_id as u32).unwrap();
                        write_delta_row(&mut bytes, row);
                    }
                }
                _ => {
                    let mut sorted: Vec<&Vec<SecondsSinceDayStart>> = route.trips.iter().collect();
                    sorted.sort_by_key(|row| {
                        row.first().copied().unwrap_or(SecondsSinceDayStart::MAX)
                    });
                    for trip_id in 0..sorted.len() {
                        bytes.write_u32::<LittleEndian>(trip_id as u32).unwrap();
                    }
                    for row in sorted {
                        write_delta_row(&mut bytes, row);
                    }
                }
            }
        }
        bytes
    }

    fn ensure_stop(&mut self, reference: &str) -> usize {
        if let Some(&index) = self.stop_by_reference.get(reference) {
            return index;
        }
        let display_name = reference.split('@').next().unwrap_or(reference);
        let index = self.stops.len();
        self.stops.push(StopDef {
            id: index as u32,
            name: display_name.to_string(),
            lat: 0.0,
            lon: 0.0,
            route_ids: Vec::new(),
            transfers: Vec::new(),
        });
        self.stop_by_reference.insert(reference.to_string(), index);
        index
    }
}

fn write_name(bytes: &mut Vec<u8>, name: &str) {
    bytes.write_u16::<LittleEndian>(name.len() as u16).unwrap();
    bytes.extend_from_slice(name.as_bytes());
}

fn write_delta_row(bytes: &mut Vec<u8>, row: &[SecondsSinceDayStart]) {
    let mut previous = 0i32;
    for time in row {
        let seconds = time.total_seconds();
        bytes.write_i32::<LittleEndian>(seconds - previous).unwrap();
        previous = seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;
    use std::io::Cursor;

    fn builder() -> NetworkBuilder {
        NetworkBuilder::new()
            .route(1, "M1", &["A", "B", "C"], |route| {
                // declared out of order on purpose
                route
                    .trip(&["10:10:00", "10:15:00", "10:20:00"])
                    .trip(&["10:00:00", "10:05:00", "10:10:00"]);
            })
            .transfer("B", "C", "00:02:00")
    }

    #[test]
    fn build_sorts_trips_by_first_stop_time() {
        let network = builder().build();
        let route = network.route(0);
        assert_eq!(route.nb_of_trips(), 2);
        assert!(route.time(0, 0) < route.time(1, 0));
    }

    #[test]
    fn binary_round_trip_both_versions() {
        let reference = builder().build();
        let builder = builder();
        for version in [1u16, 2u16] {
            let network = dataset::read_network(
                Cursor::new(builder.write_stops(version)),
                Cursor::new(builder.write_routes(version)),
            )
            .unwrap();
            assert_eq!(network.nb_of_stops(), reference.nb_of_stops());
            assert_eq!(network.nb_of_routes(), reference.nb_of_routes());
            let route = network.route(0);
            assert_eq!(route.nb_of_trips(), 2);
            // trips come out sorted whatever the on-disk order
            assert!(route.time(0, 0) < route.time(1, 0));
            assert_eq!(
                route.time(0, 2),
                SecondsSinceDayStart::from_hms(10, 10, 0)
            );
        }
    }
}
