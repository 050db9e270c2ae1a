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

use std::collections::{BTreeMap, HashMap};

use crate::model::{Route, Stop};
use crate::time::PositiveDuration;

/// Walk duration applied to implicit transfers between two stops that
/// share the same display name.
pub const SAME_NAME_TRANSFER_DURATION: PositiveDuration = PositiveDuration::from_hms(0, 2, 0);

/// Sentinel stored in place of a stop index when the referenced stop id
/// is absent from the dataset. Skipped at scan time.
pub const UNKNOWN_STOP: i32 = -1;

/// The stops and routes of one dataset, together with the derived
/// indices the routing engine traverses. Immutable once built.
#[derive(Debug)]
pub struct Network {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    stop_id_to_index: BTreeMap<u32, usize>,
    /// For each stop index, the internal indices of the routes serving it,
    /// expanded across all route objects sharing a referenced route id.
    routes_by_stop: Vec<Vec<usize>>,
    /// For each route, the global stop index of each pattern position,
    /// `UNKNOWN_STOP` where the pattern references an absent stop id.
    route_stop_indices: Vec<Vec<i32>>,
    /// Explicit walking transfers, targets resolved to stop indices.
    explicit_transfers: Vec<Vec<(i32, PositiveDuration)>>,
    /// For each stop index, the other stop indices bearing the same
    /// display name. Symmetric, self-excluded, deduplicated.
    implicit_transfers: Vec<Vec<usize>>,
}

impl Network {
    pub fn new(stops: Vec<Stop>, routes: Vec<Route>) -> Self {
        let stop_id_to_index: BTreeMap<u32, usize> = stops
            .iter()
            .enumerate()
            .map(|(index, stop)| (stop.id, index))
            .collect();

        let mut routes_by_id: HashMap<u32, Vec<usize>> = HashMap::new();
        for (route_index, route) in routes.iter().enumerate() {
            routes_by_id.entry(route.id).or_default().push(route_index);
        }

        let routes_by_stop = stops
            .iter()
            .map(|stop| {
                let mut serving: Vec<usize> = stop
                    .route_ids
                    .iter()
                    .filter_map(|route_id| routes_by_id.get(route_id))
                    .flatten()
                    .copied()
                    .collect();
                serving.sort_unstable();
                serving.dedup();
                serving
            })
            .collect();

        let route_stop_indices = routes
            .iter()
            .map(|route| {
                route
                    .stop_ids
                    .iter()
                    .map(|stop_id| {
                        stop_id_to_index
                            .get(stop_id)
                            .map_or(UNKNOWN_STOP, |&index| index as i32)
                    })
                    .collect()
            })
            .collect();

        let explicit_transfers = stops
            .iter()
            .map(|stop| {
                stop.transfers
                    .iter()
                    .map(|&(target_id, walk)| {
                        let target = stop_id_to_index
                            .get(&target_id)
                            .map_or(UNKNOWN_STOP, |&index| index as i32);
                        (target, walk)
                    })
                    .collect()
            })
            .collect();

        let implicit_transfers = {
            let mut stops_by_name: HashMap<&str, Vec<usize>> = HashMap::new();
            for (index, stop) in stops.iter().enumerate() {
                stops_by_name.entry(stop.name.as_str()).or_default().push(index);
            }
            stops
                .iter()
                .enumerate()
                .map(|(index, stop)| {
                    stops_by_name[stop.name.as_str()]
                        .iter()
                        .copied()
                        .filter(|&other| other != index)
                        .collect()
                })
                .collect()
        };

        Self {
            stops,
            routes,
            stop_id_to_index,
            routes_by_stop,
            route_stop_indices,
            explicit_transfers,
            implicit_transfers,
        }
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn nb_of_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn stop_index(&self, stop_id: u32) -> Option<usize> {
        self.stop_id_to_index.get(&stop_id).copied()
    }

    pub fn stop(&self, index: usize) -> &Stop {
        &self.stops[index]
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn route(&self, index: usize) -> &Route {
        &self.routes[index]
    }

    pub(crate) fn routes_at(&self, stop_index: usize) -> &[usize] {
        &self.routes_by_stop[stop_index]
    }

    pub(crate) fn route_stop_indices(&self, route_index: usize) -> &[i32] {
        &self.route_stop_indices[route_index]
    }

    pub(crate) fn explicit_transfers_at(&self, stop_index: usize) -> &[(i32, PositiveDuration)] {
        &self.explicit_transfers[stop_index]
    }

    pub(crate) fn implicit_transfers_at(&self, stop_index: usize) -> &[usize] {
        &self.implicit_transfers[stop_index]
    }

    /// Display name of the last known stop of the route's pattern, used as
    /// the headsign of journey legs riding this route.
    pub fn direction_of(&self, route_index: usize) -> &str {
        self.route_stop_indices[route_index]
            .iter()
            .rev()
            .find(|&&index| index != UNKNOWN_STOP)
            .map_or("", |&index| self.stops[index as usize].name.as_str())
    }

    /// Gathers into `out_buffer` the routes serving any of the stops in
    /// `marked_stops`, each route written once.
    ///
    /// `seen_scratch` must be a `nb_of_routes()`-sized buffer, all false ;
    /// it is used for deduplication and handed back all false, so repeated
    /// calls allocate nothing.
    pub fn collect_routes_serving(
        &self,
        marked_stops: &[usize],
        seen_scratch: &mut [bool],
        out_buffer: &mut Vec<usize>,
    ) -> usize {
        debug_assert_eq!(seen_scratch.len(), self.routes.len());
        debug_assert!(seen_scratch.iter().all(|seen| !seen));
        out_buffer.clear();
        for &stop in marked_stops {
            for &route in &self.routes_by_stop[stop] {
                if !seen_scratch[route] {
                    seen_scratch[route] = true;
                    out_buffer.push(route);
                }
            }
        }
        for &route in out_buffer.iter() {
            seen_scratch[route] = false;
        }
        out_buffer.len()
    }
}
