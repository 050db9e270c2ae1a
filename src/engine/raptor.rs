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

use crate::engine::routing_state::{ParentEntry, RoutingState, NONE};
use crate::filters::RouteFilter;
use crate::network::{Network, SAME_NAME_TRANSFER_DURATION, UNKNOWN_STOP};
use crate::time::{PositiveDuration, SecondsSinceDayStart};

pub const DEFAULT_MAX_ROUNDS: usize = 5;

/// One earliest-arrival computation : origin and destination stop
/// indices, a departure time, and the round limit.
#[derive(Debug)]
pub struct Request<'a> {
    pub origins: &'a [usize],
    pub destinations: &'a [usize],
    pub departure_time: SecondsSinceDayStart,
    pub max_rounds: usize,
    pub filter: Option<&'a RouteFilter>,
}

/// The round-based earliest-arrival engine.
///
/// Round `k` holds the earliest arrivals reachable with at most `k`
/// boarded trips, any number of walking transfers in between. Each round
/// scans the routes serving the stops improved in the previous round,
/// then relaxes walking transfers from the stops improved in this one.
///
/// Owns its [`RoutingState`] and is therefore exclusive to one caller ;
/// the network it computes against is shared and read-only.
pub struct Raptor {
    state: RoutingState,
}

impl Raptor {
    pub fn new(network: &Network) -> Self {
        Self {
            state: RoutingState::new(
                network.nb_of_stops(),
                network.nb_of_routes(),
                DEFAULT_MAX_ROUNDS,
            ),
        }
    }

    pub(crate) fn state(&self) -> &RoutingState {
        &self.state
    }

    /// Fills the routing state for `request` and returns the earliest
    /// arrival found across the destinations, at any round
    /// ([`SecondsSinceDayStart::MAX`] when unreachable).
    ///
    /// Deterministic : identical inputs yield an identical state.
    pub fn compute(&mut self, network: &Network, request: &Request<'_>) -> SecondsSinceDayStart {
        debug_assert!(request
            .origins
            .iter()
            .chain(request.destinations)
            .all(|&stop| stop < network.nb_of_stops()));

        self.state.ensure_rounds(request.max_rounds);
        self.state.reset();
        self.state.set_destinations(request.destinations);

        for &origin in request.origins {
            if request.departure_time < self.state.best_arrival[0][origin] {
                self.state.best_arrival[0][origin] = request.departure_time;
            }
            self.state.mark(origin);
        }

        let mut best_at_destination = SecondsSinceDayStart::MAX;

        for round in 1..=request.max_rounds {
            self.state.shift_marks();
            if self.state.marked_prev_list.is_empty() {
                break;
            }
            self.state.copy_round(round);

            {
                let state = &mut self.state;
                network.collect_routes_serving(
                    &state.marked_prev_list,
                    &mut state.route_scratch,
                    &mut state.routes_to_scan,
                );
            }
            for index in 0..self.state.routes_to_scan.len() {
                let route_index = self.state.routes_to_scan[index];
                if let Some(filter) = request.filter {
                    if !filter.allows(network.route(route_index)) {
                        continue;
                    }
                }
                self.scan_route(network, route_index, round, &mut best_at_destination);
            }

            self.scan_transfers(network, round);

            for &destination in request.destinations {
                let arrival = self.state.best_arrival[round][destination];
                if arrival < best_at_destination {
                    best_at_destination = arrival;
                }
            }

            // nothing improved : further rounds cannot either
            if self.state.marked_list.is_empty() {
                break;
            }
        }

        best_at_destination
    }

    /// Traverses the pattern of one route, riding the earliest catchable
    /// trip and improving arrivals along the way.
    fn scan_route(
        &mut self,
        network: &Network,
        route_index: usize,
        round: usize,
        best_at_destination: &mut SecondsSinceDayStart,
    ) {
        let route = network.route(route_index);
        if route.nb_of_trips() == 0 {
            return;
        }
        let stop_indices = network.route_stop_indices(route_index);
        let state = &mut self.state;

        let mut trip: Option<usize> = None;
        let mut board_stop = UNKNOWN_STOP;
        let mut board_position = NONE;
        let mut board_time = SecondsSinceDayStart::MAX;

        for (position, &stop_index) in stop_indices.iter().enumerate() {
            if stop_index == UNKNOWN_STOP {
                continue;
            }
            let stop = stop_index as usize;

            // Alight first, reconsider boarding after : a traveller who
            // reached this stop in the previous round is presumed to have
            // just alighted here, and cannot hop on an earlier trip of
            // the same route at the same instant.
            if let Some(current_trip) = trip {
                let arrival = route.time(current_trip, position);
                if arrival < state.best_arrival[round][stop] && arrival < *best_at_destination {
                    state.best_arrival[round][stop] = arrival;
                    state.parents[round].set(
                        stop,
                        ParentEntry {
                            parent_stop: board_stop,
                            parent_round: (round - 1) as i32,
                            route: route_index as i32,
                            board_time,
                            trip: current_trip as i32,
                            board_position,
                            alight_position: position as i32,
                        },
                    );
                    if !state.marked[stop] {
                        state.marked[stop] = true;
                        state.marked_list.push(stop);
                    }
                    if state.is_destination[stop] {
                        *best_at_destination = arrival;
                    }
                }
            }

            if state.marked_prev[stop] {
                let waiting_from = state.best_arrival[round - 1][stop];
                if let Some(candidate) = route.earliest_trip_to_board(position, waiting_from) {
                    let departs_earlier = match trip {
                        None => true,
                        Some(current_trip) => {
                            route.time(candidate, position) < route.time(current_trip, position)
                        }
                    };
                    if departs_earlier {
                        trip = Some(candidate);
                        board_stop = stop_index;
                        board_position = position as i32;
                        board_time = route.time(candidate, position);
                    }
                }
            }
        }
    }

    /// Relaxes the walking transfers leaving every stop improved in this
    /// round. The marked list is snapshot before iterating : a stop newly
    /// reached by a transfer only becomes a transfer source in the next
    /// round, which keeps walking paths bounded.
    fn scan_transfers(&mut self, network: &Network, round: usize) {
        let state = &mut self.state;
        let nb_of_marked = state.marked_list.len();
        for index in 0..nb_of_marked {
            let stop = state.marked_list[index];
            let arrival = state.best_arrival[round][stop];
            for &(target, walk) in network.explicit_transfers_at(stop) {
                if target == UNKNOWN_STOP || target as usize == stop {
                    continue;
                }
                Self::relax_transfer(state, round, stop, target as usize, arrival, walk);
            }
            for &target in network.implicit_transfers_at(stop) {
                Self::relax_transfer(
                    state,
                    round,
                    stop,
                    target,
                    arrival,
                    SAME_NAME_TRANSFER_DURATION,
                );
            }
        }
    }

    fn relax_transfer(
        state: &mut RoutingState,
        round: usize,
        from: usize,
        to: usize,
        from_arrival: SecondsSinceDayStart,
        walk: PositiveDuration,
    ) {
        let arrival = from_arrival + walk;
        if arrival < state.best_arrival[round][to] {
            state.best_arrival[round][to] = arrival;
            state.parents[round].set(
                to,
                ParentEntry {
                    parent_stop: from as i32,
                    parent_round: round as i32,
                    route: NONE,
                    board_time: from_arrival,
                    trip: NONE,
                    board_position: NONE,
                    alight_position: NONE,
                },
            );
            if !state.marked[to] {
                state.marked[to] = true;
                state.marked_list.push(to);
            }
        }
    }
}
