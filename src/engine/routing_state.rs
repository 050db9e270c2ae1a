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

use crate::time::SecondsSinceDayStart;

/// Sentinel for "no parent" / "not a transit leg" fields.
pub(crate) const NONE: i32 = -1;

/// How the best arrival at one (round, stop) cell was obtained.
/// `route == NONE` means a walking transfer ; otherwise a transit leg
/// boarded on `trip` of `route` at `board_position`, alighted at
/// `alight_position`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParentEntry {
    pub parent_stop: i32,
    pub parent_round: i32,
    pub route: i32,
    pub board_time: SecondsSinceDayStart,
    pub trip: i32,
    pub board_position: i32,
    pub alight_position: i32,
}

impl ParentEntry {
    fn none() -> Self {
        Self {
            parent_stop: NONE,
            parent_round: NONE,
            route: NONE,
            board_time: SecondsSinceDayStart::MAX,
            trip: NONE,
            board_position: NONE,
            alight_position: NONE,
        }
    }
}

/// Parent pointers of one round, kept as seven parallel arrays rather
/// than an array of structs : the route scan touches at most two of the
/// seven fields per stop.
#[derive(Debug)]
pub(crate) struct ParentArrays {
    parent_stop: Vec<i32>,
    parent_round: Vec<i32>,
    route: Vec<i32>,
    board_time: Vec<SecondsSinceDayStart>,
    trip: Vec<i32>,
    board_position: Vec<i32>,
    alight_position: Vec<i32>,
}

impl ParentArrays {
    fn new(nb_of_stops: usize) -> Self {
        Self {
            parent_stop: vec![NONE; nb_of_stops],
            parent_round: vec![NONE; nb_of_stops],
            route: vec![NONE; nb_of_stops],
            board_time: vec![SecondsSinceDayStart::MAX; nb_of_stops],
            trip: vec![NONE; nb_of_stops],
            board_position: vec![NONE; nb_of_stops],
            alight_position: vec![NONE; nb_of_stops],
        }
    }

    fn reset(&mut self) {
        self.parent_stop.fill(NONE);
        self.parent_round.fill(NONE);
        self.route.fill(NONE);
        self.board_time.fill(SecondsSinceDayStart::MAX);
        self.trip.fill(NONE);
        self.board_position.fill(NONE);
        self.alight_position.fill(NONE);
    }

    fn copy_from(&mut self, other: &ParentArrays) {
        self.parent_stop.copy_from_slice(&other.parent_stop);
        self.parent_round.copy_from_slice(&other.parent_round);
        self.route.copy_from_slice(&other.route);
        self.board_time.copy_from_slice(&other.board_time);
        self.trip.copy_from_slice(&other.trip);
        self.board_position.copy_from_slice(&other.board_position);
        self.alight_position.copy_from_slice(&other.alight_position);
    }

    pub(crate) fn set(&mut self, stop: usize, entry: ParentEntry) {
        self.parent_stop[stop] = entry.parent_stop;
        self.parent_round[stop] = entry.parent_round;
        self.route[stop] = entry.route;
        self.board_time[stop] = entry.board_time;
        self.trip[stop] = entry.trip;
        self.board_position[stop] = entry.board_position;
        self.alight_position[stop] = entry.alight_position;
    }

    pub(crate) fn get(&self, stop: usize) -> ParentEntry {
        ParentEntry {
            parent_stop: self.parent_stop[stop],
            parent_round: self.parent_round[stop],
            route: self.route[stop],
            board_time: self.board_time[stop],
            trip: self.trip[stop],
            board_position: self.board_position[stop],
            alight_position: self.alight_position[stop],
        }
    }
}

/// The mutable arrays of one query : best arrivals per round, parent
/// pointers, mark sets and scan scratch buffers.
///
/// Allocated once per network and reused across queries : `reset()`
/// clears only the rounds dirtied by the previous query, and the mark
/// vectors are cleared through their index lists, so a steady-state
/// query allocates nothing proportional to the network size.
#[derive(Debug)]
pub struct RoutingState {
    nb_of_stops: usize,
    /// `best_arrival[round][stop]` : earliest known arrival at `stop`
    /// using at most `round` boarded trips.
    pub(crate) best_arrival: Vec<Vec<SecondsSinceDayStart>>,
    pub(crate) parents: Vec<ParentArrays>,
    pub(crate) marked: Vec<bool>,
    pub(crate) marked_list: Vec<usize>,
    pub(crate) marked_prev: Vec<bool>,
    pub(crate) marked_prev_list: Vec<usize>,
    pub(crate) is_destination: Vec<bool>,
    destinations: Vec<usize>,
    /// Dedup scratch for [`crate::network::Network::collect_routes_serving`].
    pub(crate) route_scratch: Vec<bool>,
    pub(crate) routes_to_scan: Vec<usize>,
    last_round_used: usize,
}

impl RoutingState {
    pub fn new(nb_of_stops: usize, nb_of_routes: usize, max_rounds: usize) -> Self {
        let best_arrival = (0..=max_rounds)
            .map(|_| vec![SecondsSinceDayStart::MAX; nb_of_stops])
            .collect();
        let parents = (0..=max_rounds).map(|_| ParentArrays::new(nb_of_stops)).collect();
        Self {
            nb_of_stops,
            best_arrival,
            parents,
            marked: vec![false; nb_of_stops],
            marked_list: Vec::new(),
            marked_prev: vec![false; nb_of_stops],
            marked_prev_list: Vec::new(),
            is_destination: vec![false; nb_of_stops],
            destinations: Vec::new(),
            route_scratch: vec![false; nb_of_routes],
            routes_to_scan: Vec::new(),
            last_round_used: 0,
        }
    }

    /// Grows the round axis when a query asks for more rounds than any
    /// previous one. A one-time cost, like the initial allocation.
    pub(crate) fn ensure_rounds(&mut self, max_rounds: usize) {
        while self.best_arrival.len() <= max_rounds {
            self.best_arrival
                .push(vec![SecondsSinceDayStart::MAX; self.nb_of_stops]);
            self.parents.push(ParentArrays::new(self.nb_of_stops));
        }
    }

    pub(crate) fn reset(&mut self) {
        for round in 0..=self.last_round_used {
            self.best_arrival[round].fill(SecondsSinceDayStart::MAX);
            self.parents[round].reset();
        }
        for &stop in &self.marked_list {
            self.marked[stop] = false;
        }
        self.marked_list.clear();
        for &stop in &self.marked_prev_list {
            self.marked_prev[stop] = false;
        }
        self.marked_prev_list.clear();
        for &stop in &self.destinations {
            self.is_destination[stop] = false;
        }
        self.destinations.clear();
        self.last_round_used = 0;
    }

    pub(crate) fn set_destinations(&mut self, destinations: &[usize]) {
        for &stop in destinations {
            if !self.is_destination[stop] {
                self.is_destination[stop] = true;
                self.destinations.push(stop);
            }
        }
    }

    pub(crate) fn mark(&mut self, stop: usize) {
        if !self.marked[stop] {
            self.marked[stop] = true;
            self.marked_list.push(stop);
        }
    }

    /// Marks of the finished round become the previous-round marks ; the
    /// current mark set starts empty.
    pub(crate) fn shift_marks(&mut self) {
        for &stop in &self.marked_prev_list {
            self.marked_prev[stop] = false;
        }
        self.marked_prev_list.clear();
        std::mem::swap(&mut self.marked, &mut self.marked_prev);
        std::mem::swap(&mut self.marked_list, &mut self.marked_prev_list);
    }

    /// Seeds `round` with the previous round's arrivals and parents, so
    /// that arrivals are monotone in the round index and every cell keeps
    /// a parent chain consistent with its value.
    pub(crate) fn copy_round(&mut self, round: usize) {
        debug_assert!(round >= 1);
        let (earlier, current) = self.best_arrival.split_at_mut(round);
        current[0].copy_from_slice(&earlier[round - 1]);
        let (earlier, current) = self.parents.split_at_mut(round);
        current[0].copy_from(&earlier[round - 1]);
        self.last_round_used = self.last_round_used.max(round);
    }

    pub(crate) fn arrival(&self, round: usize, stop: usize) -> SecondsSinceDayStart {
        self.best_arrival[round][stop]
    }

    pub(crate) fn parent(&self, round: usize, stop: usize) -> ParentEntry {
        self.parents[round].get(stop)
    }

    pub(crate) fn last_round_used(&self) -> usize {
        self.last_round_used
    }
}
