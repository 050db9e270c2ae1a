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

use std::fmt::{Display, Formatter};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::engine::{Raptor, Request};
use crate::filters::RouteFilter;
use crate::network::Network;
use crate::periods::{BadPeriod, PeriodRegistry};
use crate::response::Journey;
use crate::stop_search::stops_matching;
use crate::time::SecondsSinceDayStart;

/// Granularity of the arrive-by departure search, in seconds.
const ARRIVE_BY_STEP: i32 = 60;

pub const DEFAULT_ARRIVE_BY_WINDOW_MINUTES: u32 = 120;

/// The public query surface : forward and arrive-by searches, their
/// by-name variants, and period switching.
///
/// Owns the loaded networks and one routing engine per network. All
/// entry points take `&mut self` : the routing state is reused across
/// queries, so a facade instance serves one caller at a time. Callers
/// needing concurrency keep one facade per worker.
#[derive(Default)]
pub struct Solver {
    periods: PeriodRegistry,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a network under a period id. The first registered
    /// period becomes the active one.
    pub fn add_period(&mut self, id: impl Into<String>, network: Network) {
        self.periods.insert(id, network);
    }

    pub fn set_period(&mut self, id: &str) -> Result<(), BadPeriod> {
        self.periods.set_active(id)
    }

    pub fn current_period(&self) -> Option<&str> {
        self.periods.active()
    }

    pub fn available_periods(&self) -> Vec<&str> {
        self.periods.available().collect()
    }

    pub fn network(&self) -> Option<&Network> {
        self.periods.active_network()
    }

    /// Earliest-arrival query : all Pareto-optimal journeys departing
    /// the origins at `departure_time` or later.
    ///
    /// Unknown stop ids are dropped with a warning ; when nothing
    /// remains on either side the result is empty, like any other
    /// unreachable query.
    pub fn forward_query(
        &mut self,
        origin_ids: &[u32],
        destination_ids: &[u32],
        departure_time: SecondsSinceDayStart,
        max_rounds: usize,
        filter: Option<&RouteFilter>,
    ) -> Result<Vec<Journey>, BadRequest> {
        if origin_ids.is_empty() {
            return Err(BadRequest::NoDepartureStop);
        }
        if destination_ids.is_empty() {
            return Err(BadRequest::NoArrivalStop);
        }
        let period = self
            .periods
            .active_period_mut()
            .ok_or(BadRequest::NoActivePeriod)?;
        let origins = resolve_stop_ids(&period.network, origin_ids, "origin");
        let destinations = resolve_stop_ids(&period.network, destination_ids, "destination");
        if origins.is_empty() || destinations.is_empty() {
            return Ok(Vec::new());
        }
        Ok(solve(
            &mut period.engine,
            &period.network,
            &origins,
            &destinations,
            departure_time,
            max_rounds,
            filter,
        ))
    }

    /// Forward query with origins and destinations designated by display
    /// name (case-insensitive substring match).
    pub fn forward_query_by_names(
        &mut self,
        origin_name: &str,
        destination_name: &str,
        departure_time: SecondsSinceDayStart,
        max_rounds: usize,
        filter: Option<&RouteFilter>,
    ) -> Result<Vec<Journey>, BadRequest> {
        let (origins, destinations) = self.resolve_names(origin_name, destination_name)?;
        if origins.is_empty() || destinations.is_empty() {
            return Ok(Vec::new());
        }
        let period = self
            .periods
            .active_period_mut()
            .ok_or(BadRequest::NoActivePeriod)?;
        Ok(solve(
            &mut period.engine,
            &period.network,
            &origins,
            &destinations,
            departure_time,
            max_rounds,
            filter,
        ))
    }

    /// Latest-departure query : among departures (at 60 s granularity,
    /// within `window_minutes` before the deadline) whose best arrival
    /// meets `arrival_deadline`, returns the Pareto set observed for the
    /// latest one.
    pub fn arrive_by_query(
        &mut self,
        origin_ids: &[u32],
        destination_ids: &[u32],
        arrival_deadline: SecondsSinceDayStart,
        max_rounds: usize,
        window_minutes: u32,
        filter: Option<&RouteFilter>,
    ) -> Result<Vec<Journey>, BadRequest> {
        if origin_ids.is_empty() {
            return Err(BadRequest::NoDepartureStop);
        }
        if destination_ids.is_empty() {
            return Err(BadRequest::NoArrivalStop);
        }
        let (origins, destinations) = {
            let period = self
                .periods
                .active_period_mut()
                .ok_or(BadRequest::NoActivePeriod)?;
            (
                resolve_stop_ids(&period.network, origin_ids, "origin"),
                resolve_stop_ids(&period.network, destination_ids, "destination"),
            )
        };
        if origins.is_empty() || destinations.is_empty() {
            return Ok(Vec::new());
        }
        self.arrive_by_on_indices(
            &origins,
            &destinations,
            arrival_deadline,
            max_rounds,
            window_minutes,
            filter,
        )
    }

    /// Arrive-by query with origins and destinations designated by
    /// display name.
    pub fn arrive_by_query_by_names(
        &mut self,
        origin_name: &str,
        destination_name: &str,
        arrival_deadline: SecondsSinceDayStart,
        max_rounds: usize,
        window_minutes: u32,
        filter: Option<&RouteFilter>,
    ) -> Result<Vec<Journey>, BadRequest> {
        let (origins, destinations) = self.resolve_names(origin_name, destination_name)?;
        if origins.is_empty() || destinations.is_empty() {
            return Ok(Vec::new());
        }
        self.arrive_by_on_indices(
            &origins,
            &destinations,
            arrival_deadline,
            max_rounds,
            window_minutes,
            filter,
        )
    }

    fn resolve_names(
        &self,
        origin_name: &str,
        destination_name: &str,
    ) -> Result<(Vec<usize>, Vec<usize>), BadRequest> {
        if origin_name.trim().is_empty() {
            return Err(BadRequest::NoDepartureStop);
        }
        if destination_name.trim().is_empty() {
            return Err(BadRequest::NoArrivalStop);
        }
        let network = self
            .periods
            .active_network()
            .ok_or(BadRequest::NoActivePeriod)?;
        let origins: Vec<usize> = stops_matching(network, origin_name).collect();
        let destinations: Vec<usize> = stops_matching(network, destination_name).collect();
        if origins.is_empty() {
            warn!("No stop name matches `{}`.", origin_name);
        }
        if destinations.is_empty() {
            warn!("No stop name matches `{}`.", destination_name);
        }
        Ok((origins, destinations))
    }

    /// Binary search over the departure time. Feasible probes move the
    /// lower bound up, infeasible ones the upper bound down ; the
    /// recorded set is the one whose latest first-leg departure is the
    /// greatest among all feasible probes.
    fn arrive_by_on_indices(
        &mut self,
        origins: &[usize],
        destinations: &[usize],
        arrival_deadline: SecondsSinceDayStart,
        max_rounds: usize,
        window_minutes: u32,
        filter: Option<&RouteFilter>,
    ) -> Result<Vec<Journey>, BadRequest> {
        let deadline = arrival_deadline.total_seconds();
        let window_start = (deadline - (window_minutes as i32) * 60).max(0);
        let mut lo = window_start;
        let mut hi = deadline;
        let mut recorded: Vec<Journey> = Vec::new();
        let mut recorded_departure: Option<SecondsSinceDayStart> = None;

        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            // snap the probe onto the 60 s grid anchored at the window start
            let probe = window_start + (mid - window_start) / ARRIVE_BY_STEP * ARRIVE_BY_STEP;
            let departure_time = SecondsSinceDayStart::from_seconds(probe);

            let period = self
                .periods
                .active_period_mut()
                .ok_or(BadRequest::NoActivePeriod)?;
            let journeys = solve(
                &mut period.engine,
                &period.network,
                origins,
                destinations,
                departure_time,
                max_rounds,
                filter,
            );
            let feasible: Vec<Journey> = journeys
                .into_iter()
                .filter(|journey| journey.arrival_time() <= arrival_deadline)
                .collect();

            match feasible.iter().map(Journey::departure_time).max() {
                None => {
                    hi = probe - ARRIVE_BY_STEP;
                }
                Some(latest_departure) => {
                    if recorded_departure.map_or(true, |best| latest_departure > best) {
                        recorded_departure = Some(latest_departure);
                        recorded = feasible;
                    }
                    lo = probe + ARRIVE_BY_STEP;
                }
            }
        }

        Ok(recorded)
    }
}

/// Runs the engine and enumerates the Pareto set : for each round, the
/// best destination arrival ; emitted when it strictly improves on the
/// previous emission. The list is returned most-transfers-first, so the
/// transfer count decreases and the arrival time increases along it.
fn solve(
    engine: &mut Raptor,
    network: &Network,
    origins: &[usize],
    destinations: &[usize],
    departure_time: SecondsSinceDayStart,
    max_rounds: usize,
    filter: Option<&RouteFilter>,
) -> Vec<Journey> {
    let request = Request {
        origins,
        destinations,
        departure_time,
        max_rounds,
        filter,
    };
    debug!("Start computing journeys");
    let request_timer = SystemTime::now();
    let best_arrival = engine.compute(network, &request);
    if let Ok(elapsed) = request_timer.elapsed() {
        debug!("Journeys computed in {} us", elapsed.as_micros());
    }
    if !best_arrival.is_reached() {
        return Vec::new();
    }

    let state = engine.state();
    let mut journeys = Vec::new();
    let mut previous_arrival = SecondsSinceDayStart::MAX;
    for round in 1..=state.last_round_used() {
        let mut best: Option<(usize, SecondsSinceDayStart)> = None;
        for &destination in destinations {
            let arrival = state.arrival(round, destination);
            if arrival.is_reached() && best.map_or(true, |(_, earliest)| arrival < earliest) {
                best = Some((destination, arrival));
            }
        }
        if let Some((destination, arrival)) = best {
            if arrival < previous_arrival {
                if let Some(journey) = Journey::extract(state, network, destination, round) {
                    previous_arrival = arrival;
                    journeys.push(journey);
                }
            }
        }
    }
    debug!("Nb of journeys found : {}", journeys.len());
    journeys.reverse();
    journeys
}

fn resolve_stop_ids(network: &Network, stop_ids: &[u32], role: &str) -> Vec<usize> {
    let mut indices = Vec::with_capacity(stop_ids.len());
    for &stop_id in stop_ids {
        match network.stop_index(stop_id) {
            Some(index) => indices.push(index),
            None => {
                warn!("Unknown {} stop id {}. I'll ignore it.", role, stop_id);
            }
        }
    }
    indices
}

#[derive(Debug)]
pub enum BadRequest {
    NoDepartureStop,
    NoArrivalStop,
    NoActivePeriod,
}

impl Display for BadRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BadRequest::NoDepartureStop => {
                write!(f, "No departure stop was provided.")
            }
            BadRequest::NoArrivalStop => {
                write!(f, "No arrival stop was provided.")
            }
            BadRequest::NoActivePeriod => {
                write!(f, "No dataset period is loaded.")
            }
        }
    }
}

impl std::error::Error for BadRequest {}
