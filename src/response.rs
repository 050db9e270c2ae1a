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

use std::fmt;

use crate::engine::routing_state::{RoutingState, NONE};
use crate::network::{Network, UNKNOWN_STOP};
use crate::time::SecondsSinceDayStart;

/// One step of a journey : either riding a trip of a route, or walking
/// between two stops.
#[derive(Debug, Clone)]
pub struct Leg {
    pub from_stop: usize,
    pub to_stop: usize,
    pub departure_time: SecondsSinceDayStart,
    pub arrival_time: SecondsSinceDayStart,
    pub kind: LegKind,
}

#[derive(Debug, Clone)]
pub enum LegKind {
    Transit {
        route_name: String,
        /// Name of the last stop of the route's pattern.
        direction: String,
        /// Stops served strictly between boarding and alighting, with
        /// their scheduled times.
        intermediate_stops: Vec<(usize, SecondsSinceDayStart)>,
    },
    Transfer,
}

impl Leg {
    pub fn is_transfer(&self) -> bool {
        matches!(self.kind, LegKind::Transfer)
    }

    pub fn route_name(&self) -> Option<&str> {
        match &self.kind {
            LegKind::Transit { route_name, .. } => Some(route_name),
            LegKind::Transfer => None,
        }
    }
}

/// A complete journey : legs in travel order, the first leg being the
/// departing one.
#[derive(Debug, Clone)]
pub struct Journey {
    pub legs: Vec<Leg>,
}

impl Journey {
    pub fn departure_time(&self) -> SecondsSinceDayStart {
        self.legs.first().map_or(SecondsSinceDayStart::MAX, |leg| leg.departure_time)
    }

    pub fn arrival_time(&self) -> SecondsSinceDayStart {
        self.legs.last().map_or(SecondsSinceDayStart::MAX, |leg| leg.arrival_time)
    }

    pub fn nb_of_legs(&self) -> usize {
        self.legs.len()
    }

    pub fn nb_of_transit_legs(&self) -> usize {
        self.legs.iter().filter(|leg| !leg.is_transfer()).count()
    }

    /// Number of changes between vehicles.
    pub fn nb_of_transfers(&self) -> usize {
        self.nb_of_transit_legs().saturating_sub(1)
    }

    /// A stable, structure-only digest of the journey : one tuple per
    /// leg. Equal inputs must yield equal signatures, across runs and
    /// across dataset encodings.
    pub fn signature(&self) -> Vec<(usize, usize, i32, i32, bool, Option<String>)> {
        self.legs
            .iter()
            .map(|leg| {
                (
                    leg.from_stop,
                    leg.to_stop,
                    leg.departure_time.total_seconds(),
                    leg.arrival_time.total_seconds(),
                    leg.is_transfer(),
                    leg.route_name().map(str::to_string),
                )
            })
            .collect()
    }

    /// Rebuilds the journey arriving at `destination` with at most
    /// `round` boarded trips, by chasing parent pointers back to an
    /// origin. Returns None when the destination was not reached, or
    /// when the "journey" would have no leg at all (origin and
    /// destination are the same stop).
    pub(crate) fn extract(
        state: &RoutingState,
        network: &Network,
        destination: usize,
        round: usize,
    ) -> Option<Journey> {
        if !state.arrival(round, destination).is_reached() {
            return None;
        }

        let mut legs = Vec::new();
        let mut stop = destination;
        let mut current_round = round;
        loop {
            let parent = state.parent(current_round, stop);
            if parent.parent_stop == NONE {
                break;
            }
            let from_stop = parent.parent_stop as usize;
            if parent.route == NONE {
                // walking transfer : departs when the source stop was
                // reached, arrives walk seconds later
                legs.push(Leg {
                    from_stop,
                    to_stop: stop,
                    departure_time: parent.board_time,
                    arrival_time: state.arrival(current_round, stop),
                    kind: LegKind::Transfer,
                });
            } else {
                let route_index = parent.route as usize;
                let route = network.route(route_index);
                let trip = parent.trip as usize;
                let board_position = parent.board_position as usize;
                let alight_position = parent.alight_position as usize;
                let stop_indices = network.route_stop_indices(route_index);
                let intermediate_stops = (board_position + 1..alight_position)
                    .filter(|&position| stop_indices[position] != UNKNOWN_STOP)
                    .map(|position| {
                        (
                            stop_indices[position] as usize,
                            route.time(trip, position),
                        )
                    })
                    .collect();
                legs.push(Leg {
                    from_stop,
                    to_stop: stop,
                    departure_time: parent.board_time,
                    arrival_time: route.time(trip, alight_position),
                    kind: LegKind::Transit {
                        route_name: route.name.clone(),
                        direction: network.direction_of(route_index).to_string(),
                        intermediate_stops,
                    },
                });
            }
            stop = from_stop;
            current_round = parent.parent_round as usize;
        }

        if legs.is_empty() {
            return None;
        }
        legs.reverse();

        debug_assert!(legs
            .windows(2)
            .all(|pair| pair[0].arrival_time <= pair[1].departure_time));
        debug_assert!(legs.iter().all(|leg| leg.departure_time <= leg.arrival_time));

        Some(Journey { legs })
    }

    /// Human readable rendering, one line per leg.
    pub fn write<W: fmt::Write>(&self, network: &Network, writer: &mut W) -> fmt::Result {
        let stop_name = |stop: usize| network.stop(stop).name.as_str();
        writeln!(
            writer,
            "Journey from {} to {}, departure {}, arrival {} ({} vehicle(s), {} transfer(s))",
            self.legs.first().map_or("?", |leg| stop_name(leg.from_stop)),
            self.legs.last().map_or("?", |leg| stop_name(leg.to_stop)),
            self.departure_time(),
            self.arrival_time(),
            self.nb_of_transit_legs(),
            self.nb_of_transfers(),
        )?;
        for leg in &self.legs {
            match &leg.kind {
                LegKind::Transit {
                    route_name,
                    direction,
                    intermediate_stops,
                } => {
                    writeln!(
                        writer,
                        "  {} {} -> {} {}  [{} towards {}, {} intermediate stop(s)]",
                        leg.departure_time,
                        stop_name(leg.from_stop),
                        stop_name(leg.to_stop),
                        leg.arrival_time,
                        route_name,
                        direction,
                        intermediate_stops.len(),
                    )?;
                }
                LegKind::Transfer => {
                    writeln!(
                        writer,
                        "  {} {} -> {} {}  [walk]",
                        leg.departure_time,
                        stop_name(leg.from_stop),
                        stop_name(leg.to_stop),
                        leg.arrival_time,
                    )?;
                }
            }
        }
        Ok(())
    }
}
