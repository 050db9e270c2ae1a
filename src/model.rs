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

use crate::time::{PositiveDuration, SecondsSinceDayStart};

/// A physical stop, as described by the stops file.
#[derive(Debug, Clone)]
pub struct Stop {
    pub id: u32,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Identifiers of the routes serving this stop.
    pub route_ids: Vec<u32>,
    /// Explicit walking transfers : (target stop id, walk duration).
    pub transfers: Vec<(u32, PositiveDuration)>,
}

/// A direction-specific line : a fixed sequence of stops, and the trips
/// visiting those stops in that order.
///
/// Several `Route`s may share the same `id` (e.g. the two directions of
/// a metro line) : `id` identifies the line, not the pattern.
#[derive(Debug, Clone)]
pub struct Route {
    pub id: u32,
    pub name: String,
    /// The stop pattern : stop ids, in visit order.
    pub stop_ids: Vec<u32>,
    nb_of_trips: usize,
    /// `schedule[trip * nb_of_positions() + position]` is the time at which
    /// the `trip`-th trip serves the `position`-th stop of the pattern.
    /// Trips are ordered by increasing time at every position : trips of one
    /// route do not overtake each other.
    schedule: Vec<SecondsSinceDayStart>,
}

impl Route {
    /// Builds a route from per-trip time rows.
    /// Rows must already be sorted by time at the first position.
    pub(crate) fn new(
        id: u32,
        name: String,
        stop_ids: Vec<u32>,
        trip_times: Vec<Vec<SecondsSinceDayStart>>,
    ) -> Self {
        let nb_of_positions = stop_ids.len();
        let nb_of_trips = trip_times.len();
        let mut schedule = Vec::with_capacity(nb_of_trips * nb_of_positions);
        for row in &trip_times {
            debug_assert_eq!(row.len(), nb_of_positions);
            debug_assert!(row.windows(2).all(|pair| pair[0] <= pair[1]));
            schedule.extend_from_slice(row);
        }
        debug_assert!((0..nb_of_positions).all(|position| {
            (1..nb_of_trips)
                .all(|trip| trip_times[trip - 1][position] <= trip_times[trip][position])
        }));
        Self {
            id,
            name,
            stop_ids,
            nb_of_trips,
            schedule,
        }
    }

    pub fn nb_of_positions(&self) -> usize {
        self.stop_ids.len()
    }

    pub fn nb_of_trips(&self) -> usize {
        self.nb_of_trips
    }

    /// Time at which `trip` serves the stop at `position` in the pattern.
    pub fn time(&self, trip: usize, position: usize) -> SecondsSinceDayStart {
        debug_assert!(trip < self.nb_of_trips);
        debug_assert!(position < self.nb_of_positions());
        self.schedule[trip * self.nb_of_positions() + position]
    }

    /// Returns the earliest trip that can be boarded at `position` when
    /// waiting there from `waiting_time` (departure >= waiting_time),
    /// or None if every trip has already left.
    ///
    /// Binary search on the trip axis ; relies on trips being ordered by
    /// increasing time at every position.
    pub fn earliest_trip_to_board(
        &self,
        position: usize,
        waiting_time: SecondsSinceDayStart,
    ) -> Option<usize> {
        let mut first = 0;
        let mut count = self.nb_of_trips;
        while count > 0 {
            let half = count / 2;
            let mid = first + half;
            if self.time(mid, position) < waiting_time {
                first = mid + 1;
                count -= half + 1;
            } else {
                count = half;
            }
        }
        if first < self.nb_of_trips {
            Some(first)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route_with_departures(departures: &[i32]) -> Route {
        let trip_times = departures
            .iter()
            .map(|&dep| {
                vec![
                    SecondsSinceDayStart::from_seconds(dep),
                    SecondsSinceDayStart::from_seconds(dep + 300),
                ]
            })
            .collect();
        Route::new(1, "test".to_string(), vec![10, 20], trip_times)
    }

    #[test]
    fn earliest_trip_lands_on_first_departure_not_before() {
        let route = route_with_departures(&[100, 200, 300, 400]);
        let search = |t| route.earliest_trip_to_board(0, SecondsSinceDayStart::from_seconds(t));
        assert_eq!(search(0), Some(0));
        assert_eq!(search(150), Some(1));
        assert_eq!(search(400), Some(3));
        assert_eq!(search(401), None);
    }

    #[test]
    fn exact_departure_time_is_boardable() {
        let route = route_with_departures(&[100, 200]);
        assert_eq!(
            route.earliest_trip_to_board(0, SecondsSinceDayStart::from_seconds(200)),
            Some(1)
        );
    }

    #[test]
    fn route_without_trips_is_never_boardable() {
        let route = Route::new(1, "empty".to_string(), vec![10, 20], Vec::new());
        assert_eq!(route.earliest_trip_to_board(0, SecondsSinceDayStart::zero()), None);
    }
}
