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

use crate::model::Stop;
use crate::network::Network;

/// Finds stops whose display name contains `needle`, ignoring case.
/// Used to turn user supplied names into stop indices.
pub fn stops_matching<'a>(network: &'a Network, needle: &str) -> StopsMatching<'a> {
    StopsMatching {
        needle: needle.to_lowercase(),
        inner: network.stops().iter().enumerate(),
    }
}

#[derive(Debug)]
pub struct StopsMatching<'a> {
    needle: String,
    inner: std::iter::Enumerate<std::slice::Iter<'a, Stop>>,
}

impl<'a> Iterator for StopsMatching<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, stop) in self.inner.by_ref() {
            if stop.name.to_lowercase().contains(&self.needle) {
                return Some(index);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> Network {
        let stop = |id, name: &str| Stop {
            id,
            name: name.to_string(),
            lat: 0.0,
            lon: 0.0,
            route_ids: Vec::new(),
            transfers: Vec::new(),
        };
        Network::new(
            vec![
                stop(1, "Vieux-Port"),
                stop(2, "Castellane"),
                stop(3, "Rond-Point du Prado"),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let network = network();
        let matches: Vec<usize> = stops_matching(&network, "vieux-port").collect();
        assert_eq!(matches, vec![0]);
        let matches: Vec<usize> = stops_matching(&network, "PRADO").collect();
        assert_eq!(matches, vec![2]);
    }

    #[test]
    fn no_match_yields_nothing() {
        let network = network();
        assert_eq!(stops_matching(&network, "La Rose").count(), 0);
    }
}
