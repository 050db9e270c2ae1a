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

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::engine::Raptor;
use crate::network::Network;

/// Several independent networks can be loaded side by side, one per
/// service period (school term, summer holidays, ...). Exactly one is
/// active at a time ; queries always run against the active one.
///
/// Each period keeps its own engine, since the routing state is sized
/// by the network it computes against.
#[derive(Default)]
pub struct PeriodRegistry {
    periods: BTreeMap<String, Period>,
    active: Option<String>,
}

pub(crate) struct Period {
    pub(crate) network: Network,
    pub(crate) engine: Raptor,
}

impl PeriodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a network under `id`. The first registered period
    /// becomes the active one.
    pub fn insert(&mut self, id: impl Into<String>, network: Network) {
        let id = id.into();
        let engine = Raptor::new(&network);
        self.periods.insert(id.clone(), Period { network, engine });
        if self.active.is_none() {
            self.active = Some(id);
        }
    }

    pub fn set_active(&mut self, id: &str) -> Result<(), BadPeriod> {
        if self.periods.contains_key(id) {
            self.active = Some(id.to_string());
            Ok(())
        } else {
            Err(BadPeriod {
                id: id.to_string(),
            })
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn available(&self) -> impl Iterator<Item = &str> {
        self.periods.keys().map(String::as_str)
    }

    pub fn active_network(&self) -> Option<&Network> {
        let id = self.active.as_ref()?;
        self.periods.get(id).map(|period| &period.network)
    }

    pub(crate) fn active_period_mut(&mut self) -> Option<&mut Period> {
        let id = self.active.clone()?;
        self.periods.get_mut(&id)
    }
}

#[derive(Debug)]
pub struct BadPeriod {
    id: String,
}

impl Display for BadPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "No period named `{}` is loaded.", self.id)
    }
}

impl std::error::Error for BadPeriod {}
