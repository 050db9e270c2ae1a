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

use std::collections::BTreeSet;

use tracing::warn;

use crate::model::Route;

/// Restricts which routes a query may ride.
///
/// A route passes when it belongs to every allow-set that is present,
/// and to no blocking set. An allow-set that is present but empty
/// therefore rejects every route ; an absent filter allows everything.
#[derive(Debug, Clone, Default)]
pub struct RouteFilter {
    pub allowed_ids: Option<BTreeSet<u32>>,
    pub allowed_names: Option<BTreeSet<String>>,
    pub blocked_ids: BTreeSet<u32>,
    pub blocked_names: BTreeSet<String>,
}

impl RouteFilter {
    /// Evaluated once per route at the start of each route scan.
    pub fn allows(&self, route: &Route) -> bool {
        if let Some(allowed_ids) = &self.allowed_ids {
            if !allowed_ids.contains(&route.id) {
                return false;
            }
        }
        if let Some(allowed_names) = &self.allowed_names {
            if !allowed_names.contains(&route.name) {
                return false;
            }
        }
        if self.blocked_ids.contains(&route.id) {
            return false;
        }
        if self.blocked_names.contains(&route.name) {
            return false;
        }
        true
    }
}

/// Builds a filter from `"id:<number>"` / `"name:<string>"` strings, as
/// supplied on the command line. Malformed entries are warned about and
/// skipped. Returns None when nothing usable was supplied.
pub fn parse_filters<T>(allowed: &[T], blocked: &[T]) -> Option<RouteFilter>
where
    T: AsRef<str>,
{
    let mut allowed_ids = BTreeSet::new();
    let mut allowed_names = BTreeSet::new();
    for filter_str in allowed {
        match parse_filter(filter_str.as_ref(), "allowed") {
            Some(Filter::Id(id)) => {
                allowed_ids.insert(id);
            }
            Some(Filter::Name(name)) => {
                allowed_names.insert(name);
            }
            None => {}
        }
    }

    let mut blocked_ids = BTreeSet::new();
    let mut blocked_names = BTreeSet::new();
    for filter_str in blocked {
        match parse_filter(filter_str.as_ref(), "blocked") {
            Some(Filter::Id(id)) => {
                blocked_ids.insert(id);
            }
            Some(Filter::Name(name)) => {
                blocked_names.insert(name);
            }
            None => {}
        }
    }

    let has_no_filter = allowed_ids.is_empty()
        && allowed_names.is_empty()
        && blocked_ids.is_empty()
        && blocked_names.is_empty();

    if has_no_filter {
        None
    } else {
        Some(RouteFilter {
            allowed_ids: if allowed_ids.is_empty() {
                None
            } else {
                Some(allowed_ids)
            },
            allowed_names: if allowed_names.is_empty() {
                None
            } else {
                Some(allowed_names)
            },
            blocked_ids,
            blocked_names,
        })
    }
}

enum Filter {
    Id(u32),
    Name(String),
}

fn parse_filter(filter_str: &str, filter_provenance: &str) -> Option<Filter> {
    if let Some(id_str) = filter_str.strip_prefix("id:") {
        return match id_str.parse::<u32>() {
            Ok(id) => Some(Filter::Id(id)),
            Err(_) => {
                warn!(
                    "Unparsable route id in {} filter {}. I'll ignore it.",
                    filter_provenance, filter_str
                );
                None
            }
        };
    }
    if let Some(name) = filter_str.strip_prefix("name:") {
        if name.is_empty() {
            warn!(
                "Empty route name in {} filter {}. I'll ignore it.",
                filter_provenance, filter_str
            );
            return None;
        }
        return Some(Filter::Name(name.to_string()));
    }
    warn!(
        "Invalid {} filter : {}. I'll ignore it.",
        filter_provenance, filter_str
    );
    None
}
