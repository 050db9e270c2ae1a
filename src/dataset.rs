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

//! Deserialization of the two little-endian binary streams (stops and
//! routes) produced by the preprocessor, into a [`Network`].
//!
//! Two format versions exist for each stream. They are distinguished by
//! the four magic bytes at the start of the stream :
//! - stops : `RSTS` (v1) or `RST2` (v2), identical stop-level layout ;
//! - routes : `RRTS` (v1) or `RRT2` (v2). V1 stores one delta row per
//!   trip in file order and requires a stable sort of the trips by their
//!   first-stop time ; v2 stores the trip id table upfront, already
//!   sorted, followed by the delta block.

use std::fmt::{Display, Formatter};
use std::io::Read;
use std::time::SystemTime;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::info;

use crate::model::{Route, Stop};
use crate::network::Network;
use crate::time::{PositiveDuration, SecondsSinceDayStart};

const STOPS_MAGIC_V1: &[u8; 4] = b"RSTS";
const STOPS_MAGIC_V2: &[u8; 4] = b"RST2";
const ROUTES_MAGIC_V1: &[u8; 4] = b"RRTS";
const ROUTES_MAGIC_V2: &[u8; 4] = b"RRT2";

#[derive(Debug)]
pub enum ReadDataError {
    /// The stream does not start with one of the known magics.
    UnknownMagic([u8; 4]),
    /// The version field contradicts the magic.
    VersionMismatch { expected: u16, found: u16 },
    /// A stop or route name is not valid UTF-8.
    BadName(std::string::FromUtf8Error),
    /// Truncated stream, or any other read failure.
    Io(std::io::Error),
}

impl Display for ReadDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadDataError::UnknownMagic(bytes) => {
                write!(f, "Unknown magic bytes {:?} at start of data file.", bytes)
            }
            ReadDataError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Bad format version : the magic announces version {} but the file says {}.",
                    expected, found
                )
            }
            ReadDataError::BadName(err) => {
                write!(f, "Badly encoded name in data file : {}", err)
            }
            ReadDataError::Io(err) => {
                write!(f, "Error while reading data file : {}", err)
            }
        }
    }
}

impl std::error::Error for ReadDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadDataError::Io(err) => Some(err),
            ReadDataError::BadName(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReadDataError {
    fn from(err: std::io::Error) -> Self {
        ReadDataError::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for ReadDataError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ReadDataError::BadName(err)
    }
}

/// Reads both binary streams and builds the network with its derived
/// indices.
pub fn read_network<R1, R2>(stops_reader: R1, routes_reader: R2) -> Result<Network, ReadDataError>
where
    R1: Read,
    R2: Read,
{
    let read_timer = SystemTime::now();
    let stops = read_stops(stops_reader)?;
    let routes = read_routes(routes_reader)?;
    info!("Number of stops : {}", stops.len());
    info!("Number of routes : {}", routes.len());
    info!(
        "Number of trips : {}",
        routes.iter().map(Route::nb_of_trips).sum::<usize>()
    );
    let network = Network::new(stops, routes);
    if let Ok(elapsed) = read_timer.elapsed() {
        info!("Network loaded and indexed in {} ms", elapsed.as_millis());
    }
    Ok(network)
}

pub fn read_stops<R: Read>(mut reader: R) -> Result<Vec<Stop>, ReadDataError> {
    check_header(&mut reader, STOPS_MAGIC_V1, STOPS_MAGIC_V2)?;
    let nb_of_stops = reader.read_u32::<LittleEndian>()?;
    let mut stops = Vec::with_capacity(nb_of_stops as usize);
    for _ in 0..nb_of_stops {
        let id = reader.read_u32::<LittleEndian>()?;
        let name = read_name(&mut reader)?;
        let lat = reader.read_f64::<LittleEndian>()?;
        let lon = reader.read_f64::<LittleEndian>()?;
        let nb_of_route_refs = reader.read_u32::<LittleEndian>()?;
        let mut route_ids = Vec::with_capacity(nb_of_route_refs as usize);
        for _ in 0..nb_of_route_refs {
            route_ids.push(reader.read_u32::<LittleEndian>()?);
        }
        let nb_of_transfers = reader.read_u32::<LittleEndian>()?;
        let mut transfers = Vec::with_capacity(nb_of_transfers as usize);
        for _ in 0..nb_of_transfers {
            let target_id = reader.read_u32::<LittleEndian>()?;
            let walk_seconds = reader.read_i32::<LittleEndian>()?;
            let walk = PositiveDuration::from_seconds(walk_seconds.max(0) as u32);
            transfers.push((target_id, walk));
        }
        stops.push(Stop {
            id,
            name,
            lat,
            lon,
            route_ids,
            transfers,
        });
    }
    Ok(stops)
}

pub fn read_routes<R: Read>(mut reader: R) -> Result<Vec<Route>, ReadDataError> {
    let version = check_header(&mut reader, ROUTES_MAGIC_V1, ROUTES_MAGIC_V2)?;
    let nb_of_routes = reader.read_u32::<LittleEndian>()?;
    let mut routes = Vec::with_capacity(nb_of_routes as usize);
    for _ in 0..nb_of_routes {
        let id = reader.read_u32::<LittleEndian>()?;
        let name = read_name(&mut reader)?;
        let nb_of_positions = reader.read_u32::<LittleEndian>()? as usize;
        let nb_of_trips = reader.read_u32::<LittleEndian>()? as usize;
        let mut stop_ids = Vec::with_capacity(nb_of_positions);
        for _ in 0..nb_of_positions {
            stop_ids.push(reader.read_u32::<LittleEndian>()?);
        }
        let trip_times = match version {
            1 => {
                let mut rows = Vec::with_capacity(nb_of_trips);
                for _ in 0..nb_of_trips {
                    // the trip id only matters to the preprocessor
                    let _trip_id = reader.read_u32::<LittleEndian>()?;
                    rows.push(read_delta_row(&mut reader, nb_of_positions)?);
                }
                // file order is arbitrary in v1
                rows.sort_by_key(|row| row.first().copied().unwrap_or(SecondsSinceDayStart::MAX));
                rows
            }
            _ => {
                for _ in 0..nb_of_trips {
                    let _trip_id = reader.read_u32::<LittleEndian>()?;
                }
                let mut rows = Vec::with_capacity(nb_of_trips);
                for _ in 0..nb_of_trips {
                    rows.push(read_delta_row(&mut reader, nb_of_positions)?);
                }
                rows
            }
        };
        routes.push(Route::new(id, name, stop_ids, trip_times));
    }
    Ok(routes)
}

/// Reads the magic and version fields, and tells the version apart.
fn check_header<R: Read>(
    reader: &mut R,
    magic_v1: &[u8; 4],
    magic_v2: &[u8; 4],
) -> Result<u16, ReadDataError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    let expected = if &magic == magic_v1 {
        1
    } else if &magic == magic_v2 {
        2
    } else {
        return Err(ReadDataError::UnknownMagic(magic));
    };
    let found = reader.read_u16::<LittleEndian>()?;
    if found != expected {
        return Err(ReadDataError::VersionMismatch { expected, found });
    }
    Ok(expected)
}

fn read_name<R: Read>(reader: &mut R) -> Result<String, ReadDataError> {
    let nb_of_bytes = reader.read_u16::<LittleEndian>()?;
    let mut bytes = vec![0u8; nb_of_bytes as usize];
    reader.read_exact(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

/// One trip row : deltas accumulated from zero yield the absolute times.
fn read_delta_row<R: Read>(
    reader: &mut R,
    nb_of_positions: usize,
) -> Result<Vec<SecondsSinceDayStart>, ReadDataError> {
    let mut row = Vec::with_capacity(nb_of_positions);
    let mut seconds = 0i32;
    for _ in 0..nb_of_positions {
        seconds += reader.read_i32::<LittleEndian>()?;
        row.push(SecondsSinceDayStart::from_seconds(seconds));
    }
    Ok(row)
}
