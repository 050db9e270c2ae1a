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
use std::str::FromStr;

/// A point in time, counted in seconds since midnight of the day the
/// dataset describes.
/// Values greater than 24:00:00 encode service running past midnight.
/// It can be parsed from a "HH:MM:SS" string, where hours may exceed 23.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct SecondsSinceDayStart {
    seconds: i32,
}

impl SecondsSinceDayStart {
    /// The "not reached yet" sentinel. Greater than every valid time.
    pub const MAX: SecondsSinceDayStart = SecondsSinceDayStart { seconds: i32::MAX };

    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_seconds(seconds: i32) -> Self {
        Self { seconds }
    }

    pub const fn from_hms(hours: i32, minutes: i32, seconds: i32) -> Self {
        Self {
            seconds: seconds + 60 * minutes + 60 * 60 * hours,
        }
    }

    pub fn total_seconds(&self) -> i32 {
        self.seconds
    }

    pub fn is_reached(&self) -> bool {
        *self != Self::MAX
    }
}

impl Display for SecondsSinceDayStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.seconds / 60 / 60,
            self.seconds / 60 % 60,
            self.seconds % 60
        )
    }
}

impl FromStr for SecondsSinceDayStart {
    type Err = BadTimeFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hours, minutes, seconds) = parse_hms(s)?;
        Ok(Self::from_hms(hours as i32, minutes as i32, seconds as i32))
    }
}

/// A walking or waiting duration, in seconds.
#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd)]
pub struct PositiveDuration {
    seconds: u32,
}

impl PositiveDuration {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> PositiveDuration {
        let total_seconds = seconds + 60 * minutes + 60 * 60 * hours;
        PositiveDuration {
            seconds: total_seconds,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / (60 * 60);
        let minutes_in_secs = self.seconds % (60 * 60);
        let minutes = minutes_in_secs / 60;
        let seconds = minutes_in_secs % 60;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

impl FromStr for PositiveDuration {
    type Err = BadTimeFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hours, minutes, seconds) = parse_hms(s)?;
        Ok(Self::from_hms(hours, minutes, seconds))
    }
}

impl std::ops::Add for PositiveDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds + rhs.seconds,
        }
    }
}

impl std::ops::Add<PositiveDuration> for SecondsSinceDayStart {
    type Output = Self;

    fn add(self, rhs: PositiveDuration) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_add(rhs.seconds as i32),
        }
    }
}

impl std::ops::Mul<u32> for PositiveDuration {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        PositiveDuration {
            seconds: self.seconds * rhs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BadTimeFormat {
    string: String,
}

impl Display for BadTimeFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unable to parse `{}` as a time. Expected format is 14:35:00",
            self.string
        )
    }
}

impl std::error::Error for BadTimeFormat {}

fn parse_hms(s: &str) -> Result<(u32, u32, u32), BadTimeFormat> {
    let bad = || BadTimeFormat {
        string: s.to_string(),
    };
    let mut fields = s.split(':');
    let hours = fields.next().ok_or_else(bad)?;
    let minutes = fields.next().ok_or_else(bad)?;
    let seconds = fields.next().ok_or_else(bad)?;
    if fields.next().is_some() {
        return Err(bad());
    }
    let hours: u32 = hours.parse().map_err(|_| bad())?;
    let minutes: u32 = minutes.parse().map_err(|_| bad())?;
    let seconds: u32 = seconds.parse().map_err(|_| bad())?;
    if minutes >= 60 || seconds >= 60 {
        return Err(bad());
    }
    Ok((hours, minutes, seconds))
}
