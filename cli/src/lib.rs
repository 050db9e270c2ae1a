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

use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::{Context, Error};
use structopt::StructOpt;

use massilia::filters::parse_filters;
use massilia::tracing::info;
use massilia::tracing::level_filters::LevelFilter;
use massilia::{SecondsSinceDayStart, Solver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DEPARTURE_TIME: &str = "08:00:00";
const DEFAULT_MAX_ROUNDS: &str = "5";
const DEFAULT_WINDOW_MINUTES: &str = "120";
const DEFAULT_PERIOD: &str = "default";

#[derive(StructOpt, Debug)]
#[structopt(
    name = "massilia_cli",
    about = "Run journey queries from the command line.",
    rename_all = "snake_case"
)]
pub struct Options {
    /// path to the binary stops file
    #[structopt(short = "s", long = "stops", parse(from_os_str))]
    pub stops_path: PathBuf,

    /// path to the binary routes file
    #[structopt(short = "r", long = "routes", parse(from_os_str))]
    pub routes_path: PathBuf,

    /// name under which the dataset period is registered
    #[structopt(long, default_value = DEFAULT_PERIOD)]
    pub period: String,

    /// name of the departure stop (case-insensitive substring)
    #[structopt(long)]
    pub start: String,

    /// name of the arrival stop (case-insensitive substring)
    #[structopt(long)]
    pub end: String,

    /// departure time of the query, formatted like 08:00:00
    #[structopt(long, default_value = DEFAULT_DEPARTURE_TIME)]
    pub departure_time: SecondsSinceDayStart,

    /// latest acceptable arrival time ; when given, the query becomes
    /// an arrive-by search and departure_time is ignored
    #[structopt(long)]
    pub arrival_time: Option<SecondsSinceDayStart>,

    /// width of the departure search window of arrive-by queries, in minutes
    #[structopt(long, default_value = DEFAULT_WINDOW_MINUTES)]
    pub window_minutes: u32,

    /// maximum number of boarded vehicles in a journey
    #[structopt(long, default_value = DEFAULT_MAX_ROUNDS)]
    pub max_rounds: usize,

    /// only use these routes : "id:<number>" or "name:<string>", may be repeated
    #[structopt(long = "allowed_id")]
    pub allowed_ids: Vec<String>,

    /// never use these routes : "id:<number>" or "name:<string>", may be repeated
    #[structopt(long = "forbidden_id")]
    pub forbidden_ids: Vec<String>,
}

impl Display for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "--stops {:?} --routes {:?} --period {} --start {} --end {} --departure_time {} --max_rounds {}",
            self.stops_path,
            self.routes_path,
            self.period,
            self.start,
            self.end,
            self.departure_time,
            self.max_rounds,
        )?;
        if let Some(arrival_time) = &self.arrival_time {
            write!(
                f,
                " --arrival_time {} --window_minutes {}",
                arrival_time, self.window_minutes
            )?;
        }
        for allowed in &self.allowed_ids {
            write!(f, " --allowed_id {}", allowed)?;
        }
        for forbidden in &self.forbidden_ids {
            write!(f, " --forbidden_id {}", forbidden)?;
        }
        Ok(())
    }
}

pub fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter_subscriber = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter_subscriber)
        .init();
}

pub fn run(options: &Options) -> Result<(), Error> {
    info!("Launching with options : {}", options);

    let stops_file = File::open(&options.stops_path)
        .with_context(|| format!("Unable to open stops file {:?}", options.stops_path))?;
    let routes_file = File::open(&options.routes_path)
        .with_context(|| format!("Unable to open routes file {:?}", options.routes_path))?;
    let network =
        massilia::dataset::read_network(BufReader::new(stops_file), BufReader::new(routes_file))?;

    let mut solver = Solver::new();
    solver.add_period(options.period.clone(), network);
    info!("Active period : {}", options.period);

    let filter = parse_filters(&options.allowed_ids, &options.forbidden_ids);

    let request_timer = SystemTime::now();
    let journeys = match options.arrival_time {
        Some(deadline) => solver.arrive_by_query_by_names(
            &options.start,
            &options.end,
            deadline,
            options.max_rounds,
            options.window_minutes,
            filter.as_ref(),
        )?,
        None => solver.forward_query_by_names(
            &options.start,
            &options.end,
            options.departure_time,
            options.max_rounds,
            filter.as_ref(),
        )?,
    };
    if let Ok(elapsed) = request_timer.elapsed() {
        info!("Query solved in {} ms", elapsed.as_millis());
    }

    if journeys.is_empty() {
        info!("No journey found.");
        return Ok(());
    }

    let network = solver.network().context("No period loaded")?;
    let mut output = String::new();
    for journey in &journeys {
        journey.write(network, &mut output)?;
    }
    print!("{}", output);
    Ok(())
}
