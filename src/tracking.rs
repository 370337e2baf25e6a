use std::io::Read;

use chrono::naive::NaiveDate;
use serde::Deserialize;

use super::error::Result;
use super::dataset::{Dataset,Record};
use super::region::Region;
use super::source::Source;


pub const STATES_URL: &str = "https://covidtracking.com/api/v1/states/daily.csv";


#[derive(Deserialize)]
struct StateRow {
    date: String,
    state: String,
    positive: Option<f64>,
    death: Option<f64>
}


pub fn states(source: &Source) -> Result<Dataset> {
    read_states(source.read()?.as_slice())
}

// rows come newest first, selection sorts them
pub fn read_states<R: Read>(reader: R) -> Result<Dataset> {
    csv::Reader::from_reader(reader).into_deserialize().map(|row| {
	let row: StateRow = row?;
	Ok(Record {
	    date: NaiveDate::parse_from_str(&row.date, "%Y%m%d")?,
	    region: Region::state(&row.state),
	    cases: row.positive,
	    deaths: row.death
	})
    }).collect::<Result<_>>().map(Dataset::new)
}
