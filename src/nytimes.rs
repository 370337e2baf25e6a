use std::io::Read;
use std::path::{Path,PathBuf};

use chrono::naive::NaiveDate;
use serde::Deserialize;

use super::error::Result;
use super::dataset::{Dataset,Record};
use super::population::state_code;
use super::region::Region;
use super::source::Source;


pub const NATIONAL_FILE: &str = "us.csv";
pub const STATES_FILE: &str = "us-states.csv";
pub const COUNTIES_FILE: &str = "us-counties.csv";


#[derive(Deserialize)]
struct NationalRow {
    date: String,
    cases: Option<f64>,
    deaths: Option<f64>
}

#[derive(Deserialize)]
struct StateRow {
    date: String,
    state: String,
    cases: Option<f64>,
    deaths: Option<f64>
}

#[derive(Deserialize)]
struct CountyRow {
    date: String,
    county: String,
    fips: Option<u32>,
    cases: Option<f64>,
    deaths: Option<f64>
}


pub fn location(data_dir: &Path, file: &str) -> Source {
    match data_dir.to_str() {
	Some(dir) if dir.starts_with("http://") || dir.starts_with("https://") =>
	    Source::Url(format!("{}/{}", dir.trim_end_matches('/'), file)),
	_ => Source::File(data_dir.join(file))
    }
}

pub fn default_dir() -> PathBuf {
    std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default()
	.join("covid-19-data")
}


pub fn national(source: &Source) -> Result<Dataset> {
    read_national(source.read()?.as_slice())
}

pub fn states(source: &Source) -> Result<Dataset> {
    read_states(source.read()?.as_slice())
}

pub fn counties(source: &Source) -> Result<Dataset> {
    read_counties(source.read()?.as_slice())
}


pub fn read_national<R: Read>(reader: R) -> Result<Dataset> {
    csv::Reader::from_reader(reader).into_deserialize().map(|row| {
	let row: NationalRow = row?;
	Ok(Record {
	    date: parse_date(&row.date)?,
	    region: Region::usa(),
	    cases: row.cases,
	    deaths: row.deaths
	})
    }).collect::<Result<_>>().map(Dataset::new)
}

pub fn read_states<R: Read>(reader: R) -> Result<Dataset> {
    csv::Reader::from_reader(reader).into_deserialize().map(|row| {
	let row: StateRow = row?;
	Ok(Record {
	    date: parse_date(&row.date)?,
	    region: match state_code(&row.state) {
		Some(code) => Region::state(code),
		None => Region::Aggregate(row.state)
	    },
	    cases: row.cases,
	    deaths: row.deaths
	})
    }).collect::<Result<_>>().map(Dataset::new)
}

// NYC and "Unknown" rows have no FIPS code
pub fn read_counties<R: Read>(reader: R) -> Result<Dataset> {
    csv::Reader::from_reader(reader).into_deserialize().map(|row| {
	let row: CountyRow = row?;
	Ok(Record {
	    date: parse_date(&row.date)?,
	    region: match row.fips {
		Some(fips) => Region::County(fips),
		None => Region::Aggregate(row.county)
	    },
	    cases: row.cases,
	    deaths: row.deaths
	})
    }).collect::<Result<_>>().map(Dataset::new)
}


fn parse_date(date: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(date, "%Y-%m-%d")?)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
	NaiveDate::from_ymd_opt(2020, month, day).unwrap()
    }

    #[test]
    fn reads_national_file() {
	let data = read_national("date,cases,deaths\n\
				  2020-01-21,1,0\n\
				  2020-01-22,1,0\n\
				  2020-01-24,2,\n".as_bytes()).unwrap();
	let usa = data.select(&Region::usa()).unwrap();
	assert_eq!(usa.cases, vec![(date(1, 21), Some(1.0)), (date(1, 22), Some(1.0)),
				   (date(1, 24), Some(2.0))]);
	assert_eq!(usa.deaths[2], (date(1, 24), None));
    }

    #[test]
    fn maps_state_names_to_codes() {
	let data = read_states("date,state,fips,cases,deaths\n\
				2020-03-10,Pennsylvania,42,12,0\n\
				2020-03-10,Guam,66,3,0\n\
				2020-03-11,Pennsylvania,42,16,0\n".as_bytes()).unwrap();
	assert_eq!(data.select(&Region::state("PA")).unwrap().cases.len(), 2);
	assert_eq!(data.select(&Region::Aggregate("Guam".to_string())).unwrap().cases.len(), 1);
    }

    #[test]
    fn keys_new_york_city_by_name() {
	let data = read_counties("date,county,state,fips,cases,deaths\n\
				  2020-03-01,New York City,New York,,1,0\n\
				  2020-03-01,Allegheny,Pennsylvania,42003,0,0\n\
				  2020-03-02,New York City,New York,,1,0\n\
				  2020-03-02,Allegheny,Pennsylvania,42003,2,0\n".as_bytes()).unwrap();
	assert_eq!(data.select(&Region::nyc()).unwrap().cases.len(), 2);
	assert_eq!(data.select(&Region::County(42003)).unwrap().cases,
		   vec![(date(3, 1), Some(0.0)), (date(3, 2), Some(2.0))]);
    }

    #[test]
    fn rejects_malformed_dates() {
	assert!(read_national("date,cases,deaths\n03/01/2020,1,0\n".as_bytes()).is_err());
    }

    #[test]
    fn builds_file_and_url_locations() {
	assert_eq!(location(Path::new("/data/nyt"), STATES_FILE),
		   Source::File(PathBuf::from("/data/nyt/us-states.csv")));
	assert_eq!(location(Path::new("https://example.org/covid-19-data/"), NATIONAL_FILE),
		   Source::Url("https://example.org/covid-19-data/us.csv".to_string()));
    }

}
