use std::io;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::collections::HashMap;

use serde::Deserialize;
use encoding_rs::mem::decode_latin1;
use lazy_static::lazy_static;

use super::error::{Result,Error};
use super::region::{Region,NEW_YORK_CITY,UNITED_STATES};


const RATE_BASE: f64 = 10000.0;

lazy_static! {
    static ref STATES: Vec<(&'static str, &'static str, u64)> = vec![
	("AL", "Alabama", 4_903_000),
	("AK", "Alaska", 731_545),
	("AZ", "Arizona", 7_279_000),
	("AR", "Arkansas", 3_018_000),
	("CA", "California", 39_512_000),
	("CO", "Colorado", 5_759_000),
	("CT", "Connecticut", 3_565_000),
	("DE", "Delaware", 973_764),
	("DC", "District of Columbia", 705_749),
	("FL", "Florida", 21_447_000),
	("GA", "Georgia", 10_617_000),
	("HI", "Hawaii", 1_415_000),
	("ID", "Idaho", 1_787_000),
	("IL", "Illinois", 12_672_000),
	("IN", "Indiana", 6_732_000),
	("IA", "Iowa", 3_155_000),
	("KS", "Kansas", 2_913_000),
	("KY", "Kentucky", 4_468_000),
	("LA", "Louisiana", 4_649_000),
	("ME", "Maine", 1_344_000),
	("MD", "Maryland", 6_046_000),
	("MA", "Massachusetts", 6_950_000),
	("MI", "Michigan", 9_987_000),
	("MN", "Minnesota", 5_640_000),
	("MS", "Mississippi", 2_976_000),
	("MO", "Missouri", 6_137_000),
	("MT", "Montana", 1_069_000),
	("NE", "Nebraska", 1_934_000),
	("NV", "Nevada", 3_080_000),
	("NH", "New Hampshire", 1_360_000),
	("NJ", "New Jersey", 8_882_000),
	("NM", "New Mexico", 2_097_000),
	("NY", "New York", 19_453_000),
	("NC", "North Carolina", 10_488_000),
	("ND", "North Dakota", 762_062),
	("OH", "Ohio", 11_689_000),
	("OK", "Oklahoma", 3_957_000),
	("OR", "Oregon", 4_218_000),
	("PA", "Pennsylvania", 12_802_000),
	("RI", "Rhode Island", 1_059_000),
	("SC", "South Carolina", 5_149_000),
	("SD", "South Dakota", 884_659),
	("TN", "Tennessee", 6_833_000),
	("TX", "Texas", 28_995_000),
	("UT", "Utah", 3_206_000),
	("VT", "Vermont", 623_989),
	("VA", "Virginia", 8_536_000),
	("WA", "Washington", 7_615_000),
	("WV", "West Virginia", 1_792_000),
	("WI", "Wisconsin", 5_822_000),
	("WY", "Wyoming", 578_759),
    ];

    static ref AGGREGATES: Vec<(&'static str, u64)> = vec![
	(NEW_YORK_CITY, 8_399_000),
	(UNITED_STATES, 328_200_000),
    ];
}


pub fn state_codes() -> Vec<&'static str> {
    STATES.iter().map(|(code,_,_)| *code).collect()
}

pub fn state_code(name: &str) -> Option<&'static str> {
    STATES.iter().find(|(_,n,_)| *n == name).map(|(code,_,_)| *code)
}



#[derive(Clone,Copy,Debug,PartialEq)]
pub struct RateScale {
    population: f64
}

impl RateScale {

    pub fn new(population: f64) -> Result<Self> {
	match population.is_finite() && population > 0.0 {
	    true => Ok(Self { population }),
	    false => Err(Error::InvalidInput(format!("population must be positive, got {}", population)))
	}
    }

    pub fn population(&self) -> f64 {
	self.population
    }

    pub fn forward(&self, count: f64) -> f64 {
	count / self.population * RATE_BASE
    }

    pub fn reverse(&self, rate: f64) -> f64 {
	rate * self.population / RATE_BASE
    }

}


#[derive(Deserialize)]
struct CountyRow {
    county_fips: u32,
    county_name: String,
    pop2014: f64
}

pub struct PopulationTable {
    populations: HashMap<Region,u64>,
    names: HashMap<Region,String>
}

impl PopulationTable {

    pub fn builtin() -> Self {
	let mut populations = HashMap::new();
	let mut names = HashMap::new();
	for (code,name,pop) in STATES.iter() {
	    populations.insert(Region::state(code), *pop);
	    names.insert(Region::state(code), name.to_string());
	}
	for (label,pop) in AGGREGATES.iter() {
	    populations.insert(Region::Aggregate(label.to_string()), *pop);
	}
	Self { populations, names }
    }

    pub fn load_counties(&mut self, path: &Path) -> Result<usize> {
	let mut bytes = Vec::new();
	io::BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
	let count = self.read_counties(decode_latin1(&bytes).as_bytes())?;
	log::info!("Loaded {} county populations from {}", count, path.display());
	Ok(count)
    }

    pub fn read_counties<R: Read>(&mut self, reader: R) -> Result<usize> {
	let mut count = 0;
	for row in csv::Reader::from_reader(reader).into_deserialize() {
	    let row: CountyRow = row?;
	    let region = Region::County(row.county_fips);
	    self.populations.insert(region.clone(), row.pop2014.round() as u64);
	    self.names.insert(region, row.county_name);
	    count += 1;
	}
	Ok(count)
    }

    pub fn population(&self, region: &Region) -> Result<u64> {
	self.populations.get(region).copied()
	    .ok_or_else(|| Error::UnknownRegion(region.key()))
    }

    pub fn name(&self, region: &Region) -> String {
	self.names.get(region).cloned().unwrap_or_else(|| region.key())
    }

    pub fn scale(&self, regions: &[Region]) -> Result<RateScale> {
	let total = regions.iter().map(|r| self.population(r))
	    .collect::<Result<Vec<_>>>()?.into_iter().sum::<u64>();
	RateScale::new(total as f64)
    }

}
