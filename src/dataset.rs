use chrono::naive::NaiveDate;

use super::error::{Result,Error};
use super::region::Region;
use super::series::{RawSeries,sum_series};


#[derive(Clone,Debug,PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub region: Region,
    pub cases: Option<f64>,
    pub deaths: Option<f64>
}

#[derive(Clone,Debug,PartialEq)]
pub struct Selection {
    pub cases: RawSeries,
    pub deaths: RawSeries
}

#[derive(Clone,Debug,Default)]
pub struct Dataset {
    records: Vec<Record>
}

impl Dataset {

    pub fn new(records: Vec<Record>) -> Self {
	Self { records }
    }

    pub fn len(&self) -> usize {
	self.records.len()
    }

    pub fn regions(&self) -> Vec<Region> {
	let mut regions: Vec<Region> = self.records.iter().map(|r| r.region.clone()).collect();
	regions.sort();
	regions.dedup();
	regions
    }

    pub fn select(&self, region: &Region) -> Result<Selection> {

	let mut rows: Vec<&Record> = self.records.iter()
	    .filter(|r| &r.region == region).collect();

	if rows.is_empty() {
	    return Err(Error::EmptySeries(region.key()));
	}

	rows.sort_by_key(|r| r.date);

	Ok(Selection {
	    cases: rows.iter().map(|r| (r.date, r.cases)).collect(),
	    deaths: rows.iter().map(|r| (r.date, r.deaths)).collect()
	})

    }

    pub fn select_all(&self, regions: &[Region]) -> Result<Selection> {
	let selections = regions.iter().map(|r| self.select(r)).collect::<Result<Vec<_>>>()?;
	if selections.is_empty() {
	    return Err(Error::EmptySeries("no regions".to_string()));
	}
	Ok(Selection {
	    cases: sum_series(&selections.iter().map(|s| &s.cases).collect::<Vec<_>>()),
	    deaths: sum_series(&selections.iter().map(|s| &s.deaths).collect::<Vec<_>>())
	})
    }

}
