use std::fmt;
use std::str::FromStr;

use super::error::{Result,Error};


pub const NEW_YORK_CITY: &str = "New York City";
pub const UNITED_STATES: &str = "United States";


#[derive(Clone,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum Region {
    State(String),
    County(u32),
    Aggregate(String)
}

impl Region {

    pub fn state(code: &str) -> Self {
	Self::State(code.to_uppercase())
    }

    pub fn nyc() -> Self {
	Self::Aggregate(NEW_YORK_CITY.to_string())
    }

    pub fn usa() -> Self {
	Self::Aggregate(UNITED_STATES.to_string())
    }

    pub fn key(&self) -> String {
	match self {
	    Self::State(code) => code.clone(),
	    Self::County(fips) => format!("{:05}", fips),
	    Self::Aggregate(label) => label.clone()
	}
    }

}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
	let s = s.trim();
	match s {
	    "" => Err(Error::InvalidInput("empty region".to_string())),
	    s if s.chars().all(|c| c.is_ascii_digit()) => s.parse().map(Self::County)
		.map_err(|_| Error::UnknownRegion(s.to_string())),
	    s if s.eq_ignore_ascii_case(NEW_YORK_CITY) || s.eq_ignore_ascii_case("nyc") => Ok(Self::nyc()),
	    s if s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()) => Ok(Self::state(s)),
	    s => Ok(Self::Aggregate(s.to_string()))
	}
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	write!(f, "{}", self.key())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_county_fips() {
	assert_eq!("42003".parse::<Region>().unwrap(), Region::County(42003));
	assert_eq!("01001".parse::<Region>().unwrap(), Region::County(1001));
    }

    #[test]
    fn parses_state_code_case_insensitive() {
	assert_eq!("pa".parse::<Region>().unwrap(), Region::State("PA".to_string()));
	assert_eq!(" NY ".parse::<Region>().unwrap(), Region::State("NY".to_string()));
    }

    #[test]
    fn parses_named_aggregate() {
	assert_eq!("New York City".parse::<Region>().unwrap(), Region::nyc());
	assert_eq!("nyc".parse::<Region>().unwrap(), Region::nyc());
	assert_eq!("Kansas City".parse::<Region>().unwrap(),
		   Region::Aggregate("Kansas City".to_string()));
    }

    #[test]
    fn oversized_fips_is_unknown_region() {
	match "99999999999".parse::<Region>() {
	    Err(err @ Error::UnknownRegion(_)) => assert!(err.is_region_error()),
	    other => panic!("unexpected: {:?}", other)
	}
    }

    #[test]
    fn rejects_empty_region() {
	match "  ".parse::<Region>() {
	    Err(Error::InvalidInput(_)) => {},
	    other => panic!("unexpected: {:?}", other)
	}
    }

    #[test]
    fn county_key_is_zero_padded() {
	assert_eq!(Region::County(1001).key(), "01001");
	assert_eq!(format!("{}", Region::state("wa")), "WA");
    }

}
