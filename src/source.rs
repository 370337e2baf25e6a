use std::{fmt,fs};
use std::path::PathBuf;

use super::error::{Result,Error};


#[derive(Clone,Debug,PartialEq)]
pub enum Source {
    File(PathBuf),
    Url(String)
}

impl Source {

    pub fn parse(location: &str) -> Self {
	match location.starts_with("http://") || location.starts_with("https://") {
	    true => Self::Url(location.to_string()),
	    false => Self::File(PathBuf::from(location))
	}
    }

    pub fn read(&self) -> Result<Vec<u8>> {
	match self {
	    Self::File(path) => {
		log::debug!("Reading {}...", path.display());
		Ok(fs::read(path)?)
	    },
	    Self::Url(url) => {
		log::info!("Downloading {}...", url);
		let res = reqwest::blocking::get(url.as_str())?;
		match res.status().as_u16() {
		    200 => Ok(res.bytes()?.to_vec()),
		    _ => Err(Error::HttpError(res.status()))
		}
	    }
	}
    }

}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match self {
	    Self::File(path) => write!(f, "{}", path.display()),
	    Self::Url(url) => write!(f, "{}", url)
	}
    }
}
