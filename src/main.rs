mod graph;
mod error;
mod region;
mod population;
mod series;
mod smooth;
mod source;
mod dataset;
mod nytimes;
mod tracking;

use std::fmt;
use std::path::PathBuf;

use clap::{Parser,Subcommand};

use dataset::{Dataset,Selection};
use error::{Result,Error};
use graph::{Panel,CASE_COLOR,DEATH_COLOR,RAW_OPACITY};
use population::{PopulationTable,RateScale};
use region::Region;
use smooth::{Smoother,DEFAULT_WINDOW,DEFAULT_DEGREE};
use source::Source;


#[derive(Parser)]
#[command(name = "covid19-trends", about = "Plot COVID-19 case and death trends per region")]
struct Cli {
    /// Daily counts with a smoothed trend line
    #[arg(long, global = true, overrides_with = "cumulative")]
    daily: bool,
    /// Running totals
    #[arg(long, global = true, overrides_with = "daily")]
    cumulative: bool,
    /// Page title, and the place name of a combined chart
    #[arg(long, global = true)]
    title: Option<String>,
    /// Smoothing window length (odd)
    #[arg(long, global = true, default_value_t = DEFAULT_WINDOW)]
    window: usize,
    /// Degree of the local polynomial fit
    #[arg(long, global = true, default_value_t = DEFAULT_DEGREE)]
    degree: usize,
    /// Ignore the latest, usually incomplete, daily report when smoothing
    #[arg(long, global = true)]
    zero_last: bool,
    /// Draw a reference line at this many cases per 10k population
    #[arg(long = "ref-rate", global = true)]
    ref_rates: Vec<f64>,
    /// Sum all requested regions into a single chart
    #[arg(long, global = true)]
    combine: bool,
    /// Directory the charts are written to
    #[arg(long, global = true, env = "COVID_GRAPH_DIR", default_value = "graphs")]
    output: PathBuf,
    /// Checkout (or base URL) of the NYT covid-19-data repository
    #[arg(long, global = true, env = "COVID_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// CSV with county_fips, county_name and pop2014 columns
    #[arg(long, global = true, env = "COVID_COUNTY_POPULATION")]
    counties_file: Option<PathBuf>,
    /// covidtracking.com states daily CSV
    #[arg(long, global = true, default_value = tracking::STATES_URL)]
    tracking_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deaths and cases per county (FIPS code or "New York City")
    Counties {
	regions: Vec<String>,
    },
    /// Grid of cases for several states
    States {
	regions: Vec<String>,
    },
    /// Deaths and cases for the whole country
    Usa,
    /// Deaths and cases per state from covidtracking.com
    Tracking {
	regions: Vec<String>,
    },
}

impl Cli {

    fn daily_or(&self, default: bool) -> bool {
	match (self.daily, self.cumulative) {
	    (true,_) => true,
	    (_,true) => false,
	    _ => default
	}
    }

    fn nyt_dir(&self) -> PathBuf {
	self.data_dir.clone().unwrap_or_else(nytimes::default_dir)
    }

}


#[derive(Clone,Debug)]
struct Plot {
    daily: bool,
    smoother: Smoother,
    zero_last: bool,
    refs: Vec<f64>
}

impl Plot {

    fn panel(&self, label: &str, place: &str, color: &'static str,
	     data: &series::RawSeries, scale: RateScale) -> Result<Panel> {

	if !self.daily {
	    return Ok(Panel {
		title: format!("{}: {}", label, place),
		color,
		raw: series::present(data),
		trend: None,
		opacity: 1.0,
		scale,
		refs: self.refs.clone()
	    });
	}

	let raw = series::daily(data)?;
	let mut input = series::values(&raw);
	if self.zero_last {
	    series::zero_last(&mut input);
	}
	let trend = series::with_values(&raw, self.smoother.apply(&input)
					 .map_err(|err| region_context(err, place))?);

	Ok(Panel {
	    title: format!("Daily {}: {}", label, place),
	    color,
	    raw,
	    trend: Some(trend),
	    opacity: RAW_OPACITY,
	    scale,
	    refs: self.refs.clone()
	})

    }

    fn pair(&self, place: &str, data: &Selection, scale: RateScale) -> Result<Vec<Panel>> {
	Ok(vec![
	    self.panel("Deaths", place, DEATH_COLOR, &data.deaths, scale)?,
	    self.panel("Cases", place, CASE_COLOR, &data.cases, scale)?
	])
    }

    fn file_name(&self, place: &str) -> String {
	format!("{}-{}", place, match self.daily {
	    true => "daily",
	    false => "cumulative"
	})
    }

}

fn region_context(err: Error, place: &str) -> Error {
    match err {
	Error::InvalidInput(msg) => Error::InvalidInput(format!("{}: {}", place, msg)),
	err => err
    }
}


fn main() -> Result<()> {

    pretty_env_logger::formatted_builder()
	.filter_level(log::LevelFilter::Info)
	.parse_env("RUST_LOG")
	.init();

    let cli = Cli::parse();

    run(&cli).map_err(|err| {
	log::error!("{}", err);
	err
    })

}


fn run(cli: &Cli) -> Result<()> {

    let mut populations = PopulationTable::builtin();
    if let Some(path) = &cli.counties_file {
	populations.load_counties(path)?;
    }

    let regions_or = |tokens: &Vec<String>, default: Vec<Region>| -> Result<Vec<Region>> {
	match tokens.is_empty() {
	    true => Ok(default),
	    false => parse_regions(tokens)
	}
    };

    let (group, daily, data, regions) = match &cli.command {
	Command::Counties { regions: tokens } => (
	    "counties", cli.daily_or(false),
	    nytimes::counties(&nytimes::location(&cli.nyt_dir(), nytimes::COUNTIES_FILE))?,
	    regions_or(tokens, vec![Region::County(42003)])?
	),
	Command::States { regions: tokens } => (
	    "states", cli.daily_or(true),
	    nytimes::states(&nytimes::location(&cli.nyt_dir(), nytimes::STATES_FILE))?,
	    regions_or(tokens, population::state_codes().into_iter().map(Region::state).collect())?
	),
	Command::Usa => (
	    "usa", cli.daily_or(false),
	    nytimes::national(&nytimes::location(&cli.nyt_dir(), nytimes::NATIONAL_FILE))?,
	    vec![Region::usa()]
	),
	Command::Tracking { regions: tokens } => (
	    "tracking", cli.daily_or(true),
	    tracking::states(&Source::parse(&cli.tracking_url))?,
	    regions_or(tokens, vec![Region::state("PA")])?
	),
    };

    log::info!("Loaded {} rows covering {} regions", data.len(), data.regions().len());

    let plot = Plot {
	daily,
	smoother: Smoother::new(cli.window, cli.degree)?,
	zero_last: cli.zero_last,
	refs: cli.ref_rates.clone()
    };
    if daily {
	log::debug!("Smoothing over {} days with degree {}", plot.smoother.window(), plot.smoother.degree());
    }

    match (&cli.command, cli.combine) {
	(Command::States { .. }, _) => state_grid(cli, &plot, &data, &populations, &regions),
	(_, true) => combined(cli, &plot, group, &data, &populations, &regions).map(|_| ()),
	(_, false) => {
	    for region in &regions {
		skip_region(region, paired(cli, &plot, group, &data, &populations, region))?;
	    }
	    Ok(())
	}
    }

}


/// Region errors are reported and skipped, anything else aborts.
fn skip_region<K: fmt::Display + ?Sized, T>(region: &K, result: Result<T>) -> Result<Option<T>> {
    match result {
	Ok(v) => Ok(Some(v)),
	Err(err) if err.is_region_error() => {
	    log::warn!("Skipping {}: {}", region, err);
	    Ok(None)
	},
	Err(err) => Err(err)
    }
}


fn parse_regions(tokens: &[String]) -> Result<Vec<Region>> {
    let mut regions: Vec<Region> = Vec::new();
    for token in tokens {
	if let Some(region) = skip_region(token.as_str(), token.parse())? {
	    regions.push(region);
	}
    }
    Ok(regions)
}


fn paired(cli: &Cli, plot: &Plot, group: &str, data: &Dataset,
	  populations: &PopulationTable, region: &Region) -> Result<PathBuf> {
    let place = populations.name(region);
    let scale = populations.scale(std::slice::from_ref(region))?;
    log::debug!("{}: population {}", place, scale.population());
    let panels = plot.pair(&place, &data.select(region)?, scale)?;
    graph::paired_graph(&cli.output, group, &plot.file_name(&place),
			cli.title.as_deref().unwrap_or(&place), &panels)
}


fn combined(cli: &Cli, plot: &Plot, group: &str, data: &Dataset,
	    populations: &PopulationTable, regions: &[Region]) -> Result<PathBuf> {
    let place = match &cli.title {
	Some(title) => title.clone(),
	None => regions.iter().map(|r| populations.name(r)).collect::<Vec<_>>().join(" + ")
    };
    let scale = populations.scale(regions)?;
    let panels = plot.pair(&place, &data.select_all(regions)?, scale)?;
    graph::paired_graph(&cli.output, group, &plot.file_name(&place), &place, &panels)
}


fn state_grid(cli: &Cli, plot: &Plot, data: &Dataset,
	      populations: &PopulationTable, regions: &[Region]) -> Result<()> {

    let mut panels = Vec::new();

    for region in regions {
	let panel = skip_region(region, populations.scale(std::slice::from_ref(region)).and_then(
	    |scale| plot.panel("Cases", &region.key(), CASE_COLOR, &data.select(region)?.cases, scale)
	))?;
	if let Some(mut panel) = panel {
	    panel.title = region.key();
	    panels.push(panel);
	}
    }

    if panels.is_empty() {
	return Err(Error::EmptySeries("all requested states".to_string()));
    }

    let title = cli.title.clone().unwrap_or_else(|| match plot.daily {
	true => "Daily cases by state".to_string(),
	false => "Cases by state".to_string()
    });
    graph::grid_graph(&cli.output, "states", &plot.file_name("grid"), &title, &panels)?;
    Ok(())

}
