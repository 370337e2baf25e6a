use std::{io,fs};
use std::fs::File;
use std::io::Write;
use std::path::{Path,PathBuf};

use serde_json::{Value,json};
use unidecode::unidecode;

use super::error::Result;
use super::population::RateScale;
use super::series::Series;


pub const CASE_COLOR: &str = "#1f77b4";
pub const DEATH_COLOR: &str = "#e03b68"; // framboise
pub const RAW_OPACITY: f64 = 0.25;

const RATE_TITLE: &str = "per 10k population";


#[derive(Clone,Debug)]
pub struct Panel {
    pub title: String,
    pub color: &'static str,
    pub raw: Series,
    pub trend: Option<Series>,
    pub opacity: f64,
    pub scale: RateScale,
    pub refs: Vec<f64>
}


pub fn paired_graph(graph_path: &Path, group: &str, name: &str, title: &str,
		    panels: &[Panel]) -> Result<PathBuf> {
    page(&graph_path.join(group), &format!("{}.html", slug(name)), title, json!({
	"hconcat": panels.iter().map(|p| panel_spec(p, 420, 320)).collect::<Vec<_>>()
    }))
}

pub fn grid_graph(graph_path: &Path, group: &str, name: &str, title: &str,
		  panels: &[Panel]) -> Result<PathBuf> {
    page(&graph_path.join(group), &format!("{}.html", slug(name)), title, json!({
	"columns": grid_columns(panels.len()),
	"concat": panels.iter().map(|p| panel_spec(p, 220, 160)).collect::<Vec<_>>()
    }))
}

pub fn grid_columns(n: usize) -> usize {
    ((n as f64).sqrt() as usize).max(1)
}

pub fn slug(name: &str) -> String {
    unidecode(name).to_lowercase()
	.split(|c: char| !c.is_ascii_alphanumeric())
	.filter(|s| !s.is_empty())
	.collect::<Vec<_>>().join("-")
}


fn panel_spec(panel: &Panel, width: usize, height: usize) -> Value {

    let (lo,hi) = domain(panel);
    let trend = panel.trend.as_ref();

    let values: Vec<Value> = panel.raw.iter().enumerate().filter_map(
	|(i,(date,val))| match val.is_finite() {
	    false => None,
	    true => {
		let mut datum = json!({
		    "Date": format!("{}", date.format("%Y-%m-%d")),
		    "Value": val,
		    "Rate": panel.scale.forward(*val)
		});
		if let Some((_,t)) = trend.and_then(|t| t.get(i)).filter(|(_,t)| t.is_finite()) {
		    datum["Trend"] = json!(t);
		}
		Some(datum)
	    }
	}).collect();

    let count_scale = json!({"domain": [lo, hi], "nice": false});
    let mut layers = vec![
	json!({
	    "mark": {"type": "line", "color": panel.color, "opacity": panel.opacity},
	    "selection": {"Grid": {"bind": "scales", "type": "interval"}},
	    "encoding": {
		"y": {
		    "field": "Value",
		    "type": "quantitative",
		    "title": "Count",
		    "scale": count_scale,
		    "axis": {"orient": "left", "grid": true}
		},
		"tooltip": [
		    {"field": "Date", "type": "temporal"},
		    {"field": "Value", "type": "quantitative", "format": ".0f"},
		    {"field": "Rate", "type": "quantitative", "format": ".3f", "title": RATE_TITLE}
		]
	    }
	})
    ];

    if trend.is_some() {
	layers.push(json!({
	    "mark": {"type": "line", "color": panel.color},
	    "encoding": {
		"y": {
		    "field": "Trend",
		    "type": "quantitative",
		    "scale": count_scale,
		    "axis": null
		}
	    }
	}));
    }

    if !panel.refs.is_empty() {
	layers.push(json!({
	    "data": {
		"values": panel.refs.iter().map(
		    |rate| json!({
			"Name": format!("{} {}", rate, RATE_TITLE),
			"Value": panel.scale.reverse(*rate)
		    })).collect::<Vec<_>>()
	    },
	    "encoding": {
		"y": {
		    "field": "Value",
		    "type": "quantitative",
		    "scale": count_scale,
		    "axis": null
		}
	    },
	    "layer": [
		{"mark": {"type": "rule", "color": "red", "opacity": 0.5, "size": 1}},
		{"mark": {"type": "text", "color": "red", "align": "left", "dy": -6},
		 "encoding": {"text": {"field": "Name"}, "x": {"value": 2}}}
	    ]
	}));
    }

    layers.push(json!({
	"mark": {"type": "line", "opacity": 0},
	"encoding": {
	    "y": {
		"field": "Rate",
		"type": "quantitative",
		"title": RATE_TITLE,
		"scale": {"domain": [panel.scale.forward(lo), panel.scale.forward(hi)], "nice": false},
		"axis": {"orient": "right", "grid": false}
	    }
	}
    }));

    json!({
	"title": panel.title,
	"width": width,
	"height": height,
	"data": {"values": values},
	"encoding": {
	    "x": {
		"field": "Date",
		"timeUnit": "utcyearmonthdate",
		"type": "temporal",
		"title": null,
		"axis": {"format": "%m-%d", "labelAngle": -20, "labelFontSize": 8}
	    }
	},
	"layer": layers,
	"resolve": {"scale": {"y": "independent"}}
    })

}


fn domain(panel: &Panel) -> (f64,f64) {
    let trend = panel.trend.iter().flat_map(|t| t.iter().map(|(_,v)| *v));
    let refs = panel.refs.iter().map(|r| panel.scale.reverse(*r));
    let (lo,hi) = panel.raw.iter().map(|(_,v)| *v).chain(trend).chain(refs)
	.filter(|v| v.is_finite())
	.fold((0.0f64, 0.0f64), |(lo,hi),v| (lo.min(v), hi.max(v)));
    match hi > lo {
	true => (lo, hi),
	false => (lo, lo + 1.0)
    }
}


fn page(graph_path: &Path, path: &str, title: &str, spec: Value) -> Result<PathBuf> {

    fs::create_dir_all(graph_path)?;
    let file = graph_path.join(path);
    let mut out = io::BufWriter::new(File::create(&file)?);

    let mut spec = spec;
    spec["$schema"] = json!("https://vega.github.io/schema/vega-lite/v4.json");
    spec["title"] = json!(title);

    write!(out, "<!DOCTYPE html><html><head>")?;
    write!(out, "<meta charset=\"UTF-8\">")?;
    write!(out, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")?;
    write!(out, "<title>{}</title>", title)?;
    write!(out, "<script src=\"https://cdn.jsdelivr.net/npm/vega@5\"></script>")?;
    write!(out, "<script src=\"https://cdn.jsdelivr.net/npm/vega-lite@4\"></script>")?;
    write!(out, "<script src=\"https://cdn.jsdelivr.net/npm/vega-embed\"></script>")?;
    write!(out, "</head>")?;
    write!(out, "<body>")?;
    write!(out, "<div id=\"vis\"></div>")?;
    write!(out, "<script type=\"text/javascript\">")?;
    write!(out, "var spec = ")?;

    serde_json::to_writer_pretty(out.by_ref(), &spec)?;

    write!(out, ";vegaEmbed('#vis', spec,{{}}).then(function(result) {{")?;
    write!(out, "}}).catch(console.error);")?;
    write!(out, "</script>")?;
    write!(out, "</body></html>")?;
    out.flush()?;

    log::info!("Wrote {}", file.display());
    Ok(file)

}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::naive::NaiveDate;

    fn panel(trend: bool, refs: Vec<f64>) -> Panel {
	let raw: Series = (1..=10).map(
	    |d| (NaiveDate::from_ymd_opt(2020, 6, d).unwrap(), (d * 100) as f64)
	).collect();
	Panel {
	    title: "Daily Cases: Allegheny County".to_string(),
	    color: CASE_COLOR,
	    trend: match trend {
		true => Some(raw.iter().map(|(d,v)| (*d, v - 50.0)).collect()),
		false => None
	    },
	    raw,
	    opacity: RAW_OPACITY,
	    scale: RateScale::new(1_000_000.0).unwrap(),
	    refs
	}
    }

    #[test]
    fn slugs_are_ascii() {
	assert_eq!(slug("Do\u{f1}a Ana County"), "dona-ana-county");
	assert_eq!(slug("New York City"), "new-york-city");
	assert_eq!(slug("42003"), "42003");
    }

    #[test]
    fn grid_is_roughly_square() {
	assert_eq!(grid_columns(1), 1);
	assert_eq!(grid_columns(4), 2);
	assert_eq!(grid_columns(8), 2);
	assert_eq!(grid_columns(51), 7);
	assert_eq!(grid_columns(0), 1);
    }

    #[test]
    fn rate_axis_matches_count_axis() {
	let p = panel(true, vec![]);
	let spec = panel_spec(&p, 100, 100);
	let layers = spec["layer"].as_array().unwrap();
	assert_eq!(layers.len(), 3);
	assert_eq!(layers[0]["encoding"]["y"]["scale"]["domain"], json!([0.0, 1000.0]));
	assert_eq!(layers[2]["encoding"]["y"]["scale"]["domain"], json!([0.0, 10.0]));
	assert_eq!(spec["data"]["values"][0]["Trend"], json!(50.0));
	assert_eq!(spec["data"]["values"][9]["Rate"], json!(10.0));
    }

    #[test]
    fn reference_rates_extend_domain() {
	let p = panel(false, vec![25.0]);
	let spec = panel_spec(&p, 100, 100);
	let layers = spec["layer"].as_array().unwrap();
	assert_eq!(layers.len(), 3);
	assert_eq!(layers[1]["data"]["values"][0]["Value"], json!(2500.0));
	assert_eq!(layers[0]["encoding"]["y"]["scale"]["domain"], json!([0.0, 2500.0]));
    }

    #[test]
    fn flat_series_gets_a_non_empty_domain() {
	let mut p = panel(false, vec![]);
	p.raw = p.raw.iter().map(|(d,_)| (*d, 0.0)).collect();
	assert_eq!(domain(&p), (0.0, 1.0));
    }

    #[test]
    fn writes_html_page() {
	let dir = std::env::temp_dir().join(format!("covid19-trends-graph-{}", std::process::id()));
	let file = paired_graph(&dir, "counties", "Allegheny County", "Allegheny County",
				&[panel(true, vec![1.0]), panel(false, vec![])]).unwrap();
	let html = fs::read_to_string(&file).unwrap();
	fs::remove_dir_all(&dir).unwrap();
	assert_eq!(file.file_name().unwrap(), "allegheny-county.html");
	assert!(html.contains("<title>Allegheny County</title>"));
	assert!(html.contains("\"hconcat\""));
	assert!(html.contains(RATE_TITLE));
    }

}
