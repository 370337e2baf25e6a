use std::collections::BTreeMap;

use chrono::naive::NaiveDate;

use super::error::{Result,Error};


pub type Series = Vec<(NaiveDate,f64)>;
pub type RawSeries = Vec<(NaiveDate,Option<f64>)>;


/// Day-over-day change of a cumulative counter. Missing values count
/// as zero, the first entry has no predecessor and is zero, and
/// downward revisions stay negative.
pub fn deltas(cumulative: &[Option<f64>]) -> Result<Vec<f64>> {

    if cumulative.is_empty() {
	return Err(Error::EmptySeries("cumulative series".to_string()));
    }

    let filled: Vec<f64> = cumulative.iter().map(|v| fill_value(*v)).collect();

    Ok((0..filled.len()).map(|i| match i {
	0 => 0.0,
	i => fill_value(Some(filled[i] - filled[i-1]))
    }).collect())

}

pub fn daily(data: &RawSeries) -> Result<Series> {
    let values: Vec<Option<f64>> = data.iter().map(|(_,v)| *v).collect();
    Ok(data.iter().map(|(d,_)| *d).zip(deltas(&values)?).collect())
}

pub fn present(data: &RawSeries) -> Series {
    data.iter().filter_map(|(d,v)| v.filter(|v| v.is_finite()).map(|v| (*d, v))).collect()
}

fn fill_value(value: Option<f64>) -> f64 {
    match value {
	Some(v) if v.is_finite() => v,
	_ => 0.0
    }
}


pub fn zero_last(values: &mut [f64]) {
    if let Some(last) = values.last_mut() {
	*last = 0.0;
    }
}

pub fn values(data: &Series) -> Vec<f64> {
    data.iter().map(|(_,v)| *v).collect()
}

pub fn with_values(data: &Series, values: Vec<f64>) -> Series {
    data.iter().map(|(d,_)| *d).zip(values).collect()
}


pub fn sum_series(data: &[&RawSeries]) -> RawSeries {
    let mut result : BTreeMap<NaiveDate,Option<f64>> = BTreeMap::new();
    for series in data {
	for (date,val) in series.iter() {
	    let ent = result.entry(*date).or_insert(None);
	    *ent = match (*ent, *val) {
		(Some(a),Some(b)) => Some(a + b),
		(a,None) => a,
		(None,b) => b
	    };
	}
    }
    result.into_iter().collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
	values.iter().map(|v| Some(*v)).collect()
    }

    fn date(day: u32) -> NaiveDate {
	NaiveDate::from_ymd_opt(2020, 4, day).unwrap()
    }

    #[test]
    fn deltas_of_flat_steps() {
	assert_eq!(deltas(&some(&[10.0, 10.0, 15.0, 15.0, 20.0])).unwrap(),
		   vec![0.0, 0.0, 5.0, 0.0, 5.0]);
    }

    #[test]
    fn deltas_keep_downward_revisions() {
	assert_eq!(deltas(&some(&[100.0, 90.0, 95.0])).unwrap(),
		   vec![0.0, -10.0, 5.0]);
    }

    #[test]
    fn single_value_gives_single_zero() {
	assert_eq!(deltas(&some(&[42.0])).unwrap(), vec![0.0]);
    }

    #[test]
    fn empty_input_is_rejected() {
	match deltas(&[]) {
	    Err(Error::EmptySeries(_)) => {},
	    other => panic!("unexpected: {:?}", other)
	}
    }

    #[test]
    fn missing_values_are_zero_before_differencing() {
	let input = vec![Some(5.0), None, Some(8.0), Some(f64::NAN)];
	assert_eq!(deltas(&input).unwrap(), vec![0.0, -5.0, 8.0, -8.0]);
    }

    #[test]
    fn deltas_preserve_length_and_total_change() {
	let inputs: Vec<Vec<f64>> = vec![
	    vec![0.0],
	    vec![3.0, 7.0],
	    vec![1.0, 4.0, 4.0, 2.0, 11.0, 30.0, 29.0, 50.0],
	    (0..100).map(|i| ((i * 37) % 11) as f64 + i as f64 * 3.0).collect()
	];
	for c in inputs {
	    let d = deltas(&some(&c)).unwrap();
	    assert_eq!(d.len(), c.len());
	    assert_eq!(d[0], 0.0);
	    let total: f64 = d[1..].iter().sum();
	    assert!((total - (c[c.len()-1] - c[0])).abs() < 1e-9);
	}
    }

    #[test]
    fn daily_keeps_dates_aligned() {
	let data = vec![(date(1), Some(1.0)), (date(2), Some(3.0)), (date(5), Some(10.0))];
	assert_eq!(daily(&data).unwrap(),
		   vec![(date(1), 0.0), (date(2), 2.0), (date(5), 7.0)]);
    }

    #[test]
    fn zero_last_blanks_final_value() {
	let mut values = vec![1.0, 2.0, 3.0];
	zero_last(&mut values);
	assert_eq!(values, vec![1.0, 2.0, 0.0]);
	let mut empty: Vec<f64> = vec![];
	zero_last(&mut empty);
	assert!(empty.is_empty());
    }

    #[test]
    fn present_skips_missing_values() {
	let data = vec![(date(1), Some(1.0)), (date(2), None), (date(3), Some(f64::NAN)), (date(4), Some(4.0))];
	assert_eq!(present(&data), vec![(date(1), 1.0), (date(4), 4.0)]);
    }

    #[test]
    fn sums_by_date() {
	let a = vec![(date(1), Some(1.0)), (date(2), None), (date(3), Some(4.0))];
	let b = vec![(date(2), Some(2.0)), (date(3), Some(5.0)), (date(4), None)];
	assert_eq!(sum_series(&[&a, &b]),
		   vec![(date(1), Some(1.0)), (date(2), Some(2.0)),
			(date(3), Some(9.0)), (date(4), None)]);
    }

}
