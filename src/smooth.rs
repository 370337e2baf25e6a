use super::error::{Result,Error};


pub const DEFAULT_WINDOW: usize = 7;
pub const DEFAULT_DEGREE: usize = 1;


/// Savitzky-Golay smoother: a least-squares polynomial of `degree`
/// fitted over a sliding window of `window` samples, evaluated at the
/// window center. The first and last `window / 2` samples take their
/// value from the fit over the first resp. last full window.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct Smoother {
    window: usize,
    degree: usize
}

impl Default for Smoother {
    fn default() -> Self {
	Self { window: DEFAULT_WINDOW, degree: DEFAULT_DEGREE }
    }
}

impl Smoother {

    pub fn new(window: usize, degree: usize) -> Result<Self> {
	if window == 0 || window % 2 == 0 {
	    return Err(Error::InvalidInput(format!("smoothing window must be odd, got {}", window)));
	}
	if degree >= window {
	    return Err(Error::InvalidInput(format!(
		"polynomial degree {} too high for a window of {}", degree, window)));
	}
	Ok(Self { window, degree })
    }

    pub fn window(&self) -> usize {
	self.window
    }

    pub fn degree(&self) -> usize {
	self.degree
    }

    pub fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {

	let n = data.len();
	let half = self.window / 2;

	if n < self.window {
	    return Err(Error::InvalidInput(format!(
		"{} samples is too short for a smoothing window of {}", n, self.window)));
	}

	let center = weights(self.window, self.degree, 0.0)?;
	let mut result: Vec<f64> = (0..n).map(|i| match i >= half && i + half < n {
	    true => dot(&center, &data[i-half..=i+half]),
	    false => 0.0
	}).collect();

	for i in 0..half {
	    let w = weights(self.window, self.degree, i as f64 - half as f64)?;
	    result[i] = dot(&w, &data[..self.window]);
	    let w = weights(self.window, self.degree, half as f64 - i as f64)?;
	    result[n-1-i] = dot(&w, &data[n-self.window..]);
	}

	Ok(result)

    }

}


fn dot(weights: &[f64], values: &[f64]) -> f64 {
    weights.iter().zip(values).map(|(w,v)| w * v).sum()
}


/// Weights `w` such that `sum(w[j] * y[j])` is the value at `at` of
/// the least-squares polynomial through `y`, sampled at positions
/// `-half..=half`.
fn weights(window: usize, degree: usize, at: f64) -> Result<Vec<f64>> {

    let half = (window / 2) as f64;
    let xs: Vec<f64> = (0..window).map(|j| j as f64 - half).collect();
    let terms = degree + 1;

    // Normal equations: (A^T A) z = e(at), w = A z
    let mut normal = vec![vec![0.0; terms]; terms];
    for (r,row) in normal.iter_mut().enumerate() {
	for (c,cell) in row.iter_mut().enumerate() {
	    *cell = xs.iter().map(|x| x.powi((r + c) as i32)).sum();
	}
    }
    let rhs: Vec<f64> = (0..terms).map(|k| at.powi(k as i32)).collect();
    let z = solve(normal, rhs)?;

    Ok(xs.iter().map(
	|x| z.iter().enumerate().map(|(k,zk)| zk * x.powi(k as i32)).sum()
    ).collect())

}


fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {

    let n = b.len();

    for col in 0..n {
	let pivot = (col..n).max_by(
	    |i,j| a[*i][col].abs().partial_cmp(&a[*j][col].abs())
		.unwrap_or(std::cmp::Ordering::Equal)
	).unwrap_or(col);
	if a[pivot][col].abs() < 1e-12 {
	    return Err(Error::InvalidInput("singular smoothing system".to_string()));
	}
	a.swap(col, pivot);
	b.swap(col, pivot);
	for row in col+1..n {
	    let f = a[row][col] / a[col][col];
	    for k in col..n {
		a[row][k] -= f * a[col][k];
	    }
	    b[row] -= f * b[col];
	}
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
	let s: f64 = (row+1..n).map(|k| a[row][k] * x[k]).sum();
	x[row] = (b[row] - s) / a[row][row];
    }

    Ok(x)

}
