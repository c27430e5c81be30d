use std::fmt;

/// Optional value, displayed as `NaN` when missing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value(pub Option<f64>);
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(&value, f),
            // precision would truncate the text, only width and alignment apply
            None => {
                let width = f.width().unwrap_or(0);
                match f.align() {
                    Some(fmt::Alignment::Left) => write!(f, "{:<width$}", "NaN"),
                    Some(fmt::Alignment::Center) => write!(f, "{:^width$}", "NaN"),
                    _ => write!(f, "{:>width$}", "NaN"),
                }
            }
        }
    }
}

/// Sample statistics
///
/// The mean is missing without samples and the standard deviation
/// (unbiased estimator) is missing with less than 2 samples.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}
impl Statistics {
    pub fn new<I: IntoIterator<Item = f64>>(samples: I) -> Self {
        let samples: Vec<f64> = samples.into_iter().filter(|x| !x.is_nan()).collect();
        let count = samples.len();
        let n = count as f64;
        let mean = (count > 0).then(|| samples.iter().sum::<f64>() / n);
        let std = mean.filter(|_| count > 1).map(|mean| {
            (samples.iter().map(|x| x - mean).fold(0f64, |s, x| s + x * x) / (n - 1.)).sqrt()
        });
        Self { count, mean, std }
    }
    /// Coefficient of variation: std/mean
    pub fn cv(&self) -> Option<f64> {
        match (self.std, self.mean) {
            (Some(std), Some(mean)) if mean != 0. => Some(std / mean),
            _ => None,
        }
    }
}
impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.2}s, std={:.2}s, CV={:.2}",
            Value(self.mean),
            Value(self.std),
            Value(self.cv())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_statistics() {
        let stats = Statistics::new([2., 4., 4., 4., 5., 5., 7., 9.]);
        assert_eq!(stats.count, 8);
        assert_eq!(stats.mean, Some(5.));
        let std = stats.std.unwrap();
        assert!((std - (32f64 / 7.).sqrt()).abs() < 1e-12);
        assert!((stats.cv().unwrap() - std / 5.).abs() < 1e-12);
    }

    #[test]
    fn degenerate() {
        let empty = Statistics::new(std::iter::empty());
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.std, None);
        assert_eq!(empty.cv(), None);

        let single = Statistics::new([42.]);
        assert_eq!(single.mean, Some(42.));
        assert_eq!(single.std, None);
        assert_eq!(single.cv(), None);

        let zero = Statistics::new([0., 0.]);
        assert_eq!(zero.std, Some(0.));
        assert_eq!(zero.cv(), None);
    }

    #[test]
    fn skip_nan() {
        let stats = Statistics::new([1., f64::NAN, 3.]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, Some(2.));
    }

    #[test]
    fn display() {
        assert_eq!(
            Statistics::new([]).to_string(),
            "mean=NaNs, std=NaNs, CV=NaN"
        );
        assert_eq!(
            Statistics::new([1., 3.]).to_string(),
            "mean=2.00s, std=1.41s, CV=0.71"
        );
        assert_eq!(format!("{:>5}", Value(None)), "  NaN");
        assert_eq!(format!("{:>8.2}", Value(None)), "     NaN");
        assert_eq!(format!("{:<5.2}|", Value(None)), "NaN  |");
    }
}
