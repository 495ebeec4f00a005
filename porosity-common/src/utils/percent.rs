use std::fmt;

#[derive(Clone, Copy, Debug, PartialOrd, PartialEq)]
pub struct Percent64(f64);

#[derive(thiserror::Error, Debug)]
#[error("not a valid percentage")]
pub struct PercentError;

impl Percent64 {
    pub const ZERO: Self = Percent64(0.0);
    pub const HUNDRED: Self = Percent64(100.0);

    pub fn new(float: f64) -> Result<Self, PercentError> {
        if float.is_finite() && float >= 0.0 {
            Ok(Percent64(float))
        } else {
            Err(PercentError)
        }
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// How many percent `part` is of `total`. Fails when `total` is zero.
    pub fn of(part: f64, total: f64) -> Result<Self, PercentError> {
        Self::new(100.0 * part / total)
    }

    /// Same as [`Self::of`] for pixel counts.
    pub fn of_count(part: u64, total: u64) -> Result<Self, PercentError> {
        Self::of(part as f64, total as f64)
    }
}

impl fmt::Display for Percent64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(prec) => write!(f, "{:.prec$}%", self.0),
            None => write!(f, "{}%", self.0),
        }
    }
}
