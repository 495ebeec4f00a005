use image::GrayImage;

const BINS: usize = u8::MAX as usize + 1;

/// Smallest share of the pixels a class may hold, single precision epsilon. A handful of
/// outliers in a large picture is not a class of its own.
pub const MIN_CLASS_WEIGHT: f64 = f32::EPSILON as f64;

/// Counts of every gray value in an image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram([u64; BINS]);

impl Histogram {
    pub fn of(img: &GrayImage) -> Self {
        let mut counts = [0; BINS];
        img.pixels().for_each(|luma| {
            let i: usize = luma[0].into();
            counts[i] += 1;
        });
        Self(counts)
    }

    pub fn counts(&self) -> &[u64; BINS] {
        &self.0
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }
}

/// Otsu's method. Finds the value `t` that maximizes the between-class variance of the
/// two classes `..=t` and `t+1..`. Splits where one of the classes holds less than
/// [`MIN_CLASS_WEIGHT`] of the pixels are never considered, so an empty or single valued
/// histogram gives `0`. Ties resolve to the smallest `t`.
pub fn otsu_threshold(hist: &Histogram) -> u8 {
    let total = hist.total();
    if total == 0 {
        return 0;
    }
    let sum_all: u64 = hist
        .counts()
        .iter()
        .enumerate()
        .map(|(value, &count)| value as u64 * count)
        .sum();

    let mut below = 0u64;
    let mut sum_below = 0u64;
    let mut best = (0u8, 0.0f64);

    for (value, &count) in hist.counts().iter().enumerate() {
        below += count;
        sum_below += value as u64 * count;
        let above = total - below;
        let weight_below = below as f64 / total as f64;
        let weight_above = above as f64 / total as f64;
        if weight_below.min(weight_above) < MIN_CLASS_WEIGHT
            || weight_below.max(weight_above) > 1.0 - MIN_CLASS_WEIGHT
        {
            continue;
        }

        let mean_below = sum_below as f64 / below as f64;
        let mean_above = (sum_all - sum_below) as f64 / above as f64;
        let diff = mean_below - mean_above;
        let variance = below as f64 * above as f64 * diff * diff;

        if variance > best.1 {
            best = (value.try_into().expect("there are 256 bins"), variance);
        }
    }

    best.0
}
