use std::fmt;

use crate::utils::percent::Percent64;

const IMAGE_HEADER: &str = "Image";
const POROSITY_HEADER: &str = "Porosity (%)";

#[derive(Clone, Debug, PartialEq)]
pub struct PorosityResult {
    /// Filename of the cropped picture the porosity was measured on
    pub image: String,
    pub porosity: Percent64,
}

/// All results of one batch in the order the pictures were processed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultTable {
    rows: Vec<PorosityResult>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: PorosityResult) {
        self.rows.push(result);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PorosityResult> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PorosityResult> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a PorosityResult;
    type IntoIter = std::slice::Iter<'a, PorosityResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<PorosityResult> for ResultTable {
    fn extend<T: IntoIterator<Item = PorosityResult>>(&mut self, iter: T) {
        iter.into_iter().for_each(|r| self.push(r))
    }
}

/// Two left aligned columns, porosity with two decimals and without the percent sign.
impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .iter()
            .map(|r| r.image.chars().count())
            .chain([IMAGE_HEADER.len()])
            .max()
            .unwrap_or_default();

        writeln!(f, "{IMAGE_HEADER:<width$}  {POROSITY_HEADER}")?;
        for row in self {
            writeln!(f, "{:<width$}  {:.2}", row.image, row.porosity.as_f64())?;
        }
        Ok(())
    }
}
