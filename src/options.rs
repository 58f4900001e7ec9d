use crate::error::{Error, Result};

pub const DEFAULT_GROWTH_FACTOR: f32 = 1.7;
pub const MIN_GROWTH_FACTOR: f32 = 1.5;
pub const DEFAULT_OBJECT_CAPACITY: usize = 8;
pub const DEFAULT_ARRAY_CAPACITY: usize = 8;
pub const DEFAULT_ARENA_CAPACITY: usize = 64;

/// Geometric growth applied to entry tables, cursors and the arena registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthPolicy {
    factor: f32,
}

impl GrowthPolicy {
    pub fn new(factor: f32) -> Result<Self> {
        if !factor.is_finite() || factor < MIN_GROWTH_FACTOR {
            return Err(Error::illegal_argument(format!(
                "growth factor {factor} is below {MIN_GROWTH_FACTOR}"
            )));
        }
        Ok(Self { factor })
    }

    pub fn factor(self) -> f32 {
        self.factor
    }

    /// Smallest capacity on the growth sequence starting at `current` that holds `needed`.
    pub fn grow(self, current: usize, needed: usize) -> usize {
        let mut capacity = current;
        while capacity < needed {
            capacity = ((capacity + 1) as f64 * f64::from(self.factor)) as usize;
        }
        capacity
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentOptions {
    pub object_capacity: usize,
    pub array_capacity: usize,
    pub growth: GrowthPolicy,
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object_capacity(mut self, capacity: usize) -> Self {
        self.object_capacity = capacity;
        self
    }

    pub fn with_array_capacity(mut self, capacity: usize) -> Self {
        self.array_capacity = capacity;
        self
    }

    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.object_capacity == 0 || self.array_capacity == 0 {
            return Err(Error::illegal_argument("container capacity must be non-zero"));
        }
        Ok(())
    }
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            object_capacity: DEFAULT_OBJECT_CAPACITY,
            array_capacity: DEFAULT_ARRAY_CAPACITY,
            growth: GrowthPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolStyle {
    /// `"true"` / `"false"`.
    #[default]
    Quoted,
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoubleFormat {
    #[default]
    Shortest,
    Fixed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrintOptions {
    pub booleans: BoolStyle,
    pub doubles: DoubleFormat,
}

impl PrintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict JSON output: bare booleans, shortest doubles.
    pub fn json() -> Self {
        Self {
            booleans: BoolStyle::Bare,
            doubles: DoubleFormat::Shortest,
        }
    }

    pub fn with_booleans(mut self, booleans: BoolStyle) -> Self {
        self.booleans = booleans;
        self
    }

    pub fn with_doubles(mut self, doubles: DoubleFormat) -> Self {
        self.doubles = doubles;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(8, 9, 15)]
    #[case(8, 8, 8)]
    #[case(0, 1, 1)]
    #[case(1, 5, 6)]
    fn test_default_growth(#[case] current: usize, #[case] needed: usize, #[case] expected: usize) {
        assert_eq!(GrowthPolicy::default().grow(current, needed), expected);
    }

    #[rstest]
    #[case(1.0)]
    #[case(1.49)]
    #[case(f32::NAN)]
    fn test_rejects_small_factor(#[case] factor: f32) {
        assert!(GrowthPolicy::new(factor).is_err());
    }

    #[rstest]
    fn test_zero_capacity_is_illegal() {
        let options = DocumentOptions::new().with_object_capacity(0);
        assert!(options.validate().is_err());
    }
}
