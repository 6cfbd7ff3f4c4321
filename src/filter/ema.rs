//! Exponential Moving Average.

use super::Filter;

/// An Exponential Moving Average (EMA) filter.
///
/// Each new value is blended with the running average: `avg = alpha * value + (1 - alpha) * avg`.
/// An `alpha` of 1.0 passes values through unchanged; smaller values favor history more strongly.
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    alpha: f32,
}

impl Ema {
    /// Creates a new Exponential Moving Average filter.
    ///
    /// # Panics
    ///
    /// This method will panic if `alpha` is not in between 0.0 and 1.0.
    pub fn new(alpha: f32) -> Self {
        assert!((0.0..=1.0).contains(&alpha));
        Self { alpha }
    }
}

/// Filter state for [`Ema`] filters.
#[derive(Debug, Default)]
pub struct EmaState {
    last: Option<f32>,
}

impl Filter<f32> for Ema {
    type State = EmaState;

    fn filter(&self, state: &mut EmaState, value: f32) -> f32 {
        let avg = match state.last {
            Some(last) => self.alpha * value + (1.0 - self.alpha) * last,
            None => value,
        };
        state.last = Some(avg);
        avg
    }
}

#[cfg(test)]
mod tests {
    use crate::filter::SimpleFilter;

    use super::*;

    #[test]
    fn test_ema() {
        let mut filter = SimpleFilter::new(Ema::new(0.5));
        assert_eq!(filter.filter(1.0), 1.0);
        assert_eq!(filter.filter(2.0), 1.5);
        assert_eq!(filter.filter(2.0), 1.75);
    }

    #[test]
    fn test_reset() {
        let mut filter = SimpleFilter::new(Ema::new(0.5));
        assert_eq!(filter.filter(1.0), 1.0);
        filter.reset();
        assert_eq!(filter.filter(3.0), 3.0);
    }
}
