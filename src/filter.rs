//! Data filtering and smoothing.

pub mod ema;

use std::marker::PhantomData;

/// A stateless filter description for values of type `V`.
///
/// The filter parameters and the accumulated state are kept separate so that one set of parameters
/// can drive many independently filtered values.
pub trait Filter<V> {
    /// The per-value state associated with this filter.
    type State: Default;

    /// Feeds a new value into the filter, returning the filtered value.
    fn filter(&self, state: &mut Self::State, value: V) -> V;
}

/// Couples a [`Filter`] with a single instance of its state.
pub struct SimpleFilter<F: Filter<V>, V> {
    filter: F,
    state: F::State,
    _values: PhantomData<fn(V) -> V>,
}

impl<F: Filter<V>, V> SimpleFilter<F, V> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            state: F::State::default(),
            _values: PhantomData,
        }
    }

    /// Feeds a new value into the filter, returning the filtered value.
    pub fn filter(&mut self, value: V) -> V {
        self.filter.filter(&mut self.state, value)
    }

    /// Resets the filter state to the state just after construction.
    pub fn reset(&mut self) {
        self.state = F::State::default();
    }
}
