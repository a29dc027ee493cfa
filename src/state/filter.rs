//! State filter for routing updates by the current state

use crate::utils::errors::Result;
use super::context::StateContext;
use super::resolve::ContextSource;
use super::states::State;

/// Which states a filter accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateFilter {
    /// Any state is set
    Any,
    /// No state is set
    Empty,
    /// The current state is one of these
    OneOf(Vec<String>),
}

impl StateFilter {
    pub fn one(state: impl AsRef<str>) -> Self {
        StateFilter::OneOf(vec![state.as_ref().to_string()])
    }

    pub fn one_of<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        StateFilter::OneOf(states.into_iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// Every state of a group declared with `states_group!`
    pub fn group(states: &[State]) -> Self {
        Self::one_of(states.iter().copied())
    }

    /// Match against an already fetched state
    pub fn accepts(&self, current: Option<&str>) -> bool {
        match (self, current) {
            (StateFilter::Any, current) => current.is_some(),
            (StateFilter::Empty, current) => current.is_none(),
            (StateFilter::OneOf(states), Some(current)) => states.iter().any(|s| s == current),
            (StateFilter::OneOf(_), None) => false,
        }
    }

    /// Fetch the state of `ctx` and match it
    pub async fn check<E: ContextSource>(&self, ctx: &StateContext<E>) -> Result<bool> {
        let current = ctx.get().await?;
        Ok(self.accepts(current.as_deref()))
    }
}
