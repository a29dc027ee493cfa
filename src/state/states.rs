//! State labels and state groups

use std::fmt;

/// A named conversation state
///
/// States declared with [`states_group!`](crate::states_group) are named
/// `"Group:state"`. Anything accepting `impl AsRef<str>` takes either a
/// `State` or a raw name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    name: &'static str,
}

impl State {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Group part of a grouped name, `None` for ungrouped states
    pub fn group(&self) -> Option<&'static str> {
        self.name.split_once(':').map(|(group, _)| group)
    }
}

impl AsRef<str> for State {
    fn as_ref(&self) -> &str {
        self.name
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq<str> for State {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for State {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl PartialEq<String> for State {
    fn eq(&self, other: &String) -> bool {
        self.name == other.as_str()
    }
}

/// Declares a group of states
///
/// ```
/// telestate::states_group!(pub Registration { name, age });
///
/// assert_eq!(Registration::name.name(), "Registration:name");
/// assert_eq!(Registration::all().len(), 2);
/// ```
#[macro_export]
macro_rules! states_group {
    ($vis:vis $group:ident { $($state:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy)]
        $vis struct $group;

        #[allow(non_upper_case_globals, dead_code)]
        impl $group {
            $(
                pub const $state: $crate::state::State =
                    $crate::state::State::new(concat!(stringify!($group), ":", stringify!($state)));
            )+

            pub const ALL: &'static [$crate::state::State] = &[$(Self::$state),+];

            pub fn all() -> &'static [$crate::state::State] {
                Self::ALL
            }

            pub fn contains(state: &str) -> bool {
                Self::ALL.iter().any(|s| s.name() == state)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::states_group!(Checkout { address, payment, confirm });

    #[test]
    fn test_group_names() {
        assert_eq!(Checkout::address.name(), "Checkout:address");
        assert_eq!(Checkout::confirm.to_string(), "Checkout:confirm");
        assert_eq!(Checkout::payment.group(), Some("Checkout"));
    }

    #[test]
    fn test_group_listing_keeps_order() {
        let names: Vec<&str> = Checkout::all().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Checkout:address", "Checkout:payment", "Checkout:confirm"]);
        assert!(Checkout::contains("Checkout:payment"));
        assert!(!Checkout::contains("payment"));
    }

    #[test]
    fn test_comparisons() {
        let state = State::new("waiting");
        assert_eq!(state, "waiting");
        assert_eq!(state, "waiting".to_string());
        assert_eq!(state.group(), None);
        assert_eq!(state.as_ref(), "waiting");
    }
}
