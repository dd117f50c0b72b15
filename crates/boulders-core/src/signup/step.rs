use std::fmt;

use serde::{Deserialize, Serialize};

/// One stage of the signup wizard.
///
/// The declaration order is the wizard order; `index()` is the only ordering
/// key used by navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Personal,
    Membership,
    Addons,
    Review,
    Payment,
    Success,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Personal,
        Step::Membership,
        Step::Addons,
        Step::Review,
        Step::Payment,
        Step::Success,
    ];

    pub const fn first() -> Step {
        Step::Personal
    }

    pub const fn last() -> Step {
        Step::Success
    }

    pub const fn index(self) -> usize {
        match self {
            Step::Personal => 0,
            Step::Membership => 1,
            Step::Addons => 2,
            Step::Review => 3,
            Step::Payment => 4,
            Step::Success => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Step> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// URL segment used by the routing layer.
    pub const fn slug(self) -> &'static str {
        match self {
            Step::Personal => "personal",
            Step::Membership => "membership",
            Step::Addons => "addons",
            Step::Review => "review",
            Step::Payment => "payment",
            Step::Success => "success",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Step> {
        let slug = slug.trim().trim_matches('/');
        Self::ALL
            .iter()
            .copied()
            .find(|step| step.slug().eq_ignore_ascii_case(slug))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Per-step flags derived from the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStatus {
    pub step: Step,
    pub is_active: bool,
    pub is_completed: bool,
    pub is_accessible: bool,
}

impl StepStatus {
    /// Status list of a freshly started wizard: only the first step is
    /// active and accessible, nothing is completed.
    pub fn initial_list() -> [StepStatus; 6] {
        Step::ALL.map(|step| StepStatus {
            step,
            is_active: step == Step::first(),
            is_completed: false,
            is_accessible: step == Step::first(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_from_index() {
        for step in Step::ALL {
            assert_eq!(Step::from_index(step.index()), Some(step));
        }
        assert_eq!(Step::from_index(6), None);
    }

    #[test]
    fn next_and_prev_stop_at_the_boundaries() {
        assert_eq!(Step::Personal.prev(), None);
        assert_eq!(Step::Personal.next(), Some(Step::Membership));
        assert_eq!(Step::Success.next(), None);
        assert_eq!(Step::Success.prev(), Some(Step::Payment));
    }

    #[test]
    fn from_slug_is_case_insensitive_and_ignores_slashes() {
        assert_eq!(Step::from_slug("/Review/"), Some(Step::Review));
        assert_eq!(Step::from_slug("addons"), Some(Step::Addons));
        assert_eq!(Step::from_slug("checkout"), None);
    }

    #[test]
    fn initial_list_only_opens_the_first_step() {
        let list = StepStatus::initial_list();
        assert!(list[0].is_active && list[0].is_accessible);
        assert!(list[1..].iter().all(|s| !s.is_active && !s.is_accessible));
        assert!(list.iter().all(|s| !s.is_completed));
    }
}
