//! The external target selector.

use std::fmt;

/// Which configuration the fields are heading towards.
///
/// Owned by the presentation layer and read once per frame by each field.
/// Flipping it at any time is safe; the damped progress of each field turns
/// the flip into a continuous transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TreeState {
    /// The "CHAOS" configuration: everything dispersed in a cloud.
    Scattered,
    /// The "FORM" configuration: the tree silhouette.
    #[default]
    TreeShape,
}

impl TreeState {
    /// Progress value the fields converge to in this state.
    #[inline]
    pub fn target_progress(self) -> f32 {
        match self {
            TreeState::Scattered => 0.0,
            TreeState::TreeShape => 1.0,
        }
    }

    /// The other state.
    pub fn toggled(self) -> Self {
        match self {
            TreeState::Scattered => TreeState::TreeShape,
            TreeState::TreeShape => TreeState::Scattered,
        }
    }

    /// Label shown on the overlay buttons.
    pub fn label(self) -> &'static str {
        match self {
            TreeState::Scattered => "CHAOS",
            TreeState::TreeShape => "FORM",
        }
    }
}

impl fmt::Display for TreeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_formed() {
        assert_eq!(TreeState::default(), TreeState::TreeShape);
    }

    #[test]
    fn test_targets() {
        assert_eq!(TreeState::Scattered.target_progress(), 0.0);
        assert_eq!(TreeState::TreeShape.target_progress(), 1.0);
    }

    #[test]
    fn test_toggle_round_trip() {
        let s = TreeState::Scattered;
        assert_eq!(s.toggled(), TreeState::TreeShape);
        assert_eq!(s.toggled().toggled(), s);
        assert_eq!(TreeState::TreeShape.to_string(), "FORM");
    }
}
