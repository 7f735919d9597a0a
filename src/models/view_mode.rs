use std::fmt;
use std::str::FromStr;

/// Layout mode of the carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// One image per page
    Single,
    /// 2x2 grid per page
    #[default]
    Multi,
}

impl ViewMode {
    /// Number of item slots a page holds in this mode.
    pub fn slots_per_page(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Multi => 4,
        }
    }

    /// Grid shape as (rows, columns).
    pub fn grid_shape(self) -> (usize, usize) {
        match self {
            Self::Single => (1, 1),
            Self::Multi => (2, 2),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Single => Self::Multi,
            Self::Multi => Self::Single,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multi => "multi",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown view mode name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view mode {0:?} (expected \"single\" or \"multi\")")]
pub struct ParseViewModeError(pub String);

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            _ => Err(ParseViewModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_match_grid_shape() {
        for mode in [ViewMode::Single, ViewMode::Multi] {
            let (rows, cols) = mode.grid_shape();
            assert_eq!(rows * cols, mode.slots_per_page());
        }
    }

    #[test]
    fn test_parse_view_mode() {
        assert_eq!("single".parse::<ViewMode>(), Ok(ViewMode::Single));
        assert_eq!(" Multi ".parse::<ViewMode>(), Ok(ViewMode::Multi));
        assert!("grid".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(ViewMode::Single.toggled(), ViewMode::Multi);
        assert_eq!(ViewMode::Multi.toggled().toggled(), ViewMode::Multi);
    }
}
