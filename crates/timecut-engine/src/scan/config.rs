//! Markers and labels the scan recognizes.

pub const DEFAULT_OPEN_MARKER: &str = "CUT";
pub const DEFAULT_CLOSE_MARKER: &str = "END_CUT";
pub const DEFAULT_COLUMN_TITLES: [&str; 7] = ["Week", "Time", "Mon", "Tues", "Wed", "Thur", "Fri"];

/// Words that steer the scan. Passed into every run; nothing here is global.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    /// Token that opens a course metadata block.
    pub open_marker: String,
    /// Token that closes a course metadata block.
    pub close_marker: String,
    /// Header tokens that are never touched.
    pub column_titles: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            open_marker: DEFAULT_OPEN_MARKER.to_string(),
            close_marker: DEFAULT_CLOSE_MARKER.to_string(),
            column_titles: DEFAULT_COLUMN_TITLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanConfig {
    pub fn is_title(&self, tokens: &[String]) -> bool {
        tokens.iter().any(|t| self.column_titles.contains(t))
    }

    pub fn opens(&self, tokens: &[String]) -> bool {
        tokens.iter().any(|t| *t == self.open_marker)
    }

    pub fn closes(&self, tokens: &[String]) -> bool {
        tokens.iter().any(|t| *t == self.close_marker)
    }
}
