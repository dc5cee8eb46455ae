use std::path::MAIN_SEPARATOR;

use crate::error::SearchError;
use crate::traits::Matcher;

/// How a candidate filename is compared against the query name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Full name including extension must be equal.
    Exact,

    /// Only the part before the first `.` must be equal.
    StemOnly,
}

/// Case handling for comparisons. Case-sensitive unless asked otherwise,
/// regardless of what the host filesystem does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

/// A validated search term.
///
/// Construction fails for names that would match everything (empty name,
/// empty stem in [`MatchMode::StemOnly`]) or nothing (names with a path
/// separator), so a `Query` that exists is always safe to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    name:  String,
    mode:  MatchMode,
    case:  CaseSensitivity,
    /// Pre-folded comparison key: the whole name or its stem, lowercased
    /// when case-insensitive.
    key:   String,
}

impl Query {
    pub fn new(name: impl Into<String>, mode: MatchMode) -> Result<Self, SearchError> {
        Self::with_case(name, mode, CaseSensitivity::Sensitive)
    }

    pub fn with_case(
        name: impl Into<String>,
        mode: MatchMode,
        case: CaseSensitivity,
    ) -> Result<Self, SearchError> {
        let name = name.into();

        if name.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if name.contains('/') || name.contains(MAIN_SEPARATOR) {
            return Err(SearchError::InvalidPattern(name));
        }

        let key = match mode {
            MatchMode::Exact    => name.clone(),
            MatchMode::StemOnly => {
                let s = stem(&name);
                if s.is_empty() {
                    return Err(SearchError::EmptyStem(name));
                }
                s.to_string()
            }
        };
        let key = fold(key, case);

        Ok(Self { name, mode, case, key })
    }

    /// Build a query the way the command line does: stem matching is used
    /// when `match_all_extensions` is set or when `name` has no extension.
    pub fn from_input(
        name: impl Into<String>,
        match_all_extensions: bool,
        case: CaseSensitivity,
    ) -> Result<Self, SearchError> {
        let name = name.into();
        let mode = if match_all_extensions || !name.contains('.') {
            MatchMode::StemOnly
        } else {
            MatchMode::Exact
        };
        Self::with_case(name, mode, case)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn case(&self) -> CaseSensitivity {
        self.case
    }
}

impl Matcher for Query {
    fn is_match(&self, filename: &str) -> bool {
        let candidate = match self.mode {
            MatchMode::Exact    => filename,
            MatchMode::StemOnly => stem(filename),
        };
        match self.case {
            CaseSensitivity::Sensitive   => candidate == self.key,
            CaseSensitivity::Insensitive => candidate.to_lowercase() == self.key,
        }
    }
}

/// Everything before the first `.`; the whole name if there is none.
pub fn stem(filename: &str) -> &str {
    filename.split_once('.').map_or(filename, |(s, _)| s)
}

fn fold(s: String, case: CaseSensitivity) -> String {
    match case {
        CaseSensitivity::Sensitive   => s,
        CaseSensitivity::Insensitive => s.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_full_name() {
        let q = Query::new("a.txt", MatchMode::Exact).unwrap();
        assert!(q.is_match("a.txt"));
        assert!(!q.is_match("a.csv"));
        assert!(!q.is_match("A.txt"));
        assert!(!q.is_match("a.txt.bak"));
    }

    #[test]
    fn stem_ignores_everything_after_first_dot() {
        let q = Query::new("a.txt", MatchMode::StemOnly).unwrap();
        assert!(q.is_match("a.csv"));
        assert!(q.is_match("a"));
        assert!(q.is_match("a.tar.gz"));
        assert!(!q.is_match("ab.txt"));
        assert!(!q.is_match(".a"));
    }

    #[test]
    fn stem_of_dotless_name_is_whole_name() {
        assert_eq!(stem("Makefile"), "Makefile");
        assert_eq!(stem("archive.tar.gz"), "archive");
        assert_eq!(stem(".bashrc"), "");
    }

    #[test]
    fn degenerate_queries_are_rejected() {
        assert!(matches!(Query::new("", MatchMode::Exact), Err(SearchError::EmptyQuery)));
        assert!(matches!(Query::new("", MatchMode::StemOnly), Err(SearchError::EmptyQuery)));
        assert!(matches!(
            Query::new(".txt", MatchMode::StemOnly),
            Err(SearchError::EmptyStem(_))
        ));
        assert!(matches!(
            Query::new("dir/a.txt", MatchMode::Exact),
            Err(SearchError::InvalidPattern(_))
        ));
    }

    #[test]
    fn dotfile_is_fine_in_exact_mode() {
        let q = Query::new(".bashrc", MatchMode::Exact).unwrap();
        assert!(q.is_match(".bashrc"));
        assert!(!q.is_match(".profile"));
    }

    #[test]
    fn from_input_enables_stem_mode_without_extension() {
        let q = Query::from_input("report", false, CaseSensitivity::Sensitive).unwrap();
        assert_eq!(q.mode(), MatchMode::StemOnly);
        assert!(q.is_match("report.pdf"));
        assert!(q.is_match("report"));

        let q = Query::from_input("report.pdf", false, CaseSensitivity::Sensitive).unwrap();
        assert_eq!(q.mode(), MatchMode::Exact);

        let q = Query::from_input("report.pdf", true, CaseSensitivity::Sensitive).unwrap();
        assert_eq!(q.mode(), MatchMode::StemOnly);
    }

    #[test]
    fn case_insensitive_folds_both_sides() {
        let q = Query::with_case("Readme.MD", MatchMode::Exact, CaseSensitivity::Insensitive)
            .unwrap();
        assert!(q.is_match("README.md"));
        assert!(q.is_match("readme.md"));
        assert_eq!(q.name(), "Readme.MD");

        let q = Query::with_case("Readme", MatchMode::StemOnly, CaseSensitivity::Insensitive)
            .unwrap();
        assert!(q.is_match("README.txt"));
    }
}
