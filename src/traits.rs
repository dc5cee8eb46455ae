/// Decides whether a filename is a match.
///
/// [`Query`](crate::Query) is the built-in implementation, and the traversal
/// worker calls it only through this trait.
///
/// # Thread Safety
///
/// `Send + Sync` are required: matchers are shared across worker threads and
/// called concurrently on different filenames without synchronization.
///
/// # Example
///
/// ```rust
/// use parfind::Matcher;
///
/// struct ExtensionMatcher(&'static str);
///
/// impl Matcher for ExtensionMatcher {
///     fn is_match(&self, filename: &str) -> bool {
///         filename
///             .rsplit_once('.')
///             .map(|(_, ext)| ext.eq_ignore_ascii_case(self.0))
///             .unwrap_or(false)
///     }
/// }
///
/// assert!(ExtensionMatcher("rs").is_match("main.RS"));
/// ```
pub trait Matcher: Send + Sync {
    /// Returns `true` if a file named `filename` should be reported.
    fn is_match(&self, filename: &str) -> bool;
}
