//! File path resolution for path-like field values
//!
//! Field values such as `./images/cover.png` are resolved relative to the
//! file a node originated from, so later pipeline stages get stable paths.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

/// Matches values that carry a URL scheme (`https:`, `mailto:`, `data:`).
static URL_SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z\d+\-.]*:").unwrap());

/// Collaborator deciding which string field values are file paths and how
/// they resolve against a node's origin.
pub trait PathResolver: Send + Sync {
    /// Whether `value` should be treated as a file path.
    fn is_resolvable_path(&self, value: &str) -> bool;

    /// Resolve `path` against the file `origin`.
    ///
    /// `resolve_absolute` controls whether root-relative paths (`/img.png`)
    /// are resolved against the assets context or left untouched.
    /// Resolving an already resolved path must return it unchanged.
    fn resolve_file_path(&self, origin: Option<&str>, path: &str, resolve_absolute: bool)
        -> String;
}

/// Filesystem-free resolver working on lexical paths.
///
/// Root-relative values inside the origin's top-level directory or inside the
/// assets context count as already resolved and are left as they are.
#[derive(Debug, Clone, Default)]
pub struct DefaultPathResolver {
    /// Directory root-relative paths resolve into when absolute resolution is on
    context: Option<PathBuf>,
}

impl DefaultPathResolver {
    /// Create a resolver with an optional assets context directory
    pub fn new(context: Option<PathBuf>) -> Self {
        Self { context }
    }

    /// The assets context, if any
    pub fn context(&self) -> Option<&Path> {
        self.context.as_deref()
    }
}

fn is_url(value: &str) -> bool {
    value.starts_with("//") || URL_SCHEME_RE.is_match(value)
}

/// Lexically normalize `.` and `..` components.
fn normalize(path: &Path) -> String {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized.to_string_lossy().into_owned()
}

impl PathResolver for DefaultPathResolver {
    fn is_resolvable_path(&self, value: &str) -> bool {
        if is_url(value) || !(value.starts_with('.') || value.starts_with('/')) {
            return false;
        }
        Path::new(value)
            .extension()
            .is_some_and(|extension| !extension.is_empty())
    }

    fn resolve_file_path(
        &self,
        origin: Option<&str>,
        path: &str,
        resolve_absolute: bool,
    ) -> String {
        let Some(origin) = origin else {
            return path.to_string();
        };

        if is_url(path) {
            return path.to_string();
        }

        let base = Path::new(origin).parent().unwrap_or_else(|| Path::new(""));

        if path.starts_with('/') {
            // Output of an earlier pass: resolved beside the origin or into the context
            let origin_root = base
                .ancestors()
                .filter(|dir| dir.is_absolute() && dir.parent().is_some())
                .last();
            let resolved = origin_root.is_some_and(|root| Path::new(path).starts_with(root))
                || self
                    .context
                    .as_deref()
                    .is_some_and(|context| Path::new(path).starts_with(context));

            return match (&self.context, resolve_absolute && !resolved) {
                (Some(context), true) => normalize(&context.join(path.trim_start_matches('/'))),
                _ => path.to_string(),
            };
        }

        normalize(&base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_resolvable_path() {
        let resolver = DefaultPathResolver::default();
        assert!(resolver.is_resolvable_path("./images/cover.png"));
        assert!(resolver.is_resolvable_path("../assets/photo.jpg"));
        assert!(resolver.is_resolvable_path("/uploads/file.pdf"));

        assert!(!resolver.is_resolvable_path("images/cover.png"));
        assert!(!resolver.is_resolvable_path("./folder/"));
        assert!(!resolver.is_resolvable_path("https://example.com/a.png"));
        assert!(!resolver.is_resolvable_path("//cdn.example.com/a.png"));
        assert!(!resolver.is_resolvable_path("Hello World"));
    }

    #[test]
    fn test_resolve_relative_to_origin() {
        let resolver = DefaultPathResolver::default();
        assert_eq!(
            resolver.resolve_file_path(
                Some("/content/posts/hello.md"),
                "./images/cover.png",
                false
            ),
            "/content/posts/images/cover.png"
        );
        assert_eq!(
            resolver.resolve_file_path(Some("/content/posts/hello.md"), "../assets/a.jpg", false),
            "/content/assets/a.jpg"
        );
    }

    #[test]
    fn test_resolve_without_origin_is_identity() {
        let resolver = DefaultPathResolver::default();
        assert_eq!(
            resolver.resolve_file_path(None, "./images/cover.png", true),
            "./images/cover.png"
        );
    }

    #[test]
    fn test_resolve_absolute_paths_against_context() {
        let resolver = DefaultPathResolver::new(Some(PathBuf::from("/site/static")));
        let origin = Some("/content/posts/hello.md");

        assert_eq!(
            resolver.resolve_file_path(origin, "/img/logo.svg", true),
            "/site/static/img/logo.svg"
        );
        assert_eq!(
            resolver.resolve_file_path(origin, "/img/logo.svg", false),
            "/img/logo.svg"
        );
    }

    #[test]
    fn test_resolving_twice_is_stable() {
        let resolver = DefaultPathResolver::new(Some(PathBuf::from("/site")));
        let origin = Some("/content/posts/a.md");

        for value in ["./img.png", "../shared/b.jpg", "/img/logo.svg"] {
            let once = resolver.resolve_file_path(origin, value, true);
            let twice = resolver.resolve_file_path(origin, &once, true);
            assert_eq!(once, twice, "{value}");
        }

        assert_eq!(
            resolver.resolve_file_path(origin, "/content/posts/img.png", true),
            "/content/posts/img.png"
        );
        assert_eq!(
            resolver.resolve_file_path(origin, "/site/img/logo.svg", true),
            "/site/img/logo.svg"
        );
    }
}
