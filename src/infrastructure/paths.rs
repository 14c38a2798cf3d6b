//! Filesystem locations used by the runtime.

use std::path::PathBuf;

/// Returns the directory jobseek writes its trace files to.
///
/// Resolves to `$XDG_STATE_HOME/jobseek` when set, otherwise
/// `~/.local/state/jobseek`, falling back to the system temp directory when no home
/// directory is known.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(state_home) = std::env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(state_home).join("jobseek");
    }

    home_dir().map_or_else(
        || std::env::temp_dir().join("jobseek"),
        |home| home.join(".local").join("state").join("jobseek"),
    )
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, or with no known home directory, are returned
/// unchanged.
///
/// ```
/// use jobseek::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/data/jobs.json"), PathBuf::from("/data/jobs.json"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
