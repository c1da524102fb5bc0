use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Resolve the directory installations live under.
///
/// The environment variable `var` wins when set to a non-empty value; an
/// empty value counts as unset. Otherwise `fallback` is joined onto the
/// user's home directory. Returns `None` only when the variable is unset
/// and no home directory can be determined.
pub fn install_root(var: impl AsRef<OsStr>, fallback: impl AsRef<Path>) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(fallback.as_ref())))
}
