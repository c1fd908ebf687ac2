use std::env;
use std::ffi::OsString;
use tracing::debug;

/// Variables removed from the environment while `make` runs
pub const DEFAULT_SCRUBBED_VARS: &[&str] = &[
    "MAKEFLAGS",
    "MFLAGS",
    "CFLAGS",
    "LDFLAGS",
    "CPPFLAGS",
    "DESTDIR",
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_CONFIG",
];

/// Guard that removes environment variables and puts them back when dropped.
///
/// Restoration happens in `Drop`, so it runs on early returns and unwinding as well as on
/// the normal path.
#[must_use = "variables are restored as soon as the guard is dropped"]
pub struct ScopedEnv {
    saved: Vec<(String, Option<OsString>)>,
}

impl ScopedEnv {
    /// Remove every variable in `names` until the guard is dropped
    pub fn scrub<S: AsRef<str>>(names: &[S]) -> Self {
        let mut saved = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let previous = env::var_os(name);
            if previous.is_some() {
                debug!(name, "scrubbing build variable");
                env::remove_var(name);
            }
            saved.push((name.to_string(), previous));
        }
        ScopedEnv { saved }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        // Reverse order so a name listed twice ends with its original value
        for (name, previous) in self.saved.drain(..).rev() {
            match previous {
                Some(value) => env::set_var(&name, value),
                None => env::remove_var(&name),
            }
        }
    }
}
