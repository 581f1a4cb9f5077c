//! Shared capability-based filesystem helpers for user-generation tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;

/// Create a unique names root under `target/user-generation-tests`.
///
/// # Errors
///
/// Returns any filesystem errors encountered while creating the directory.
pub fn unique_names_root(prefix: &str) -> io::Result<Utf8PathBuf> {
    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let process_id = std::process::id();
    let root = Utf8PathBuf::from("target")
        .join("user-generation-tests")
        .join(format!("{prefix}-{process_id}-{counter}"));
    let cwd = Dir::open_ambient_dir(".", ambient_authority())?;
    cwd.create_dir_all(&root)?;
    Ok(root)
}

/// Write `files` into `<root>/<locale>/`, creating the locale directory.
///
/// # Errors
///
/// Returns any filesystem errors encountered while writing.
pub fn write_locale(root: &Utf8Path, locale: &str, files: &[(&str, &str)]) -> io::Result<()> {
    let root_dir = Dir::open_ambient_dir(root, ambient_authority())?;
    root_dir.create_dir_all(locale)?;
    let locale_dir = root_dir.open_dir(locale)?;
    for (name, contents) in files {
        locale_dir.write(name, contents)?;
    }
    Ok(())
}
