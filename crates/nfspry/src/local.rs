//! Local-side filesystem helpers for `lcd`, `get` and `put`.

use std::path::Path;

use anyhow::{Context, Result, bail};

/// Changes the local working directory; no argument means `$HOME`.
pub fn change_dir(target: Option<&str>) -> Result<()> {
    let dir = match target {
        Some(dir) => dir.to_string(),
        None => match std::env::var("HOME") {
            Ok(home) => home,
            Err(_) => bail!("HOME is not set"),
        },
    };
    std::env::set_current_dir(Path::new(&dir)).with_context(|| dir)
}

/// The final path component, used to derive remote names for `put`.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_directories() {
        assert_eq!(basename("a/b/c.txt"), "c.txt");
        assert_eq!(basename("plain"), "plain");
        assert_eq!(basename("/abs/path"), "path");
    }
}
