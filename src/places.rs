//! Place list input.

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Read the place list at `path`, asking on stdin for another path if it
/// does not exist.
pub fn read_places(path: &Path) -> Result<Vec<String>> {
    read_places_with(path, prompt_for_path)
}

/// Read the place list, using `ask` to get a replacement path when `path`
/// is missing. A missing replacement is an error.
pub fn read_places_with<F>(path: &Path, ask: F) -> Result<Vec<String>>
where
    F: FnOnce() -> Result<PathBuf>,
{
    let path = if path.exists() {
        path.to_path_buf()
    } else {
        let replacement = ask()?;
        if !replacement.exists() {
            bail!(
                "Places file {} not found; check the file name",
                replacement.display()
            );
        }
        replacement
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read places file {}", path.display()))?;
    Ok(parse_places(&content))
}

/// One place per line, trimmed, blank lines dropped
pub fn parse_places(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn prompt_for_path() -> Result<PathBuf> {
    let mut stderr = io::stderr();
    write!(stderr, "\x07Enter a valid filename: ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read filename from stdin")?;
    Ok(PathBuf::from(line.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hotel-scraper-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_places() {
        let places = parse_places("ohio\n  new york  \n\n\ttexas\r\n");
        assert_eq!(places, vec!["ohio", "new york", "texas"]);
    }

    #[test]
    fn test_read_existing_file_does_not_prompt() {
        let path = temp_file("existing.txt", "ohio\ntexas\n");
        let places = read_places_with(&path, || panic!("should not prompt")).unwrap();
        assert_eq!(places, vec!["ohio", "texas"]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_uses_prompted_path() {
        let replacement = temp_file("replacement.txt", "utah\n");
        let missing = std::env::temp_dir().join("hotel-scraper-does-not-exist.txt");

        let prompted = replacement.clone();
        let places = read_places_with(&missing, move || Ok(prompted)).unwrap();
        assert_eq!(places, vec!["utah"]);
        let _ = std::fs::remove_file(replacement);
    }

    #[test]
    fn test_missing_replacement_is_fatal() {
        let missing = std::env::temp_dir().join("hotel-scraper-does-not-exist.txt");
        let also_missing = std::env::temp_dir().join("hotel-scraper-also-missing.txt");

        let result = read_places_with(&missing, move || Ok(also_missing));
        assert!(result.is_err());
    }
}
