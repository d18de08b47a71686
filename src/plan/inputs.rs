use std::io;
use std::path::Path;

/// Reads extra search queries from a line-delimited file.
///
/// Each line is trimmed and blank lines are dropped; there is no comment
/// syntax. A missing file is not an error: it is logged and contributes no
/// queries. Other I/O failures (permissions, invalid UTF-8) are returned.
pub fn read_queries(path: &Path) -> io::Result<Vec<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Inputs file not found, ignoring");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}
