use std::path::PathBuf;

/// Platform directories used by plotsight.
pub struct StandardPaths {
    pub base_dir: PathBuf,
    pub logs_dir: PathBuf,
}

/// Resolves the plotsight data directory.
///
/// - Windows: `%APPDATA%/plotsight`
/// - macOS: `~/Library/Application Support/plotsight`
/// - Linux: `~/.local/share/plotsight`
///
/// Falls back to `./.plotsight` when the platform has no data directory.
pub fn standard_paths() -> StandardPaths {
    let base_dir = match dirs::data_dir() {
        Some(dir) => dir.join("plotsight"),
        None => PathBuf::from(".plotsight"),
    };
    let logs_dir = base_dir.join("logs");
    StandardPaths { base_dir, logs_dir }
}

/// Turns a recoverable step failure into an absent value.
///
/// Every chart render and insight sub-analysis goes through here, so a failure
/// is logged once with the step name and then simply missing from the result.
pub fn fail_soft<T>(step: &str, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(step, "Skipping after failure: {e:#}");
            None
        }
    }
}

/// Turns an artifact key into a file name stem that is safe on every platform.
///
/// Anything other than letters, digits, `-` and `_` becomes `_`, and runs of
/// `_` collapse to one.
pub fn sanitize_file_stem(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    let mut last_was_underscore = false;
    for c in key.trim().chars() {
        let c = if c.is_alphanumeric() || c == '-' { c } else { '_' };
        if c == '_' {
            if last_was_underscore {
                continue;
            }
            last_was_underscore = true;
        } else {
            last_was_underscore = false;
        }
        result.push(c);
    }

    let result = result.trim_matches('_');
    if result.is_empty() {
        "artifact".to_owned()
    } else {
        result.to_owned()
    }
}
