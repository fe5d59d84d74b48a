pub mod http_server;

use std::path::Path;

use toolfetch_core::storage::is_temp_name;

/// In-progress temp files still present in `dir`.
pub fn temp_leftovers(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|n| is_temp_name(n))
                .collect()
        })
        .unwrap_or_default()
}
