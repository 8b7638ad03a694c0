pub mod progress;

use std::path::Path;

/// Final path component of `path`, which becomes the object key and feeds
/// the image description. `None` for paths like `/` or `..`, and for names
/// that are not valid UTF-8.
pub fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
