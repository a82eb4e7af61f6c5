// Utility functions extracted for testing

/// Extracts a `YYYY.MM.DD` key from the first run of 8 consecutive digits
/// in `filename`. The digits are not validated as a calendar date.
pub fn date_key(filename: &str) -> Option<String> {
    let bytes = filename.as_bytes();
    let start = bytes
        .windows(8)
        .position(|w| w.iter().all(u8::is_ascii_digit))?;
    // ASCII digits only, so byte offsets are char boundaries
    let digits = &filename[start..start + 8];
    Some(format!("{}.{}.{}", &digits[..4], &digits[4..6], &digits[6..]))
}

pub fn human_size(bytes: u64) -> String {
    human_bytes::human_bytes(bytes as f64)
}

/// Joins a remote directory and a file name with a single `/`.
pub fn remote_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
