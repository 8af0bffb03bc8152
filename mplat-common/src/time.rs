//! Duration formatting

const SECONDS_PER_MINUTE: u64 = 60;

/// Format a whole number of seconds as zero-padded "mm:ss"
///
/// Minutes are not wrapped into hours, so anything from 100 minutes up renders with
/// three or more minute digits.
pub fn format_mm_ss(total_seconds: u64) -> String {
    let minutes = total_seconds / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;
    format!("{:02}:{:02}", minutes, seconds)
}
