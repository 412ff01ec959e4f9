//! Human-readable byte counts

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Format bytes in the largest whole unit (GB, MB, KB, B), truncating.
///
/// `1536` is `"1KB"`, not `"1.5KB"` or `"2KB"`.
pub fn human_size(bytes: u64) -> String {
    if bytes >= GB {
        format!("{}GB", bytes / GB)
    } else if bytes >= MB {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB {
        format!("{}KB", bytes / KB)
    } else {
        format!("{bytes}B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size_bytes() {
        assert_eq!(human_size(0), "0B");
        assert_eq!(human_size(1), "1B");
        assert_eq!(human_size(1023), "1023B");
    }

    #[test]
    fn test_human_size_unit_boundaries() {
        assert_eq!(human_size(1024), "1KB");
        assert_eq!(human_size(1_048_576), "1MB");
        assert_eq!(human_size(1_073_741_824), "1GB");
        assert_eq!(human_size(1_048_575), "1023KB");
    }

    #[test]
    fn test_human_size_truncates() {
        assert_eq!(human_size(1536), "1KB");
        assert_eq!(human_size(2047), "1KB");
        assert_eq!(human_size(3 * MB - 1), "2MB");
        assert_eq!(human_size(5 * GB + GB / 2), "5GB");
    }

    #[test]
    fn test_human_size_stays_in_gb() {
        assert_eq!(human_size(2048 * GB), "2048GB");
    }
}
