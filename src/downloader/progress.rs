//! Progress tracking for downloads

use serde::Serialize;

/// A single progress event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadProgress {
    pub status: DownloadStatus,
    pub downloaded_bytes: u64,
    /// From Content-Length; 0 when the server did not send one
    pub total_bytes: u64,
    /// Whole percent, 0 throughout when `total_bytes` is unknown
    pub percentage: u8,
    /// Bytes per second since the transfer started; absent once finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

/// Download status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Downloading,
    Finished,
}

impl DownloadProgress {
    /// Progress while bytes are still arriving
    pub fn downloading(downloaded_bytes: u64, total_bytes: u64, elapsed_secs: f64) -> Self {
        let speed = if elapsed_secs > 0.0 {
            downloaded_bytes as f64 / elapsed_secs
        } else {
            0.0
        };

        Self {
            status: DownloadStatus::Downloading,
            downloaded_bytes,
            total_bytes,
            percentage: percentage(downloaded_bytes, total_bytes),
            speed: Some(speed),
        }
    }

    /// Final event after the stream completed
    pub fn finished(downloaded_bytes: u64, total_bytes: u64) -> Self {
        Self {
            status: DownloadStatus::Finished,
            downloaded_bytes,
            total_bytes,
            percentage: 100,
            speed: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == DownloadStatus::Finished
    }
}

fn percentage(downloaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (downloaded as u128 * 100) / total as u128;
    pct.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // PERCENTAGE
    // ============================================================

    #[test]
    fn test_percentage_basic() {
        let progress = DownloadProgress::downloading(8192, 16384, 1.0);
        assert_eq!(progress.percentage, 50);
        assert_eq!(progress.status, DownloadStatus::Downloading);
    }

    #[test]
    fn test_percentage_truncates() {
        let progress = DownloadProgress::downloading(999, 1000, 1.0);
        assert_eq!(progress.percentage, 99);
    }

    #[test]
    fn test_percentage_unknown_total() {
        let progress = DownloadProgress::downloading(123_456, 0, 1.0);
        assert_eq!(progress.percentage, 0);
        assert_eq!(progress.total_bytes, 0);
    }

    #[test]
    fn test_percentage_clamped_when_server_undercounts() {
        let progress = DownloadProgress::downloading(2000, 1000, 1.0);
        assert_eq!(progress.percentage, 100);
    }

    #[test]
    fn test_percentage_large_file() {
        let progress = DownloadProgress::downloading(5_000_000_000, 10_000_000_000, 1.0);
        assert_eq!(progress.percentage, 50);
    }

    // ============================================================
    // SPEED
    // ============================================================

    #[test]
    fn test_speed_zero_elapsed() {
        let progress = DownloadProgress::downloading(1024, 2048, 0.0);
        assert_eq!(progress.speed, Some(0.0));
    }

    #[test]
    fn test_speed_bytes_per_second() {
        let progress = DownloadProgress::downloading(4096, 0, 2.0);
        assert_eq!(progress.speed, Some(2048.0));
    }

    // ============================================================
    // FINISHED
    // ============================================================

    #[test]
    fn test_finished_event() {
        let progress = DownloadProgress::finished(100, 0);
        assert!(progress.is_finished());
        assert_eq!(progress.percentage, 100);
        assert_eq!(progress.speed, None);
        assert_eq!(progress.downloaded_bytes, 100);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(DownloadProgress::finished(10, 10)).unwrap();
        assert_eq!(json["status"], "finished");
        assert_eq!(json["percentage"], 100);
        assert!(json.get("speed").is_none());

        let json = serde_json::to_value(DownloadProgress::downloading(5, 10, 1.0)).unwrap();
        assert_eq!(json["status"], "downloading");
        assert_eq!(json["speed"], 5.0);
    }
}
