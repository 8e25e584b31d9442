//! Data layer: immutable transfer options and per-transfer reports.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Capacity of the buffered writer between the network stream and the
    /// staging file.
    pub chunk_size: usize,
    /// Replace an existing table instead of skipping it.
    pub overwrite: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1 << 20,
            overwrite: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded,
    Skipped,
}

/// Result of one completed transfer, used only to build a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub outcome: DownloadOutcome,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

impl DownloadReport {
    pub fn skipped() -> Self {
        Self {
            outcome: DownloadOutcome::Skipped,
            bytes_written: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Bytes per second, 0 when no time elapsed.
    pub fn rate(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.bytes_written as f64 / seconds
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> String {
        match self.outcome {
            DownloadOutcome::Skipped => "skipped (already exists)".to_string(),
            DownloadOutcome::Downloaded => format!(
                "downloaded {} in {:.1}s ({}/s)",
                format_bytes(self.bytes_written as f64),
                self.elapsed.as_secs_f64(),
                format_bytes(self.rate()),
            ),
        }
    }
}

/// Formats a byte quantity with 1024-based units; whole bytes are printed
/// without decimals.
pub fn format_bytes(size: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = size;
    for (position, unit) in UNITS.iter().enumerate() {
        if value < 1024.0 || position == UNITS.len() - 1 {
            if *unit == "B" {
                return format!("{} {unit}", value as u64);
            }
            return format!("{value:.2} {unit}");
        }
        value /= 1024.0;
    }
    unreachable!("last unit always matches")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_bytes_across_units() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(1023.0), "1023 B");
        assert_eq!(format_bytes(1024.0), "1.00 KB");
        assert_eq!(format_bytes(1536.0), "1.50 KB");
        assert_eq!(format_bytes((1u64 << 20) as f64), "1.00 MB");
        assert_eq!(format_bytes((1u64 << 40) as f64), "1.00 TB");
        assert_eq!(format_bytes((1u64 << 50) as f64), "1024.00 TB");
    }

    #[test]
    fn zero_elapsed_reports_zero_rate() {
        let report = DownloadReport {
            outcome: DownloadOutcome::Downloaded,
            bytes_written: 100,
            elapsed: Duration::ZERO,
        };
        assert_eq!(report.rate(), 0.0);
        assert_eq!(report.summary(), "downloaded 100 B in 0.0s (0 B/s)");
    }

    #[test]
    fn downloaded_summary_includes_size_and_rate() {
        let report = DownloadReport {
            outcome: DownloadOutcome::Downloaded,
            bytes_written: 2 << 20,
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(report.summary(), "downloaded 2.00 MB in 2.0s (1.00 MB/s)");
    }

    #[test]
    fn skipped_summary() {
        assert_eq!(DownloadReport::skipped().summary(), "skipped (already exists)");
    }
}
