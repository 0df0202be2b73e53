//! Latency extraction from `ping` summaries.
//!
//! Two summary layouts are recognised, independent of the platform the
//! monitor runs on:
//!
//! - Windows: `Minimum = 10ms, Maximum = 90ms, Average = 42ms` yields
//!   [`Latency::Whole`].
//! - Slash-delimited: `rtt min/avg/max/mdev = 10/42.5/90/1.2 ms` (iputils),
//!   `round-trip min/avg/max/stddev = ...` (BSD, macOS) and
//!   `round-trip min/avg/max = ...` (BusyBox) yield [`Latency::Fractional`].

use std::sync::OnceLock;

use regex::Regex;

use crate::storage::Latency;

fn average_regex() -> &'static Regex {
    static AVERAGE_REGEX: OnceLock<Regex> = OnceLock::new();
    AVERAGE_REGEX.get_or_init(|| {
        Regex::new(r"Average\s*=\s*(\S*?)\s*ms").expect("failed to compile average regex")
    })
}

fn triple_regex() -> &'static Regex {
    static TRIPLE_REGEX: OnceLock<Regex> = OnceLock::new();
    TRIPLE_REGEX.get_or_init(|| {
        Regex::new(r"min/avg/max(?:/[A-Za-z-]+)?\s*=\s*([^/\s]+)/([^/\s]+)/([^/\s]+)")
            .expect("failed to compile min/avg/max regex")
    })
}

/// Extract the average latency from probe output.
///
/// Returns `None` when no known summary line is present or the located
/// value is not a number. The first recognised summary line wins.
pub fn parse_latency(raw: &str) -> Option<Latency> {
    for line in raw.lines() {
        if let Some(caps) = average_regex().captures(line) {
            return parse_whole(&caps[1]);
        }
        if let Some(caps) = triple_regex().captures(line) {
            return parse_fractional(&caps[2]);
        }
    }
    tracing::debug!("No latency summary found in probe output");
    None
}

fn parse_whole(value: &str) -> Option<Latency> {
    match value.parse::<u64>() {
        Ok(ms) => Some(Latency::Whole(ms)),
        Err(e) => {
            tracing::warn!(value, error = %e, "Failed to parse average response time");
            None
        }
    }
}

fn parse_fractional(value: &str) -> Option<Latency> {
    match value.parse::<f64>() {
        Ok(ms) if ms.is_finite() => Some(Latency::Fractional(ms)),
        Ok(_) => {
            tracing::warn!(value, "Average response time is not finite");
            None
        }
        Err(e) => {
            tracing::warn!(value, error = %e, "Failed to parse average response time");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOWS_OUTPUT: &str = "\r
Pinging example.com [93.184.216.34] with 32 bytes of data:\r
Reply from 93.184.216.34: bytes=32 time=41ms TTL=56\r
Reply from 93.184.216.34: bytes=32 time=43ms TTL=56\r
\r
Ping statistics for 93.184.216.34:\r
    Packets: Sent = 4, Received = 4, Lost = 0 (0% loss),\r
Approximate round trip times in milli-seconds:\r
    Minimum = 10ms, Maximum = 90ms, Average = 42ms\r
";

    const LINUX_OUTPUT: &str = "PING example.com (93.184.216.34) 56(84) bytes of data.
64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=10.0 ms

--- example.com ping statistics ---
4 packets transmitted, 4 received, 0% packet loss, time 3004ms
rtt min/avg/max/mdev = 10/42.5/90/1.2 ms
";

    #[test]
    fn test_windows_average_is_whole() {
        assert_eq!(parse_latency(WINDOWS_OUTPUT), Some(Latency::Whole(42)));
    }

    #[test]
    fn test_linux_average_is_fractional() {
        assert_eq!(parse_latency(LINUX_OUTPUT), Some(Latency::Fractional(42.5)));
    }

    #[test]
    fn test_bsd_and_busybox_summaries() {
        assert_eq!(
            parse_latency("round-trip min/avg/max/stddev = 9.812/11.204/13.911/1.562 ms"),
            Some(Latency::Fractional(11.204))
        );
        assert_eq!(
            parse_latency("round-trip min/avg/max = 0.061/0.075/0.090 ms"),
            Some(Latency::Fractional(0.075))
        );
    }

    #[test]
    fn test_unrelated_output_is_none() {
        assert_eq!(parse_latency("Request timed out."), None);
        assert_eq!(parse_latency(""), None);
        // Per-reply lines are not summaries.
        assert_eq!(
            parse_latency("64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=0.05 ms"),
            None
        );
    }

    #[test]
    fn test_non_numeric_values_are_none() {
        assert_eq!(parse_latency("Minimum = 1ms, Maximum = 3ms, Average = 4.5ms"), None);
        assert_eq!(parse_latency("Average = abcms"), None);
        assert_eq!(parse_latency("rtt min/avg/max/mdev = 1/x/3/0 ms"), None);
        assert_eq!(parse_latency("rtt min/avg/max/mdev = 1/nan/3/0 ms"), None);
    }
}
