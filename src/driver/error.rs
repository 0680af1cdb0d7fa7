use std::fmt;

use thiserror::Error;

/// Closed set of failure kinds raised at the page-driver boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverErrorKind {
    ConnectionReset,
    TimedOut,
    NavigationFailed,
    Disconnected,
    DnsResolution,
    SessionClosed,
    /// Non-success status from an in-session fetch
    HttpStatus(u16),
    /// Page loaded but its structure could not be read
    Extraction,
    Other,
}

impl DriverErrorKind {
    /// Whether retrying the same operation can reasonably succeed
    pub fn is_transient(self) -> bool {
        match self {
            DriverErrorKind::ConnectionReset
            | DriverErrorKind::TimedOut
            | DriverErrorKind::NavigationFailed
            | DriverErrorKind::Disconnected
            | DriverErrorKind::DnsResolution
            | DriverErrorKind::SessionClosed => true,
            DriverErrorKind::HttpStatus(status) => status == 429 || (500..600).contains(&status),
            DriverErrorKind::Extraction | DriverErrorKind::Other => false,
        }
    }
}

impl fmt::Display for DriverErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverErrorKind::ConnectionReset => f.write_str("connection reset"),
            DriverErrorKind::TimedOut => f.write_str("timed out"),
            DriverErrorKind::NavigationFailed => f.write_str("navigation failed"),
            DriverErrorKind::Disconnected => f.write_str("protocol disconnected"),
            DriverErrorKind::DnsResolution => f.write_str("DNS resolution failed"),
            DriverErrorKind::SessionClosed => f.write_str("session closed"),
            DriverErrorKind::HttpStatus(status) => write!(f, "HTTP {status}"),
            DriverErrorKind::Extraction => f.write_str("extraction failed"),
            DriverErrorKind::Other => f.write_str("driver failure"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct DriverError {
    pub kind: DriverErrorKind,
    pub message: String,
}

impl DriverError {
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timed_out(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::TimedOut, message)
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::new(DriverErrorKind::Extraction, message)
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }

    /// Map a raw browser/protocol message onto a kind.
    ///
    /// Only the driver boundary inspects message text; everything above it
    /// dispatches on [`DriverErrorKind`].
    pub fn classify_message(message: &str) -> DriverErrorKind {
        let msg = message.to_lowercase();

        if msg.contains("err_connection_reset")
            || msg.contains("connection reset")
            || msg.contains("failed to fetch")
            || msg.contains("networkerror")
            || msg.contains("network error")
        {
            DriverErrorKind::ConnectionReset
        } else if msg.contains("err_name_not_resolved")
            || msg.contains("name resolution")
            || msg.contains("dns resolution")
        {
            DriverErrorKind::DnsResolution
        } else if msg.contains("timed out") || msg.contains("err_timed_out") {
            DriverErrorKind::TimedOut
        } else if msg.contains("target closed")
            || msg.contains("session closed")
            || msg.contains("no such session")
            || msg.contains("page closed")
            || msg.contains("no response from the chromium instance")
        {
            DriverErrorKind::SessionClosed
        } else if msg.contains("websocket")
            || msg.contains("disconnected")
            || msg.contains("connection closed")
        {
            DriverErrorKind::Disconnected
        } else if msg.contains("net::err") || msg.contains("navigation failed") {
            DriverErrorKind::NavigationFailed
        } else {
            DriverErrorKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_kinds() {
        assert!(DriverErrorKind::ConnectionReset.is_transient());
        assert!(DriverErrorKind::TimedOut.is_transient());
        assert!(DriverErrorKind::NavigationFailed.is_transient());
        assert!(DriverErrorKind::Disconnected.is_transient());
        assert!(DriverErrorKind::DnsResolution.is_transient());
        assert!(DriverErrorKind::SessionClosed.is_transient());
        assert!(DriverErrorKind::HttpStatus(503).is_transient());
        assert!(DriverErrorKind::HttpStatus(429).is_transient());
    }

    #[test]
    fn test_fatal_kinds() {
        assert!(!DriverErrorKind::Extraction.is_transient());
        assert!(!DriverErrorKind::Other.is_transient());
        assert!(!DriverErrorKind::HttpStatus(404).is_transient());
    }

    #[test]
    fn test_classify_chrome_messages() {
        assert_eq!(
            DriverError::classify_message("net::ERR_CONNECTION_RESET at https://x"),
            DriverErrorKind::ConnectionReset
        );
        assert_eq!(
            DriverError::classify_message("net::ERR_NAME_NOT_RESOLVED"),
            DriverErrorKind::DnsResolution
        );
        assert_eq!(
            DriverError::classify_message("Request timed out."),
            DriverErrorKind::TimedOut
        );
        assert_eq!(
            DriverError::classify_message("Protocol error: Target closed"),
            DriverErrorKind::SessionClosed
        );
        assert_eq!(
            DriverError::classify_message("net::ERR_ABORTED"),
            DriverErrorKind::NavigationFailed
        );
        assert_eq!(
            DriverError::classify_message("Cannot read properties of undefined"),
            DriverErrorKind::Other
        );
    }

    #[test]
    fn test_rejected_page_fetch_is_transient() {
        let message = "Script execution failed: ExceptionDetails { exception_id: 1, \
                       text: \"Uncaught (in promise)\", line_number: 0, column_number: 0, \
                       exception: Some(RemoteObject { description: \
                       Some(\"TypeError: Failed to fetch\") }) }";
        let kind = DriverError::classify_message(message);
        assert_eq!(kind, DriverErrorKind::ConnectionReset);
        assert!(kind.is_transient());

        assert!(DriverError::classify_message("NetworkError when attempting to fetch resource.")
            .is_transient());
    }

    #[test]
    fn test_urls_in_messages_do_not_look_like_network_faults() {
        for message in [
            "Cannot read properties of null at https://cdns.example.com/app.js",
            "Uncaught TypeError at https://example.com/timeout-banner.js",
            "ReferenceError: navigationBar is not defined",
        ] {
            assert_eq!(
                DriverError::classify_message(message),
                DriverErrorKind::Other,
                "{message}"
            );
        }
    }

    #[test]
    fn test_display() {
        let err = DriverError::new(DriverErrorKind::HttpStatus(502), "bad gateway");
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
    }
}
