use std::fmt;

#[derive(Debug)]
pub(crate) enum MetricsError {
    Unavailable(String),
    MountPointNotFound(String),
    InterfaceNotFound(String),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::Unavailable(msg) => write!(f, "Metric unavailable: {}", msg),
            MetricsError::MountPointNotFound(msg) => {
                write!(f, "No filesystem mounted at: {}", msg)
            }
            MetricsError::InterfaceNotFound(msg) => {
                write!(f, "Network interface not found: {}", msg)
            }
        }
    }
}

impl std::error::Error for MetricsError {}
