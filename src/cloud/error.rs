use std::fmt;

#[derive(Debug)]
pub(crate) enum CloudError {
    Http(String),
    Api(String),
}

impl fmt::Display for CloudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudError::Http(msg) => write!(f, "Cloud API request failed: {}", msg),
            CloudError::Api(msg) => write!(f, "Cloud API error: {}", msg),
        }
    }
}

impl std::error::Error for CloudError {}

impl From<ureq::Error> for CloudError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => CloudError::Api(format!("status code {}", code)),
            other => CloudError::Http(format!("{}", other)),
        }
    }
}

impl From<std::io::Error> for CloudError {
    fn from(err: std::io::Error) -> Self {
        CloudError::Http(format!("{}", err))
    }
}
