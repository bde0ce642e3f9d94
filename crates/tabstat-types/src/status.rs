use std::fmt;

use crate::status_code::{self, status_code_t, StatusCode, StatusCodeType};

/// Error value of the tabstat crates: a numeric code from one of the
/// `status_code` ranges plus an optional detail message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Status {
    code: status_code_t,
    message: Option<String>,
}

impl Status {
    pub fn new(code: status_code_t) -> Self {
        Self { code, message: None }
    }

    pub fn with_message(code: status_code_t, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(msg.into()),
        }
    }

    pub fn code(&self) -> status_code_t {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::OK
    }

    /// Range the code belongs to.
    pub fn code_type(&self) -> StatusCodeType {
        status_code::type_of(self.code)
    }

    /// True for failures of the call itself rather than of the remote logic.
    pub fn is_transport_error(&self) -> bool {
        self.code_type() == StatusCodeType::RPC
    }

    /// `Name(code)` followed by the message, if any.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", status_code::to_string(self.code), self.code)?;
        if let Some(msg) = &self.message {
            write!(f, " {}", msg)?;
        }
        Ok(())
    }
}

impl std::error::Error for Status {}

impl From<status_code_t> for Status {
    fn from(code: status_code_t) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_code::{CatalogCode, RPCCode};

    #[test]
    fn test_status_ok() {
        let s = Status::new(StatusCode::OK);
        assert!(s.is_ok());
        assert_eq!(s.code(), 0);
        assert!(s.message().is_none());
        assert_eq!(s.describe(), "OK(0)");
    }

    #[test]
    fn test_status_with_message() {
        let s = Status::with_message(CatalogCode::TABLE_NOT_FOUND, "table 10042");
        assert!(!s.is_ok());
        assert_eq!(s.code(), 3001);
        assert_eq!(s.message(), Some("table 10042"));
        assert_eq!(s.describe(), "Catalog::TableNotFound(3001) table 10042");
    }

    #[test]
    fn test_status_display() {
        let s = Status::new(RPCCode::TIMEOUT);
        assert_eq!(format!("{}", s), "RPC::Timeout(2005)");
    }

    #[test]
    fn test_status_from_code() {
        let s: Status = StatusCode::INVALID_ARG.into();
        assert_eq!(s.code(), 3);
    }

    #[test]
    fn test_transport_classification() {
        assert!(Status::new(RPCCode::CONNECT_FAILED).is_transport_error());
        assert!(!Status::new(CatalogCode::TABLE_EXISTS).is_transport_error());
        assert_eq!(Status::new(CatalogCode::TABLE_EXISTS).code_type(), StatusCodeType::Catalog);
    }

    #[test]
    fn test_status_is_error() {
        let s = Status::new(StatusCode::UNKNOWN);
        let e: &dyn std::error::Error = &s;
        assert!(e.to_string().contains("Unknown"));
    }
}
