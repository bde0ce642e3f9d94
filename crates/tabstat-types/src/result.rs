use crate::status::Status;
use crate::status_code::status_code_t;

/// The standard result type used throughout tabstat, with `Status` as the error.
pub type Result<T> = std::result::Result<T, Status>;

/// Alias for the unit type.
pub type Void = ();

/// Create an error result from a status code.
pub fn make_error<T>(code: status_code_t) -> Result<T> {
    Err(Status::new(code))
}

/// Create an error result from a status code and message.
pub fn make_error_msg<T>(code: status_code_t, msg: impl Into<String>) -> Result<T> {
    Err(Status::with_message(code, msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_code::{CatalogCode, RPCCode};

    #[test]
    fn test_make_error() {
        let r: Result<i32> = make_error(CatalogCode::TABLE_NOT_FOUND);
        assert!(r.is_err());
        assert_eq!(r.unwrap_err().code(), 3001);
    }

    #[test]
    fn test_make_error_msg() {
        let r: Result<()> = make_error_msg(RPCCode::CONNECT_FAILED, "meta service unreachable");
        let err = r.unwrap_err();
        assert_eq!(err.code(), 2014);
        assert_eq!(err.message(), Some("meta service unreachable"));
    }
}
