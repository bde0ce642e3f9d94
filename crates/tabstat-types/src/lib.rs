//! Shared vocabulary of the tabstat crates: catalog id newtypes and the
//! `Status` error value with its numeric code ranges.

#[macro_use]
pub mod strong_type;

pub mod ids;
pub mod result;
pub mod status;
#[allow(non_snake_case)]
pub mod status_code;

pub use ids::*;
pub use result::{make_error, make_error_msg, Result, Void};
pub use status::Status;
pub use status_code::*;
