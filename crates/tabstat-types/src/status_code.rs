/// Status code type alias.
#[allow(non_camel_case_types)]
pub type status_code_t = u16;

/// Common status codes (0-999).
pub mod StatusCode {
    use super::status_code_t;

    pub const OK: status_code_t = 0;
    pub const NOT_IMPLEMENTED: status_code_t = 1;
    pub const DATA_CORRUPTION: status_code_t = 2;
    pub const INVALID_ARG: status_code_t = 3;
    pub const INVALID_CONFIG: status_code_t = 4;
    pub const INTERRUPTED: status_code_t = 27;
    pub const FOUND_BUG: status_code_t = 998;
    pub const UNKNOWN: status_code_t = 999;
}

/// RPC transport status codes (2xxx).
pub mod RPCCode {
    use super::status_code_t;

    pub const INVALID_MESSAGE_TYPE: status_code_t = 2000;
    pub const REQUEST_IS_EMPTY: status_code_t = 2001;
    pub const VERIFY_RESPONSE_FAILED: status_code_t = 2003;
    pub const TIMEOUT: status_code_t = 2005;
    pub const INVALID_ADDR: status_code_t = 2006;
    pub const SEND_FAILED: status_code_t = 2007;
    pub const SOCKET_ERROR: status_code_t = 2010;
    pub const REQUEST_REFUSED: status_code_t = 2012;
    pub const SOCKET_CLOSED: status_code_t = 2013;
    pub const CONNECT_FAILED: status_code_t = 2014;
}

/// Catalog status codes (3xxx).
pub mod CatalogCode {
    use super::status_code_t;

    pub const DATABASE_NOT_FOUND: status_code_t = 3000;
    pub const TABLE_NOT_FOUND: status_code_t = 3001;
    pub const DATABASE_EXISTS: status_code_t = 3002;
    pub const TABLE_EXISTS: status_code_t = 3003;
    pub const TABLET_EXISTS: status_code_t = 3004;
    pub const TABLE_DROPPED: status_code_t = 3005;
    pub const TABLET_NOT_FOUND: status_code_t = 3006;
    pub const TABLE_NOT_MANAGED: status_code_t = 3007;
}

/// Remote metadata service status codes (4xxx).
///
/// These travel inside a response body rather than failing the call.
pub mod MetaServiceCode {
    use super::status_code_t;

    pub const INVALID_ARGUMENT: status_code_t = 4000;
    pub const KV_TXN_CREATE_ERR: status_code_t = 4001;
    pub const KV_TXN_GET_ERR: status_code_t = 4002;
    pub const TABLET_NOT_FOUND: status_code_t = 4003;
    pub const PROTOBUF_PARSE_ERR: status_code_t = 4004;
    pub const MAX_QPS_LIMIT: status_code_t = 4005;
    pub const UNDEFINED_ERR: status_code_t = 4999;
}

/// Classification of status code ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum StatusCodeType {
    Invalid = -1,
    Common = 0,
    RPC = 2,
    Catalog = 3,
    MetaService = 4,
}

/// Determine the type/category of a status code.
pub fn type_of(code: status_code_t) -> StatusCodeType {
    match code {
        0..=999 => StatusCodeType::Common,
        2000..=2999 => StatusCodeType::RPC,
        3000..=3999 => StatusCodeType::Catalog,
        4000..=4999 => StatusCodeType::MetaService,
        _ => StatusCodeType::Invalid,
    }
}

/// Convert a status code to its human-readable name.
pub fn to_string(code: status_code_t) -> &'static str {
    match code {
        // Common
        StatusCode::OK => "OK",
        StatusCode::NOT_IMPLEMENTED => "NotImplemented",
        StatusCode::DATA_CORRUPTION => "DataCorruption",
        StatusCode::INVALID_ARG => "InvalidArg",
        StatusCode::INVALID_CONFIG => "InvalidConfig",
        StatusCode::INTERRUPTED => "Interrupted",
        StatusCode::FOUND_BUG => "FoundBug",
        StatusCode::UNKNOWN => "Unknown",

        // RPC
        RPCCode::INVALID_MESSAGE_TYPE => "RPC::InvalidMessageType",
        RPCCode::REQUEST_IS_EMPTY => "RPC::RequestIsEmpty",
        RPCCode::VERIFY_RESPONSE_FAILED => "RPC::VerifyResponseFailed",
        RPCCode::TIMEOUT => "RPC::Timeout",
        RPCCode::INVALID_ADDR => "RPC::InvalidAddr",
        RPCCode::SEND_FAILED => "RPC::SendFailed",
        RPCCode::SOCKET_ERROR => "RPC::SocketError",
        RPCCode::REQUEST_REFUSED => "RPC::RequestRefused",
        RPCCode::SOCKET_CLOSED => "RPC::SocketClosed",
        RPCCode::CONNECT_FAILED => "RPC::ConnectFailed",

        // Catalog
        CatalogCode::DATABASE_NOT_FOUND => "Catalog::DatabaseNotFound",
        CatalogCode::TABLE_NOT_FOUND => "Catalog::TableNotFound",
        CatalogCode::DATABASE_EXISTS => "Catalog::DatabaseExists",
        CatalogCode::TABLE_EXISTS => "Catalog::TableExists",
        CatalogCode::TABLET_EXISTS => "Catalog::TabletExists",
        CatalogCode::TABLE_DROPPED => "Catalog::TableDropped",
        CatalogCode::TABLET_NOT_FOUND => "Catalog::TabletNotFound",
        CatalogCode::TABLE_NOT_MANAGED => "Catalog::TableNotManaged",

        // Meta service
        MetaServiceCode::INVALID_ARGUMENT => "MetaService::InvalidArgument",
        MetaServiceCode::KV_TXN_CREATE_ERR => "MetaService::KvTxnCreateErr",
        MetaServiceCode::KV_TXN_GET_ERR => "MetaService::KvTxnGetErr",
        MetaServiceCode::TABLET_NOT_FOUND => "MetaService::TabletNotFound",
        MetaServiceCode::PROTOBUF_PARSE_ERR => "MetaService::ProtobufParseErr",
        MetaServiceCode::MAX_QPS_LIMIT => "MetaService::MaxQpsLimit",
        MetaServiceCode::UNDEFINED_ERR => "MetaService::UndefinedErr",

        _ => "UnknownStatusCode",
    }
}
