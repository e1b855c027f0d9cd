pub use self::access_log::AccessLogMiddleware;
pub use self::error::ErrorMiddleware;

mod access_log;
mod error;
