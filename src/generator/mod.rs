pub mod curl;
pub mod http;

pub use curl::to_curl;
pub use http::HttpGenerator;
