pub mod config;
pub mod error;
pub mod generator;
pub mod logger;
pub mod model;
pub mod parser;
pub mod utils;

// Re-export commonly used types
pub use error::{ReqconvError, Result};
pub use model::{Auth, AuthType, HeaderList, RequestBody, RequestModel};
pub use parser::http_file::parse_http_file;

/// 解析 curl 命令；任何输入都会返回请求模型，空输入得到 `GET` + 空 URL
pub fn parse_curl(input: &str) -> RequestModel {
    parser::CurlParser::parse(input)
}

/// 将请求模型转换回 curl 命令
pub fn serialize_curl(request: &RequestModel) -> String {
    generator::to_curl(request)
}
