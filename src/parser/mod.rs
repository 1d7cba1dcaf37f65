pub mod auth;
pub mod body;
pub mod curl;
pub mod http_file;
pub mod lexer;
pub mod multipart;
pub mod script;
pub mod types;

// Re-export commonly used types
pub use curl::CurlParser;
pub use http_file::{HttpFileParser, parse_http_file};
pub use types::ParsedFile;

/// 从文件路径解析 HTTP 文件
pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<ParsedFile> {
    HttpFileParser::parse_file(path)
}

/// 从字符串内容解析 HTTP 请求
pub fn parse_content(content: &str) -> ParsedFile {
    HttpFileParser::parse_content(content)
}
