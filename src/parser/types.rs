use crate::model::RequestModel;
use serde::Serialize;
use std::path::PathBuf;

/// 整个 .http 文件的解析结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedFile {
    /// 分组名称（由文件名推导）
    pub name: Option<String>,

    /// 解析出的所有请求，保持文件中的顺序
    pub requests: Vec<RequestModel>,

    /// 源文件路径
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl ParsedFile {
    /// 创建一个新的空文件解析结果
    pub fn new() -> Self {
        Self {
            name: None,
            requests: Vec::new(),
            source_path: None,
        }
    }

    /// 设置源文件路径
    pub fn with_source_path(mut self, path: PathBuf) -> Self {
        self.source_path = Some(path);
        self
    }

    /// 添加一个请求
    pub fn add_request(&mut self, request: RequestModel) {
        self.requests.push(request);
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl Default for ParsedFile {
    fn default() -> Self {
        Self::new()
    }
}

/// 取文件名中不带扩展名的部分，作为默认分组名
pub fn file_stem(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_file_new() {
        let file = ParsedFile::new();
        assert!(file.is_empty());
        assert_eq!(file.name, None);
        assert_eq!(file.source_path, None);
    }

    #[test]
    fn test_parsed_file_with_source_path() {
        let file = ParsedFile::new().with_source_path(PathBuf::from("/test/api.http"));
        assert_eq!(file.source_path, Some(PathBuf::from("/test/api.http")));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("requests/users.http"), Some("users".to_string()));
        assert_eq!(file_stem("api.rest"), Some("api".to_string()));
        assert_eq!(file_stem(""), None);
    }
}
