use crate::model::{Auth, HeaderList, RequestModel};
use crate::parser::auth::decode_authorization;
use crate::parser::body::finish_body;
use crate::parser::multipart::extract_boundary;
use crate::parser::script::translate_script;
use crate::parser::types::{ParsedFile, file_stem};
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, trace};

static SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^###\s*(.*)$").expect("valid separator regex"));

static REQUEST_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(GET|POST|PUT|DELETE|PATCH|HEAD|OPTIONS)\s+(.+?)(?:\s+HTTP/\d(?:\.\d)?)?$")
        .expect("valid request line regex")
});

static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9_\-\.]+)\s*:\s*(.*)$").expect("valid header regex"));

static NAME_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:#|//)?\s*@name\b\s*=?\s*(.+)$").expect("valid name directive regex")
});

const UNNAMED_REQUEST: &str = "Unnamed request";

/// 只有这些方法会把后续内容收集为 body
const BODY_METHODS: [&str; 4] = ["POST", "PUT", "PATCH", "DELETE"];

/// 行级状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    Normal,
    /// 处于多行 `> {% ... %}` 脚本中
    Script,
}

/// 正在积累的请求块
#[derive(Debug, Default)]
struct Block {
    /// 分隔符 `###` 后的文本
    title: Option<String>,
    /// `# @name` 指令
    directive_name: Option<String>,
    method: Option<String>,
    url: String,
    headers: HeaderList,
    auth: Auth,
    content_type: Option<String>,
    boundary: Option<String>,
    body_lines: Vec<String>,
    /// 一旦进入 body 模式就不会再解析 Header
    in_body: bool,
    /// 请求行之后、第一个 Header 之前，允许 `?` / `&` 续行
    url_open: bool,
    scripts: Vec<String>,
}

impl Block {
    fn titled(title: Option<String>) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    fn has_url(&self) -> bool {
        !self.url.is_empty()
    }

    fn accepts_body(&self) -> bool {
        self.method
            .as_deref()
            .is_some_and(|m| BODY_METHODS.contains(&m))
    }

    fn set_request_line(&mut self, method: &str, url: &str) {
        self.method = Some(method.to_string());
        self.url = url.trim().to_string();
        self.url_open = true;
    }

    fn add_header(&mut self, name: &str, value: &str) {
        self.url_open = false;

        if name.eq_ignore_ascii_case("authorization") {
            if let Some(auth) = decode_authorization(value) {
                self.auth = auth;
                return;
            }
        }

        if name.eq_ignore_ascii_case("content-type") {
            self.content_type = Some(value.to_string());
            if value.to_ascii_lowercase().contains("multipart/form-data") {
                self.boundary = extract_boundary(value);
            }
        }

        self.headers.append(name, value);
    }

    fn push_body_line(&mut self, line: &str) {
        self.in_body = true;
        self.url_open = false;
        self.body_lines.push(line.to_string());
    }

    /// 块结束：没有 URL 的块直接丢弃
    fn finish(self, default_name: Option<&str>) -> Option<RequestModel> {
        if !self.has_url() {
            debug!("Dropping request block without URL");
            return None;
        }

        let method = self.method.unwrap_or_else(|| "GET".to_string());
        let name = self
            .title
            .or(self.directive_name)
            .or_else(|| name_from_url(&method, &self.url))
            .or_else(|| default_name.map(str::to_string))
            .unwrap_or_else(|| UNNAMED_REQUEST.to_string());

        let raw_body = self.body_lines.join("\n");
        let body = finish_body(&raw_body, self.content_type.as_deref(), self.boundary.as_deref());

        let script = self.scripts.join("\n");
        let post_script = (!script.trim().is_empty()).then(|| translate_script(script.trim()));

        let mut request = RequestModel::new();
        request.name = Some(name);
        request.method = method;
        request.url = self.url;
        request.headers = self.headers;
        request.auth = self.auth;
        request.body = body;
        request.post_script = post_script;
        request.sync_query_params();
        Some(request)
    }
}

/// HTTP 文件解析器
pub struct HttpFileParser;

impl HttpFileParser {
    /// 从文件路径解析，文件名（不含扩展名）作为分组名
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedFile> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let filename = path.file_name().and_then(|s| s.to_str());
        let parsed = Self::parse_named(&content, filename).with_source_path(path.to_path_buf());
        Ok(parsed)
    }

    /// 从字符串内容解析
    pub fn parse_content(content: &str) -> ParsedFile {
        Self::parse_named(content, None)
    }

    /// 从字符串内容解析，可选的文件名用于生成默认名称
    pub fn parse_named(content: &str, filename: Option<&str>) -> ParsedFile {
        let mut file = ParsedFile::new();
        file.name = filename.and_then(file_stem);
        let default_name = file.name.clone();
        let default_name = default_name.as_deref();

        let mut state = LineState::Normal;
        let mut script = String::new();
        let mut current: Option<Block> = None;

        let finish = |block: Option<Block>, file: &mut ParsedFile| {
            if let Some(request) = block.and_then(|b| b.finish(default_name)) {
                file.add_request(request);
            }
        };

        for line in content.lines() {
            let trimmed = line.trim();

            if state == LineState::Script {
                match trimmed.strip_suffix("%}") {
                    Some(rest) => {
                        script.push_str(rest);
                        if let Some(block) = current.as_mut() {
                            block.scripts.push(std::mem::take(&mut script));
                        }
                        script.clear();
                        state = LineState::Normal;
                    }
                    None => {
                        script.push_str(line);
                        script.push('\n');
                    }
                }
                continue;
            }

            if let Some(caps) = SEPARATOR.captures(trimmed) {
                finish(current.take(), &mut file);
                let title = caps[1].trim();
                current = Some(Block::titled((!title.is_empty()).then(|| title.to_string())));
                continue;
            }

            // 响应脚本
            if trimmed.starts_with('>') && trimmed.contains("{%") {
                let block = current.get_or_insert_with(Block::default);
                let Some((_, rest)) = trimmed.split_once("{%") else {
                    continue;
                };
                match rest.split_once("%}") {
                    Some((body, _)) => block.scripts.push(body.trim().to_string()),
                    None => {
                        script.clear();
                        if !rest.trim().is_empty() {
                            script.push_str(rest.trim());
                            script.push('\n');
                        }
                        state = LineState::Script;
                    }
                }
                continue;
            }

            // `<> previous-response.json` 与 `> handler.js` 只在宿主工具中有意义
            if trimmed.starts_with("<>") || trimmed.starts_with('>') {
                trace!("Skipping response handler reference: {}", trimmed);
                continue;
            }

            if let Some(caps) = NAME_DIRECTIVE.captures(trimmed) {
                if current.as_ref().is_none_or(|b| !b.in_body) {
                    current.get_or_insert_with(Block::default).directive_name =
                        Some(caps[1].trim().to_string());
                    continue;
                }
            }

            if is_comment(trimmed) {
                continue;
            }

            if current.as_ref().is_some_and(|b| b.in_body) {
                if let Some(block) = current.as_mut() {
                    block.push_body_line(line);
                }
                continue;
            }

            // 文件级变量定义，如 `@host = example.com`
            if trimmed.starts_with('@') {
                continue;
            }

            if let Some(caps) = REQUEST_LINE.captures(trimmed) {
                if current.as_ref().is_some_and(Block::has_url) {
                    finish(current.take(), &mut file);
                }
                current
                    .get_or_insert_with(Block::default)
                    .set_request_line(&caps[1], &caps[2]);
                continue;
            }

            // 只有 URL 的请求行，方法默认为 GET
            if looks_like_url(trimmed) {
                if current.as_ref().is_some_and(Block::has_url) {
                    finish(current.take(), &mut file);
                }
                current
                    .get_or_insert_with(Block::default)
                    .set_request_line("GET", trimmed);
                continue;
            }

            let Some(block) = current.as_mut().filter(|b| b.has_url()) else {
                continue;
            };

            if trimmed.is_empty() {
                block.url_open = false;
                if block.accepts_body() {
                    block.push_body_line(line);
                }
                continue;
            }

            if block.url_open
                && line.starts_with(char::is_whitespace)
                && (trimmed.starts_with('?') || trimmed.starts_with('&'))
            {
                block.url.push_str(trimmed);
                continue;
            }

            if let Some(caps) = HEADER.captures(trimmed) {
                block.add_header(&caps[1], caps[2].trim());
                continue;
            }

            if block.accepts_body() {
                block.push_body_line(line);
            } else {
                trace!("Ignoring line outside of body: {}", trimmed);
            }
        }

        if state == LineState::Script {
            if let Some(block) = current.as_mut() {
                block.scripts.push(script);
            }
        }
        finish(current.take(), &mut file);

        file
    }
}

/// 便捷函数：解析 .http 文本，没有任何可用请求时返回空列表
pub fn parse_http_file(content: &str, filename: Option<&str>) -> Vec<RequestModel> {
    HttpFileParser::parse_named(content, filename).requests
}

/// 判断是否为注释行（`###` 已在之前处理）
fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

fn looks_like_url(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    !line.contains(char::is_whitespace)
        && (lower.starts_with("http://") || lower.starts_with("https://") || line.starts_with("{{"))
}

/// 由 URL 路径生成名称，如 `GET /api/users`
fn name_from_url(method: &str, url: &str) -> Option<String> {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .find('/')
        .map(|i| &without_scheme[i..])
        .unwrap_or_default();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');

    if path.is_empty() {
        None
    } else {
        Some(format!("{} {}", method, path))
    }
}
