use crate::model::{Auth, RequestBody, RequestModel};
use crate::parser::auth::decode_authorization;
use crate::parser::lexer::tokenize;
use crate::parser::multipart::{self, Part};
use tracing::{debug, trace};

/// WebSocket 连接由传输层自行管理的 Header，导入时直接丢弃
const WEBSOCKET_MANAGED_HEADERS: [&str; 6] = [
    "Connection",
    "Host",
    "Upgrade",
    "Sec-WebSocket-Key",
    "Sec-WebSocket-Version",
    "Sec-WebSocket-Extensions",
];

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// 支持的 curl 选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Request,
    Header,
    Cookie,
    Data,
    DataUrlencode,
    Json,
    Form,
    /// `--form-string`：值永远是文本，`@` 不表示文件
    FormString,
    Url,
    User,
    UserAgent,
    Referer,
    Get,
    Head,
    Location,
    /// 认识但不影响请求模型的无参选项（如 `-s`、`-k`）
    Ignored,
    /// 带参数但不影响请求模型的选项（如 `-x`、`-o`），参数需要一并跳过
    IgnoredWithValue,
}

impl Flag {
    fn from_short(c: char) -> Option<Self> {
        let flag = match c {
            'X' => Flag::Request,
            'H' => Flag::Header,
            'b' => Flag::Cookie,
            'd' => Flag::Data,
            'F' => Flag::Form,
            'u' => Flag::User,
            'A' => Flag::UserAgent,
            'e' => Flag::Referer,
            'G' => Flag::Get,
            'I' => Flag::Head,
            'L' => Flag::Location,
            'x' | 'o' | 'm' | 'w' | 'E' | 'T' | 'U' | 'c' | 'r' | 'Y' | 'y' => {
                Flag::IgnoredWithValue
            }
            's' | 'S' | 'v' | 'k' | 'i' | 'f' | 'g' | 'N' | 'O' | 'J' | 'q' | '0' | '1' | '2'
            | '3' | '4' | '6' => Flag::Ignored,
            _ => return None,
        };
        Some(flag)
    }

    fn from_long(name: &str) -> Option<Self> {
        let flag = match name {
            "request" => Flag::Request,
            "header" => Flag::Header,
            "cookie" => Flag::Cookie,
            "data" | "data-raw" | "data-binary" | "data-ascii" => Flag::Data,
            "data-urlencode" => Flag::DataUrlencode,
            "json" => Flag::Json,
            "form" => Flag::Form,
            "form-string" => Flag::FormString,
            "url" => Flag::Url,
            "user" => Flag::User,
            "user-agent" => Flag::UserAgent,
            "referer" => Flag::Referer,
            "get" => Flag::Get,
            "head" => Flag::Head,
            "location" | "location-trusted" => Flag::Location,
            "compressed" | "insecure" | "silent" | "show-error" | "verbose" | "include"
            | "fail" | "globoff" | "no-buffer" | "http1.1" | "http2" | "http2-prior-knowledge"
            | "http3" => Flag::Ignored,
            "proxy" | "output" | "max-time" | "connect-timeout" | "write-out" | "resolve"
            | "cacert" | "cert" | "key" | "upload-file" | "proxy-user" | "cookie-jar"
            | "range" | "speed-limit" | "speed-time" | "retry" | "limit-rate" => {
                Flag::IgnoredWithValue
            }
            _ => return None,
        };
        Some(flag)
    }

    fn takes_value(self) -> bool {
        !matches!(
            self,
            Flag::Get | Flag::Head | Flag::Location | Flag::Ignored
        )
    }
}

/// 尚未决定归属（body 还是 query）的数据参数
#[derive(Debug, Clone, PartialEq, Eq)]
enum DataArg {
    /// `-d` / `--data-raw` / `--data-binary`：值已是编码后的形式
    Raw(String),
    /// `--data-urlencode`：值为原文，由 curl 负责编码
    Urlencode(String),
}

impl DataArg {
    fn as_str(&self) -> &str {
        match self {
            DataArg::Raw(s) | DataArg::Urlencode(s) => s,
        }
    }

    /// 作为查询串片段输出
    fn to_query_fragment(&self) -> String {
        match self {
            DataArg::Raw(s) => s.clone(),
            DataArg::Urlencode(s) => match s.split_once('=') {
                Some((key, value)) => format!("{}={}", key, encode_component(value)),
                None => encode_component(s),
            },
        }
    }
}

/// 第一遍扫描的结果，所有依赖全局信息的决定都推迟到 [`CurlArgs::finish`]
#[derive(Debug, Default)]
struct CurlArgs {
    url: Option<String>,
    method: Option<String>,
    headers: Vec<(String, String)>,
    data: Vec<DataArg>,
    form: Vec<Part>,
    user: Option<String>,
    force_get: bool,
    follow_redirects: bool,
}

/// curl 命令解析器
pub struct CurlParser;

impl CurlParser {
    /// 解析完整的 curl 命令文本，任何输入都会得到一个请求模型
    pub fn parse(input: &str) -> RequestModel {
        let tokens = tokenize(input);
        Self::parse_tokens(&tokens)
    }

    /// 解析已经切分好的参数列表
    pub fn parse_tokens(tokens: &[String]) -> RequestModel {
        Self::scan(tokens).finish()
    }

    fn scan(tokens: &[String]) -> CurlArgs {
        let mut args = CurlArgs::default();
        let mut iter = tokens.iter().enumerate();

        while let Some((index, token)) = iter.next() {
            if index == 0 && token.eq_ignore_ascii_case("curl") {
                continue;
            }

            if let Some(long) = token.strip_prefix("--") {
                if long.is_empty() {
                    continue;
                }
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value.to_string())),
                    None => (long, None),
                };
                match Flag::from_long(name) {
                    Some(flag) if flag.takes_value() => {
                        let value = inline.or_else(|| iter.next().map(|(_, v)| v.clone()));
                        if let Some(value) = value {
                            args.apply(flag, value);
                        }
                    }
                    Some(flag) => args.apply(flag, String::new()),
                    None => trace!("Ignoring unsupported curl option --{}", name),
                }
                continue;
            }

            if token.len() > 1 && token.starts_with('-') {
                let shorts = &token[1..];
                for (offset, c) in shorts.char_indices() {
                    match Flag::from_short(c) {
                        Some(flag) if flag.takes_value() => {
                            let rest = &shorts[offset + c.len_utf8()..];
                            let value = if rest.is_empty() {
                                iter.next().map(|(_, v)| v.clone())
                            } else {
                                Some(rest.to_string())
                            };
                            if let Some(value) = value {
                                args.apply(flag, value);
                            }
                            break;
                        }
                        Some(flag) => args.apply(flag, String::new()),
                        None => {
                            trace!("Ignoring unsupported curl option -{}", c);
                            break;
                        }
                    }
                }
                continue;
            }

            if looks_like_url(token) {
                args.url = Some(token.clone());
            }
        }

        args
    }
}

impl CurlArgs {
    fn apply(&mut self, flag: Flag, value: String) {
        match flag {
            Flag::Request => self.method = Some(value.to_uppercase()),
            Flag::Header => {
                if let Some(header) = parse_header(&value) {
                    self.headers.push(header);
                }
            }
            Flag::Cookie => self.headers.push(("Cookie".to_string(), value)),
            Flag::Data => {
                self.data.push(DataArg::Raw(value));
                self.default_method("POST");
            }
            Flag::DataUrlencode => {
                self.data.push(DataArg::Urlencode(value));
                self.default_method("POST");
            }
            Flag::Json => {
                self.data.push(DataArg::Raw(value));
                self.default_header("Content-Type", "application/json");
                self.default_header("Accept", "application/json");
                self.default_method("POST");
            }
            Flag::Form => {
                if let Some(part) = parse_form_arg(&value) {
                    self.form.push(part);
                }
                self.default_method("POST");
            }
            Flag::FormString => {
                if let Some((key, value)) = value.split_once('=') {
                    self.form
                        .push(Part::Field(key.trim().to_string(), value.to_string()));
                }
                self.default_method("POST");
            }
            Flag::Url => self.url = Some(value),
            Flag::User => self.user = Some(value),
            Flag::UserAgent => self.headers.push(("User-Agent".to_string(), value)),
            Flag::Referer => self.headers.push(("Referer".to_string(), value)),
            Flag::Get => self.force_get = true,
            Flag::Head => self.default_method("HEAD"),
            Flag::Location => self.follow_redirects = true,
            Flag::Ignored | Flag::IgnoredWithValue => {}
        }
    }

    fn default_method(&mut self, method: &str) {
        if self.method.is_none() {
            self.method = Some(method.to_string());
        }
    }

    fn default_header(&mut self, name: &str, value: &str) {
        if !self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name)) {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }

    /// 第二遍：根据全部选项决定方法、body 与查询参数
    fn finish(self) -> RequestModel {
        let mut request = RequestModel::new();
        request.url = self.url.unwrap_or_default();
        request.follow_redirects = self.follow_redirects;

        let websocket = is_websocket(&request.url);
        for (name, value) in self.headers {
            if websocket
                && WEBSOCKET_MANAGED_HEADERS
                    .iter()
                    .any(|h| h.eq_ignore_ascii_case(&name))
            {
                debug!("Dropping websocket-managed header {}", name);
                continue;
            }
            if name.eq_ignore_ascii_case("authorization") {
                if let Some(auth) = decode_authorization(&value) {
                    request.auth = auth;
                    continue;
                }
            }
            request.headers.append(&name, &value);
        }

        if let (Some(user), Auth::None) = (&self.user, &request.auth) {
            let (username, password) = user.split_once(':').unwrap_or((user.as_str(), ""));
            request.auth = Auth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            };
        }

        if !self.form.is_empty() && !request.headers.contains("Content-Type") {
            request.headers.append("Content-Type", MULTIPART_FORM_DATA);
        }

        let mut method = self.method;
        let mut form = self.form;

        if self.force_get {
            method = Some("GET".to_string());
            for arg in &self.data {
                append_query(&mut request.url, &arg.to_query_fragment());
            }
        } else if !self.data.is_empty() {
            if !request.headers.contains("Content-Type") {
                request.headers.append("Content-Type", FORM_URLENCODED);
            }
            let declared = request.content_type().unwrap_or_default().to_string();
            let content_type = declared.to_ascii_lowercase();
            let joined = self
                .data
                .iter()
                .map(DataArg::as_str)
                .collect::<Vec<_>>()
                .join("&");

            request.body = if content_type.starts_with(FORM_URLENCODED) {
                match data_pairs(&self.data) {
                    Some(pairs) => RequestBody::UrlEncoded(pairs),
                    None => raw_body(joined),
                }
            } else if content_type.starts_with(MULTIPART_FORM_DATA) {
                let parts = multipart::extract_boundary(&declared)
                    .map(|boundary| multipart::split_parts(&joined, &boundary))
                    .unwrap_or_default();
                if parts.is_empty() {
                    debug!("Data arguments do not split as multipart, keeping raw body");
                    raw_body(joined)
                } else {
                    form.extend(parts);
                    RequestBody::None
                }
            } else {
                raw_body(joined)
            };
        }

        if request.body.is_none() && !form.is_empty() {
            let (fields, files) = multipart::partition(form);
            request.body = RequestBody::Multipart { fields, files };
        }

        request.method = method.unwrap_or_else(|| "GET".to_string());
        request.sync_query_params();
        request
    }
}

/// 所有数据参数都是 `key=value` 时返回键值对，否则返回 `None`（按原始文本处理）
fn data_pairs(data: &[DataArg]) -> Option<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for arg in data {
        match arg {
            DataArg::Raw(s) => {
                let trimmed = s.trim_start();
                if trimmed.starts_with('{') || trimmed.starts_with('[') {
                    return None;
                }
                for piece in s.split('&').filter(|p| !p.is_empty()) {
                    if !piece.contains('=') {
                        return None;
                    }
                    pairs.extend(
                        url::form_urlencoded::parse(piece.as_bytes())
                            .map(|(k, v)| (k.into_owned(), v.into_owned())),
                    );
                }
            }
            DataArg::Urlencode(s) => {
                let (key, value) = s.split_once('=')?;
                pairs.push((key.to_string(), value.to_string()));
            }
        }
    }
    if pairs.is_empty() { None } else { Some(pairs) }
}

fn raw_body(joined: String) -> RequestBody {
    if joined.is_empty() {
        RequestBody::None
    } else {
        RequestBody::Raw(joined)
    }
}

/// 解析 `-H` 参数；`X-Empty;` 表示值为空的 Header
fn parse_header(value: &str) -> Option<(String, String)> {
    if let Some((name, value)) = value.split_once(':') {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        return Some((name.to_string(), value.trim().to_string()));
    }
    let name = value.trim().strip_suffix(';')?.trim();
    (!name.is_empty()).then(|| (name.to_string(), String::new()))
}

/// 解析 `-F key=value` / `-F key=@path;type=...`
fn parse_form_arg(value: &str) -> Option<Part> {
    let (key, value) = value.split_once('=')?;
    let key = key.trim().to_string();
    match value.strip_prefix('@') {
        Some(path) => {
            let path = path.split(';').next().unwrap_or_default();
            Some(Part::File(key, path.trim_matches('"').to_string()))
        }
        None => Some(Part::Field(key, value.to_string())),
    }
}

fn looks_like_url(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    lower.starts_with("http") || lower.starts_with("ws://") || lower.starts_with("wss://")
}

fn is_websocket(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("ws://") || lower.starts_with("wss://")
}

fn append_query(url: &mut String, fragment: &str) {
    if fragment.is_empty() {
        return;
    }
    if !url.contains('?') {
        url.push('?');
    } else if !url.ends_with('?') && !url.ends_with('&') {
        url.push('&');
    }
    url.push_str(fragment);
}

fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
