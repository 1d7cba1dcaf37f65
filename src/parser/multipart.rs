use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static BOUNDARY_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)boundary\s*=\s*"?([^";\s]+)"?"#).expect("valid boundary regex"));

static PART_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(?:^|[;\s])name\s*=\s*"?([^";]*)"?"#).expect("valid name regex"));

static PART_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:^|[;\s])filename\s*=\s*"?([^";]*)"?"#).expect("valid filename regex")
});

/// multipart 请求体中的一个部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// 文本字段 (name, value)
    Field(String, String),
    /// 文件引用 (name, path)
    File(String, String),
}

/// 从 Content-Type 中提取 `boundary=` 参数（忽略大小写，可带引号）
pub fn extract_boundary(content_type: &str) -> Option<String> {
    BOUNDARY_PARAM
        .captures(content_type)
        .map(|caps| caps[1].to_string())
}

/// 按 boundary 拆分 multipart 文本
///
/// 空片段与结尾的 `--` 片段会被丢弃；没有 `name` 的片段同样忽略。
/// 返回空列表时由调用方回退为原始文本。
pub fn split_parts(body: &str, boundary: &str) -> Vec<Part> {
    if boundary.is_empty() {
        return Vec::new();
    }

    let delimiter = format!("--{}", boundary);
    // 只在正文开头或换行之后切分，行中间出现的 boundary 属于内容
    let splitter = match Regex::new(&format!(r"(?:^|\r?\n){}", regex::escape(&delimiter))) {
        Ok(re) => re,
        Err(e) => {
            trace!("Invalid multipart boundary {:?}: {}", boundary, e);
            return Vec::new();
        }
    };

    splitter
        .split(body)
        .filter(|fragment| !fragment.trim().is_empty() && !fragment.starts_with("--"))
        .filter_map(parse_part)
        .collect()
}

/// 解析单个片段：头部直到空行，空行之后为内容
fn parse_part(fragment: &str) -> Option<Part> {
    let fragment = fragment.trim_start_matches([' ', '\t']);
    let fragment = fragment
        .strip_prefix("\r\n")
        .or_else(|| fragment.strip_prefix('\n'))
        .unwrap_or(fragment);

    let mut name = None;
    let mut filename = None;
    let mut content_lines = Vec::new();
    let mut in_headers = true;

    for line in fragment.lines() {
        if in_headers {
            if line.trim().is_empty() {
                in_headers = false;
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                if key.trim().eq_ignore_ascii_case("content-disposition") {
                    name = PART_NAME.captures(value).map(|caps| caps[1].to_string());
                    filename = PART_FILENAME
                        .captures(value)
                        .map(|caps| caps[1].to_string());
                }
            }
            continue;
        }
        content_lines.push(line);
    }

    let name = name?;
    let content = content_lines.join("\n");
    let content = content.trim();
    let content = content
        .strip_prefix('<')
        .map(str::trim)
        .unwrap_or(content);

    let part = match filename {
        Some(filename) => {
            let path = if content.is_empty() {
                filename
            } else {
                content.to_string()
            };
            Part::File(name, path)
        }
        None => Part::Field(name, content.to_string()),
    };
    Some(part)
}

/// 将拆分结果归为 (fields, files)
pub fn partition(parts: Vec<Part>) -> (Vec<(String, String)>, Vec<(String, String)>) {
    let mut fields = Vec::new();
    let mut files = Vec::new();
    for part in parts {
        match part {
            Part::Field(k, v) => fields.push((k, v)),
            Part::File(k, v) => files.push((k, v)),
        }
    }
    (fields, files)
}
