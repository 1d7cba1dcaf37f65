use crate::model::RequestBody;
use crate::parser::multipart;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static REPEATED_AMPERSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&{2,}").expect("valid ampersand regex"));

/// 根据 Content-Type 将积累的原始 body 文本整理成最终的请求体
///
/// - 空 body → `None`
/// - `multipart/form-data` 且有 boundary → 按部分拆分，拆不出任何部分时保留原文
/// - `application/x-www-form-urlencoded` → 键值对（换行视为 `&`）
/// - 其他 → 原始文本
pub fn finish_body(raw: &str, content_type: Option<&str>, boundary: Option<&str>) -> RequestBody {
    let raw = raw.trim();
    if raw.is_empty() {
        return RequestBody::None;
    }

    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();

    if content_type.contains("multipart/form-data") {
        if let Some(boundary) = boundary {
            let parts = multipart::split_parts(raw, boundary);
            if !parts.is_empty() {
                let (fields, files) = multipart::partition(parts);
                return RequestBody::Multipart { fields, files };
            }
            debug!("No multipart parts found for boundary {:?}, keeping raw body", boundary);
        }
        return RequestBody::Raw(raw.to_string());
    }

    if content_type.contains("application/x-www-form-urlencoded") {
        return RequestBody::UrlEncoded(parse_form_pairs(raw));
    }

    RequestBody::Raw(raw.to_string())
}

/// 解析 `a=1&b=2` 风格文本；每行也视为一个分隔
pub fn parse_form_pairs(raw: &str) -> Vec<(String, String)> {
    let normalized: String = raw
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("&");
    let normalized = REPEATED_AMPERSANDS.replace_all(&normalized, "&");

    normalized
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}
