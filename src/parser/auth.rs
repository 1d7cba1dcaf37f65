use crate::model::Auth;
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::debug;

/// 解析 `Authorization` Header 的值
///
/// 支持 `Basic` 与 `Bearer` 两种方案，其他方案返回 `None`，由调用方原样保留 Header。
pub fn decode_authorization(value: &str) -> Option<Auth> {
    let value = value.trim();

    if starts_with_ignore_case(value, "basic ") {
        return Some(decode_basic(value[6..].trim()));
    }

    if starts_with_ignore_case(value, "bearer ") {
        return Some(Auth::Bearer {
            token: value[7..].to_string(),
        });
    }

    None
}

/// 解码 Basic 凭据，支持 `{{user}} {{pass}}` 与 `{{user}}:{{pass}}` 这类占位符写法
fn decode_basic(credential: &str) -> Auth {
    if credential.contains("{{") && credential.contains("}}") {
        let parts: Vec<&str> = credential.split_whitespace().collect();
        if parts.len() == 2 {
            return basic(parts[0], parts[1]);
        }
        return split_credential(credential);
    }

    match STANDARD.decode(credential) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(decoded) => split_credential(&decoded),
            Err(e) => {
                debug!("Basic credential is not valid UTF-8: {}", e);
                basic(credential, "")
            }
        },
        Err(e) => {
            debug!("Basic credential is not valid base64: {}", e);
            basic(credential, "")
        }
    }
}

/// 按第一个 `:` 拆分用户名与密码
fn split_credential(credential: &str) -> Auth {
    match credential.split_once(':') {
        Some((username, password)) => basic(username, password),
        None => basic(credential, ""),
    }
}

fn basic(username: &str, password: &str) -> Auth {
    Auth::Basic {
        username: username.to_string(),
        password: password.to_string(),
    }
}

/// 生成 `Authorization` Header 的值（`Inherit` / `None` 返回 `None`）
pub fn encode_authorization(auth: &Auth) -> Option<String> {
    match auth {
        Auth::Basic { username, password } => {
            let value = if placeholder_form_is_unambiguous(username, password) {
                if password.is_empty() {
                    username.clone()
                } else {
                    format!("{} {}", username, password)
                }
            } else {
                STANDARD.encode(format!("{}:{}", username, password))
            };
            Some(format!("Basic {}", value))
        }
        Auth::Bearer { token } => Some(format!("Bearer {}", token)),
        Auth::None | Auth::Inherit => None,
    }
}

/// 占位符凭据以 `user pass` 明文写出，只有能被 [`decode_basic`] 原样拆回时才这样做
fn placeholder_form_is_unambiguous(username: &str, password: &str) -> bool {
    let has_placeholder = |s: &str| s.contains("{{") && s.contains("}}");
    if !has_placeholder(username) && !has_placeholder(password) {
        return false;
    }
    if username.is_empty() || username.contains(char::is_whitespace) {
        return false;
    }
    !password.contains(char::is_whitespace)
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.is_char_boundary(prefix.len())
        && value[..prefix.len()].eq_ignore_ascii_case(prefix)
}
