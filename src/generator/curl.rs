use crate::model::{RequestBody, RequestModel};
use crate::parser::auth::encode_authorization;

/// 将请求模型转换为可以再次执行（也可以再次解析）的 curl 命令
pub fn to_curl(request: &RequestModel) -> String {
    let mut parts = vec!["curl".to_string()];

    if !request.method.eq_ignore_ascii_case("GET") {
        parts.push(format!("-X {}", request.method.to_uppercase()));
    }
    parts.push(shell_escape(&request.url));

    if request.follow_redirects {
        parts.push("-L".to_string());
    }

    for (name, value) in request.headers.iter() {
        parts.push(format!("-H {}", double_quote(&format!("{}: {}", name, value))));
    }
    if let Some(value) = encode_authorization(&request.auth) {
        parts.push(format!("-H {}", double_quote(&format!("Authorization: {}", value))));
    }

    match &request.body {
        RequestBody::None => {}
        RequestBody::Raw(text) => parts.push(format!("--data {}", shell_escape(text))),
        RequestBody::UrlEncoded(pairs) => {
            for (key, value) in pairs {
                parts.push(format!(
                    "--data-urlencode {}",
                    shell_escape(&format!("{}={}", key, value))
                ));
            }
        }
        RequestBody::Multipart { fields, files } => {
            for (key, value) in fields {
                parts.push(format!("-F {}", shell_escape(&format!("{}={}", key, value))));
            }
            for (key, path) in files {
                parts.push(format!("-F {}", shell_escape(&format!("{}=@{}", key, path))));
            }
        }
    }

    parts.join(" ")
}

/// 默认使用单引号；值中含单引号时改用双引号
///
/// 反斜杠和控制字符会被转义，双引号内的 `$` 与反引号同样转义，避免被 shell 展开。
pub fn shell_escape(value: &str) -> String {
    if value.contains('\'') {
        double_quote(value)
    } else {
        format!("'{}'", escape_controls(value))
    }
}

fn double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in escape_controls(value).chars() {
        if matches!(c, '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn escape_controls(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Auth;

    #[test]
    fn test_simple_get() {
        let mut req = RequestModel::new();
        req.url = "https://example.com".to_string();
        assert_eq!(to_curl(&req), "curl 'https://example.com'");
    }

    #[test]
    fn test_post_with_headers_and_body() {
        let mut req = RequestModel::new();
        req.method = "POST".to_string();
        req.url = "https://example.com/users".to_string();
        req.headers.append("Content-Type", "application/json");
        req.body = RequestBody::Raw(r#"{"name":"a"}"#.to_string());

        assert_eq!(
            to_curl(&req),
            r#"curl -X POST 'https://example.com/users' -H "Content-Type: application/json" --data '{"name":"a"}'"#
        );
    }

    #[test]
    fn test_shell_escape() {
        assert_eq!(shell_escape(r#"{"a":1}"#), r#"'{"a":1}'"#);
        assert_eq!(shell_escape(r#"it's "ok""#), r#""it's \"ok\"""#);
        assert_eq!(shell_escape("a\nb"), r"'a\nb'");
        assert_eq!(shell_escape(r"C:\tmp"), r"'C:\\tmp'");
        assert_eq!(shell_escape("it's $HOME `id`"), r#""it's \$HOME \`id\`""#);
        assert_eq!(shell_escape("$HOME"), "'$HOME'");
    }

    #[test]
    fn test_form_and_auth() {
        let mut req = RequestModel::new();
        req.method = "POST".to_string();
        req.url = "https://example.com/upload".to_string();
        req.auth = Auth::Bearer {
            token: "t0k".to_string(),
        };
        req.body = RequestBody::Multipart {
            fields: vec![("name".to_string(), "alice".to_string())],
            files: vec![("avatar".to_string(), "/tmp/a.png".to_string())],
        };

        let curl = to_curl(&req);
        assert!(curl.contains(r#"-H "Authorization: Bearer t0k""#));
        assert!(curl.contains("-F 'name=alice'"));
        assert!(curl.contains("-F 'avatar=@/tmp/a.png'"));
    }

    #[test]
    fn test_urlencoded_fields() {
        let mut req = RequestModel::new();
        req.method = "POST".to_string();
        req.url = "https://example.com".to_string();
        req.body = RequestBody::UrlEncoded(vec![("q".to_string(), "a b".to_string())]);
        assert!(to_curl(&req).ends_with("--data-urlencode 'q=a b'"));
    }
}
