use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// 可识别的外部脚本调用形式
static SCRIPT_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"client\.global\.(set|get)\(|client\.test\(|response\.headers\.valueOf\(|response\.(status|headers)\b|response\.body\b((?:\.[A-Za-z_$][\w$]*)*)",
    )
    .expect("valid script call regex")
});

/// 将 .http 文件中的响应脚本转换为宿主脚本写法
///
/// 逐行做文本替换，不认识的行原样保留。
///
/// | 原写法 | 转换后 |
/// |---|---|
/// | `client.global.set(` | `pm.environment.set(` |
/// | `client.global.get(` | `pm.environment.get(` |
/// | `client.test(` | `pm.test(` |
/// | `response.status` | `pm.response.code` |
/// | `response.headers.valueOf(` | `pm.response.headers.get(` |
/// | `response.headers` | `pm.response.headers` |
/// | `response.body.x` | `pm.response.json().x` |
/// | `response.body` | `pm.response.json()` |
pub fn translate_script(script: &str) -> String {
    script
        .lines()
        .map(translate_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn translate_line(line: &str) -> String {
    SCRIPT_CALL
        .replace_all(line, |caps: &Captures| {
            let whole = &caps[0];
            // `foo.response.status` 这类成员访问不是脚本 API
            let start = caps.get(0).map_or(0, |m| m.start());
            if line[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c == '.' || c == '_' || c == '$' || c.is_alphanumeric())
            {
                return whole.to_string();
            }

            if let Some(op) = caps.get(1) {
                return format!("pm.environment.{}(", op.as_str());
            }
            if whole.starts_with("client.test") {
                return "pm.test(".to_string();
            }
            if whole.starts_with("response.headers.valueOf") {
                return "pm.response.headers.get(".to_string();
            }
            if let Some(accessor) = caps.get(2) {
                return match accessor.as_str() {
                    "status" => "pm.response.code".to_string(),
                    _ => "pm.response.headers".to_string(),
                };
            }
            let fields = caps.get(3).map_or("", |m| m.as_str());
            format!("pm.response.json(){}", fields)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_global_set_get() {
        assert_eq!(
            translate_script(r#"client.global.set("token", response.body.token);"#),
            r#"pm.environment.set("token", pm.response.json().token);"#
        );
        assert_eq!(
            translate_script(r#"var id = client.global.get("id");"#),
            r#"var id = pm.environment.get("id");"#
        );
    }

    #[test]
    fn test_translate_test_and_status() {
        let script = r#"client.test("ok", function() {
    client.assert(response.status === 200);
});"#;
        let expected = r#"pm.test("ok", function() {
    client.assert(pm.response.code === 200);
});"#;
        assert_eq!(translate_script(script), expected);
    }

    #[test]
    fn test_translate_headers() {
        assert_eq!(
            translate_script(r#"var ct = response.headers.valueOf("Content-Type");"#),
            r#"var ct = pm.response.headers.get("Content-Type");"#
        );
        assert_eq!(
            translate_script("console.log(response.headers);"),
            "console.log(pm.response.headers);"
        );
    }

    #[test]
    fn test_translate_body_variants() {
        assert_eq!(
            translate_script("var data = response.body;"),
            "var data = pm.response.json();"
        );
        assert_eq!(
            translate_script("var name = response.body.user.name;"),
            "var name = pm.response.json().user.name;"
        );
    }

    #[test]
    fn test_body_prefixed_members_untouched() {
        let script = "var text = response.bodyText;";
        assert_eq!(translate_script(script), script);
    }

    #[test]
    fn test_unknown_lines_pass_through() {
        let script = "let x = 1;\n// comment\nfoo.response.status";
        assert_eq!(translate_script(script), script);
    }
}
