use once_cell::sync::Lazy;
use regex::Regex;

/// 反斜杠 + 换行（shell 续行）
static LINE_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\r?\n").expect("valid line continuation regex"));

/// 当前所处的引号状态，三者互斥
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
    /// `$'...'`
    AnsiC,
}

/// 将 shell 风格的命令切分为参数列表
///
/// 支持单引号、双引号、`$'...'` 以及续行。引号未闭合时不报错，
/// 扫描到末尾后直接输出已积累的内容。
pub fn tokenize(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    let input = LINE_CONTINUATION.replace_all(input, " ");

    let mut tokens = Vec::new();
    let mut current = String::new();
    // 区分 "没有 token" 与 "空字符串 token"（例如 `''`）
    let mut in_token = false;
    let mut state = Quote::None;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Quote::None => match c {
                '\'' => {
                    state = Quote::Single;
                    in_token = true;
                }
                '"' => {
                    state = Quote::Double;
                    in_token = true;
                }
                '$' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    state = Quote::AnsiC;
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_token = true;
                }
            },
            Quote::Single | Quote::Double | Quote::AnsiC => {
                let closing = if state == Quote::Double { '"' } else { '\'' };
                if c == closing {
                    state = Quote::None;
                } else if c == '\\' {
                    match chars.next() {
                        Some(next) => push_escape(&mut current, next),
                        None => current.push('\\'),
                    }
                } else {
                    current.push(c);
                }
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}

/// 解码引号内的转义序列；未知转义保留反斜杠
fn push_escape(out: &mut String, c: char) {
    match c {
        'n' => out.push('\n'),
        't' => out.push('\t'),
        'r' => out.push('\r'),
        'b' => out.push('\u{8}'),
        'f' => out.push('\u{c}'),
        'a' => out.push('\u{7}'),
        'v' => out.push('\u{b}'),
        '0' => out.push('\0'),
        '\'' | '"' | '\\' | '$' | '`' => out.push(c),
        _ => {
            out.push('\\');
            out.push(c);
        }
    }
}
