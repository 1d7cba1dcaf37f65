use crate::Result;
use crate::config::{OutputFormat, Settings};
use crate::generator::{HttpGenerator, to_curl};
use crate::model::{AuthType, RequestModel};
use colored::*;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};

/// 将解析结果渲染为指定格式的文本
pub struct RequestFormatter {
    format: OutputFormat,
    color: bool,
    pretty: bool,
}

impl RequestFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: true,
            pretty: true,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            format: settings.output,
            color: settings.color,
            pretty: settings.pretty,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// 单个请求（curl 解析结果）
    pub fn format_one(&self, request: &RequestModel) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.to_json(request),
            _ => self.format_many(std::slice::from_ref(request)),
        }
    }

    /// 多个请求（.http 文件解析结果）
    pub fn format_many(&self, requests: &[RequestModel]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.to_json(requests),
            OutputFormat::Curl => Ok(requests.iter().map(to_curl).collect::<Vec<_>>().join("\n")),
            OutputFormat::Http => Ok(HttpGenerator::generate(requests)),
            OutputFormat::Table => Ok(self.format_table(requests)),
        }
    }

    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    fn format_table(&self, requests: &[RequestModel]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["#", "Name", "Method", "URL", "Body", "Auth"]);

        for (i, request) in requests.iter().enumerate() {
            let method = if self.color {
                self.colorize_method(&request.method)
            } else {
                request.method.clone()
            };
            table.add_row(vec![
                (i + 1).to_string(),
                request.name.clone().unwrap_or_default(),
                method,
                request.url.clone(),
                request.body.kind().to_string(),
                auth_label(request.auth_type()).to_string(),
            ]);
        }

        table.to_string()
    }

    fn colorize_method(&self, method: &str) -> String {
        match method {
            "GET" | "HEAD" | "OPTIONS" => method.green().to_string(),
            "POST" => method.yellow().to_string(),
            "PUT" | "PATCH" => method.blue().to_string(),
            "DELETE" => method.red().to_string(),
            _ => method.to_string(),
        }
    }
}

fn auth_label(kind: AuthType) -> &'static str {
    match kind {
        AuthType::None => "-",
        AuthType::Basic => "basic",
        AuthType::Bearer => "bearer",
        AuthType::Inherit => "inherit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RequestModel {
        let mut req = RequestModel::new();
        req.name = Some("users".to_string());
        req.url = "https://example.com/users".to_string();
        req
    }

    #[test]
    fn test_format_json() {
        let formatter = RequestFormatter::new(OutputFormat::Json);
        let output = formatter.format_one(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["url"], "https://example.com/users");
    }

    #[test]
    fn test_format_curl_lines() {
        let formatter = RequestFormatter::new(OutputFormat::Curl);
        let output = formatter.format_many(&[sample(), sample()]).unwrap();
        assert_eq!(output.lines().count(), 2);
        assert!(output.starts_with("curl 'https://example.com/users'"));
    }

    #[test]
    fn test_format_table() {
        let formatter = RequestFormatter::new(OutputFormat::Table).with_color(false);
        let output = formatter.format_many(&[sample()]).unwrap();
        assert!(output.contains("users"));
        assert!(output.contains("GET"));
        assert!(output.contains("none"));
    }
}
