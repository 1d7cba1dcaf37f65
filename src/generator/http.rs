use crate::model::{RequestBody, RequestModel};
use crate::parser::auth::encode_authorization;
use crate::parser::multipart::extract_boundary;

const DEFAULT_BOUNDARY: &str = "----ReqconvFormBoundary";

pub struct HttpGenerator;

impl HttpGenerator {
    /// Convert a list of requests to .http file content
    pub fn generate(requests: &[RequestModel]) -> String {
        let mut output = String::new();

        for (i, request) in requests.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&Self::format_request(request));
        }

        output
    }

    fn format_request(request: &RequestModel) -> String {
        let mut block = String::new();

        // 1. Separator / Name
        block.push_str(&format!("### {}\n", request.name.as_deref().unwrap_or_default()));

        // 2. Request Line
        block.push_str(&format!("{} {}\n", request.method, request.url));

        // 3. Headers
        let boundary = Self::boundary_for(request);
        for (key, value) in request.headers.iter() {
            if Self::should_skip_header(key) {
                continue;
            }
            if key.eq_ignore_ascii_case("content-type") {
                if let Some(boundary) = boundary.as_deref() {
                    if extract_boundary(value).is_none() {
                        block.push_str(&format!("{}: {}; boundary={}\n", key, value, boundary));
                        continue;
                    }
                }
            }
            block.push_str(&format!("{}: {}\n", key, value));
        }
        if let Some(value) = encode_authorization(&request.auth) {
            block.push_str(&format!("Authorization: {}\n", value));
        }
        if !request.headers.contains("Content-Type") {
            match (&request.body, boundary.as_deref()) {
                (RequestBody::UrlEncoded(_), _) => {
                    block.push_str("Content-Type: application/x-www-form-urlencoded\n")
                }
                (RequestBody::Multipart { .. }, Some(boundary)) => block.push_str(&format!(
                    "Content-Type: multipart/form-data; boundary={}\n",
                    boundary
                )),
                _ => {}
            }
        }

        // 4. Body
        match &request.body {
            RequestBody::None => {}
            RequestBody::Raw(text) => {
                block.push('\n');
                block.push_str(text);
                block.push('\n');
            }
            RequestBody::UrlEncoded(pairs) => {
                block.push('\n');
                let encoded: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                block.push_str(&encoded.join("&"));
                block.push('\n');
            }
            RequestBody::Multipart { fields, files } => {
                let boundary = boundary.as_deref().unwrap_or(DEFAULT_BOUNDARY);
                block.push('\n');
                for (name, value) in fields {
                    block.push_str(&format!(
                        "--{}\nContent-Disposition: form-data; name=\"{}\"\n\n{}\n",
                        boundary, name, value
                    ));
                }
                for (name, path) in files {
                    let filename = path.rsplit(['/', '\\']).next().unwrap_or(path);
                    block.push_str(&format!(
                        "--{}\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\n\n< {}\n",
                        boundary, name, filename, path
                    ));
                }
                block.push_str(&format!("--{}--\n", boundary));
            }
        }

        // 5. Response script
        if let Some(script) = request.post_script.as_deref().filter(|s| !s.trim().is_empty()) {
            block.push_str(&format!("\n> {{%\n{}\n%}}\n", script));
        }

        block
    }

    /// multipart 请求使用已声明的 boundary，没有时使用默认值
    fn boundary_for(request: &RequestModel) -> Option<String> {
        if !matches!(request.body, RequestBody::Multipart { .. }) {
            return None;
        }
        request
            .content_type()
            .and_then(extract_boundary)
            .or_else(|| Some(DEFAULT_BOUNDARY.to_string()))
    }

    fn should_skip_header(name: &str) -> bool {
        name.eq_ignore_ascii_case("content-length")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Auth;

    #[test]
    fn test_generate_get() {
        let mut req = RequestModel::new();
        req.name = Some("List users".to_string());
        req.url = "https://example.com/users".to_string();
        req.headers.append("Accept", "application/json");
        req.headers.append("Content-Length", "0");

        let output = HttpGenerator::generate(&[req]);
        assert_eq!(
            output,
            "### List users\nGET https://example.com/users\nAccept: application/json\n"
        );
    }

    #[test]
    fn test_generate_auth_and_script() {
        let mut req = RequestModel::new();
        req.method = "POST".to_string();
        req.url = "https://example.com/login".to_string();
        req.auth = Auth::Bearer {
            token: "abc".to_string(),
        };
        req.body = RequestBody::Raw("{}".to_string());
        req.post_script = Some("pm.environment.set(\"t\", 1);".to_string());

        let output = HttpGenerator::generate(&[req]);
        assert!(output.contains("Authorization: Bearer abc\n"));
        assert!(output.contains("\n\n{}\n"));
        assert!(output.ends_with("> {%\npm.environment.set(\"t\", 1);\n%}\n"));
    }

    #[test]
    fn test_generate_multipart_adds_boundary() {
        let mut req = RequestModel::new();
        req.method = "POST".to_string();
        req.url = "https://example.com/upload".to_string();
        req.headers.append("Content-Type", "multipart/form-data");
        req.body = RequestBody::Multipart {
            fields: vec![("a".to_string(), "1".to_string())],
            files: vec![("f".to_string(), "./dir/x.txt".to_string())],
        };

        let output = HttpGenerator::generate(&[req]);
        assert!(output.contains(&format!(
            "Content-Type: multipart/form-data; boundary={}\n",
            DEFAULT_BOUNDARY
        )));
        assert!(output.contains("name=\"f\"; filename=\"x.txt\"\n\n< ./dir/x.txt\n"));
        assert!(output.ends_with(&format!("--{}--\n", DEFAULT_BOUNDARY)));
    }
}
