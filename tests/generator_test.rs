use reqconv::generator::HttpGenerator;
use reqconv::{parse_curl, parse_http_file};

#[test]
fn test_curl_to_http_file_and_back() {
    let original = parse_curl(
        "curl -X PUT 'https://example.com/users/1?notify=true' -H 'Content-Type: application/json' -H 'Authorization: Bearer abc' -d '{\"name\":\"bob\"}'",
    );
    let http = HttpGenerator::generate(std::slice::from_ref(&original));
    let parsed = parse_http_file(&http, None);

    assert_eq!(parsed.len(), 1);
    let request = &parsed[0];
    assert_eq!(request.method, original.method);
    assert_eq!(request.url, original.url);
    assert_eq!(request.headers, original.headers);
    assert_eq!(request.body, original.body);
    assert_eq!(request.auth, original.auth);
    assert_eq!(request.query_params, original.query_params);
}

#[test]
fn test_form_request_to_http_file() {
    let original = parse_curl("curl https://example.com/upload -F note=hi -F doc=@./a/b.pdf");
    let http = HttpGenerator::generate(std::slice::from_ref(&original));
    let parsed = parse_http_file(&http, None);

    assert_eq!(parsed[0].form_fields(), original.form_fields());
    assert_eq!(parsed[0].form_files(), original.form_files());
}

#[test]
fn test_http_file_regenerates_all_blocks() {
    let content = "### one\nGET https://example.com/1\n\n### two\nDELETE https://example.com/2\n";
    let requests = parse_http_file(content, None);
    let regenerated = parse_http_file(&HttpGenerator::generate(&requests), None);
    assert_eq!(requests, regenerated);
}
