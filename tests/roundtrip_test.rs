use reqconv::{RequestModel, parse_curl, serialize_curl};

fn assert_round_trip(input: &str) {
    let first = parse_curl(input);
    let command = serialize_curl(&first);
    let second = parse_curl(&command);

    assert_eq!(first.method, second.method, "command: {}", command);
    assert_eq!(first.url, second.url, "command: {}", command);
    assert_eq!(first.headers, second.headers, "command: {}", command);
    assert_eq!(first.body, second.body, "command: {}", command);
    assert_eq!(first.auth, second.auth, "command: {}", command);
}

#[test]
fn test_round_trip_simple() {
    assert_round_trip("curl https://example.com");
    assert_round_trip("curl -X DELETE 'https://example.com/items/1?force=true'");
    assert_round_trip("curl -L https://example.com -H 'Accept: */*'");
}

#[test]
fn test_round_trip_json_body() {
    assert_round_trip(
        r#"curl -X POST https://example.com/api -H "Content-Type: application/json" -d '{"name":"it is","list":[1,2]}'"#,
    );
    assert_round_trip(r#"curl https://example.com -d '{"a":"b\nc","d":"e\\f"}'"#);
}

#[test]
fn test_round_trip_single_quote_in_body() {
    assert_round_trip(r#"curl https://example.com -H 'Content-Type: text/plain' -d "it's \"quoted\"""#);
}

#[test]
fn test_round_trip_urlencoded() {
    assert_round_trip("curl https://example.com/login -d 'user=alice&pass=s3cr%26t' --data-urlencode 'note=a b'");
}

#[test]
fn test_round_trip_auth_and_cookies() {
    assert_round_trip("curl https://example.com -u admin:secret -b 'a=1' -b 'b=2'");
    assert_round_trip("curl https://example.com -H 'Authorization: Basic {{user}} {{pass}}'");
    assert_round_trip("curl https://example.com -H 'Authorization: Bearer {{token}}'");
}

#[test]
fn test_round_trip_placeholder_credentials_with_spaces() {
    assert_round_trip("curl https://example.com -u '{{user}}:a b'");
    assert_round_trip("curl https://example.com -H 'Authorization: Basic {{token}}'");
}

#[test]
fn test_round_trip_shell_expansion_characters() {
    let input = r#"curl https://example.com -H 'X-Price: $HOME' -d "it's \$5 `now`""#;
    assert_round_trip(input);

    let command = serialize_curl(&parse_curl(input));
    assert!(command.contains(r#""X-Price: \$HOME""#), "command: {}", command);
    assert!(command.contains(r#""it's \$5 \`now\`""#), "command: {}", command);
}

#[test]
fn test_round_trip_get_flag() {
    assert_round_trip("curl -G https://example.com/search -d q=rust -d page=2");
}

#[test]
fn test_serialize_default_model() {
    assert_eq!(serialize_curl(&RequestModel::new()), "curl ''");
}
