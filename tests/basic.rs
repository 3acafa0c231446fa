use webrequest::utils::UrlUtils;
use webrequest::RequestBuilder;

#[test]
fn test_version() {
    assert!(!webrequest::VERSION.is_empty());
}

#[test]
fn test_url_utils_adds_scheme() {
    let url = UrlUtils::validate_url("example.com").expect("URL should parse");
    assert_eq!(url.scheme(), "http");
}

#[test]
fn test_documented_get_example() {
    let prepared = RequestBuilder::new()
        .get()
        .target_url("http://example.com/api")
        .and_then(|b| b.add_param("q", "a b"))
        .and_then(|b| b.add_param("n", "1"))
        .expect("builder")
        .prepare()
        .expect("prepared");
    assert_eq!(prepared.url, "http://example.com/api?q=a%20b&n=1");
}
