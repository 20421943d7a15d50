//! Parse HTTP response header lines into HeadResult.

use super::HeadResult;

/// Parse collected header lines. A status line (`HTTP/...`) starts a new
/// response, so only the headers of the last response after redirects count.
pub(crate) fn parse_headers(lines: &[String]) -> HeadResult {
    let mut result = HeadResult::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            result = HeadResult::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                result.content_length = value.parse::<u64>().ok();
            }
            if name.eq_ignore_ascii_case("etag") {
                let etag = normalize_etag(value);
                result.etag = (!etag.is_empty()).then_some(etag);
            }
        }
    }

    result
}

/// Strip surrounding quotes and any CR/LF from an ETag value.
pub(crate) fn normalize_etag(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect::<String>()
        .trim()
        .trim_matches('"')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_headers_content_length_and_etag() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Length: 12345",
            "ETag: \"0f343b0931126a20f133d67c2b018a3b-37\"",
        ]));
        assert_eq!(r.content_length, Some(12345));
        assert_eq!(r.etag.as_deref(), Some("0f343b0931126a20f133d67c2b018a3b-37"));
    }

    #[test]
    fn parse_headers_case_insensitive_names() {
        let r = parse_headers(&lines(&["content-length: 7", "etag: abc-1"]));
        assert_eq!(r.content_length, Some(7));
        assert_eq!(r.etag.as_deref(), Some("abc-1"));
    }

    #[test]
    fn parse_headers_missing_fields() {
        let r = parse_headers(&lines(&["HTTP/1.1 200 OK", "Server: test"]));
        assert_eq!(r, HeadResult::default());
    }

    #[test]
    fn parse_headers_keeps_only_last_response() {
        let r = parse_headers(&lines(&[
            "HTTP/1.1 302 Found",
            "Location: https://cdn.example.com/a",
            "Content-Length: 0",
            "",
            "HTTP/2 200",
            "etag: \"abc123-2\"",
        ]));
        assert_eq!(r.content_length, None);
        assert_eq!(r.etag.as_deref(), Some("abc123-2"));
    }

    #[test]
    fn normalize_etag_strips_quotes_and_crlf() {
        assert_eq!(normalize_etag("\"abc123-2\"\r\n"), "abc123-2");
        assert_eq!(normalize_etag("abc\r123"), "abc123");
    }

    #[test]
    fn empty_etag_is_absent() {
        let r = parse_headers(&lines(&["ETag: \"\""]));
        assert!(r.etag.is_none());
    }
}
