//! Minimal raw HTTP message handling.
//!
//! Only the header/body boundary is located; nothing else about the message is
//! validated.

use std::collections::HashMap;

/// ヘッダとボディの区切り
pub const BOUNDARY: &str = "\r\n\r\n";

/// リクエスト行からメソッドを取り出せない場合の値
pub const UNKNOWN_METHOD: &str = "UNKNOWN";

/// 生テキストから解析したHTTPメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    /// リクエスト行の先頭トークン
    pub method: String,
    /// ヘッダ（受信したままの大文字/小文字）
    pub headers: HashMap<String, String>,
    /// 最初の空行より後ろのすべて
    pub body: String,
}

impl ParsedMessage {
    /// ヘッダを取得（完全一致がなければ大文字小文字を無視して探す）
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.headers.get(name) {
            return Some(value);
        }
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// ボディがあるかどうか
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}

/// ヘッダ部とボディ部に分割（区切りがなければ None）
pub fn split_message(raw: &str) -> Option<(&str, &str)> {
    raw.split_once(BOUNDARY)
}

/// 生テキストを解析
pub fn parse_http_raw(raw: &str) -> Option<ParsedMessage> {
    if raw.is_empty() {
        return None;
    }
    let (head, body) = split_message(raw)?;

    let mut lines = head.split("\r\n");
    let method = lines
        .next()
        .and_then(|line| line.split_whitespace().next())
        .unwrap_or(UNKNOWN_METHOD)
        .to_string();

    let headers = lines
        .filter_map(|line| match line.find(':') {
            Some(idx) if idx > 0 => Some((
                line[..idx].trim().to_string(),
                line[idx + 1..].trim().to_string(),
            )),
            _ => None,
        })
        .collect();

    Some(ParsedMessage {
        method,
        headers,
        body: body.to_string(),
    })
}

/// 改行をすべて CRLF に正規化（既存の CRLF や単独の CR は二重変換しない）
pub fn ensure_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str("\r\n");
            }
            '\n' => out.push_str("\r\n"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_and_unbounded_input_fail() {
        assert_eq!(parse_http_raw(""), None);
        assert_eq!(parse_http_raw("GET / HTTP/1.1\r\nHost: x"), None);
        // LF だけの空行は区切りとみなさない
        assert_eq!(parse_http_raw("GET / HTTP/1.1\nHost: x\n\nbody"), None);
    }

    #[test]
    fn parses_simple_request() {
        let parsed = parse_http_raw("GET /p HTTP/1.1\r\nHost: example.com\r\n\r\nbody").unwrap();
        assert_eq!(parsed.method, "GET");
        assert_eq!(
            parsed.headers,
            HashMap::from([("Host".to_string(), "example.com".to_string())])
        );
        assert_eq!(parsed.body, "body");
    }

    #[test]
    fn skips_malformed_header_lines() {
        let raw = "POST /x HTTP/1.1\r\nno colon here\r\n: empty-name\r\n  X-Pad :  v : w  \r\n\r\n";
        let parsed = parse_http_raw(raw).unwrap();
        assert_eq!(parsed.method, "POST");
        assert_eq!(parsed.headers.len(), 1);
        assert_eq!(parsed.header("X-Pad"), Some("v : w"));
        assert!(!parsed.has_body());
    }

    #[test]
    fn blank_request_line_is_unknown_method() {
        let parsed = parse_http_raw("\r\nHost: a\r\n\r\n").unwrap();
        assert_eq!(parsed.method, UNKNOWN_METHOD);
        assert_eq!(parsed.header("host"), Some("a"));
    }

    #[test]
    fn body_keeps_inner_blank_lines() {
        let parsed = parse_http_raw("PUT / HTTP/1.1\r\n\r\na\r\n\r\nb\r\n\r\n").unwrap();
        assert_eq!(parsed.body, "a\r\n\r\nb\r\n\r\n");
    }

    #[test]
    fn header_lookup_prefers_exact_case() {
        let raw = "GET / HTTP/1.1\r\nhost: lower\r\nHost: upper\r\n\r\n";
        let parsed = parse_http_raw(raw).unwrap();
        assert_eq!(parsed.header("Host"), Some("upper"));
        assert_eq!(parsed.header("host"), Some("lower"));
        assert_eq!(parsed.header("Accept"), None);
    }

    #[test]
    fn crlf_normalization() {
        assert_eq!(ensure_crlf("a\nb\r\nc"), "a\r\nb\r\nc");
        assert_eq!(ensure_crlf(&ensure_crlf("a\nb\r\nc")), "a\r\nb\r\nc");
        assert_eq!(ensure_crlf("a\rb"), "a\rb");
        assert_eq!(ensure_crlf("\n\n"), "\r\n\r\n");
        assert_eq!(ensure_crlf("x\r\r\ny"), "x\r\r\ny");
    }
}
