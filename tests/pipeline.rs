use std::collections::HashMap;

use hexpane::buffer::{format_rows, render_text};
use hexpane::codec::{self, HexCase};
use hexpane::config::Config;
use hexpane::host::{
    HostError, Notifier, RawMessage, Severity, Surface, Target, ViewRegistry, WriteBack,
};
use hexpane::http::{self, ParsedMessage};
use hexpane::session::{CommitOutcome, EditSession, Scope};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Recorder {
    written: Option<String>,
    fail: bool,
}

impl WriteBack for Recorder {
    fn write_back(&mut self, raw: &str) -> Result<(), HostError> {
        if self.fail {
            return Err(HostError::Unavailable);
        }
        self.written = Some(raw.to_string());
        Ok(())
    }
}

struct Toasts<'a>(&'a mut Vec<(String, Severity)>);

impl Notifier for Toasts<'_> {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.0.push((message.to_string(), severity));
    }
}

#[test]
fn documented_codec_examples() {
    assert_eq!(codec::hex_to_ascii("48 ZZ 65"), "He");
    assert_eq!(codec::ascii_to_hex("A.B", Some("41 00 42")), "41 00 42");
    assert_eq!(codec::ascii_to_hex("A.B", None), "41 2e 42");
    assert_eq!(http::ensure_crlf("a\nb\r\nc"), "a\r\nb\r\nc");
    assert_eq!(http::parse_http_raw(""), None);
    assert_eq!(http::parse_http_raw("GET / HTTP/1.1\r\nHost: x"), None);
    assert_eq!(
        http::parse_http_raw("GET /p HTTP/1.1\r\nHost: example.com\r\n\r\nbody"),
        Some(ParsedMessage {
            method: "GET".to_string(),
            headers: HashMap::from([("Host".to_string(), "example.com".to_string())]),
            body: "body".to_string(),
        })
    );
}

#[test]
fn every_byte_survives_dump_and_reparse() {
    let bytes: Vec<u8> = (0..=255).collect();
    for chunk in bytes.chunks(16) {
        let rows = format_rows(chunk, HexCase::Upper);
        assert_eq!(rows.len(), 1);
        assert_eq!(codec::parse_hex_greedy(&rows[0].hex()), chunk);
        let preview: String = rows[0]
            .hex_tokens
            .iter()
            .map(|t| codec::hex_to_ascii(t))
            .collect();
        assert_eq!(preview, rows[0].ascii_preview);
    }
}

#[test]
fn dump_text_for_request() {
    let mut session = EditSession::default();
    session.load("GET / HTTP/1.1\r\n\r\n");
    let expected = [
        "00000000  47 45 54 20 2f 20 48 54 54 50 2f 31 2e 31 0d 0a GET / HTTP/1.1..",
        "00000010  0d 0a                                           ..",
    ]
    .join("\n");
    assert_eq!(session.dump_text(), expected);
    assert_eq!(render_text(session.rows()), expected);
}

#[test]
fn registry_to_commit_round_trip() {
    let config = Config {
        scope: Scope::Body,
        ..Config::default()
    };
    let mut registry = ViewRegistry::new();
    registry.register_hex_views(&config);

    let source = RawMessage {
        id: "42".to_string(),
        host: "example.com".to_string(),
        path: "/upload".to_string(),
        raw: Some("POST /upload HTTP/1.1\nHost: example.com\n\n\u{0}\u{1}data".to_string()),
    };
    // LF だけのメッセージには区切りがないので、ボディ判定は通らない
    assert!(registry.views_for(Surface::Replay, &source).is_empty());

    let source = RawMessage {
        raw: source.raw.as_deref().map(http::ensure_crlf),
        ..source
    };
    assert_eq!(
        registry.views_for(Surface::Replay, &source),
        vec!["Request Hex", "Response Hex"]
    );

    let mut view = registry
        .open(Surface::Replay, "Request Hex", &source)
        .unwrap();
    assert_eq!(view.session().rows()[0].ascii_preview, "..data");

    let modal = view.open_modal(0).unwrap();
    modal.set_ascii("..DATA");
    assert_eq!(modal.current_hex, "00 01 44 41 54 41");
    view.apply_modal().unwrap();

    let mut recorder = Recorder::default();
    let mut toasts = Vec::new();
    let outcome = view.commit(&mut recorder, &mut Toasts(&mut toasts));
    let expected = "POST /upload HTTP/1.1\r\nHost: example.com\r\n\r\n\u{0}\u{1}DATA";
    assert_eq!(outcome, CommitOutcome::Committed(expected.to_string()));
    assert_eq!(recorder.written.as_deref(), Some(expected));
    assert_eq!(toasts[0].1, Severity::Success);

    // レスポンスは書き戻せない
    let response = registry
        .open(Surface::Replay, "Response Hex", &source)
        .unwrap();
    let outcome = response.commit(&mut recorder, &mut Toasts(&mut toasts));
    assert_eq!(outcome, CommitOutcome::NotPermitted);
    assert_eq!(response.context().target, Target::Response);
}

#[test]
fn unavailable_host_reports_error() {
    let mut registry = ViewRegistry::new();
    registry.register_hex_views(&Config::default());
    let source = RawMessage {
        raw: Some("PUT / HTTP/1.1\r\n\r\nx".to_string()),
        ..RawMessage::default()
    };
    let view = registry
        .open(Surface::Replay, "Request Hex", &source)
        .unwrap();

    let mut recorder = Recorder {
        fail: true,
        ..Recorder::default()
    };
    let mut toasts = Vec::new();
    let outcome = view.commit(&mut recorder, &mut Toasts(&mut toasts));
    assert_eq!(
        outcome,
        CommitOutcome::Failed("Failed to update request: write-back is not available".to_string())
    );
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].1, Severity::Error);
    assert_eq!(recorder.written, None);
}
