//! Integration tests for chat change detection: backlog suppression,
//! panel-rebuild resync, burst capping.

use danmaku_sim::chat::{ChatItem, Cursor};
use danmaku_sim::detector::{ChangeDetector, NEWER_CHAT_LIMIT};

fn item(id: &str, timestamp: &str) -> ChatItem {
    ChatItem {
        id: id.to_string(),
        timestamp: Some(timestamp.to_string()),
        message_html: Some(format!("<span>{id}</span>")),
    }
}

#[test]
fn first_batch_is_backlog() {
    // Pre-existing panel content: the initial notification advances the
    // cursor but must not render.
    let items = vec![
        item("a", "-1:00"),
        item("b", "0:05"),
        item("c", "0:05"),
        item("d", "0:10"),
    ];
    let mut detector = ChangeDetector::new();
    let detection = detector.detect(&items);

    let ids: Vec<&str> = detection.newer.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c", "d"]);
    assert!(!detection.render);
    assert_eq!(
        detector.cursor(),
        &Cursor {
            id: Some("d".into()),
            ord: 10,
        }
    );
}

#[test]
fn rebuilt_panel_resyncs_cursor() {
    // The host re-rendered and appended e (ord 5) positionally after d:
    // ordered by arrival, not by time. Nothing is newer than the cursor,
    // so the cursor resyncs to the last row the panel shows.
    let mut detector = ChangeDetector::new();
    detector.detect(&[
        item("a", "-1:00"),
        item("b", "0:05"),
        item("c", "0:05"),
        item("d", "0:10"),
    ]);

    let detection = detector.detect(&[
        item("a", "-1:00"),
        item("b", "0:05"),
        item("c", "0:05"),
        item("d", "0:10"),
        item("e", "0:05"),
    ]);
    assert!(detection.newer.is_empty());
    assert_eq!(
        detector.cursor(),
        &Cursor {
            id: Some("e".into()),
            ord: 5,
        }
    );
}

#[test]
fn append_only_growth_emits_once() {
    // Normal growth: each row appears in exactly one detection result.
    let mut detector = ChangeDetector::new();
    let mut items = vec![item("a", "0:01")];
    detector.detect(&items);

    let mut seen: Vec<String> = Vec::new();
    for (i, ts) in [("b", "0:02"), ("c", "0:02"), ("d", "0:03")]
        .iter()
        .enumerate()
    {
        items.push(item(ts.0, ts.1));
        let detection = detector.detect(&items);
        assert!(detection.render);
        for chat in &detection.newer {
            assert!(!seen.contains(&chat.id), "duplicate emission of {}", chat.id);
            seen.push(chat.id.clone());
        }
        assert_eq!(seen.len(), i + 1);
    }
    assert_eq!(seen, ["b", "c", "d"]);
}

#[test]
fn burst_is_capped() {
    let items: Vec<ChatItem> = (0..50)
        .map(|i| item(&format!("m{i}"), &format!("0:{:02}", i % 60)))
        .collect();
    let mut detector = ChangeDetector::new();
    let detection = detector.detect(&items);
    assert_eq!(detection.newer.len(), NEWER_CHAT_LIMIT);
    // The cursor stops at the last collected row; the remainder arrives on
    // the next pass.
    assert_eq!(detector.cursor().id.as_deref(), Some("m29"));

    let detection = detector.detect(&items);
    assert_eq!(detection.newer.len(), 20);
    assert_eq!(detection.newer[0].id, "m30");
    assert_eq!(detector.cursor().id.as_deref(), Some("m49"));
}

#[test]
fn same_input_same_output() {
    let items = vec![
        item("a", "0:01"),
        item("b", "0:02"),
        item("c", "0:02"),
        item("d", "0:03"),
    ];
    let mut first = ChangeDetector::new();
    let mut second = ChangeDetector::new();
    let d1 = first.detect(&items);
    let d2 = second.detect(&items);
    assert_eq!(d1.newer, d2.newer);
    assert_eq!(first.cursor(), second.cursor());
}

#[test]
fn cursor_never_regresses_without_resync() {
    // Over a growing panel, the cursor ord is nondecreasing.
    let mut detector = ChangeDetector::new();
    let mut items = Vec::new();
    let mut prev_ord = i64::MIN;
    for i in 0..20 {
        items.push(item(&format!("m{i}"), &format!("{}:{:02}", i / 3, (i % 3) * 20)));
        detector.detect(&items);
        let ord = detector.cursor().ord;
        assert!(ord >= prev_ord, "cursor regressed: {prev_ord} -> {ord}");
        prev_ord = ord;
    }
}

#[test]
fn reset_treats_next_batch_as_backlog() {
    let mut detector = ChangeDetector::new();
    let items = vec![item("a", "0:01"), item("b", "0:02")];
    detector.detect(&items);
    let detection = detector.detect(&[item("a", "0:01"), item("b", "0:02"), item("c", "0:03")]);
    assert!(detection.render);

    detector.reset();
    assert_eq!(detector.cursor(), &Cursor::default());
    let detection = detector.detect(&items);
    assert!(!detection.render);
    assert_eq!(detection.newer.len(), 2);
}
