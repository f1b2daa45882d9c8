use webscribe::{ControlKind, Document, Position, Rect};
use webscribe_recorder::highlight::OVERLAY_LABEL;
use webscribe_recorder::{
    Action, ActionKind, ActionLog, ActionRecorder, CollectorSink, ControlMessage, DomSignal,
    RecorderConfig, SenderId,
};

const OPENER: SenderId = SenderId(1);

fn recorder_for(doc: &Document) -> (ActionRecorder, CollectorSink) {
    let sink = CollectorSink::new();
    // Click feedback is runtime-scheduled; keep these tests synchronous.
    let config = RecorderConfig {
        click_feedback: false,
        ..RecorderConfig::default()
    };
    let recorder = ActionRecorder::with_config(doc.clone(), OPENER, sink.clone(), config);
    (recorder, sink)
}

fn click(node: &webscribe::ElementNode) -> DomSignal {
    DomSignal::Click {
        target: node.as_element(),
        position: Position::new(10.0, 10.0),
    }
}

#[test]
fn full_round_trip() {
    let doc = Document::new("https://example.com/form");
    let button = doc.root().append_child("button");
    button.set_id("go");
    let input = doc.root().append_child("input");
    input.set_classes(&["_x", "generated-1"]);

    let (mut recorder, sink) = recorder_for(&doc);

    recorder.on_message(OPENER, ControlMessage::InitRecording);
    assert!(recorder.is_armed());

    recorder.handle_signal(click(&button));

    input.set_value("hello");
    recorder.handle_signal(DomSignal::ValueCommit(input.as_element()));

    recorder.disarm();
    recorder.handle_signal(click(&button));

    let actions = sink.actions();
    assert_eq!(actions.len(), 3);

    assert_eq!(
        actions[0].kind,
        ActionKind::Navigate {
            url: "https://example.com/form".to_string()
        }
    );
    assert_eq!(
        actions[1].kind,
        ActionKind::Click {
            selector: "#go".to_string()
        }
    );
    // Unstable classes filtered out; the button sibling forces a positional
    // qualifier. The only-child case is covered separately below.
    assert_eq!(
        actions[2].kind,
        ActionKind::Fill {
            selector: "input:nth-child(2)".to_string(),
            value: "hello".to_string()
        }
    );
}

#[test]
fn only_child_input_resolves_to_bare_tag() {
    let doc = Document::new("https://example.com");
    let input = doc.root().append_child("input");
    input.set_classes(&["_x", "generated-1"]);

    let (mut recorder, sink) = recorder_for(&doc);
    recorder.arm();

    input.set_value("hello");
    recorder.handle_signal(DomSignal::ValueCommit(input.as_element()));

    let actions = sink.actions();
    assert_eq!(
        actions.last().unwrap().kind,
        ActionKind::Fill {
            selector: "input".to_string(),
            value: "hello".to_string()
        }
    );
}

#[test]
fn double_arm_is_idempotent() {
    let doc = Document::new("https://example.com");
    let button = doc.root().append_child("button");
    button.set_id("once");

    let (mut recorder, sink) = recorder_for(&doc);
    recorder.on_message(OPENER, ControlMessage::InitRecording);
    recorder.on_message(OPENER, ControlMessage::InitRecording);

    recorder.handle_signal(click(&button));

    let actions = sink.actions();
    let navigates = actions.iter().filter(|a| a.type_name() == "navigate").count();
    let clicks = actions.iter().filter(|a| a.type_name() == "click").count();
    assert_eq!(navigates, 1, "re-arming must not emit a second navigate");
    assert_eq!(clicks, 1, "re-arming must not duplicate observation");
    // One overlay, not two.
    assert_eq!(
        doc.floating_nodes()
            .iter()
            .filter(|n| n.label == OVERLAY_LABEL)
            .count(),
        1
    );
}

#[test]
fn disarm_removes_overlay_and_silences_signals() {
    let doc = Document::new("https://example.com");
    let button = doc.root().append_child("button");
    button.set_id("go");

    let (mut recorder, sink) = recorder_for(&doc);
    recorder.arm();
    assert!(doc
        .floating_nodes()
        .iter()
        .any(|n| n.label == OVERLAY_LABEL));

    recorder.disarm();
    assert!(doc.floating_nodes().is_empty());
    assert!(!recorder.is_armed());

    let before = sink.len();
    recorder.handle_signal(click(&button));
    recorder.handle_signal(DomSignal::ValueCommit(button.as_element()));
    recorder.handle_signal(DomSignal::PointerOver(button.as_element()));
    assert_eq!(sink.len(), before, "no actions after disarm");

    // Disarming again is a no-op.
    recorder.disarm();
}

#[test]
fn unload_forces_disarm() {
    let doc = Document::new("https://example.com");
    let (mut recorder, sink) = recorder_for(&doc);
    recorder.arm();

    recorder.on_unload();
    assert!(!recorder.is_armed());
    assert!(doc.floating_nodes().is_empty());
    assert_eq!(sink.len(), 1); // just the navigate
}

#[test]
fn signals_before_first_arm_are_ignored() {
    let doc = Document::new("https://example.com");
    let button = doc.root().append_child("button");
    button.set_id("go");

    let (mut recorder, sink) = recorder_for(&doc);
    recorder.handle_signal(click(&button));
    assert!(sink.is_empty());
    assert!(!recorder.is_armed());
}

#[test]
fn control_messages_from_non_opener_are_ignored() {
    let doc = Document::new("https://example.com");
    let (mut recorder, sink) = recorder_for(&doc);

    recorder.on_message(SenderId(99), ControlMessage::InitRecording);
    assert!(!recorder.is_armed());
    assert!(sink.is_empty());

    recorder.on_message(OPENER, ControlMessage::InitRecording);
    assert!(recorder.is_armed());

    recorder.on_message(SenderId(99), ControlMessage::StopRecording);
    assert!(recorder.is_armed(), "only the opener may stop the session");

    recorder.on_message(OPENER, ControlMessage::StopRecording);
    assert!(!recorder.is_armed());
}

#[test]
fn emission_preserves_signal_order() {
    let doc = Document::new("https://example.com");
    let first = doc.root().append_child("button");
    first.set_id("first");
    let field = doc.root().append_child("input");
    field.set_id("field");
    let second = doc.root().append_child("button");
    second.set_id("second");

    let (mut recorder, sink) = recorder_for(&doc);
    recorder.arm();

    recorder.handle_signal(click(&first));
    field.set_value("abc");
    recorder.handle_signal(DomSignal::ValueCommit(field.as_element()));
    recorder.handle_signal(click(&second));

    let actions = sink.actions();
    let types: Vec<_> = actions.iter().map(Action::type_name).collect();
    assert_eq!(types, ["navigate", "click", "fill", "click"]);
    assert!(actions.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn select_control_commits_as_select_action() {
    let doc = Document::new("https://example.com");
    let select = doc.root().append_child("select");
    select.set_classes(&["country"]);
    select.set_value("NL");

    let (mut recorder, sink) = recorder_for(&doc);
    recorder.arm();
    recorder.handle_signal(DomSignal::ValueCommit(select.as_element()));

    assert_eq!(
        sink.actions().last().unwrap().kind,
        ActionKind::Select {
            selector: "select.country".to_string(),
            value: "NL".to_string()
        }
    );
}

#[test]
fn value_commit_on_non_input_target_is_dropped() {
    let doc = Document::new("https://example.com");
    let div = doc.root().append_child("div");
    div.set_kind(ControlKind::Other);

    let (mut recorder, sink) = recorder_for(&doc);
    recorder.arm();
    recorder.handle_signal(DomSignal::ValueCommit(div.as_element()));

    assert_eq!(sink.len(), 1); // navigate only
}

#[test]
fn click_on_root_is_dropped_silently() {
    let doc = Document::new("https://example.com");
    let (mut recorder, sink) = recorder_for(&doc);
    recorder.arm();

    recorder.handle_signal(DomSignal::Click {
        target: doc.root().as_element(),
        position: Position::default(),
    });

    assert_eq!(sink.len(), 1, "unresolvable click emits nothing");
    assert!(recorder.is_armed(), "session state is unaffected");
}

#[test]
fn hover_tracking_follows_pointer() {
    let doc = Document::new("https://example.com");
    let button = doc.root().append_child("button");
    button.set_rect(Rect::new(10.0, 20.0, 30.0, 40.0));

    let (mut recorder, _sink) = recorder_for(&doc);
    recorder.arm();

    recorder.handle_signal(DomSignal::PointerOver(button.as_element()));
    let overlay = doc
        .floating_nodes()
        .into_iter()
        .find(|n| n.label == OVERLAY_LABEL)
        .unwrap();
    assert!(overlay.visible);
    assert_eq!(overlay.rect, Rect::new(10.0, 20.0, 30.0, 40.0));

    recorder.handle_signal(DomSignal::PointerOut);
    let overlay = doc
        .floating_nodes()
        .into_iter()
        .find(|n| n.label == OVERLAY_LABEL)
        .unwrap();
    assert!(!overlay.visible);
}

#[test]
fn collected_sequence_renders_to_script() {
    let doc = Document::new("https://example.com");
    let button = doc.root().append_child("button");
    button.set_id("go");

    let (mut recorder, sink) = recorder_for(&doc);
    recorder.arm();
    recorder.handle_signal(click(&button));
    recorder.disarm();

    let mut log = ActionLog::new("smoke");
    for action in sink.actions() {
        log.record(action);
    }
    log.finish();

    let script = log.to_script();
    assert!(script.contains("test('smoke', async ({ page }) => {"));
    assert!(script.contains("await page.goto('https://example.com');"));
    assert!(script.contains("await page.click('#go');"));
}

#[tokio::test]
async fn click_feedback_ripple_is_transient_and_non_blocking() {
    let doc = Document::new("https://example.com");
    let button = doc.root().append_child("button");
    button.set_id("go");

    let sink = CollectorSink::new();
    let config = RecorderConfig {
        ripple_duration: std::time::Duration::from_millis(20),
        ..RecorderConfig::default()
    };
    let mut recorder = ActionRecorder::with_config(doc.clone(), OPENER, sink.clone(), config);
    recorder.arm();
    recorder.handle_signal(click(&button));

    // The action is already emitted, ripple or not.
    assert_eq!(sink.len(), 2);
    assert!(doc
        .floating_nodes()
        .iter()
        .any(|n| n.label == webscribe_recorder::highlight::RIPPLE_LABEL));

    // Disarm while the ripple is still in flight; it completes on its own.
    recorder.disarm();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(doc.floating_nodes().is_empty());
}
