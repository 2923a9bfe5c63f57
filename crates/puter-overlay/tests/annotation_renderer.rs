use pretty_assertions::assert_eq;
use puter_overlay::{
    AnnotationRenderer, AnnotationStyle, DecorationKind, DecorationLayerId, DecorationPlacement,
    DocumentUri, EvaluationEntry, OverlayState, Position, RenderOutcome, Workspace,
    WorkspaceChangeKind,
};
use std::sync::{Arc, Mutex};

const LAYER: DecorationLayerId = DecorationLayerId::EVALUATION_RESULTS;

fn five_line_workspace() -> (Workspace, DocumentUri) {
    let mut workspace = Workspace::new();
    let uri = workspace
        .open_document("file:///calc.txt", "a = 40\nb = 2\n// | a + b\nc\nd")
        .unwrap();
    workspace.set_active_document(&uri).unwrap();
    (workspace, uri)
}

#[test]
fn test_single_annotation_at_end_of_line() {
    let (mut workspace, uri) = five_line_workspace();
    let mut renderer = AnnotationRenderer::new(AnnotationStyle::default());
    let state = OverlayState::from_entries(vec![EvaluationEntry::new(2, "=> 42")]);

    let outcome = renderer.render(&mut workspace, &uri, &state);
    assert_eq!(
        outcome,
        RenderOutcome::Applied {
            shown: 1,
            skipped: 0
        }
    );

    let shown = workspace.decorations_for(&uri, LAYER);
    assert_eq!(shown.len(), 1);
    let deco = &shown[0];
    assert_eq!(deco.text, "=> 42");
    assert_eq!(deco.range.start, Position::new(2, 10));
    assert!(deco.range.is_empty());
    assert_eq!(deco.placement, DecorationPlacement::After);
    assert_eq!(deco.kind, DecorationKind::EvaluationResult);

    // Display only.
    assert_eq!(
        workspace.document_text(&uri).unwrap(),
        "a = 40\nb = 2\n// | a + b\nc\nd"
    );
}

#[test]
fn test_end_of_line_column_is_utf16() {
    let mut workspace = Workspace::new();
    let uri = workspace.open_document("untitled:emoji", "👋 + 1\n").unwrap();
    workspace.set_active_document(&uri).unwrap();
    let mut renderer = AnnotationRenderer::new(AnnotationStyle::default());

    let state = OverlayState::from_entries(vec![EvaluationEntry::new(0, "=> 👋1")]);
    renderer.render(&mut workspace, &uri, &state);

    let shown = workspace.decorations_for(&uri, LAYER);
    assert_eq!(shown[0].range.start, Position::new(0, 6));
}

#[test]
fn test_render_is_idempotent() {
    let (mut workspace, uri) = five_line_workspace();
    let mut renderer = AnnotationRenderer::new(AnnotationStyle::default());
    let state = OverlayState::from_entries(vec![
        EvaluationEntry::new(0, "40"),
        EvaluationEntry::new(1, "2"),
    ]);

    renderer.render(&mut workspace, &uri, &state);
    let once = workspace.decorations_for(&uri, LAYER).to_vec();
    renderer.render(&mut workspace, &uri, &state);
    let twice = workspace.decorations_for(&uri, LAYER).to_vec();

    assert_eq!(once, twice);
    assert_eq!(workspace.decoration_count(&uri), 2);
    // The layer is defined once and reused.
    assert_eq!(workspace.layer_count(), 1);
}

#[test]
fn test_render_replaces_previous_annotations() {
    let (mut workspace, uri) = five_line_workspace();
    let mut renderer = AnnotationRenderer::new(AnnotationStyle::default());

    let first = OverlayState::from_entries(vec![
        EvaluationEntry::new(0, "a"),
        EvaluationEntry::new(1, "b"),
        EvaluationEntry::new(2, "c"),
    ]);
    renderer.render(&mut workspace, &uri, &first);

    let second = OverlayState::from_entries(vec![EvaluationEntry::new(1, "b2")]);
    renderer.render(&mut workspace, &uri, &second);

    let shown = workspace.decorations_for(&uri, LAYER);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].range.start.line, 1);
    assert_eq!(shown[0].text, "b2");

    renderer.render(&mut workspace, &uri, &OverlayState::default());
    assert!(workspace.decorations_for(&uri, LAYER).is_empty());
    assert_eq!(renderer.shown_document(), None);
}

#[test]
fn test_out_of_range_lines_are_skipped_not_clamped() {
    let (mut workspace, uri) = five_line_workspace();
    let mut renderer = AnnotationRenderer::new(AnnotationStyle::default());
    let state = OverlayState::from_entries(vec![
        EvaluationEntry::new(1, "ok"),
        EvaluationEntry::new(5, "gone"),
        EvaluationEntry::new(99, "gone too"),
    ]);

    let outcome = renderer.render(&mut workspace, &uri, &state);
    assert_eq!(
        outcome,
        RenderOutcome::Applied {
            shown: 1,
            skipped: 2
        }
    );
    let shown = workspace.decorations_for(&uri, LAYER);
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].text, "ok");
}

#[test]
fn test_inactive_document_is_a_no_op() {
    let (mut workspace, active) = five_line_workspace();
    let background = workspace.open_document("file:///other.txt", "x\ny").unwrap();
    let mut renderer = AnnotationRenderer::new(AnnotationStyle::default());

    let seen = Arc::new(Mutex::new(Vec::<WorkspaceChangeKind>::new()));
    let seen_clone = Arc::clone(&seen);
    workspace.subscribe(move |change| {
        seen_clone.lock().unwrap().push(change.kind);
    });

    let state = OverlayState::from_entries(vec![EvaluationEntry::new(0, "1")]);
    let outcome = renderer.render(&mut workspace, &background, &state);

    assert_eq!(outcome, RenderOutcome::Inactive);
    assert_eq!(workspace.decoration_count(&background), 0);
    assert_eq!(workspace.decoration_count(&active), 0);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_switching_documents_withdraws_previous_annotations() {
    let (mut workspace, first) = five_line_workspace();
    let second = workspace.open_document("file:///second.txt", "1\n2").unwrap();
    let mut renderer = AnnotationRenderer::new(AnnotationStyle::default());

    let state = OverlayState::from_entries(vec![EvaluationEntry::new(0, "x")]);
    renderer.render(&mut workspace, &first, &state);
    assert_eq!(renderer.shown_document(), Some(&first));

    workspace.set_active_document(&second).unwrap();
    renderer.render(&mut workspace, &second, &state);

    assert_eq!(workspace.decoration_count(&first), 0);
    assert_eq!(workspace.decoration_count(&second), 1);
    assert_eq!(renderer.shown_document(), Some(&second));

    assert!(renderer.withdraw(&mut workspace, &second));
    assert!(!renderer.withdraw(&mut workspace, &second));
    assert_eq!(workspace.decoration_count(&second), 0);
}

#[test]
fn test_restyle_and_dispose() {
    let (mut workspace, uri) = five_line_workspace();
    let mut renderer = AnnotationRenderer::new(AnnotationStyle::default());
    let state = OverlayState::from_entries(vec![EvaluationEntry::new(0, "x")]);
    renderer.render(&mut workspace, &uri, &state);

    let muted = AnnotationStyle {
        color: "#999999".to_string(),
        ..AnnotationStyle::default()
    };
    renderer.restyle(&mut workspace, muted.clone());
    assert_eq!(workspace.layer_style(LAYER), Some(&muted));
    assert_eq!(workspace.layer_count(), 1);
    // Restyling does not drop what is shown.
    assert_eq!(workspace.decoration_count(&uri), 1);

    renderer.dispose(&mut workspace);
    assert_eq!(workspace.layer_count(), 0);
    assert_eq!(workspace.decoration_count(&uri), 0);
}
