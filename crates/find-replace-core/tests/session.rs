use find_replace_core::{
    DEFAULT_HISTORY_CAPACITY, Document, PatternOptions, SearchAction, SearchMode, SearchRequest,
    SearchScope, SearchSession, SessionConfig, SessionState, TextBuffer, TextRange,
};
use pretty_assertions::assert_eq;

const FIND_ALL: SearchAction = SearchAction::FindAll {
    mark: false,
    highlight: false,
};
const HIGHLIGHT_ALL: SearchAction = SearchAction::FindAll {
    mark: false,
    highlight: true,
};

fn run(
    session: &mut SearchSession,
    doc: &mut Document,
    request: &SearchRequest,
    action: SearchAction,
) -> String {
    session
        .execute(doc, request, action)
        .unwrap()
        .unwrap_or_default()
}

#[test]
fn test_history_keeps_most_recent_entries() {
    let mut doc = Document::new("text");
    let mut session = SearchSession::new();
    for i in 0..12 {
        run(&mut session, &mut doc, &SearchRequest::new(format!("q{i}")), SearchAction::FindNext);
    }

    let history = session.find_history();
    assert_eq!(history.len(), DEFAULT_HISTORY_CAPACITY);
    assert_eq!(history.latest(), Some("q11"));
    assert_eq!(history.entries().last().map(String::as_str), Some("q2"));
}

#[test]
fn test_history_moves_repeated_entry_to_front() {
    let mut doc = Document::new("a b");
    let mut session = SearchSession::with_config(SessionConfig { history_capacity: 3 });
    for text in ["a", "b", "a"] {
        run(&mut session, &mut doc, &SearchRequest::new(text), SearchAction::FindNext);
    }
    assert_eq!(session.find_history().entries(), ["a".to_string(), "b".to_string()]);

    session.clear_history();
    assert!(session.find_history().is_empty());
}

#[test]
fn test_extended_mode_finds_control_characters() {
    let mut doc = Document::new("one\ttwo\tthree");
    let mut session = SearchSession::new();
    let request = SearchRequest::new(r"\t")
        .with_replacement(r"\n")
        .with_mode(SearchMode::Extended);

    assert_eq!(
        run(&mut session, &mut doc, &request, SearchAction::ReplaceAll),
        "Total replaced: 2"
    );
    assert_eq!(doc.text(), "one\ntwo\nthree");
    assert_eq!(session.find_history().latest(), Some(r"\t"));
    assert_eq!(session.replace_history().latest(), Some(r"\n"));
}

#[test]
fn test_pattern_mode_replace_all_with_groups() {
    let mut doc = Document::new("John Smith\nJane Doe");
    let mut session = SearchSession::new();
    let request = SearchRequest::new(r"(\w+) (\w+)")
        .with_replacement("$2, $1")
        .with_mode(SearchMode::Pattern(PatternOptions::default()));

    assert_eq!(
        run(&mut session, &mut doc, &request, SearchAction::ReplaceAll),
        "Total replaced: 2"
    );
    assert_eq!(doc.text(), "Smith, John\nDoe, Jane");
}

#[test]
fn test_whole_word_and_case_flags() {
    let mut doc = Document::new("Foo food foo");
    let mut session = SearchSession::new();

    let request = SearchRequest::new("foo").with_flags(true, true);
    assert_eq!(
        run(&mut session, &mut doc, &request, HIGHLIGHT_ALL),
        "Total found: 1"
    );

    let request = SearchRequest::new("foo").with_flags(false, false);
    assert_eq!(
        run(&mut session, &mut doc, &request, HIGHLIGHT_ALL),
        "Total found: 3"
    );
}

#[test]
fn test_no_wrap_stops_at_last_match() {
    let mut doc = Document::new("x y x");
    let mut session = SearchSession::new();
    let request = SearchRequest::new("x").with_wrap(false);

    assert_eq!(run(&mut session, &mut doc, &request, SearchAction::FindNext), "1 out of 2 matches");
    assert_eq!(run(&mut session, &mut doc, &request, SearchAction::FindNext), "2 out of 2 matches");
    assert_eq!(run(&mut session, &mut doc, &request, SearchAction::FindNext), "Match not found");
}

#[test]
fn test_explicit_range_scope() {
    let mut doc = Document::new("x x x x");
    let mut session = SearchSession::new();
    let request = SearchRequest::new("x")
        .with_replacement("y")
        .with_scope(SearchScope::Range(TextRange::new(2, 5)));

    assert_eq!(
        run(&mut session, &mut doc, &request, SearchAction::ReplaceAll),
        "Total replaced: 2"
    );
    assert_eq!(doc.text(), "x y y x");
}

#[test]
fn test_external_edit_requires_invalidate() {
    let mut doc = Document::new("a a");
    let mut session = SearchSession::new();
    let request = SearchRequest::new("a").with_scope(SearchScope::Range(TextRange::new(0, 3)));

    run(&mut session, &mut doc, &request, FIND_ALL);
    assert_eq!(session.current_results().len(), 2);

    doc.edit(TextRange::new(1, 2), "a");
    run(&mut session, &mut doc, &request, FIND_ALL);
    assert_eq!(session.current_results().len(), 2);

    session.invalidate();
    assert_eq!(session.state(), SessionState::Stale);
    assert_eq!(
        run(&mut session, &mut doc, &request, FIND_ALL),
        "Total found: 3"
    );
}

#[test]
fn test_replace_walks_through_matches() {
    let mut doc = Document::new("red green red blue red");
    let mut session = SearchSession::new();
    let request = SearchRequest::new("red")
        .with_replacement("RED")
        .with_flags(true, false);

    // The first call only selects.
    run(&mut session, &mut doc, &request, SearchAction::Replace);
    assert_eq!(doc.selection(), TextRange::new(0, 3));

    for _ in 0..3 {
        run(&mut session, &mut doc, &request, SearchAction::Replace);
    }
    assert_eq!(doc.text(), "RED green RED blue RED");
    assert_eq!(
        run(&mut session, &mut doc, &request, SearchAction::Replace),
        "Match not found"
    );
}
