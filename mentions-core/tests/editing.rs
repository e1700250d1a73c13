//! Trigger lifecycle, finalizing mentions and keeping ranges in step with edits

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{color_at, config, engine_with, type_chars};
use mentions_core::{
    AttributeValue, CandidateSearch, Edit, MentionEngine, MentionEvent, MentionListener,
    MentionRange, NewMention, SearchState, SharedEngine, TextBuffer, TextHost, TextRange,
    WeakEngine,
};

fn red() -> Option<AttributeValue> {
    Some(AttributeValue::from("red"))
}

fn black() -> Option<AttributeValue> {
    Some(AttributeValue::from("black"))
}

fn ranges(mentions: &[MentionRange]) -> Vec<(usize, usize)> {
    mentions
        .iter()
        .map(|m| (m.range.start, m.range.length))
        .collect()
}

// ========================================================================
// Search lifecycle
// ========================================================================

#[test]
fn test_typing_trigger_starts_search() {
    let (mut engine, listener) = engine_with("", config());
    type_chars(&mut engine, "@t");

    assert_eq!(
        listener.events(),
        vec![
            MentionEvent::SearchShow {
                trigger: '@',
                query: String::new()
            },
            MentionEvent::SearchUpdate(String::new()),
            MentionEvent::SearchUpdate("t".to_string()),
        ]
    );
    match engine.search_state() {
        SearchState::Searching(candidate) => {
            assert_eq!(candidate.trigger_offset, 0);
            assert_eq!(candidate.query, "t");
        }
        SearchState::Idle => panic!("expected an active search"),
    }
}

#[test]
fn test_space_ends_search() {
    let (mut engine, listener) = engine_with("", config());
    type_chars(&mut engine, "@st");
    listener.clear();

    type_chars(&mut engine, " ");
    assert_eq!(listener.events(), vec![MentionEvent::SearchHide]);
    assert!(!engine.is_searching());

    // typing on does not revive it
    listener.clear();
    type_chars(&mut engine, "x");
    assert!(listener.events().is_empty());
}

#[test]
fn test_space_kept_when_spaces_are_searchable() {
    let (mut engine, listener) = engine_with("", config().with_search_spaces_in_query(true));
    type_chars(&mut engine, "@steven z");

    assert!(engine.is_searching());
    assert_eq!(
        listener.events().last(),
        Some(&MentionEvent::SearchUpdate("steven z".to_string()))
    );
    assert!(!listener.hidden());
}

#[test]
fn test_mid_word_trigger_does_not_search() {
    let (mut engine, listener) = engine_with("", config());
    type_chars(&mut engine, "mail@example");

    assert!(!engine.is_searching());
    assert!(listener.events().is_empty());
}

#[test]
fn test_backspacing_over_trigger_hides_search() {
    let (mut engine, listener) = engine_with("hello ", config());
    type_chars(&mut engine, "@a");
    listener.clear();

    assert!(engine.delete_backward());
    assert_eq!(listener.events(), vec![MentionEvent::SearchUpdate(String::new())]);

    assert!(engine.delete_backward());
    assert_eq!(engine.host().text(), "hello ");
    assert!(!engine.is_searching());
    assert_eq!(listener.events().last(), Some(&MentionEvent::SearchHide));
}

#[test]
fn test_new_trigger_replaces_active_search() {
    let (mut engine, listener) = engine_with("", config().with_search_spaces_in_query(true));
    type_chars(&mut engine, "@ab ");
    listener.clear();

    type_chars(&mut engine, "#");
    // '#' is not a trigger here, the search just continues
    assert_eq!(listener.events(), vec![MentionEvent::SearchUpdate("ab #".to_string())]);

    type_chars(&mut engine, " @");
    let events = listener.events();
    let tail = &events[events.len() - 3..];
    assert_eq!(
        tail,
        &[
            MentionEvent::SearchHide,
            MentionEvent::SearchShow {
                trigger: '@',
                query: String::new()
            },
            MentionEvent::SearchUpdate(String::new()),
        ]
    );
    match engine.search_state() {
        SearchState::Searching(candidate) => assert_eq!(candidate.trigger_offset, 6),
        SearchState::Idle => panic!("expected an active search"),
    }
}

#[test]
fn test_multiple_trigger_characters() {
    let (mut engine, listener) = engine_with("", config().with_triggers(['@', '#']));
    type_chars(&mut engine, "#ru");

    assert_eq!(
        listener.events().first(),
        Some(&MentionEvent::SearchShow {
            trigger: '#',
            query: String::new()
        })
    );
    assert!(engine.is_searching());
}

#[test]
fn test_caret_leaving_span_hides_search() {
    let (mut engine, listener) = engine_with("hi ", config());
    type_chars(&mut engine, "@ste");
    listener.clear();

    // moving inside the span shortens the query
    engine.host_mut().move_left();
    engine.selection_did_change();
    assert_eq!(listener.events(), vec![MentionEvent::SearchUpdate("st".to_string())]);

    engine.host_mut().set_caret(1);
    engine.selection_did_change();
    assert_eq!(listener.events().last(), Some(&MentionEvent::SearchHide));
    assert!(!engine.is_searching());

    // moving back does not restart a search
    listener.clear();
    engine.host_mut().set_caret(7);
    engine.selection_did_change();
    assert!(listener.events().is_empty());
}

// ========================================================================
// Finalizing
// ========================================================================

#[test]
fn test_add_mention_replaces_query() {
    let (mut engine, listener) = engine_with("", config());
    type_chars(&mut engine, "Hey @ste");
    listener.clear();

    let added = engine.add_mention(NewMention::new("Steven Zweier")).unwrap();

    assert_eq!(engine.host().text(), "Hey Steven Zweier");
    assert_eq!(added.range, TextRange::new(4, 13));
    assert_eq!(engine.mentions(), &[added.clone()]);
    assert_eq!(engine.host().caret(), 17);
    assert_eq!(
        listener.events(),
        vec![MentionEvent::SearchHide, MentionEvent::Added(added)]
    );
    assert_eq!(color_at(&engine, 3), black());
    assert_eq!(color_at(&engine, 4), red());
    assert_eq!(color_at(&engine, 16), red());
    assert!(!engine.is_searching());
}

#[test]
fn test_text_after_mention_is_plain() {
    let (mut engine, _) = engine_with("", config());
    type_chars(&mut engine, "@ti");
    engine.add_mention(NewMention::new("Tiffany")).unwrap();

    type_chars(&mut engine, "!");
    assert_eq!(engine.host().text(), "Tiffany!");
    assert_eq!(ranges(engine.mentions()), vec![(0, 7)]);
    assert_eq!(color_at(&engine, 7), black());
}

#[test]
fn test_space_after_mention() {
    let (mut engine, listener) = engine_with("", config().with_space_after_mention(true));
    type_chars(&mut engine, "@ti");
    engine.add_mention(NewMention::new("Tiffany")).unwrap();

    assert_eq!(engine.host().text(), "Tiffany ");
    assert_eq!(ranges(engine.mentions()), vec![(0, 7)]);
    assert_eq!(color_at(&engine, 6), red());
    assert_eq!(color_at(&engine, 7), black());
    assert_eq!(engine.host().caret(), 8);

    listener.clear();
    type_chars(&mut engine, "@");
    assert!(engine.is_searching());
}

#[test]
fn test_add_mention_without_search() {
    let (mut engine, listener) = engine_with("plain text", config());
    assert!(engine.add_mention(NewMention::new("Nobody")).is_none());
    assert_eq!(engine.host().text(), "plain text");
    assert!(listener.events().is_empty());
}

#[test]
fn test_add_mention_keeps_id() {
    let (mut engine, _) = engine_with("", config());
    type_chars(&mut engine, "@a");
    let mention = NewMention::new("Alice");
    let id = mention.id;

    let added = engine.add_mention(mention).unwrap();
    assert_eq!(added.id, id);
}

#[test]
fn test_trigger_inside_mention_does_not_search() {
    let (mut engine, listener) = engine_with("", config());
    type_chars(&mut engine, "@bo");
    engine.add_mention(NewMention::new("@bob")).unwrap();
    listener.clear();

    type_chars(&mut engine, "x");
    assert!(!engine.is_searching());
    assert!(listener.events().is_empty());
}

// ========================================================================
// Edits around tracked mentions
// ========================================================================

#[test]
fn test_typing_before_mention_shifts_it() {
    let (mut engine, listener) = engine_with("Hi Steven", config());
    engine
        .insert_mentions(vec![MentionRange::new("Steven", TextRange::new(3, 6))])
        .unwrap();

    engine.host_mut().set_caret(0);
    type_chars(&mut engine, "Oh, ");

    assert_eq!(engine.host().text(), "Oh, Hi Steven");
    assert_eq!(ranges(engine.mentions()), vec![(7, 6)]);
    assert_eq!(color_at(&engine, 7), red());
    assert!(listener.removed().is_empty());
}

#[test]
fn test_typing_at_mention_start_shifts_it() {
    let (mut engine, _) = engine_with("Hi Steven", config());
    engine
        .insert_mentions(vec![MentionRange::new("Steven", TextRange::new(3, 6))])
        .unwrap();

    engine.host_mut().set_caret(3);
    type_chars(&mut engine, "x");

    assert_eq!(ranges(engine.mentions()), vec![(4, 6)]);
    assert_eq!(color_at(&engine, 3), black());
}

#[test]
fn test_editing_inside_mention_removes_it() {
    let (mut engine, listener) = engine_with("Hi Steven and Tiffany", config());
    engine
        .insert_mentions(vec![
            MentionRange::new("Steven", TextRange::new(3, 6)),
            MentionRange::new("Tiffany", TextRange::new(14, 7)),
        ])
        .unwrap();

    engine.host_mut().set_caret(9);
    assert!(engine.delete_backward());

    assert_eq!(engine.host().text(), "Hi Steve and Tiffany");
    assert_eq!(ranges(engine.mentions()), vec![(13, 7)]);
    let removed = listener.removed();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].display_name, "Steven");
    assert_eq!(removed[0].range, TextRange::new(3, 6));

    // broken mention loses its styling, the other keeps it
    for offset in 3..8 {
        assert_eq!(color_at(&engine, offset), black());
    }
    assert_eq!(color_at(&engine, 13), red());
}

#[test]
fn test_paste_over_two_mentions_removes_both() {
    let (mut engine, listener) = engine_with("Steven, Tiffany, Ann", config());
    engine
        .insert_mentions(vec![
            MentionRange::new("Steven", TextRange::new(0, 6)),
            MentionRange::new("Tiffany", TextRange::new(8, 7)),
            MentionRange::new("Ann", TextRange::new(17, 3)),
        ])
        .unwrap();

    assert!(engine.replace_text(TextRange::new(2, 10), "pasted"));

    assert_eq!(engine.host().text(), "Stpastedany, Ann");
    assert_eq!(ranges(engine.mentions()), vec![(13, 3)]);
    assert_eq!(listener.removed().len(), 2);
}

#[test]
fn test_deleting_everything_resets() {
    let (mut engine, listener) = engine_with("Steven", config());
    engine
        .insert_mentions(vec![MentionRange::new("Steven", TextRange::new(0, 6))])
        .unwrap();

    assert!(engine.replace_text(TextRange::new(0, 6), ""));
    assert!(engine.host().is_empty());
    assert!(engine.mentions().is_empty());
    assert_eq!(listener.removed().len(), 1);
    assert_eq!(engine.host().typing_attributes(), &common::black());
}

#[test]
fn test_external_edit_reported_with_diff() {
    let (mut engine, _) = engine_with("Hi Steven", config());
    engine
        .insert_mentions(vec![MentionRange::new("Steven", TextRange::new(3, 6))])
        .unwrap();

    let before = engine.host().text().to_string();
    engine.host_mut().replace_range(TextRange::new(0, 2), "Hello");
    let edit = Edit::between(&before, engine.host().text());
    engine.text_did_change(edit);

    assert_eq!(ranges(engine.mentions()), vec![(6, 6)]);
}

#[test]
fn test_remove_and_clear_mentions() {
    let (mut engine, listener) = engine_with("Steven and Tiffany", config());
    let steven = MentionRange::new("Steven", TextRange::new(0, 6));
    let tiffany = MentionRange::new("Tiffany", TextRange::new(11, 7));
    engine
        .insert_mentions(vec![steven.clone(), tiffany.clone()])
        .unwrap();

    assert_eq!(engine.mention_at(12), Some(&tiffany));
    assert!(engine.mention_at(8).is_none());

    assert_eq!(engine.remove_mention(steven.id), Some(steven.clone()));
    assert!(engine.remove_mention(steven.id).is_none());
    assert_eq!(color_at(&engine, 0), black());
    assert_eq!(listener.events(), vec![MentionEvent::Removed(steven)]);

    engine.clear_mentions();
    assert!(engine.mentions().is_empty());
    assert_eq!(color_at(&engine, 12), black());
    assert_eq!(listener.removed().len(), 2);
}

#[test]
fn test_finalizing_shifts_later_mentions() {
    let (mut engine, _) = engine_with(" and Tiffany", config());
    engine
        .insert_mentions(vec![MentionRange::new("Tiffany", TextRange::new(5, 7))])
        .unwrap();

    engine.host_mut().set_caret(0);
    type_chars(&mut engine, "@st");
    assert_eq!(ranges(engine.mentions()), vec![(8, 7)]);

    engine.add_mention(NewMention::new("Steven")).unwrap();
    assert_eq!(engine.host().text(), "Steven and Tiffany");
    assert_eq!(ranges(engine.mentions()), vec![(0, 6), (11, 7)]);
}

#[test]
fn test_multibyte_text_uses_character_offsets() {
    let (mut engine, _) = engine_with("Grüße ", config());
    type_chars(&mut engine, "@jö");
    let added = engine.add_mention(NewMention::new("Jörg")).unwrap();

    assert_eq!(engine.host().text(), "Grüße Jörg");
    assert_eq!(added.range, TextRange::new(6, 4));
    assert_eq!(color_at(&engine, 9), red());
}

// ========================================================================
// Listeners calling back into a shared engine
// ========================================================================

/// Completes any `@t` search with "Tiffany", reading the engine first
#[derive(Default)]
struct Completer {
    engine: RefCell<Option<WeakEngine<TextBuffer>>>,
    seen: RefCell<Vec<(usize, SearchState)>>,
}

impl MentionListener for Completer {
    fn on_search_update(&self, query: &str) {
        let Some(engine) = self.engine.borrow().as_ref().and_then(WeakEngine::upgrade) else {
            return;
        };
        let count = engine.borrow().mentions().len();
        let state = engine.borrow().search_state().clone();
        self.seen.borrow_mut().push((count, state));

        if query == "t" {
            engine.update(|e| e.add_mention(NewMention::new("Tiffany")));
        }
    }
}

#[test]
fn test_listener_reads_and_finalizes_from_handler() {
    let mut inner = MentionEngine::new(TextBuffer::from_text("hi "), config()).unwrap();
    let completer = Rc::new(Completer::default());
    inner.set_listener(completer.clone());
    let engine = SharedEngine::new(inner);
    *completer.engine.borrow_mut() = Some(engine.downgrade());

    assert!(engine.update(|e| e.insert_text("@t")));

    let searching = SearchState::Searching(CandidateSearch {
        trigger: '@',
        trigger_offset: 3,
        query: "t".to_string(),
    });
    assert_eq!(*completer.seen.borrow(), vec![(0, searching)]);

    let engine = engine.borrow();
    assert_eq!(engine.host().text(), "hi Tiffany");
    assert_eq!(ranges(engine.mentions()), vec![(3, 7)]);
    assert!(!engine.is_searching());
}

#[test]
fn test_shared_engine_dispatches_in_order() {
    let (inner, listener) = engine_with("", config());
    let engine = SharedEngine::new(inner);

    engine.update(|e| type_chars(e, "@t"));
    engine.update(|e| e.add_mention(NewMention::new("Tiffany")));

    assert_eq!(
        listener.events()[..3],
        [
            MentionEvent::SearchShow {
                trigger: '@',
                query: String::new()
            },
            MentionEvent::SearchUpdate(String::new()),
            MentionEvent::SearchUpdate("t".to_string()),
        ]
    );
    assert!(matches!(
        listener.events()[3..],
        [MentionEvent::SearchHide, MentionEvent::Added(_)]
    ));
}
