use prompt_injector::guard::ModalGuard;
use prompt_injector::keys::{Key, KeyPress};
use prompt_injector::memory::{MemoryClipboard, MemoryPage};
use prompt_injector::page::Page;
use prompt_injector::picker::{sort_prompts, NavMode, PickerOptions, PickerStep, PromptPicker};
use prompt_injector::prompt::{Category, PromptTemplate};
use std::rc::Rc;

fn prompt(id: &str, title: &str, content: &str) -> PromptTemplate {
    PromptTemplate::new(id, title, content)
}

fn dated(id: &str, pinned: bool, last_modified: Option<&str>) -> PromptTemplate {
    let mut p = prompt(id, id, "");
    p.pinned = Some(pinned);
    p.last_modified = last_modified.map(str::to_string);
    p
}

fn ids<'a>(list: impl Iterator<Item = &'a PromptTemplate>) -> Vec<String> {
    list.map(|p| p.id.clone()).collect()
}

fn library() -> (Vec<PromptTemplate>, Vec<Category>) {
    let mut review = prompt("review", "Code review", "Review this diff");
    review.category_id = "dev".into();
    review.tags = vec!["git".into()];
    review.last_modified = Some("2024-03-01".into());

    let mut mail = prompt("mail", "Polite email", "Write an email to {{who}}");
    mail.category_id = "writing".into();
    mail.last_modified = Some("2024-02-01".into());

    let mut explain = prompt("explain", "Explain", "Explain: ");
    explain.category_id = "dev".into();
    explain.last_modified = Some("2024-01-01".into());

    (
        vec![review, mail, explain],
        vec![Category::new("dev", "Development"), Category::new("writing", "Writing")],
    )
}

fn open(page: &Rc<MemoryPage>, guard: &ModalGuard) -> PromptPicker {
    let (prompts, categories) = library();
    PromptPicker::open(
        prompts,
        categories,
        None,
        PickerOptions::default(),
        page.clone(),
        guard,
    )
    .unwrap()
}

fn key(picker: PromptPicker, k: Key, clipboard: &mut MemoryClipboard) -> PromptPicker {
    match picker.handle_key(&KeyPress::plain(k), clipboard) {
        PickerStep::Open(p) => p,
        other => panic!("picker closed unexpectedly: {other:?}"),
    }
}

#[test]
fn pinned_first_then_most_recent() {
    let mut list = vec![
        dated("a", false, Some("2024-01-01")),
        dated("pinned", true, Some("2023-01-01")),
        dated("b", false, Some("2024-06-01")),
    ];
    sort_prompts(&mut list);
    assert_eq!(ids(list.iter()), vec!["pinned", "b", "a"]);
}

#[test]
fn missing_or_invalid_dates_sort_oldest() {
    let mut list = vec![
        dated("none", false, None),
        dated("bad", false, Some("yesterday")),
        dated("rfc", false, Some("2024-05-01T10:00:00Z")),
        dated("day", false, Some("2024-05-01")),
    ];
    sort_prompts(&mut list);
    assert_eq!(ids(list.iter()), vec!["rfc", "day", "none", "bad"]);
}

#[test]
fn opens_sorted_and_registers_listeners() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let picker = open(&page, &guard);
    assert_eq!(ids(picker.results()), vec!["review", "mail", "explain"]);
    assert_eq!(picker.selected_index(), Some(0));
    assert!(page.live_listeners() > 0);
    assert_eq!(page.live_listeners(), picker.listener_count());
}

#[test]
fn query_matches_title_content_and_tags_case_insensitively() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut picker = open(&page, &guard);

    picker.set_query("EMAIL");
    assert_eq!(ids(picker.results()), vec!["mail"]);
    picker.set_query("explain:");
    assert_eq!(ids(picker.results()), vec!["explain"]);
    picker.set_query("Git");
    assert_eq!(ids(picker.results()), vec!["review"]);
    picker.set_query("nothing matches");
    assert_eq!(picker.result_count(), 0);
    assert_eq!(picker.selected_index(), None);
    picker.set_query("");
    assert_eq!(picker.result_count(), 3);
}

#[test]
fn arrows_wrap_in_both_directions() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut cb = MemoryClipboard::new();
    let mut picker = open(&page, &guard);

    picker = key(picker, Key::ArrowUp, &mut cb);
    assert_eq!(picker.selected_index(), Some(2));
    picker = key(picker, Key::ArrowDown, &mut cb);
    assert_eq!(picker.selected_index(), Some(0));
    picker = key(picker, Key::ArrowDown, &mut cb);
    assert_eq!(picker.highlighted().unwrap().id, "mail");
}

#[test]
fn tab_cycles_categories_and_shift_tab_goes_back() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut cb = MemoryClipboard::new();
    let mut picker = open(&page, &guard);

    picker = key(picker, Key::Tab, &mut cb);
    assert_eq!(picker.category_filter().unwrap().id, "dev");
    assert_eq!(ids(picker.results()), vec!["review", "explain"]);

    picker = key(picker, Key::Tab, &mut cb);
    assert_eq!(picker.category_filter().unwrap().id, "writing");
    assert_eq!(ids(picker.results()), vec!["mail"]);

    picker = key(picker, Key::Tab, &mut cb);
    assert!(picker.category_filter().is_none());
    assert_eq!(picker.result_count(), 3);

    picker = match picker.handle_key(&KeyPress::shift(Key::Tab), &mut cb) {
        PickerStep::Open(p) => p,
        other => panic!("{other:?}"),
    };
    assert_eq!(picker.category_filter().unwrap().id, "writing");
}

#[test]
fn category_and_query_combine() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut cb = MemoryClipboard::new();
    let mut picker = open(&page, &guard);
    picker = key(picker, Key::Tab, &mut cb);
    picker.set_query("review");
    assert_eq!(ids(picker.results()), vec!["review"]);
    picker.set_query("email");
    assert_eq!(picker.result_count(), 0);
}

#[test]
fn enter_selects_highlighted_and_releases_everything() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut cb = MemoryClipboard::new();
    let mut picker = open(&page, &guard);
    picker = key(picker, Key::ArrowDown, &mut cb);

    match picker.handle_key(&KeyPress::plain(Key::Enter), &mut cb) {
        PickerStep::Selected(p) => assert_eq!(p.id, "mail"),
        other => panic!("{other:?}"),
    }
    assert_eq!(page.live_listeners(), 0);
    assert!(!guard.is_held());
}

#[test]
fn enter_with_no_results_keeps_picker_open() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut cb = MemoryClipboard::new();
    let mut picker = open(&page, &guard);
    picker.set_query("zzz");
    let picker = key(picker, Key::Enter, &mut cb);
    assert_eq!(picker.result_count(), 0);
}

#[test]
fn escape_cancels_without_side_effects() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut cb = MemoryClipboard::new();
    let picker = open(&page, &guard);

    let step = picker.handle_key(&KeyPress::plain(Key::Escape), &mut cb);
    assert!(matches!(step, PickerStep::Cancelled));
    assert_eq!(cb.contents(), None);
    assert_eq!(page.live_listeners(), 0);
    assert!(!guard.is_held());
}

#[test]
fn copy_shortcut_copies_raw_content_and_stays_open() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut cb = MemoryClipboard::new();
    let mut picker = open(&page, &guard);
    picker = key(picker, Key::ArrowDown, &mut cb);

    picker = match picker.handle_key(&KeyPress::primary(Key::Char('c')), &mut cb) {
        PickerStep::Open(p) => p,
        other => panic!("{other:?}"),
    };
    assert_eq!(cb.contents().as_deref(), Some("Write an email to {{who}}"));
    assert_eq!(picker.selected_index(), Some(1));
    assert!(guard.is_held());
}

#[test]
fn denied_clipboard_reports_without_closing() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut cb = MemoryClipboard::new();
    cb.deny(true);
    let picker = open(&page, &guard);

    let picker = match picker.handle_key(&KeyPress::primary(Key::Char('c')), &mut cb) {
        PickerStep::Open(p) => p,
        other => panic!("{other:?}"),
    };
    assert!(picker.status().unwrap().contains("clipboard write denied"));
    assert_eq!(cb.contents(), None);
}

#[test]
fn hover_only_applies_in_mouse_mode() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut cb = MemoryClipboard::new();
    let mut picker = open(&page, &guard);

    picker.hover(2);
    assert_eq!(picker.selected_index(), Some(0));

    picker.mouse_moved();
    assert_eq!(picker.nav_mode(), NavMode::Mouse);
    picker.hover(2);
    assert_eq!(picker.selected_index(), Some(2));
    picker.hover(7);
    assert_eq!(picker.selected_index(), Some(2));

    picker = key(picker, Key::ArrowDown, &mut cb);
    assert_eq!(picker.nav_mode(), NavMode::Keyboard);
    assert_eq!(picker.selected_index(), Some(0));
    picker.hover(1);
    assert_eq!(picker.selected_index(), Some(0));
}

#[test]
fn second_picker_cannot_open_while_one_is_open() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let first = open(&page, &guard);
    let (prompts, categories) = library();
    let second = PromptPicker::open(
        prompts,
        categories,
        None,
        PickerOptions::default(),
        page.clone(),
        &guard,
    );
    assert!(second.is_none());
    first.close();
    assert!(!guard.is_held());
    assert_eq!(page.live_listeners(), 0);
}

#[test]
fn outside_click_respects_setting() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let (prompts, categories) = library();
    let options = PickerOptions {
        close_on_outside_click: false,
        ..PickerOptions::default()
    };
    let picker =
        PromptPicker::open(prompts, categories, None, options, page.clone(), &guard).unwrap();
    let picker = match picker.click_outside() {
        PickerStep::Open(p) => p,
        other => panic!("{other:?}"),
    };
    drop(picker);
    assert_eq!(page.live_listeners(), 0);
    assert!(!guard.is_held());

    let picker = open(&page, &guard);
    assert!(matches!(picker.click_outside(), PickerStep::Cancelled));
}

#[test]
fn closing_restores_previous_focus() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let field = page.add_field("input", None, "");
    let (prompts, categories) = library();
    let picker = PromptPicker::open(
        prompts,
        categories,
        Some(field.element()),
        PickerOptions::default(),
        page.clone(),
        &guard,
    )
    .unwrap();
    page.blur();
    picker.close();
    assert_eq!(page.focused(), Some(field.id()));
    assert!(page.active_element().is_some());
}

#[test]
fn registers_only_the_listeners_it_handles() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let picker = open(&page, &guard);
    // keydown, mousemove and mousedown for outside clicks
    assert_eq!(picker.listener_count(), 3);
    picker.close();

    let (prompts, categories) = library();
    let options = PickerOptions {
        close_on_outside_click: false,
        ..PickerOptions::default()
    };
    let picker =
        PromptPicker::open(prompts, categories, None, options, page.clone(), &guard).unwrap();
    assert_eq!(picker.listener_count(), 2);
}
