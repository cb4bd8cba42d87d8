use prompt_injector::form::{FormOptions, FormStep, VariableForm};
use prompt_injector::guard::ModalGuard;
use prompt_injector::keys::{Key, KeyPress};
use prompt_injector::memory::MemoryPage;
use prompt_injector::prompt::PromptTemplate;

fn open_form(page: &std::rc::Rc<MemoryPage>, guard: &ModalGuard, content: &str) -> VariableForm {
    let template = PromptTemplate::new("t", "T", content);
    match VariableForm::collect(&template, FormOptions::default(), page.clone(), guard) {
        Some(FormStep::Open(form)) => form,
        other => panic!("expected an open form, got {other:?}"),
    }
}

#[test]
fn template_without_variables_confirms_immediately() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let template = PromptTemplate::new("t", "T", "No placeholders { here }");

    let step = VariableForm::collect(&template, FormOptions::default(), page.clone(), &guard);

    match step {
        Some(FormStep::Confirmed(text)) => assert_eq!(text, "No placeholders { here }"),
        other => panic!("{other:?}"),
    }
    assert_eq!(page.live_listeners(), 0);
    assert!(!guard.is_held());
}

#[test]
fn one_empty_field_per_variable_in_scan_order() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let form = open_form(&page, &guard, "{{b}} {{a}} {{b}} {{ a }}");

    assert_eq!(form.variables(), vec!["b", "a", " a "]);
    assert_eq!(form.value(0), Some(""));
    assert_eq!(form.value(2), Some(""));
    assert_eq!(form.value(3), None);
    assert!(guard.is_held());
    assert_eq!(page.live_listeners(), form.listener_count());
}

#[test]
fn preview_tracks_every_edit() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut form = open_form(&page, &guard, "Dear {{name}}, re: {{topic}}");

    assert_eq!(form.preview(), "Dear {{name}}, re: {{topic}}");
    form.set_value(0, "Ann");
    assert_eq!(form.preview(), "Dear Ann, re: {{topic}}");
    form.set_value(1, "taxes");
    assert_eq!(form.preview(), "Dear Ann, re: taxes");
    form.set_value(0, "");
    assert_eq!(form.preview(), "Dear {{name}}, re: taxes");
}

#[test]
fn submit_chord_confirms_with_current_values() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut form = open_form(&page, &guard, "{{a}}-{{b}}");
    form.set_value(0, "x");
    form.focus_field(1);

    let step = form.handle_key(&KeyPress::primary(Key::Enter));

    match step {
        FormStep::Confirmed(text) => assert_eq!(text, "x-"),
        other => panic!("{other:?}"),
    }
    assert_eq!(page.live_listeners(), 0);
    assert!(!guard.is_held());
}

#[test]
fn plain_enter_and_tab_do_not_submit() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let form = open_form(&page, &guard, "{{a}}");

    let form = match form.handle_key(&KeyPress::plain(Key::Enter)) {
        FormStep::Open(f) => f,
        other => panic!("{other:?}"),
    };
    let mut form = match form.handle_key(&KeyPress::plain(Key::Tab)) {
        FormStep::Open(f) => f,
        other => panic!("{other:?}"),
    };
    form.set_value(0, "line one\nline two");
    assert_eq!(form.confirm(), "line one\nline two");
}

#[test]
fn escape_cancels_and_tears_down() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let form = open_form(&page, &guard, "{{a}}");

    assert!(matches!(
        form.handle_key(&KeyPress::plain(Key::Escape)),
        FormStep::Cancelled
    ));
    assert_eq!(page.live_listeners(), 0);
    assert!(!guard.is_held());
}

#[test]
fn only_one_form_at_a_time() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let _form = open_form(&page, &guard, "{{a}}");
    let template = PromptTemplate::new("u", "U", "{{b}}");
    assert!(VariableForm::collect(&template, FormOptions::default(), page.clone(), &guard).is_none());
}

#[test]
fn focus_field_ignores_out_of_range() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let mut form = open_form(&page, &guard, "{{a}} {{b}}");
    form.focus_field(1);
    form.focus_field(5);
    assert_eq!(form.focused(), 1);
}

#[test]
fn outside_click_cancels_when_enabled() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let form = open_form(&page, &guard, "{{a}}");
    assert!(matches!(form.click_outside(), FormStep::Cancelled));

    let template = PromptTemplate::new("t", "T", "{{a}}");
    let options = FormOptions {
        close_on_outside_click: false,
        ..FormOptions::default()
    };
    let form = match VariableForm::collect(&template, options, page.clone(), &guard) {
        Some(FormStep::Open(f)) => f,
        other => panic!("{other:?}"),
    };
    assert!(matches!(form.click_outside(), FormStep::Open(_)));
}

#[test]
fn cancel_releases_listeners_and_guard() {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let form = open_form(&page, &guard, "{{a}} {{b}}");
    assert!(page.live_listeners() > 0);

    form.cancel();

    assert_eq!(page.live_listeners(), 0);
    assert!(!guard.is_held());
}
