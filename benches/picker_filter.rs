use criterion::{criterion_group, criterion_main, Criterion};
use prompt_injector::guard::ModalGuard;
use prompt_injector::memory::MemoryPage;
use prompt_injector::picker::{PickerOptions, PromptPicker};
use prompt_injector::prompt::{Category, PromptTemplate};
use prompt_injector::{extract_variables, render_template, VariableBindings};

fn library() -> Vec<PromptTemplate> {
    (0..10_000)
        .map(|i| {
            let mut p = PromptTemplate::new(
                format!("{i}"),
                format!("Prompt {i}"),
                format!("Write about {{{{topic}}}} in the style of item {i}"),
            );
            p.category_id = format!("c{}", i % 10);
            p.tags = vec![format!("tag{}", i % 100)];
            p.last_modified = Some(format!("2024-01-{:02}", i % 28 + 1));
            p
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let page = MemoryPage::new();
    let guard = ModalGuard::new();
    let categories = (0..10).map(|i| Category::new(format!("c{i}"), format!("Cat {i}"))).collect();
    let mut picker = PromptPicker::open(
        library(),
        categories,
        None,
        PickerOptions::default(),
        page,
        &guard,
    )
    .expect("picker opens");
    c.bench_function("picker_filter_10k", |b| b.iter(|| picker.set_query("item 9999")));
}

fn bench_render(c: &mut Criterion) {
    let content = "Dear {{name}}, about {{topic}}: {{body}} -- {{name}}".repeat(50);
    let mut bindings = VariableBindings::new();
    for (i, var) in extract_variables(content.as_str()).into_iter().enumerate() {
        bindings.insert(var, format!("value {i}"));
    }
    c.bench_function("render_template", |b| b.iter(|| render_template(&content, &bindings)));
}

criterion_group!(benches, bench_filter, bench_render);
criterion_main!(benches);
