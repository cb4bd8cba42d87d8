use crate::template::extract_variables;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const PROMPTS_FILE: &str = "prompts.json";
pub const CATEGORIES_FILE: &str = "categories.json";

/// A stored prompt. Owned by the store; the injector only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

fn default_enabled() -> bool {
    true
}

impl PromptTemplate {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            enabled: true,
            category_id: String::new(),
            pinned: None,
            notes: None,
            last_modified: None,
            sort_order: None,
        }
    }

    /// Variables referenced by the current `content`. Always rescanned.
    pub fn parsed_variables(&self) -> Vec<String> {
        extract_variables(self.content.as_str())
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.unwrap_or(false)
    }

    /// `lastModified` as a timestamp. Accepts RFC 3339 or a bare `YYYY-MM-DD`.
    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_modified.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Read-only view of the prompt records the picker needs.
pub trait PromptStore {
    fn enabled_prompts(&self) -> anyhow::Result<Vec<PromptTemplate>>;
    fn categories(&self) -> anyhow::Result<Vec<Category>>;
}

/// Load all prompts from the JSON file at `path`.
pub fn load_prompts(path: &str) -> anyhow::Result<Vec<PromptTemplate>> {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let list: Vec<PromptTemplate> = serde_json::from_str(&content)?;
    Ok(list)
}

/// Persist `prompts` to `path`.
pub fn save_prompts(path: &str, prompts: &[PromptTemplate]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(prompts)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_categories(path: &str) -> anyhow::Result<Vec<Category>> {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let list: Vec<Category> = serde_json::from_str(&content)?;
    Ok(list)
}

pub fn save_categories(path: &str, categories: &[Category]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(categories)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Store backed by the prompt and category JSON files.
#[derive(Debug, Clone)]
pub struct JsonPromptStore {
    prompts_path: String,
    categories_path: String,
}

impl JsonPromptStore {
    pub fn new(prompts_path: impl Into<String>, categories_path: impl Into<String>) -> Self {
        Self {
            prompts_path: prompts_path.into(),
            categories_path: categories_path.into(),
        }
    }

    pub fn from_settings(settings: &crate::settings::Settings) -> Self {
        Self::new(settings.prompts_file.clone(), settings.categories_file.clone())
    }
}

impl Default for JsonPromptStore {
    fn default() -> Self {
        Self::new(PROMPTS_FILE, CATEGORIES_FILE)
    }
}

impl PromptStore for JsonPromptStore {
    fn enabled_prompts(&self) -> anyhow::Result<Vec<PromptTemplate>> {
        let list = load_prompts(&self.prompts_path)?;
        Ok(list.into_iter().filter(|p| p.enabled).collect())
    }

    fn categories(&self) -> anyhow::Result<Vec<Category>> {
        load_categories(&self.categories_path)
    }
}

/// Store over records the host already holds in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticPromptStore {
    pub prompts: Vec<PromptTemplate>,
    pub categories: Vec<Category>,
}

impl StaticPromptStore {
    pub fn new(prompts: Vec<PromptTemplate>, categories: Vec<Category>) -> Self {
        Self { prompts, categories }
    }
}

impl PromptStore for StaticPromptStore {
    fn enabled_prompts(&self) -> anyhow::Result<Vec<PromptTemplate>> {
        Ok(self.prompts.iter().filter(|p| p.enabled).cloned().collect())
    }

    fn categories(&self) -> anyhow::Result<Vec<Category>> {
        Ok(self.categories.clone())
    }
}

impl<S: PromptStore + ?Sized> PromptStore for std::rc::Rc<S> {
    fn enabled_prompts(&self) -> anyhow::Result<Vec<PromptTemplate>> {
        (**self).enabled_prompts()
    }

    fn categories(&self) -> anyhow::Result<Vec<Category>> {
        (**self).categories()
    }
}

impl<S: PromptStore> PromptStore for std::cell::RefCell<S> {
    fn enabled_prompts(&self) -> anyhow::Result<Vec<PromptTemplate>> {
        self.borrow().enabled_prompts()
    }

    fn categories(&self) -> anyhow::Result<Vec<Category>> {
        self.borrow().categories()
    }
}
