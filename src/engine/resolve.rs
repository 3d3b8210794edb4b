use std::collections::HashMap;

use crate::model::ThemeEntry;

use super::normalize::normalize_label;

pub const LEVEL_SEPARATOR: char = '\\';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConflict {
    pub code_name: String,
    pub kept_theme: String,
    pub ignored_theme: String,
}

#[derive(Debug, Clone, Default)]
pub struct ThemeIndex {
    by_code: HashMap<String, String>,
    conflicts: Vec<ThemeConflict>,
}

impl ThemeIndex {
    pub fn build(themes: &[ThemeEntry]) -> Self {
        let mut index = Self::default();

        for theme in themes {
            let theme_name = normalize_label(&theme.theme_name);
            if theme_name.is_empty() {
                continue;
            }

            for code in &theme.included_initial_codes {
                let code_name = normalize_label(code);
                if code_name.is_empty() {
                    continue;
                }

                match index.by_code.get(&code_name) {
                    Some(kept) if *kept != theme_name => {
                        let conflict = ThemeConflict {
                            code_name,
                            kept_theme: kept.clone(),
                            ignored_theme: theme_name.clone(),
                        };
                        if !index.conflicts.contains(&conflict) {
                            index.conflicts.push(conflict);
                        }
                    }
                    Some(_) => {}
                    None => {
                        index.by_code.insert(code_name, theme_name.clone());
                    }
                }
            }
        }

        index
    }

    pub fn theme_for(&self, code_name: &str) -> Option<&str> {
        self.by_code.get(code_name).map(String::as_str)
    }

    pub fn conflicts(&self) -> &[ThemeConflict] {
        &self.conflicts
    }
}

pub fn resolve(question_label: &str, code_name: &str, themes: &ThemeIndex) -> String {
    match themes.theme_for(code_name) {
        Some(theme_name) => {
            format!("{question_label}{LEVEL_SEPARATOR}{theme_name}{LEVEL_SEPARATOR}{code_name}")
        }
        None => format!("{question_label}{LEVEL_SEPARATOR}{code_name}"),
    }
}
