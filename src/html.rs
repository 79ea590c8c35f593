use crate::{
    error::{Result, ViewerError},
    tool::DATA_PLACEHOLDER,
};
use std::path::Path;

const DEFAULT_TEMPLATE: &str = include_str!("../data/template.html");

/// HTML page with a single slot for the tree JSON.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Default for Template {
    fn default() -> Self {
        Template {
            source: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl Template {
    pub fn new(source: impl Into<String>) -> Result<Template> {
        let source = source.into();
        let count = source.matches(DATA_PLACEHOLDER).count();
        if count != 1 {
            return Err(ViewerError::Template {
                placeholder: DATA_PLACEHOLDER,
                count,
            });
        }
        Ok(Template { source })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Template> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ViewerError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        Template::new(source)
    }

    /// Substitute the tree JSON verbatim for the placeholder.
    pub fn render(&self, json: &str) -> String {
        self.source.replacen(DATA_PLACEHOLDER, json, 1)
    }
}
