use thiserror::Error;

/// Custom error type for hierarchy-viewer operations
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Error reading a file from the filesystem
    #[error("Failed to read file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing an output artifact
    #[error("Failed to write file: {path}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing CSV data
    #[error("Failed to parse CSV")]
    CsvParse(#[from] csv::Error),

    /// Error serializing to JSON
    #[error("Failed to serialize JSON")]
    JsonSerialize(#[from] serde_json::Error),

    /// Error building the graph editor URL
    #[error("Failed to build viewer URL")]
    Url(#[from] url::ParseError),

    /// Two headers collapse to the same case-insensitive name
    #[error("Duplicate column '{name}'")]
    DuplicateColumn { name: String },

    /// A user supplied column name is not in the table
    #[error("'{role}' column not found: {name}")]
    MissingColumn { role: &'static str, name: String },

    /// A row has no child key, so no node identity can be derived
    #[error("Row {row} has an empty key")]
    EmptyKey { row: usize },

    /// Value column holds something that is not a number
    #[error("Row {row}: value '{value}' in column '{column}' is not numeric")]
    NonNumericValue {
        row: usize,
        column: String,
        value: String,
    },

    /// Value scaling has an empty range
    #[error("Cannot scale values: minimum and maximum are both {bound}")]
    DegenerateScale { bound: f64 },

    /// Child key seen twice
    #[error("Duplicate key '{key}' at row {row}")]
    DuplicateKey { key: String, row: usize },

    /// Parent reference without a matching row
    #[error("Row '{child}' references missing parent '{parent}'")]
    DanglingParent { child: String, parent: String },

    /// No row has an empty parent
    #[error("No root row found (every row has a parent)")]
    NoRoot,

    /// More than one row has an empty parent
    #[error("Multiple root rows found: {}", .keys.join(", "))]
    MultipleRoots { keys: Vec<String> },

    /// Template does not carry exactly one data placeholder
    #[error("Template must contain the {placeholder} placeholder exactly once, found {count}")]
    Template {
        placeholder: &'static str,
        count: usize,
    },
}

impl ViewerError {
    /// Errors caused by how the tool was invoked rather than by the data
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ViewerError::MissingColumn { .. } | ViewerError::DuplicateColumn { .. }
        )
    }
}

/// Result type alias for hierarchy-viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;
