/// Placeholder in the HTML template that receives the tree JSON.
pub const DATA_PLACEHOLDER: &str = "\"{{data}}\"";

/// Cluster label for rows whose group cell is empty.
pub const MISSING_GROUP: &str = "<NA>";

/// Input files are CSV; a bare base name gets this extension.
pub const CSV_EXTENSION: &str = "csv";

pub fn key_is_bare_id(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// DOT node identifier for a row key: `n<key>`, quoted when the key is not a plain word.
pub fn node_id(key: &str) -> String {
    if key_is_bare_id(key) {
        format!("n{key}")
    } else {
        format!("\"n{}\"", escape_dot(key))
    }
}

pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
