//! Graphviz DOT rendering of the row set.
//!
//! Rows are turned into an ordered list of [`Block`]s (cluster open/close,
//! nodes, edges) which is rendered and joined once at the end.

use crate::{
    columns::Columns,
    error::{Result, ViewerError},
    table::{Row, Table},
    tool::{MISSING_GROUP, escape_dot, escape_html, node_id},
};
use url::Url;

/// Online editor that renders a DOT graph passed in the `dot` query parameter.
pub const EDITOR_URL: &str = "http://magjac.com/graphviz-visual-editor/";

/// Node size range (inches) used in bubble mode.
pub const SCALE_RANGE: (f64, f64) = (1.0, 3.0);

const NBSP: &str = "&nbsp;";

/// Lower bound of the value range mapped onto [`SCALE_RANGE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScaleFloor {
    /// Anchor the range at 0.0 unless a value is lower
    #[default]
    Zero,
    /// Use the smallest observed value
    Observed,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Draw arrows from parent to child
    pub reverse: bool,
    /// Show every column of the row inside its node
    pub expand_all: bool,
    pub floor: ScaleFloor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Scale {
    min: f64,
    max: f64,
}

impl Scale {
    fn observe(values: impl IntoIterator<Item = f64>, floor: ScaleFloor) -> Result<Scale> {
        let Some((observed_min, max)) = values.into_iter().fold(None, |acc, v| match acc {
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
            None => Some((v, v)),
        }) else {
            return Err(ViewerError::DegenerateScale { bound: 0.0 });
        };
        // only the low end is anchored; the high end is always the largest value
        let min = match floor {
            ScaleFloor::Zero => f64::min(observed_min, 0.0),
            ScaleFloor::Observed => observed_min,
        };
        if max <= min {
            return Err(ViewerError::DegenerateScale { bound: max });
        }
        Ok(Scale { min, max })
    }

    fn size(&self, value: f64) -> f64 {
        let (lo, hi) = SCALE_RANGE;
        lo + (hi - lo) * (value - self.min) / (self.max - self.min)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Label {
    Plain(String),
    Html(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Block {
    ClusterOpen { index: usize, label: String },
    ClusterClose,
    Node {
        id: String,
        label: Label,
        size: Option<(f64, String)>,
        nested: bool,
    },
    Edge { from: String, to: String },
}

impl Block {
    fn render(&self) -> String {
        match self {
            Block::ClusterOpen { index, label } => format!(
                "\tsubgraph cluster{index} {{\n\t\tlabel=\"{}\"",
                escape_dot(label)
            ),
            Block::ClusterClose => "\t}".to_string(),
            Block::Node {
                id,
                label,
                size,
                nested,
            } => {
                let indent = if *nested { "\t\t" } else { "\t" };
                let mut attrs = match label {
                    Label::Plain(text) => format!("label=\"{}\"", escape_dot(text)),
                    Label::Html(html) => format!("label=<{html}>"),
                };
                if let Some((size, raw)) = size {
                    attrs.push_str(&format!(
                        " width=\"{size:.3}\" height=\"{size:.3}\" tooltip=\"{}\"",
                        escape_dot(raw)
                    ));
                }
                format!("{indent}{id} [{attrs}];")
            }
            Block::Edge { from, to } => format!("\t{from} -> {to};"),
        }
    }
}

/// Table label listing every column except the display column.
fn expanded_label(table: &Table, columns: &Columns, row: &Row, title: &str) -> String {
    let mut html = String::from(
        "<table style=\"rounded\" border=\"0\" cellborder=\"0\" cellspacing=\"0\" cellpadding=\"1\">\n",
    );
    html.push_str(&format!(
        "\t\t<tr><td align=\"center\" colspan=\"2\"><font color=\"#000000\"><b>{}</b></font></td></tr>\n",
        escape_html(title)
    ));
    for (i, column) in table.columns().iter().enumerate() {
        if Some(i) == columns.display {
            continue;
        }
        let cell = row.get(i);
        let value = if cell.is_absent() {
            NBSP.to_string()
        } else {
            escape_html(&cell.to_string())
        };
        html.push_str(&format!(
            "\t\t<tr><td align=\"left\"><font color=\"#000000\">{}{NBSP}</font></td>\n\
             \t\t<td align=\"left\"><font color=\"#000000\">{value}</font></td></tr>\n",
            escape_html(&column.name)
        ));
    }
    html.push_str("\t\t</table>");
    html
}

/// Render the table as a Graphviz `digraph`.
pub fn to_dot(table: &Table, columns: &Columns, options: &GraphOptions) -> Result<String> {
    let mut rows: Vec<&Row> = table.rows().iter().collect();
    if let Some(col) = columns.group {
        // clusters are block scoped, so members of a group must be adjacent
        rows.sort_by(|a, b| a.get(col).sort_cmp(b.get(col)));
    }

    let values = rows
        .iter()
        .map(|row| columns.value(table, row))
        .collect::<Result<Vec<_>>>()?;
    let scale = match columns.value {
        Some(_) => Some(Scale::observe(values.iter().flatten().copied(), options.floor)?),
        None => None,
    };
    tracing::debug!(rows = rows.len(), ?scale, "rendering graph");

    let group_of = |row: &Row| {
        columns.group.map(|col| match row.get(col) {
            cell if cell.is_absent() => MISSING_GROUP.to_string(),
            cell => cell.to_string(),
        })
    };
    let mut blocks = Vec::with_capacity(rows.len() * 2 + 2);
    let mut clusters = 0;
    for (i, &row) in rows.iter().enumerate() {
        let key = columns.key(row)?;
        let group = group_of(row);
        if let Some(label) = &group {
            let previous = i.checked_sub(1).and_then(|p| group_of(rows[p]));
            if previous.as_ref() != Some(label) {
                if previous.is_some() {
                    blocks.push(Block::ClusterClose);
                }
                clusters += 1;
                blocks.push(Block::ClusterOpen {
                    index: clusters,
                    label: label.clone(),
                });
            }
        }

        let title = columns.label(row, &key);
        let label = if options.expand_all {
            Label::Html(expanded_label(table, columns, row, &title))
        } else {
            Label::Plain(title)
        };
        let size = scale.zip(values[i]).map(|(scale, value)| {
            let raw = columns
                .value
                .map(|col| row.get(col).to_string())
                .unwrap_or_default();
            (scale.size(value), raw)
        });
        blocks.push(Block::Node {
            id: node_id(&key),
            label,
            size,
            nested: group.is_some(),
        });
    }
    if clusters > 0 {
        blocks.push(Block::ClusterClose);
    }

    for row in &rows {
        let Some(parent) = columns.parent(row) else {
            continue;
        };
        let (child, parent) = (node_id(&columns.key(row)?), node_id(&parent));
        blocks.push(if options.reverse {
            Block::Edge {
                from: parent,
                to: child,
            }
        } else {
            Block::Edge {
                from: child,
                to: parent,
            }
        });
    }

    let node_style = if scale.is_some() {
        "shape=\"circle\" style=\"filled\" color=\"SkyBlue\" fixedsize=\"shape\""
    } else {
        "shape=\"Mrecord\" style=\"filled\" color=\"SkyBlue\""
    };
    let mut lines = vec![
        "digraph d {".to_string(),
        "\tgraph [rankdir=\"LR\"; compound=\"True\" color=\"Gray\"];".to_string(),
        format!("\tnode [{node_style}];"),
    ];
    lines.extend(blocks.iter().map(Block::render));
    lines.push("}\n".to_string());
    Ok(lines.join("\n"))
}

/// Link to the online graph editor with the DOT text in its query string.
pub fn graph_url(dot: &str) -> Result<String> {
    let mut url = Url::parse(EDITOR_URL)?;
    url.query_pairs_mut().append_pair("dot", dot);
    Ok(url.into())
}
