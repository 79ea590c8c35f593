use columns::Columns;
use tree::Tree;

pub mod columns;
pub mod dot;
pub mod emit;
mod error;
pub mod html;
pub mod table;
mod tool;
pub mod tree;

pub use columns::ColumnNames;
pub use dot::{GraphOptions, ScaleFloor};
pub use emit::Artifacts;
pub use error::{Result, ViewerError};
pub use html::Template;
pub use table::Table;

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub columns: ColumnNames,
    pub graph: GraphOptions,
    pub template: Template,
}

/// Build the graph, the tree and the viewer page for a loaded table.
///
/// Column names are checked first, so a bad invocation fails before any
/// output is produced.
pub fn generate(table: &Table, options: &Options) -> Result<Artifacts> {
    let columns = Columns::resolve(table, &options.columns)?;

    let dot = dot::to_dot(table, &columns, &options.graph)?;
    let url = dot::graph_url(&dot)?;

    let json = Tree::new(table, &columns)?.to_json()?;
    let html = options.template.render(&json);

    Ok(Artifacts {
        dot,
        url,
        json: columns.value.map(|_| json),
        html,
    })
}

pub fn from_csv(csv: &str, options: &Options) -> Result<Artifacts> {
    generate(&Table::from_csv(csv)?, options)
}
