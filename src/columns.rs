use crate::{
    error::{Result, ViewerError},
    table::{Cell, Row, Table},
};

/// Column names as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ColumnNames {
    pub from: String,
    pub to: String,
    pub display: Option<String>,
    pub group: Option<String>,
    pub value: Option<String>,
}

/// Column positions validated against a loaded table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    pub from: usize,
    pub to: usize,
    pub display: Option<usize>,
    pub group: Option<usize>,
    pub value: Option<usize>,
}

fn resolve(table: &Table, role: &'static str, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| ViewerError::MissingColumn {
            role,
            name: name.to_string(),
        })
}

fn resolve_optional(table: &Table, role: &'static str, name: Option<&str>) -> Result<Option<usize>> {
    name.map(|name| resolve(table, role, name)).transpose()
}

impl Columns {
    pub fn resolve(table: &Table, names: &ColumnNames) -> Result<Columns> {
        Ok(Columns {
            from: resolve(table, "from", &names.from)?,
            to: resolve(table, "to", &names.to)?,
            display: resolve_optional(table, "display", names.display.as_deref())?,
            group: resolve_optional(table, "group", names.group.as_deref())?,
            value: resolve_optional(table, "value", names.value.as_deref())?,
        })
    }

    /// Child key of a row; an absent or empty key cannot name a node.
    pub fn key(&self, row: &Row) -> Result<String> {
        let key = row.get(self.from).to_string();
        if key.is_empty() {
            return Err(ViewerError::EmptyKey { row: row.number });
        }
        Ok(key)
    }

    pub fn parent(&self, row: &Row) -> Option<String> {
        match row.get(self.to) {
            Cell::Absent => None,
            cell => Some(cell.to_string()),
        }
    }

    /// Display text: the display column when configured, the key otherwise.
    pub fn label(&self, row: &Row, key: &str) -> String {
        match self.display {
            Some(col) => row.get(col).to_string(),
            None => key.to_string(),
        }
    }

    /// Numeric value of a row, `None` when the cell is missing.
    pub fn value(&self, table: &Table, row: &Row) -> Result<Option<f64>> {
        let Some(col) = self.value else {
            return Ok(None);
        };
        match row.get(col) {
            cell @ (Cell::Integer(_) | Cell::Number(_)) => Ok(cell.as_number()),
            Cell::Absent => Ok(None),
            Cell::Text(text) => Err(ViewerError::NonNumericValue {
                row: row.number,
                column: table.columns()[col].name.clone(),
                value: text.clone(),
            }),
        }
    }
}
