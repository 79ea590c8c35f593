use crate::error::{Result, ViewerError};
use std::{cmp::Ordering, fmt, path::Path};

/// Field contents treated as missing, in addition to the empty string.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
];

static ABSENT: Cell = Cell::Absent;

/// One cell of the loaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Whole numbers are kept exact so large identifiers survive
    Integer(i64),
    Number(f64),
    Absent,
}

impl Cell {
    pub fn parse(field: &str) -> Cell {
        if field.is_empty() || NA_MARKERS.contains(&field) {
            return Cell::Absent;
        }
        if let Ok(n) = field.parse::<i64>() {
            return Cell::Integer(n);
        }
        match field.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(field.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Integer(n) => Some(*n as f64),
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Ordering used when clustering rows: numbers, then text, then missing cells.
    pub fn sort_cmp(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Integer(a), Cell::Integer(b)) => a.cmp(b),
            (Cell::Integer(_) | Cell::Number(_), Cell::Integer(_) | Cell::Number(_)) => {
                let (a, b) = (self.as_number(), other.as_number());
                a.unwrap_or_default().total_cmp(&b.unwrap_or_default())
            }
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Integer(_) | Cell::Number(_), _) => Ordering::Less,
            (_, Cell::Integer(_) | Cell::Number(_)) => Ordering::Greater,
            (Cell::Text(_), Cell::Absent) => Ordering::Less,
            (Cell::Absent, Cell::Text(_)) => Ordering::Greater,
            (Cell::Absent, Cell::Absent) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(n) => write!(f, "{n}"),
            // integral values print like integers so `1` and `1.0` name the same row
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Absent => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Header as written in the file
    pub name: String,
    /// Upper-cased header used for lookups
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct Row {
    /// 1-based position among the data records
    pub number: usize,
    cells: Vec<Cell>,
}

impl Row {
    pub fn get(&self, column: usize) -> &Cell {
        self.cells.get(column).unwrap_or(&ABSENT)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let csv = std::fs::read_to_string(path).map_err(|source| ViewerError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        Table::from_csv(&csv)
    }

    pub fn from_csv(csv: &str) -> Result<Table> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(csv.as_bytes());

        let mut columns: Vec<Column> = Vec::new();
        for name in rdr.headers()? {
            let key = name.to_uppercase();
            if columns.iter().any(|c| c.key == key) {
                return Err(ViewerError::DuplicateColumn {
                    name: name.to_string(),
                });
            }
            columns.push(Column {
                name: name.to_string(),
                key,
            });
        }

        let mut rows = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            rows.push(Row {
                number: i + 1,
                cells: record.iter().map(Cell::parse).collect(),
            });
        }

        Ok(Table { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Case-insensitive exact lookup of a column position.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let key = name.to_uppercase();
        self.columns.iter().position(|c| c.key == key)
    }
}

#[cfg(test)]
mod test {
    use super::{Cell, Table};
    use pretty_assertions::assert_eq;
    use std::cmp::Ordering;

    #[test]
    fn test_parse_cells() {
        for (field, cell) in [
            ("", Cell::Absent),
            ("NaN", Cell::Absent),
            ("null", Cell::Absent),
            ("42", Cell::Integer(42)),
            ("-7", Cell::Integer(-7)),
            ("1234567890123456789", Cell::Integer(1234567890123456789)),
            ("-1.5", Cell::Number(-1.5)),
            ("inf", Cell::Text("inf".to_string())),
            ("Root", Cell::Text("Root".to_string())),
        ] {
            assert_eq!(Cell::parse(field), cell, "{field:?}");
        }
    }

    #[test]
    fn test_render_numbers() {
        assert_eq!(Cell::Number(1.0).to_string(), "1");
        assert_eq!(Cell::parse("1.0").to_string(), "1");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::parse("1234567890123456789").to_string(), "1234567890123456789");
        assert_eq!(Cell::parse("1").to_string(), Cell::parse("1.0").to_string());
        assert_eq!(Cell::Absent.to_string(), "");
    }

    #[test]
    fn test_sort_order() {
        let mut cells = vec![
            Cell::Absent,
            Cell::Text("b".to_string()),
            Cell::Integer(10),
            Cell::Text("a".to_string()),
            Cell::Number(2.5),
            Cell::Integer(2),
        ];
        cells.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(
            cells,
            vec![
                Cell::Integer(2),
                Cell::Number(2.5),
                Cell::Integer(10),
                Cell::Text("a".to_string()),
                Cell::Text("b".to_string()),
                Cell::Absent,
            ]
        );
        assert_eq!(Cell::Absent.sort_cmp(&Cell::Absent), Ordering::Equal);
    }

    #[test]
    fn test_load_table() {
        let table = Table::from_csv("id,Parent,name\n1,,Root\n2,1,A\n3,1\n").unwrap();
        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.columns()[1].name, "Parent");
        assert_eq!(table.columns()[1].key, "PARENT");
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.column_index("parent"), Some(1));
        assert_eq!(table.column_index("missing"), None);

        let short = &table.rows()[2];
        assert_eq!(short.number, 3);
        assert!(short.get(2).is_absent());
        assert!(table.rows()[0].get(1).is_absent());
    }

    #[test]
    fn test_duplicate_headers() {
        let err = Table::from_csv("id,ID\n1,2\n").unwrap_err();
        assert!(err.is_config());
    }
}
