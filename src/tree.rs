use crate::{
    columns::Columns,
    error::{Result, ViewerError},
    table::Table,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node of the collapsible tree, in the shape the D3 viewer reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of nodes in this subtree, itself included
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    root: TreeNode,
}

/// Identity and parent reference of one row, in row order.
struct Link {
    key: String,
    parent: Option<String>,
}

impl Tree {
    /// Rebuild the hierarchy from parent pointers.
    ///
    /// Exactly one row may lack a parent; it becomes the root. Children keep
    /// the order of their rows in the table.
    pub fn new(table: &Table, columns: &Columns) -> Result<Tree> {
        let rows = table.rows();
        let mut index: HashMap<String, usize> = HashMap::with_capacity(rows.len());
        let mut nodes = Vec::with_capacity(rows.len());
        let mut links = Vec::with_capacity(rows.len());

        for row in rows {
            let key = columns.key(row)?;
            if index.contains_key(&key) {
                return Err(ViewerError::DuplicateKey {
                    key,
                    row: row.number,
                });
            }
            index.insert(key.clone(), nodes.len());
            nodes.push(Some(TreeNode {
                name: columns.label(row, &key),
                value: columns.value(table, row)?,
                children: Vec::new(),
            }));
            links.push(Link {
                parent: columns.parent(row),
                key,
            });
        }

        let roots: Vec<usize> = links
            .iter()
            .enumerate()
            .filter(|(_, link)| link.parent.is_none())
            .map(|(i, _)| i)
            .collect();
        let root = match roots.as_slice() {
            [root] => *root,
            [] => return Err(ViewerError::NoRoot),
            _ => {
                return Err(ViewerError::MultipleRoots {
                    keys: roots.iter().map(|&i| links[i].key.clone()).collect(),
                });
            }
        };

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); links.len()];
        for (i, link) in links.iter().enumerate() {
            let Some(parent) = &link.parent else {
                continue;
            };
            let &p = index
                .get(parent)
                .ok_or_else(|| ViewerError::DanglingParent {
                    child: link.key.clone(),
                    parent: parent.clone(),
                })?;
            children[p].push(i);
        }

        let root_key = links[root].key.clone();
        let root = assemble(root, &children, &mut nodes).ok_or(ViewerError::NoRoot)?;
        let size = root.size();
        if size < links.len() {
            // only rows caught in a parent cycle can be cut off from the root
            tracing::warn!(
                unreachable = links.len() - size,
                "some rows are not connected to the root and were left out of the tree"
            );
        }
        tracing::debug!(nodes = size, root = %root_key, "built tree");

        Ok(Tree { root })
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }
}

fn assemble(index: usize, children: &[Vec<usize>], nodes: &mut [Option<TreeNode>]) -> Option<TreeNode> {
    let mut node = nodes[index].take()?;
    node.children = children[index]
        .iter()
        .filter_map(|&child| assemble(child, children, nodes))
        .collect();
    Some(node)
}

#[cfg(test)]
mod test {
    use crate::{
        columns::{ColumnNames, Columns},
        error::ViewerError,
        table::Table,
        tree::{Tree, TreeNode},
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn build(csv: &str, display: Option<&str>, value: Option<&str>) -> crate::Result<Tree> {
        let table = Table::from_csv(csv)?;
        let columns = Columns::resolve(
            &table,
            &ColumnNames {
                from: "id".to_string(),
                to: "parent".to_string(),
                display: display.map(String::from),
                value: value.map(String::from),
                ..Default::default()
            },
        )?;
        Tree::new(&table, &columns)
    }

    /// (child, parent) name pairs, walking the tree depth first.
    fn adjacency(node: &TreeNode, out: &mut Vec<(String, String)>) {
        for child in &node.children {
            out.push((child.name.clone(), node.name.clone()));
            adjacency(child, out);
        }
    }

    #[test]
    fn test_get_tree() {
        let tree = build(
            "id,parent,name\n1,,Root\n2,1,A\n3,1,B\n",
            Some("name"),
            None,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"name": "Root", "children": [{"name": "A"}, {"name": "B"}]})
        );
    }

    #[test]
    fn test_node_count_and_root() {
        let csv = "id,parent\n4,2\n2,1\n1,\n3,1\n5,4\n";
        let tree = build(csv, None, None).unwrap();
        assert_eq!(tree.root().name, "1");
        assert_eq!(tree.root().size(), 5);
        let names: Vec<&str> = tree.root().children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["2", "3"]);
    }

    #[test]
    fn test_json_round_trip() {
        let csv = "id,parent\n1,\n2,1\n3,1\n4,3\n5,3\n6,2\n";
        let tree = build(csv, None, None).unwrap();
        let parsed: TreeNode = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(&parsed, tree.root());

        let mut pairs = Vec::new();
        adjacency(&parsed, &mut pairs);
        pairs.sort();
        let expected: Vec<(String, String)> = [("2", "1"), ("3", "1"), ("4", "3"), ("5", "3"), ("6", "2")]
            .iter()
            .map(|(c, p)| (c.to_string(), p.to_string()))
            .collect();
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_values() {
        let tree = build("id,parent,size\n1,,10\n2,1,\n", None, Some("size")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"name": "1", "value": 10.0, "children": [{"name": "2"}]})
        );
    }

    #[test]
    fn test_malformed_trees() {
        assert!(matches!(
            build("id,parent\n1,\n2,9\n", None, None),
            Err(ViewerError::DanglingParent { .. })
        ));
        assert!(matches!(
            build("id,parent\n1,\n1,1\n", None, None),
            Err(ViewerError::DuplicateKey { row: 2, .. })
        ));
        assert!(matches!(
            build("id,parent\n1,2\n2,1\n", None, None),
            Err(ViewerError::NoRoot)
        ));
        match build("id,parent\n1,\n2,\n3,1\n", None, None) {
            Err(ViewerError::MultipleRoots { keys }) => assert_eq!(keys, vec!["1", "2"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_large_integer_keys() {
        let csv = "id,parent\n1234567890123456789,\n1234567890123456788,1234567890123456789\n";
        let tree = build(csv, None, None).unwrap();
        assert_eq!(tree.root().name, "1234567890123456789");
        assert_eq!(tree.root().children[0].name, "1234567890123456788");
    }

    #[test]
    fn test_cycle_is_left_out() {
        let tree = build("id,parent\n1,\n2,3\n3,2\n4,1\n", None, None).unwrap();
        assert_eq!(tree.root().size(), 2);
    }
}
