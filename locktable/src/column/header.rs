use super::ColumnNode;

/// One cell of a (possibly multi-level) table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub title: String,
    /// Set for leaf headers, `None` for group headers.
    pub data_index: Option<String>,
    pub col_span: usize,
    pub row_span: usize,
}

/// Lay a column tree out as header rows.
///
/// Row `r` holds every node at depth `r`. Groups span their leaves; leaves
/// above the deepest level span the remaining rows.
pub fn header_rows(columns: &[ColumnNode]) -> Vec<Vec<HeaderCell>> {
    let depth = columns.iter().map(ColumnNode::depth).max().unwrap_or(0);
    let mut rows = vec![Vec::new(); depth];
    for column in columns {
        place(column, 0, depth, &mut rows);
    }
    rows
}

fn place(node: &ColumnNode, level: usize, depth: usize, rows: &mut [Vec<HeaderCell>]) {
    match node {
        ColumnNode::Leaf(leaf) => rows[level].push(HeaderCell {
            title: leaf.title.clone(),
            data_index: Some(leaf.data_index.clone()),
            col_span: 1,
            row_span: depth - level,
        }),
        ColumnNode::Group(group) => {
            rows[level].push(HeaderCell {
                title: group.title.clone(),
                data_index: None,
                col_span: node.leaf_count(),
                row_span: 1,
            });
            for child in &group.children {
                place(child, level + 1, depth, rows);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_header_is_one_row() {
        let rows = header_rows(&[ColumnNode::leaf("a"), ColumnNode::leaf("b")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 2);
        assert!(rows[0].iter().all(|cell| cell.row_span == 1));
    }

    #[test]
    fn test_grouped_header_spans() {
        let rows = header_rows(&[
            ColumnNode::leaf("id"),
            ColumnNode::group("name", vec![ColumnNode::leaf("first"), ColumnNode::leaf("last")]),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].data_index.as_deref(), Some("id"));
        assert_eq!(rows[0][0].row_span, 2);
        assert_eq!(rows[0][1].title, "name");
        assert_eq!(rows[0][1].col_span, 2);
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[1][1].data_index.as_deref(), Some("last"));
    }

    #[test]
    fn test_no_columns_no_rows() {
        assert!(header_rows(&[]).is_empty());
    }
}
