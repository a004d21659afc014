use std::cmp::max;
use std::fmt;

use super::code::{BitString, CodeTable};
use super::node::{NodeIndex, NodeKind};
use super::tree::HuffmanTree;
use super::Symbol;

const BOX_DRAWINGS_DOUBLE_HORIZONTAL: &str = "═";

/// Draws the tree top down, every leaf labelled with symbol, frequency and
/// code word.
pub struct TreeRenderer<'a> {
    tree: &'a HuffmanTree,
    code_table: &'a CodeTable,
}

pub fn symbol_label(symbol: Symbol) -> String {
    match symbol {
        b'\n' => "\\n".to_string(),
        b' ' => "_".to_string(),
        0 => "NUL".to_string(),
        s if s.is_ascii_graphic() => (s as char).to_string(),
        s => format!("0x{:02X}", s),
    }
}

/// Rendered subtree. `anchor` is the column the parent edge attaches to.
struct Block {
    rows: Vec<String>,
    width: usize,
    anchor: usize,
}

impl Block {
    fn leaf(label: String) -> Self {
        let width = label.chars().count();
        Self {
            rows: vec![label],
            width,
            anchor: width / 2,
        }
    }

    /// Places both children side by side, one column apart, and hangs them
    /// from a junction drawn above that column.
    fn join(left: Block, right: Block) -> Self {
        let width = left.width + 1 + right.width;
        let mut rows = Vec::with_capacity(3 + max(left.rows.len(), right.rows.len()));
        for junction in ["•", "║"] {
            rows.push(format!("{:>w$}{:r$}", junction, "", w = left.width + 1, r = right.width));
        }
        rows.push(format!(
            "{:a$}╔{}╩{}╗{:b$}",
            "",
            BOX_DRAWINGS_DOUBLE_HORIZONTAL.repeat(left.width - left.anchor - 1),
            BOX_DRAWINGS_DOUBLE_HORIZONTAL.repeat(right.anchor),
            "",
            a = left.anchor,
            b = right.width - right.anchor - 1
        ));
        for i in 0..max(left.rows.len(), right.rows.len()) {
            let left_row = left.rows.get(i).map_or("", String::as_str);
            let right_row = right.rows.get(i).map_or("", String::as_str);
            rows.push(format!(
                "{:lw$} {:rw$}",
                left_row,
                right_row,
                lw = left.width,
                rw = right.width
            ));
        }
        Self {
            rows,
            width,
            anchor: left.width,
        }
    }
}

impl<'a> TreeRenderer<'a> {
    pub fn new(tree: &'a HuffmanTree, code_table: &'a CodeTable) -> Self {
        Self { tree, code_table }
    }

    fn leaf_label(&self, symbol: Symbol, frequency: u64) -> String {
        match self.code_table.get(symbol) {
            Some(code_word) => format!(
                "({}:{}:{})",
                symbol_label(symbol),
                frequency,
                BitString(code_word)
            ),
            None => format!("({}:{})", symbol_label(symbol), frequency),
        }
    }

    fn block(&self, index: NodeIndex) -> Block {
        let node = self.tree.node(index);
        match node.kind {
            NodeKind::Leaf { symbol } => Block::leaf(self.leaf_label(symbol, node.frequency)),
            NodeKind::Inner { left, right } => Block::join(self.block(left), self.block(right)),
        }
    }
}

impl fmt::Display for TreeRenderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.block(self.tree.root().index).rows {
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{symbol_label, TreeRenderer};
    use crate::frequency::FrequencyTable;
    use crate::huffman::build_code;

    #[test]
    fn test_symbol_labels() {
        assert_eq!(symbol_label(b'a'), "a");
        assert_eq!(symbol_label(b'\n'), "\\n");
        assert_eq!(symbol_label(b' '), "_");
        assert_eq!(symbol_label(0), "NUL");
        assert_eq!(symbol_label(0x7F), "0x7F");
        assert_eq!(symbol_label(0xE9), "0xE9");
    }

    #[test]
    fn test_render_two_leaves() {
        let table = FrequencyTable::from(b"xy".as_slice());
        let (tree, code_table) = build_code(&table).unwrap();
        let rendered = TreeRenderer::new(&tree, &code_table).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "       •",
                "       ║",
                "   ╔═══╩═══╗",
                "(y:1:0) (x:1:1)",
            ]
        );
    }

    #[test]
    fn test_render_nested_subtree() {
        let table = FrequencyTable::from(b"aabc".as_slice());
        let (tree, code_table) = build_code(&table).unwrap();
        let rendered = TreeRenderer::new(&tree, &code_table).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "                 •",
                "                 ║",
                "        ╔════════╩═══╗",
                "        •         (a:2:1)",
                "        ║",
                "    ╔═══╩════╗",
                "(c:1:00) (b:1:01)",
            ]
        );
    }

    #[test]
    fn test_render_single_leaf() {
        let table = FrequencyTable::from(b"\n\n\n".as_slice());
        let (tree, code_table) = build_code(&table).unwrap();
        let rendered = TreeRenderer::new(&tree, &code_table).to_string();
        assert_eq!(rendered, "(\\n:3:0)\n");
    }

    #[test]
    fn test_render_lists_every_leaf() {
        let table = FrequencyTable::from(b"hello world".as_slice());
        let (tree, code_table) = build_code(&table).unwrap();
        let rendered = TreeRenderer::new(&tree, &code_table).to_string();
        for (symbol, _) in code_table.iter() {
            assert!(
                rendered.contains(&format!("({}:", symbol_label(symbol))),
                "leaf of symbol {} missing in\n{}",
                symbol,
                rendered
            );
        }
    }
}
