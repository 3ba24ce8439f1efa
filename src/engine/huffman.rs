use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::Write as _;

use crate::engine::frequency::FrequencyTable;
use crate::protocol::constants::{PSEUDO_EOF, SYMBOL_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: u16,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn leaf(symbol: u16, weight: u64) -> Self {
        HuffmanNode::Leaf { symbol, weight }
    }

    pub fn merge(left: Self, right: Self) -> Self {
        HuffmanNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } => *weight,
            HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    /// Child reached by `bit`; `None` on a leaf
    pub fn child(&self, bit: bool) -> Option<&HuffmanNode> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }
}

/// Heap slot. Equal weights pop in insertion order.
struct Queued {
    weight: u64,
    seq: usize,
    node: HuffmanNode,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    pub fn build(freqs: &FrequencyTable) -> Self {
        let mut heap = BinaryHeap::new();
        let mut seq = 0;

        for (symbol, weight) in freqs.present() {
            heap.push(Queued { weight, seq, node: HuffmanNode::leaf(symbol, weight) });
            seq += 1;
        }

        // Empty input leaves only the pseudo-EOF; give it a zero-weight partner
        // so the root is always internal.
        if heap.len() == 1 {
            heap.push(Queued { weight: 0, seq, node: HuffmanNode::leaf(0, 0) });
            seq += 1;
        }

        // The pseudo-EOF leaf is always queued, so the heap is never empty
        // here and each merge shrinks it by one.
        loop {
            match (heap.pop(), heap.pop()) {
                (Some(left), Some(right)) => {
                    let node = HuffmanNode::merge(left.node, right.node);
                    heap.push(Queued { weight: node.weight(), seq, node });
                    seq += 1;
                }
                (Some(root), None) => return Self { root: root.node },
                (None, _) => unreachable!("pseudo-EOF leaf missing from the queue"),
            }
        }
    }

    pub fn from_root(root: HuffmanNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        fn walk(node: &HuffmanNode) -> usize {
            match node {
                HuffmanNode::Leaf { .. } => 1,
                HuffmanNode::Internal { left, right, .. } => walk(left) + walk(right),
            }
        }
        walk(&self.root)
    }

    /// Length of the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        fn walk(node: &HuffmanNode) -> usize {
            match node {
                HuffmanNode::Leaf { .. } => 0,
                HuffmanNode::Internal { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }

    pub fn code_table(&self) -> CodeTable {
        let mut codes = vec![None; SYMBOL_COUNT];
        let mut path = Vec::new();

        fn build_codes(node: &HuffmanNode, path: &mut Vec<bool>, codes: &mut [Option<Vec<bool>>]) {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    codes[*symbol as usize] = Some(path.clone());
                }
                HuffmanNode::Internal { left, right, .. } => {
                    path.push(false);
                    build_codes(left, path, codes);
                    path.pop();

                    path.push(true);
                    build_codes(right, path, codes);
                    path.pop();
                }
            }
        }

        build_codes(&self.root, &mut path, &mut codes);
        CodeTable { codes }
    }

    /// Indented outline of the tree, one node per line
    pub fn render(&self) -> String {
        fn walk(node: &HuffmanNode, depth: usize, label: &str, out: &mut String) {
            let indent = "  ".repeat(depth);
            match node {
                HuffmanNode::Leaf { symbol, weight } => {
                    let _ = writeln!(out, "{}{} leaf {} [weight {}]", indent, label, symbol_name(*symbol), weight);
                }
                HuffmanNode::Internal { weight, left, right } => {
                    let _ = writeln!(out, "{}{} internal [weight {}]", indent, label, weight);
                    walk(left, depth + 1, "0", out);
                    walk(right, depth + 1, "1", out);
                }
            }
        }

        let mut out = String::new();
        walk(&self.root, 0, "root", &mut out);
        out
    }
}

/// Printable form of a symbol
pub fn symbol_name(symbol: u16) -> String {
    match symbol {
        PSEUDO_EOF => "EOF".to_string(),
        s if (0x21..0x7f).contains(&s) => format!("'{}' ({:#04x})", s as u8 as char, s),
        s => format!("{:#04x}", s),
    }
}

/// Root-to-leaf bit path for every symbol present in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Vec<bool>>>,
}

impl CodeTable {
    pub fn get(&self, symbol: u16) -> Option<&[bool]> {
        self.codes.get(symbol as usize)?.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &[bool])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_deref().map(|c| (s as u16, c)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_len(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// True when no code is a prefix of another symbol's code
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<_> = self.iter().collect();
        codes.iter().all(|(a, ca)| {
            codes
                .iter()
                .all(|(b, cb)| a == b || !cb.starts_with(ca))
        })
    }
}

/// Render a code as a string of '0' and '1'
pub fn code_string(code: &[bool]) -> String {
    code.iter().map(|&b| if b { '1' } else { '0' }).collect()
}
