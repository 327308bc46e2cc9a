//! Token lattice over utterance positions.
//!
//! `edge_lists[i]` holds every candidate reading starting at word `i`; a
//! tokenization is a path from position 0 to the end:
//!
//! ```text
//!  0        1        2        3
//!  half ─── and ──── half ──► end
//!  └──── OPTION(half and half) ─┘
//! ```
//!
//! A path's weight is the sum of `score * length` over its edges, so a
//! confident multi-word reading outweighs the words read separately.
//! `UNKNOWN` fillers weigh 0: they keep the lattice connected without ever
//! winning over a real reading.

use super::dedup::EdgeKey;
use crate::{Span, Spanned, Token};
use std::collections::HashMap;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub token: Token,
    pub score: f64,
    /// Number of words covered.
    pub length: usize,
}

impl Edge {
    pub fn new(token: Token, score: f64, length: usize) -> Self {
        Edge { token, score, length }
    }

    /// Zero-score single-word edge for a word nothing else explains.
    pub fn filler(text: &str) -> Self {
        Edge { token: Token::Unknown { text: text.to_string() }, score: 0.0, length: 1 }
    }

    pub fn is_filler(&self) -> bool {
        matches!(self.token, Token::Unknown { .. })
    }

    fn weight(&self) -> f64 {
        self.score * self.length as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub edge_lists: Vec<Vec<Edge>>,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    position: usize,
    choice: usize,
}

impl Graph {
    /// Empty lattice over `positions` words.
    pub fn new(positions: usize) -> Self {
        Graph { edge_lists: vec![Vec::new(); positions] }
    }

    /// Single-path lattice reading each token as one word with score 1.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        Graph { edge_lists: tokens.iter().map(|t| vec![Edge::new(t.clone(), 1.0, 1)]).collect() }
    }

    pub fn len(&self) -> usize {
        self.edge_lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_lists.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_lists.iter().map(Vec::len).sum()
    }

    pub fn add_edge(&mut self, start: usize, edge: Edge) {
        if let Some(edges) = self.edge_lists.get_mut(start) {
            edges.push(edge);
        }
    }

    /// Drop edges scoring below `threshold` and duplicate readings, keeping the
    /// best-scoring copy of each. Fillers are kept whatever their score.
    pub fn filter(&self, threshold: f64) -> Graph {
        let end = self.len();
        let edge_lists = self
            .edge_lists
            .iter()
            .enumerate()
            .map(|(start, edges)| {
                let mut kept: Vec<Edge> = Vec::new();
                let mut seen: HashMap<EdgeKey, usize> = HashMap::new();
                for edge in edges {
                    if edge.length == 0 || start + edge.length > end {
                        continue;
                    }
                    if edge.score < threshold && !edge.is_filler() {
                        continue;
                    }
                    let key = EdgeKey::new(start, edge.length, &edge.token);
                    match seen.get(&key) {
                        Some(&slot) if kept[slot].score >= edge.score => {}
                        Some(&slot) => kept[slot] = edge.clone(),
                        None => {
                            seen.insert(key, kept.len());
                            kept.push(edge.clone());
                        }
                    }
                }
                kept
            })
            .collect();
        Graph { edge_lists }
    }

    /// Sub-lattice over `span`, keeping edges that lie inside it and whose
    /// token passes `admit`. Every position gets a filler so that dropping a
    /// reading never disconnects the sub-lattice.
    pub fn restrict(&self, span: Span, admit: impl Fn(&Token) -> bool) -> Graph {
        let end = span.end().min(self.len());
        let start = span.start.min(end);
        let mut graph = Graph::new(end - start);
        for position in start..end {
            for edge in &self.edge_lists[position] {
                if position + edge.length <= end && admit(&edge.token) {
                    graph.add_edge(position - start, edge.clone());
                }
            }
            if !graph.edge_lists[position - start].iter().any(Edge::is_filler) {
                graph.add_edge(position - start, Edge::filler("_"));
            }
        }
        graph
    }

    /// Every highest-weight path, in edge order.
    pub fn maximal_tokenizations(&self) -> Vec<Vec<Spanned>> {
        self.prune_to_maximal().all_tokenizations()
    }

    /// Every path from position 0 to the end, in edge order.
    pub fn all_tokenizations(&self) -> Vec<Vec<Spanned>> {
        let end = self.len();
        let mut results = Vec::new();
        if end == 0 {
            return results;
        }
        let mut path: Vec<Spanned> = Vec::new();
        let mut stack = vec![Frame { position: 0, choice: 0 }];
        while let Some(&Frame { position, choice }) = stack.last() {
            if position == end {
                results.push(path.clone());
                stack.pop();
                path.pop();
                continue;
            }
            let edges = &self.edge_lists[position];
            let next = (choice..edges.len()).find(|&c| edges[c].length > 0 && position + edges[c].length <= end);
            match next {
                Some(c) => {
                    let top = stack.len() - 1;
                    stack[top].choice = c + 1;
                    let edge = &edges[c];
                    path.push(Spanned::new(edge.token.clone(), Span::new(position, edge.length)));
                    stack.push(Frame { position: position + edge.length, choice: 0 });
                }
                None => {
                    stack.pop();
                    path.pop();
                }
            }
        }
        results
    }

    /// Keep only edges lying on some highest-weight path from 0 to the end.
    fn prune_to_maximal(&self) -> Graph {
        let end = self.len();
        // best[i]: highest weight of a path from i to the end, None if the end is unreachable.
        let mut best: Vec<Option<f64>> = vec![None; end + 1];
        best[end] = Some(0.0);
        for position in (0..end).rev() {
            best[position] = self.edge_lists[position]
                .iter()
                .filter(|e| e.length > 0 && position + e.length <= end)
                .filter_map(|e| best[position + e.length].map(|rest| e.weight() + rest))
                .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))));
        }

        // Only positions reachable along optimal edges from 0 matter; the rest
        // are never visited by the path walk.
        let edge_lists = self
            .edge_lists
            .iter()
            .enumerate()
            .map(|(position, edges)| {
                let Some(here) = best[position] else {
                    return Vec::new();
                };
                edges
                    .iter()
                    .filter(|e| e.length > 0 && position + e.length <= end)
                    .filter(|e| best[position + e.length].is_some_and(|rest| (e.weight() + rest - here).abs() < EPSILON))
                    .cloned()
                    .collect()
            })
            .collect();
        Graph { edge_lists }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str) -> Token {
        Token::Option { id: 1, name: name.to_string() }
    }

    fn words(graph: &Graph) -> Vec<Vec<String>> {
        graph
            .maximal_tokenizations()
            .iter()
            .map(|path| path.iter().map(|s| s.token.describe()).collect())
            .collect()
    }

    fn half_and_half() -> Graph {
        let mut g = Graph::new(3);
        for (i, w) in ["half", "and", "half"].iter().enumerate() {
            g.add_edge(i, Edge::filler(w));
        }
        g.add_edge(0, Edge::new(option("half and half"), 1.0, 3));
        g.add_edge(1, Edge::new(Token::Conjunction, 1.0, 1));
        g
    }

    #[test]
    fn maximal_prefers_multi_word_reading() {
        assert_eq!(words(&half_and_half()), vec![vec!["OPTION(half and half)".to_string()]]);
        assert_eq!(half_and_half().all_tokenizations().len(), 3);
    }

    #[test]
    fn maximal_keeps_equal_weight_alternatives() {
        let mut g = Graph::new(1);
        g.add_edge(0, Edge::filler("vanilla"));
        g.add_edge(0, Edge::new(Token::Attribute { id: 10, name: "vanilla".into() }, 1.0, 1));
        g.add_edge(0, Edge::new(option("vanilla syrup"), 1.0, 1));
        assert_eq!(words(&g).len(), 2);
    }

    #[test]
    fn filter_drops_weak_and_duplicate_edges_but_keeps_fillers() {
        let mut g = Graph::new(1);
        g.add_edge(0, Edge::filler("cones"));
        g.add_edge(0, Edge::new(Token::Entity { pid: 9, name: "cone".into() }, 0.6, 1));
        g.add_edge(0, Edge::new(Token::Entity { pid: 9, name: "cones".into() }, 0.9, 1));
        g.add_edge(0, Edge::new(Token::Entity { pid: 7, name: "corn".into() }, 0.2, 1));
        g.add_edge(0, Edge::new(Token::Conjunction, 1.0, 2));
        let filtered = g.filter(0.35);
        assert_eq!(filtered.edge_lists[0].len(), 2);
        assert!(filtered.edge_lists[0][0].is_filler());
        assert_eq!(filtered.edge_lists[0][1].score, 0.9);
    }

    #[test]
    fn restrict_shifts_positions_and_refills() {
        let g = half_and_half();
        let sub = g.restrict(Span::new(1, 2), |t| !matches!(t, Token::Conjunction));
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.all_tokenizations().len(), 1);
        let spans: Vec<Span> = sub.all_tokenizations()[0].iter().map(|s| s.span).collect();
        assert_eq!(spans, vec![Span::new(0, 1), Span::new(1, 1)]);
    }

    #[test]
    fn empty_lattice_has_no_tokenizations() {
        assert!(Graph::new(0).maximal_tokenizations().is_empty());
        let g = Graph::from_tokens(&[Token::AddToOrder, option("milk")]);
        assert_eq!(g.maximal_tokenizations().len(), 1);
    }
}
