//! Reconstruction of the site hierarchy from the flat nameserver
//! collections, and its indented rendering.

use std::collections::{BTreeMap, BTreeSet};

/// Indentation marker, repeated once per depth level.
const INDENT: &str = "     |";

#[derive(Debug, Clone)]
struct TopologyNode {
    name: String,
    mode: String,
    children: Vec<usize>,
}

/// The replication landscape rooted at the local site.
///
/// Arena storage: nodes live in one `Vec`, children are indices. The
/// tree exclusively owns its nodes once built.
#[derive(Debug, Clone)]
pub struct TopologyTree {
    nodes: Vec<TopologyNode>,
    root: usize,
}

impl TopologyTree {
    /// Builds the tree from the three flat collections keyed by site id:
    /// display names, replication modes, and parent-to-children
    /// mappings. Absence from the mapping collection means leaf; ids
    /// without a name entry are skipped.
    ///
    /// The source topology is acyclic by construction of the replication
    /// landscape; a visited set still guards expansion so malformed data
    /// cannot loop the builder. Returns `None` when the root id itself
    /// is unknown.
    pub fn build(
        root_id: &str,
        names: &BTreeMap<String, String>,
        modes: &BTreeMap<String, String>,
        mappings: &BTreeMap<String, Vec<String>>,
    ) -> Option<TopologyTree> {
        let root_name = names.get(root_id)?;
        let mut nodes = vec![TopologyNode {
            name: root_name.clone(),
            mode: modes.get(root_id).cloned().unwrap_or_default(),
            children: Vec::new(),
        }];

        let mut visited: BTreeSet<&str> = BTreeSet::new();
        visited.insert(root_id);

        let mut pending: Vec<(usize, &str)> = vec![(0, root_id)];
        while let Some((index, id)) = pending.pop() {
            let Some(child_ids) = mappings.get(id) else {
                continue;
            };
            for child_id in child_ids {
                if !visited.insert(child_id.as_str()) {
                    continue;
                }
                let Some(child_name) = names.get(child_id) else {
                    continue;
                };
                let child_index = nodes.len();
                nodes.push(TopologyNode {
                    name: child_name.clone(),
                    mode: modes.get(child_id).cloned().unwrap_or_default(),
                    children: Vec::new(),
                });
                nodes[index].children.push(child_index);
                pending.push((child_index, child_id.as_str()));
            }
        }

        Some(TopologyTree { nodes, root: 0 })
    }

    /// Depth-first pre-order rendering, `name (mode)` per line, each
    /// child level pushed right by one indentation marker.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(usize, usize)> = vec![(self.root, 0)];
        while let Some((index, depth)) = stack.pop() {
            let node = &self.nodes[index];
            if depth == 0 {
                out.push_str(&format!("{} ({})\n", node.name, node.mode));
            } else {
                out.push_str(&format!(
                    "{}--- {} ({})\n",
                    INDENT.repeat(depth),
                    node.name,
                    node.mode
                ));
            }
            for child in node.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn primary_with_one_secondary() {
        let names = map(&[("1", "Primary"), ("2", "DR")]);
        let modes = map(&[("1", "primary"), ("2", "sync")]);
        let mut mappings = BTreeMap::new();
        mappings.insert("1".to_string(), vec!["2".to_string()]);

        let tree = TopologyTree::build("1", &names, &modes, &mappings).unwrap();
        assert_eq!(tree.render(), "Primary (primary)\n     |--- DR (sync)\n");
    }

    #[test]
    fn chained_secondaries_indent_per_level() {
        let names = map(&[("1", "A"), ("2", "B"), ("3", "C")]);
        let modes = map(&[("1", "primary"), ("2", "sync"), ("3", "async")]);
        let mut mappings = BTreeMap::new();
        mappings.insert("1".to_string(), vec!["2".to_string()]);
        mappings.insert("2".to_string(), vec!["3".to_string()]);

        let tree = TopologyTree::build("1", &names, &modes, &mappings).unwrap();
        assert_eq!(
            tree.render(),
            "A (primary)\n     |--- B (sync)\n     |     |--- C (async)\n"
        );
    }

    #[test]
    fn siblings_keep_mapping_order() {
        let names = map(&[("1", "A"), ("2", "B"), ("3", "C")]);
        let modes = map(&[("1", "primary"), ("2", "sync"), ("3", "sync")]);
        let mut mappings = BTreeMap::new();
        mappings.insert("1".to_string(), vec!["3".to_string(), "2".to_string()]);

        let tree = TopologyTree::build("1", &names, &modes, &mappings).unwrap();
        let rendered = tree.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[1].contains("C"));
        assert!(lines[2].contains("B"));
    }

    #[test]
    fn unknown_root_yields_none() {
        let names = map(&[("1", "A")]);
        assert!(TopologyTree::build("9", &names, &BTreeMap::new(), &BTreeMap::new()).is_none());
    }

    #[test]
    fn cyclic_mapping_does_not_loop() {
        let names = map(&[("1", "A"), ("2", "B")]);
        let modes = map(&[("1", "primary"), ("2", "sync")]);
        let mut mappings = BTreeMap::new();
        mappings.insert("1".to_string(), vec!["2".to_string()]);
        mappings.insert("2".to_string(), vec!["1".to_string()]);

        let tree = TopologyTree::build("1", &names, &modes, &mappings).unwrap();
        assert_eq!(tree.render().lines().count(), 2);
    }

    #[test]
    fn missing_mode_renders_empty() {
        let names = map(&[("1", "A")]);
        let tree =
            TopologyTree::build("1", &names, &BTreeMap::new(), &BTreeMap::new()).unwrap();
        assert_eq!(tree.render(), "A ()\n");
    }
}
