//! Inheritance linking between targets
//!
//! When a target's ancestor class is itself a configured target, the child's
//! proxy derives from the parent's proxy. The linker finds those pairs and
//! orders targets so that parents are always emitted before their children.

use rustc_hash::FxHashMap;
use veneer_types::{TargetSpec, TypeName};

use crate::error::GenerateError;

/// A child target whose proxy derives from its parent target's proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyLink {
    pub child: String,
    pub parent: String,
}

/// Input to the linker: a target and its ancestor class names, nearest first
#[derive(Debug, Clone)]
pub struct LinkNode<'a> {
    pub spec: &'a TargetSpec,
    pub ancestors: Vec<String>,
}

/// Parent relations and emission order for a set of targets
#[derive(Debug, Clone, Default)]
pub struct LinkForest {
    parents: Vec<Option<usize>>,
    depths: Vec<usize>,
    order: Vec<usize>,
    links: Vec<ProxyLink>,
    errors: Vec<(usize, GenerateError)>,
}

impl LinkForest {
    /// Index of the parent target
    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.parents.get(idx).copied().flatten()
    }

    /// Number of ancestor links above a target
    pub fn depth(&self, idx: usize) -> usize {
        self.depths.get(idx).copied().unwrap_or(0)
    }

    /// Targets in emission order, parents first; rejected targets are absent
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn links(&self) -> &[ProxyLink] {
        &self.links
    }

    /// Targets rejected by the linker
    pub fn errors(&self) -> &[(usize, GenerateError)] {
        &self.errors
    }
}

pub struct InheritanceLinker;

impl InheritanceLinker {
    pub fn link(nodes: &[LinkNode<'_>]) -> LinkForest {
        let n = nodes.len();
        let index: FxHashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.spec.target_name(), i))
            .collect();

        let mut errors: Vec<(usize, GenerateError)> = Vec::new();
        let mut explicit: Vec<Option<usize>> = vec![None; n];

        for (i, node) in nodes.iter().enumerate() {
            let target = node.spec.target_name();
            if node.ancestors.iter().any(|a| a == target) {
                errors.push((i, GenerateError::configuration(target, "target inherits from itself")));
                continue;
            }
            let Some(base) = node.spec.base_proxy.as_deref() else {
                continue;
            };
            let base = TypeName::normalize(base);
            if base == target {
                errors.push((
                    i,
                    GenerateError::configuration(target, "target is declared as its own base proxy"),
                ));
            } else if !node.ancestors.iter().any(|a| a == base) {
                errors.push((
                    i,
                    GenerateError::configuration(
                        target,
                        format!("base proxy '{}' is not an ancestor of the target", base),
                    ),
                ));
            } else {
                match index.get(base) {
                    Some(&p) => explicit[i] = Some(p),
                    None => errors.push((
                        i,
                        GenerateError::configuration(
                            target,
                            format!("base proxy '{}' is not a configured target", base),
                        ),
                    )),
                }
            }
        }

        let mut alive = vec![true; n];
        for (i, _) in &errors {
            alive[*i] = false;
        }

        // Nearest surviving ancestor; an explicit parent wins while it survives.
        let mut parents: Vec<Option<usize>> = vec![None; n];
        for (i, node) in nodes.iter().enumerate() {
            if !alive[i] {
                continue;
            }
            parents[i] = explicit[i].filter(|&p| alive[p]).or_else(|| {
                node.ancestors
                    .iter()
                    .filter_map(|a| index.get(a.as_str()).copied())
                    .find(|&p| alive[p] && p != i)
            });
        }

        let mut depths = vec![0; n];
        for i in 0..n {
            if !alive[i] {
                continue;
            }
            let mut depth = 0;
            let mut cursor = parents[i];
            while let Some(p) = cursor {
                depth += 1;
                if depth > n {
                    break;
                }
                cursor = parents[p];
            }
            if depth > n {
                errors.push((
                    i,
                    GenerateError::configuration(nodes[i].spec.target_name(), "cyclic proxy chain"),
                ));
                alive[i] = false;
                parents[i] = None;
            } else {
                depths[i] = depth;
            }
        }

        let mut order: Vec<usize> = (0..n).filter(|&i| alive[i]).collect();
        order.sort_by_key(|&i| (depths[i], i));

        let links = order
            .iter()
            .filter_map(|&i| {
                parents[i].map(|p| ProxyLink {
                    child: nodes[i].spec.target_name().to_string(),
                    parent: nodes[p].spec.target_name().to_string(),
                })
            })
            .collect();

        LinkForest {
            parents,
            depths,
            order,
            links,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node<'a>(spec: &'a TargetSpec, ancestors: &[&str]) -> LinkNode<'a> {
        LinkNode {
            spec,
            ancestors: ancestors.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parents_before_children() {
        let leaf = TargetSpec::new("Acme.Leaf");
        let mid = TargetSpec::new("Acme.Mid");
        let root = TargetSpec::new("Acme.Root");
        let nodes = vec![
            node(&leaf, &["Acme.Mid", "Acme.Root"]),
            node(&mid, &["Acme.Root"]),
            node(&root, &[]),
        ];

        let forest = InheritanceLinker::link(&nodes);
        assert_eq!(forest.order(), &[2, 1, 0]);
        assert_eq!(forest.parent(0), Some(1));
        assert_eq!(forest.parent(1), Some(2));
        assert_eq!(forest.parent(2), None);
        assert_eq!(forest.depth(0), 2);
        assert_eq!(forest.links().len(), 2);
    }

    #[test]
    fn test_skips_unconfigured_ancestor() {
        let leaf = TargetSpec::new("Acme.Leaf");
        let root = TargetSpec::new("Acme.Root");
        let nodes = vec![node(&leaf, &["Acme.Mid", "Acme.Root"]), node(&root, &[])];

        let forest = InheritanceLinker::link(&nodes);
        assert_eq!(forest.parent(0), Some(1));
        assert_eq!(
            forest.links(),
            &[ProxyLink {
                child: "Acme.Leaf".into(),
                parent: "Acme.Root".into()
            }]
        );
    }

    #[test]
    fn test_self_reference_is_configuration_error() {
        let spec = TargetSpec::new("Acme.Widget").with_base_proxy("Acme.Widget");
        let nodes = vec![node(&spec, &[])];

        let forest = InheritanceLinker::link(&nodes);
        assert!(forest.order().is_empty());
        assert_eq!(forest.errors().len(), 1);
        assert!(matches!(forest.errors()[0].1, GenerateError::Configuration { .. }));
    }

    #[test]
    fn test_explicit_base_must_be_ancestor() {
        let a = TargetSpec::new("Acme.A").with_base_proxy("Acme.B");
        let b = TargetSpec::new("Acme.B");
        let nodes = vec![node(&a, &[]), node(&b, &[])];

        let forest = InheritanceLinker::link(&nodes);
        assert_eq!(forest.order(), &[1]);
        assert_eq!(forest.errors()[0].0, 0);
    }

    #[test]
    fn test_explicit_base_selects_farther_ancestor() {
        let leaf = TargetSpec::new("Acme.Leaf").with_base_proxy("Acme.Root");
        let mid = TargetSpec::new("Acme.Mid");
        let root = TargetSpec::new("Acme.Root");
        let nodes = vec![
            node(&leaf, &["Acme.Mid", "Acme.Root"]),
            node(&mid, &["Acme.Root"]),
            node(&root, &[]),
        ];

        let forest = InheritanceLinker::link(&nodes);
        assert_eq!(forest.parent(0), Some(2));
        assert_eq!(forest.depth(0), 1);
    }
}
