//! Report rendering for computed change lists
//!
//! A thin presentation layer over analyzer output: counts, per-change
//! detail sections, and a Mermaid diagram of the two graph states. Holds no
//! invariants of its own beyond faithfully reflecting its input.

use super::types::{ChangeKind, GraphChange};
use crate::graph::{EntityGraph, EntityId};
use std::collections::{BTreeMap, BTreeSet};

/// Renders a list of change records as human-readable reports
pub struct ChangeReport<'a> {
    changes: &'a [GraphChange],
}

impl<'a> ChangeReport<'a> {
    pub fn new(changes: &'a [GraphChange]) -> Self {
        ChangeReport { changes }
    }

    /// Count-by-kind summary block
    pub fn summary(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for change in self.changes {
            *counts.entry(change.kind.name()).or_default() += 1;
        }

        let mut lines = vec!["=== ENTITY GRAPH CHANGE SUMMARY ===".to_string(), String::new()];
        lines.push("Change Type Counts:".to_string());
        for (kind, count) in &counts {
            lines.push(format!("  {}: {}", kind, count));
        }
        lines.push(String::new());
        lines.push(format!("Total Changes: {}", self.changes.len()));
        lines.push(String::new());
        lines.join("\n")
    }

    /// Summary followed by per-change detail sections grouped by kind
    pub fn detailed_report(&self) -> String {
        let mut report = vec![self.summary()];

        let mut by_kind: BTreeMap<&str, Vec<&GraphChange>> = BTreeMap::new();
        for change in self.changes {
            by_kind.entry(change.kind.name()).or_default().push(change);
        }

        for (kind, changes) in &by_kind {
            report.push(format!("=== {} ===", kind.to_uppercase()));
            report.push(String::new());
            for change in changes {
                report.push(Self::format_change(change));
                report.push(String::new());
            }
        }

        report.join("\n")
    }

    fn format_change(change: &GraphChange) -> String {
        let mut lines = Vec::new();

        if let Some(entity_id) = change.kind.entity_id() {
            lines.push(format!("Entity: {}...", entity_id.short()));
        }
        if let Some((source, target)) = change.kind.edge_key() {
            lines.push(format!("Edge: {}... -> {}...", source.short(), target.short()));
        }

        match &change.kind {
            ChangeKind::NodeAdded { entity, .. } => {
                lines.push(format!("New Value: Entity({})", entity.id.short()));
            }
            ChangeKind::NodeRemoved { entity, .. } => {
                lines.push(format!("Old Value: Entity({})", entity.id.short()));
            }
            ChangeKind::NodeModified { old, new, .. } => {
                lines.push(format!("Old Value: Entity({})", old.id.short()));
                lines.push(format!("New Value: Entity({})", new.id.short()));
            }
            ChangeKind::EdgeAdded { edge, .. } => {
                lines.push(format!(
                    "New Value: Edge({}, {})",
                    edge.edge_type, edge.field_name
                ));
            }
            ChangeKind::EdgeRemoved { edge, .. } => {
                lines.push(format!(
                    "Old Value: Edge({}, {})",
                    edge.edge_type, edge.field_name
                ));
            }
            ChangeKind::EdgeModified { old_edge, new_edge, .. } => {
                lines.push(format!(
                    "Old Value: Edge({}, {})",
                    old_edge.edge_type, old_edge.field_name
                ));
                lines.push(format!(
                    "New Value: Edge({}, {})",
                    new_edge.edge_type, new_edge.field_name
                ));
            }
            ChangeKind::ComponentAdded { name, value, .. } => {
                lines.push(format!("Component: {}", name));
                lines.push(format!("New Value: {}", value));
            }
            ChangeKind::ComponentRemoved { name, value, .. } => {
                lines.push(format!("Component: {}", name));
                lines.push(format!("Old Value: {}", value));
            }
            ChangeKind::ComponentModified {
                name,
                old_value,
                new_value,
                ..
            } => {
                lines.push(format!("Component: {}", name));
                lines.push(format!("Old Value: {}", old_value));
                lines.push(format!("New Value: {}", new_value));
            }
        }

        if !change.details.is_empty() {
            let details: Vec<String> = change
                .details
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect();
            lines.push(format!("Details: {{{}}}", details.join(", ")));
        }

        format!("  {}", lines.join("\n  "))
    }

    /// Mermaid `graph TD` diagram of both graph states, with nodes tagged
    /// added/removed/modified/unchanged and edges drawn dashed with `+`/`-`
    /// labels when they only exist on one side
    pub fn mermaid_diff(&self, old: &EntityGraph, new: &EntityGraph) -> String {
        let mut lines = vec![
            "```mermaid".to_string(),
            "graph TD".to_string(),
            "  %% Entity graph change visualization".to_string(),
            String::new(),
        ];

        let all_nodes: BTreeSet<EntityId> = old.node_ids().chain(new.node_ids()).copied().collect();
        for id in &all_nodes {
            let style = match (old.contains_node(id), new.contains_node(id)) {
                (true, true) => {
                    if self.is_modified(id) {
                        "modifiedNode"
                    } else {
                        "unchangedNode"
                    }
                }
                (false, true) => "addedNode",
                // unreachable: the union only holds ids present somewhere
                (true, false) | (false, false) => "removedNode",
            };
            lines.push(format!(
                "  {}[\"{}\"]:::{}",
                id.as_uuid().simple(),
                id.short(),
                style
            ));
        }

        lines.push(String::new());

        let all_edges: BTreeSet<(EntityId, EntityId)> =
            old.edge_keys().chain(new.edge_keys()).copied().collect();
        for (source, target) in &all_edges {
            let src = source.as_uuid().simple();
            let tgt = target.as_uuid().simple();
            match (old.edge(source, target), new.edge(source, target)) {
                (Some(_), Some(edge)) => {
                    lines.push(format!("  {} -->|{}| {}", src, edge.field_name, tgt));
                }
                (None, Some(edge)) => {
                    lines.push(format!("  {} -.->|+{}| {}", src, edge.field_name, tgt));
                }
                (Some(edge), None) => {
                    lines.push(format!("  {} -.->|-{}| {}", src, edge.field_name, tgt));
                }
                (None, None) => {}
            }
        }

        lines.extend([
            String::new(),
            "  classDef addedNode fill:#90EE90,stroke:#228B22,stroke-width:2px".to_string(),
            "  classDef removedNode fill:#FFB6C1,stroke:#DC143C,stroke-width:2px".to_string(),
            "  classDef modifiedNode fill:#FFD700,stroke:#FFA500,stroke-width:2px".to_string(),
            "  classDef unchangedNode fill:#E6E6FA,stroke:#9370DB,stroke-width:1px".to_string(),
            "```".to_string(),
        ]);

        lines.join("\n")
    }

    fn is_modified(&self, id: &EntityId) -> bool {
        self.changes.iter().any(|change| {
            matches!(
                change.kind,
                ChangeKind::ComponentModified { .. } | ChangeKind::NodeModified { .. }
            ) && change.kind.entity_id() == Some(*id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::analyzer::diff_graphs;
    use crate::graph::{EdgeType, Entity, EntityEdge, LineageId};

    fn scenario() -> (EntityGraph, EntityGraph) {
        let mut old = EntityGraph::new(EntityId::generate(), LineageId::generate());
        let kept = Entity::new();
        let dropped = Entity::new();
        let kept_id = kept.id;
        let dropped_id = dropped.id;
        old.add_node(kept);
        old.add_node(dropped);
        old.add_component(&kept_id, "health", 100i64);

        let mut new = old.clone();
        new.remove_node(&dropped_id);
        new.update_component(&kept_id, "health", 50i64);
        let added = Entity::new();
        let added_id = added.id;
        new.add_node(added);
        new.add_edge(EntityEdge::new(kept_id, added_id, EdgeType::Composition, "parts"));

        (old, new)
    }

    #[test]
    fn test_summary_counts() {
        let (old, new) = scenario();
        let changes = diff_graphs(&old, &new);
        let report = ChangeReport::new(&changes);
        let summary = report.summary();

        assert!(summary.contains("=== ENTITY GRAPH CHANGE SUMMARY ==="));
        assert!(summary.contains("node_added: 1"));
        assert!(summary.contains("node_removed: 1"));
        assert!(summary.contains("edge_added: 1"));
        assert!(summary.contains("component_modified: 1"));
        assert!(summary.contains(&format!("Total Changes: {}", changes.len())));
    }

    #[test]
    fn test_detailed_report_sections() {
        let (old, new) = scenario();
        let changes = diff_graphs(&old, &new);
        let report = ChangeReport::new(&changes).detailed_report();

        assert!(report.contains("=== NODE_ADDED ==="));
        assert!(report.contains("=== COMPONENT_MODIFIED ==="));
        assert!(report.contains("Old Value: 100"));
        assert!(report.contains("New Value: 50"));
    }

    #[test]
    fn test_mermaid_tags() {
        let (old, new) = scenario();
        let changes = diff_graphs(&old, &new);
        let report = ChangeReport::new(&changes);
        let diagram = report.mermaid_diff(&old, &new);

        assert!(diagram.starts_with("```mermaid"));
        assert!(diagram.ends_with("```"));
        assert!(diagram.contains(":::addedNode"));
        assert!(diagram.contains(":::removedNode"));
        assert!(diagram.contains(":::modifiedNode"));
        assert!(diagram.contains("-.->|+parts|"));
        assert!(diagram.contains("classDef addedNode"));
    }

    #[test]
    fn test_empty_change_list() {
        let changes = Vec::new();
        let report = ChangeReport::new(&changes);
        assert!(report.summary().contains("Total Changes: 0"));
    }
}
