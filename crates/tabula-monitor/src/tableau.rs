//! テーブルローのノード走査インターフェース

use serde::{Deserialize, Serialize};

/// Read-only view of one tableau node.
pub trait TableauNode {
    fn is_active(&self) -> bool;
    fn is_blocked(&self) -> bool;
    fn has_unprocessed_existentials(&self) -> bool;
}

/// Node iteration capability the engine hands to the monitor.
pub trait TableauView {
    type Node: TableauNode;

    /// Every node in tableau order, active or not.
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;
}

impl<N: TableauNode> TableauView for [N] {
    type Node = N;

    fn nodes(&self) -> impl Iterator<Item = &N> {
        self.iter()
    }
}

impl<N: TableauNode> TableauView for Vec<N> {
    type Node = N;

    fn nodes(&self) -> impl Iterator<Item = &N> {
        self.iter()
    }
}

/// Plain node flags, for engines that snapshot their nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub active: bool,
    pub blocked: bool,
    pub unprocessed_existentials: bool,
}

impl NodeStatus {
    pub fn active() -> Self {
        Self {
            active: true,
            ..Default::default()
        }
    }

    /// Active, blocked and still owing existential expansion.
    pub fn blocked_pending() -> Self {
        Self {
            active: true,
            blocked: true,
            unprocessed_existentials: true,
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }
}

impl TableauNode for NodeStatus {
    fn is_active(&self) -> bool {
        self.active
    }

    fn is_blocked(&self) -> bool {
        self.blocked
    }

    fn has_unprocessed_existentials(&self) -> bool {
        self.unprocessed_existentials
    }
}

/// Result of one linear scan over the tableau.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCensus {
    pub active: u64,
    /// Active nodes that are blocked with unprocessed existentials.
    pub blocked_pending: u64,
}

impl NodeCensus {
    pub fn take<T: TableauView + ?Sized>(tableau: &T) -> Self {
        let mut census = Self::default();
        for node in tableau.nodes().filter(|node| node.is_active()) {
            census.active += 1;
            if node.is_blocked() && node.has_unprocessed_existentials() {
                census.blocked_pending += 1;
            }
        }
        census
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_census_counts_active_nodes_only() {
        let nodes = vec![
            NodeStatus::active(),
            NodeStatus::blocked_pending(),
            NodeStatus::inactive(),
            NodeStatus {
                active: false,
                blocked: true,
                unprocessed_existentials: true,
            },
            NodeStatus {
                active: true,
                blocked: true,
                unprocessed_existentials: false,
            },
        ];
        let census = NodeCensus::take(nodes.as_slice());
        assert_eq!(census, NodeCensus { active: 3, blocked_pending: 1 });
        assert_eq!(NodeCensus::take(&nodes), census);
    }

    #[test]
    fn test_empty_tableau() {
        let nodes: [NodeStatus; 0] = [];
        assert_eq!(NodeCensus::take(&nodes[..]), NodeCensus::default());
    }
}
