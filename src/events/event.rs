use serde::{Deserialize, Serialize};

use crate::modes::LayoutMode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadNodeDragStart {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadNodeDragEnd {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadNodeHoverEnter {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadNodeHoverLeave {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadNodeExpandToggle {
    pub id: String,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadFilterApplied {
    pub active_nodes: usize,
    pub active_edges: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadModeChanged {
    pub mode: LayoutMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadSettled {
    pub steps: u64,
}

/// Interaction and lifecycle notifications a host can mirror into its own
/// state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    NodeDragStart(PayloadNodeDragStart),
    NodeDragEnd(PayloadNodeDragEnd),
    NodeHoverEnter(PayloadNodeHoverEnter),
    NodeHoverLeave(PayloadNodeHoverLeave),
    NodeExpandToggle(PayloadNodeExpandToggle),
    FilterApplied(PayloadFilterApplied),
    ModeChanged(PayloadModeChanged),
    Settled(PayloadSettled),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_contract_drag_start() {
        let event = Event::NodeDragStart(PayloadNodeDragStart { id: "a1".into() });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"NodeDragStart":{"id":"a1"}}"#);

        let event: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(
            event,
            Event::NodeDragStart(PayloadNodeDragStart { id: "a1".into() })
        );
    }

    #[test]
    fn test_contract_mode_changed() {
        let event = Event::ModeChanged(PayloadModeChanged {
            mode: LayoutMode::Hierarchical,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"ModeChanged":{"mode":"Hierarchical"}}"#);

        let event: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(
            event,
            Event::ModeChanged(PayloadModeChanged {
                mode: LayoutMode::Hierarchical
            })
        );
    }

    #[test]
    fn test_contract_settled() {
        let event = Event::Settled(PayloadSettled { steps: 312 });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"Settled":{"steps":312}}"#);
    }
}
