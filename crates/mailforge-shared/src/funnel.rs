//! Branching automation trees attached to campaigns.
//!
//! A funnel is a list of top-level nodes rooted at a trigger.  Every node
//! kind carries exactly one (possibly empty) child list, except
//! [`FunnelKind::Condition`] which carries exactly two named branches.
//! The children-XOR-branches shape is therefore unrepresentable-by-
//! construction rather than a runtime convention.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Shape violations detected by [`FunnelConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunnelError {
    /// A non-empty tree must start with a trigger node.
    #[error("funnel tree must be rooted at a trigger node")]
    MissingTrigger,

    /// Trigger nodes are only allowed at the tree root.
    #[error("trigger node `{0}` is only allowed at the tree root")]
    NestedTrigger(String),

    /// Node ids must be unique within the owning campaign's tree.
    #[error("duplicate node id `{0}` in funnel tree")]
    DuplicateNodeId(String),
}

/// A campaign's automation tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelConfig {
    #[serde(default)]
    pub nodes: Vec<FunnelNode>,
}

/// One step in the automation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelNode {
    /// Unique within the owning campaign's tree.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Free-form key/value configuration bag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub kind: FunnelKind,
}

/// Node kind, tagged by `type` in the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FunnelKind {
    Trigger {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<FunnelNode>,
    },
    Email {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<FunnelNode>,
    },
    Delay {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<FunnelNode>,
    },
    Condition { branches: Branches },
    Action {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<FunnelNode>,
    },
    End {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<FunnelNode>,
    },
}

/// The two named child sequences of a condition node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branches {
    #[serde(rename = "true", default)]
    pub when_true: Vec<FunnelNode>,
    #[serde(rename = "false", default)]
    pub when_false: Vec<FunnelNode>,
}

impl FunnelKind {
    /// The linear child list.  Empty for condition nodes, whose children
    /// live in [`Branches`] instead.
    pub fn children(&self) -> &[FunnelNode] {
        match self {
            Self::Trigger { children }
            | Self::Email { children }
            | Self::Delay { children }
            | Self::Action { children }
            | Self::End { children } => children,
            Self::Condition { .. } => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Trigger { .. } => "trigger",
            Self::Email { .. } => "email",
            Self::Delay { .. } => "delay",
            Self::Condition { .. } => "condition",
            Self::Action { .. } => "action",
            Self::End { .. } => "end",
        }
    }
}

impl FunnelNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: FunnelKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            config: BTreeMap::new(),
            kind,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a FunnelNode>) {
        out.push(self);
        match &self.kind {
            FunnelKind::Condition { branches } => {
                for child in &branches.when_true {
                    child.visit(out);
                }
                for child in &branches.when_false {
                    child.visit(out);
                }
            }
            other => {
                for child in other.children() {
                    child.visit(out);
                }
            }
        }
    }
}

impl FunnelConfig {
    pub fn new(nodes: Vec<FunnelNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first, left-to-right traversal.  For a condition node the
    /// true branch is visited before the false branch.
    pub fn walk(&self) -> Vec<&FunnelNode> {
        let mut out = Vec::new();
        for node in &self.nodes {
            node.visit(&mut out);
        }
        out
    }

    /// Check the structural invariants that the type system cannot carry:
    /// a non-empty tree is rooted at a trigger, triggers appear nowhere
    /// else, and node ids are unique within the tree.
    pub fn validate(&self) -> Result<(), FunnelError> {
        if self.nodes.is_empty() {
            return Ok(());
        }

        if !matches!(self.nodes[0].kind, FunnelKind::Trigger { .. }) {
            return Err(FunnelError::MissingTrigger);
        }

        let mut seen = BTreeSet::new();
        for (position, node) in self.walk().into_iter().enumerate() {
            if position > 0 && matches!(node.kind, FunnelKind::Trigger { .. }) {
                return Err(FunnelError::NestedTrigger(node.id.clone()));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(FunnelError::DuplicateNodeId(node.id.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branching_tree() -> FunnelConfig {
        FunnelConfig::new(vec![
            FunnelNode::new("start", "Start Campaign", FunnelKind::Trigger { children: vec![] })
                .with_subtitle("Segment: Pharma"),
            FunnelNode::new("email-1", "Announcement Email", FunnelKind::Email { children: vec![] })
                .with_config("subject", "Announcing new series"),
            FunnelNode::new("delay-1", "Wait 2 Days", FunnelKind::Delay { children: vec![] })
                .with_config("duration", "2")
                .with_config("unit", "days"),
            FunnelNode::new(
                "cond-1",
                "Opened Email?",
                FunnelKind::Condition {
                    branches: Branches {
                        when_true: vec![
                            FunnelNode::new("score-1", "Score +10", FunnelKind::Action { children: vec![] }),
                            FunnelNode::new("email-2", "Follow-up: Specs", FunnelKind::Email { children: vec![] }),
                        ],
                        when_false: vec![FunnelNode::new(
                            "email-3",
                            "Re-send: Different Subject",
                            FunnelKind::Email { children: vec![] },
                        )],
                    },
                },
            ),
        ])
    }

    #[test]
    fn walk_is_depth_first_left_to_right() {
        let tree = branching_tree();
        let order: Vec<&str> = tree.walk().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            order,
            ["start", "email-1", "delay-1", "cond-1", "score-1", "email-2", "email-3"]
        );
    }

    #[test]
    fn serialized_form_is_tagged_by_type() {
        let tree = branching_tree();
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["nodes"][0]["type"], "trigger");
        assert_eq!(json["nodes"][3]["type"], "condition");
        // Branch keys are the literal strings "true" / "false".
        assert_eq!(json["nodes"][3]["branches"]["true"][0]["id"], "score-1");
        assert_eq!(json["nodes"][3]["branches"]["false"][0]["id"], "email-3");
    }

    #[test]
    fn round_trips_through_json() {
        let tree = branching_tree();
        let text = serde_json::to_string(&tree).unwrap();
        let back: FunnelConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn empty_branches_round_trip() {
        let tree = FunnelConfig::new(vec![
            FunnelNode::new("start", "Start", FunnelKind::Trigger { children: vec![] }),
            FunnelNode::new(
                "cond-1",
                "Ever Opened?",
                FunnelKind::Condition { branches: Branches::default() },
            ),
        ]);
        let text = serde_json::to_string(&tree).unwrap();
        let back: FunnelConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.walk().len(), 2);
    }

    #[test]
    fn validate_accepts_the_seeded_shape() {
        assert_eq!(branching_tree().validate(), Ok(()));
        assert_eq!(FunnelConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_requires_trigger_root() {
        let tree = FunnelConfig::new(vec![FunnelNode::new(
            "email-1",
            "Email",
            FunnelKind::Email { children: vec![] },
        )]);
        assert_eq!(tree.validate(), Err(FunnelError::MissingTrigger));
    }

    #[test]
    fn validate_rejects_nested_trigger() {
        let tree = FunnelConfig::new(vec![FunnelNode::new(
            "start",
            "Start",
            FunnelKind::Trigger {
                children: vec![FunnelNode::new(
                    "start-2",
                    "Another Start",
                    FunnelKind::Trigger { children: vec![] },
                )],
            },
        )]);
        assert_eq!(
            tree.validate(),
            Err(FunnelError::NestedTrigger("start-2".to_string()))
        );
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let tree = FunnelConfig::new(vec![
            FunnelNode::new("start", "Start", FunnelKind::Trigger { children: vec![] }),
            FunnelNode::new("start", "Copy", FunnelKind::Email { children: vec![] }),
        ]);
        assert_eq!(
            tree.validate(),
            Err(FunnelError::DuplicateNodeId("start".to_string()))
        );
    }
}
