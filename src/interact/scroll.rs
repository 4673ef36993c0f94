use serde::Serialize;

use crate::dom::{Dom, NodeId};

use super::{mark, ClickOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBlock {
    Start,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: NodeId,
    pub target_id: String,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

/// Fragment links (`a[href^="#"]`) scroll smoothly instead of jumping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SmoothScroll {
    anchors: Vec<NodeId>,
}

impl SmoothScroll {
    pub(crate) fn collect(dom: &mut Dom) -> Self {
        let root = dom.root();
        let anchors: Vec<NodeId> = dom
            .all_by_tag(root, "a")
            .into_iter()
            .filter(|a| dom.attr(*a, "href").map_or(false, |h| h.starts_with('#')))
            .collect();
        for anchor in anchors.iter() {
            mark(dom, *anchor, "smooth-scroll");
        }
        Self { anchors }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub(crate) fn on_click(&self, dom: &Dom, node: NodeId, outcome: &mut ClickOutcome) {
        if !self.anchors.contains(&node) {
            return;
        }
        outcome.default_prevented = true;
        let target_id = match dom.attr(node, "href") {
            Some(href) => href.strip_prefix('#').unwrap_or(href).to_string(),
            None => return,
        };
        if target_id.is_empty() {
            return;
        }
        if let Some(target) = dom.element_by_id(&target_id) {
            outcome.scroll_to = Some(ScrollRequest {
                target,
                target_id,
                behavior: ScrollBehavior::Smooth,
                block: ScrollBlock::Start,
            });
        }
    }
}
