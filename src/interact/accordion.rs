use crate::dom::{Dom, NodeId};
use crate::page::FaqMounted;

use super::{mark, ClickOutcome, ACTIVE};

pub(crate) const MARKER: &str = "accordion";

#[derive(Clone, Debug, PartialEq, Eq)]
struct Item {
    card: NodeId,
    header: NodeId,
}

/// FAQ accordion: at most one `.faq-card` is `active` at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Accordion {
    items: Vec<Item>,
}

impl Accordion {
    pub(crate) fn collect(dom: &mut Dom, mounted: &FaqMounted) -> Option<Self> {
        let items: Vec<Item> = mounted
            .items()
            .iter()
            .copied()
            .filter(|card| dom.is_attached(*card) && dom.has_class(*card, "faq-card"))
            .filter_map(|card| {
                let header = dom.first_by_class(card, "faq-header")?;
                Some(Item { card, header })
            })
            .collect();
        if items.is_empty() {
            return None;
        }
        for item in items.iter() {
            mark(dom, item.header, MARKER);
        }
        Some(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn on_click(&self, dom: &mut Dom, node: NodeId, outcome: &mut ClickOutcome) {
        let current = match self.items.iter().find(|item| item.header == node) {
            Some(item) => item.card,
            None => return,
        };
        outcome.default_prevented = true;
        outcome.propagation_stopped = true;

        let was_active = dom.has_class(current, ACTIVE);
        for item in self.items.iter() {
            dom.remove_class(item.card, ACTIVE);
        }
        if !was_active {
            dom.add_class(current, ACTIVE);
        }
    }
}
