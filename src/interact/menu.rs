use crate::dom::{Dom, NodeId};

use super::{mark, ACTIVE};

pub const HAMBURGER_ID: &str = "nav-hamburger";
pub const MENU_ID: &str = "nav-menu";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Menu {
    hamburger: NodeId,
    menu: NodeId,
    links: Vec<NodeId>,
}

impl Menu {
    pub(crate) fn collect(dom: &mut Dom) -> Option<Self> {
        let hamburger = dom.element_by_id(HAMBURGER_ID)?;
        let menu = dom.element_by_id(MENU_ID)?;
        let links = dom.all_by_tag(menu, "a");
        mark(dom, hamburger, "menu-toggle");
        mark(dom, menu, "menu");
        for link in links.iter() {
            mark(dom, *link, "menu-link");
        }
        Some(Self {
            hamburger,
            menu,
            links,
        })
    }

    pub fn is_open(&self, dom: &Dom) -> bool {
        dom.has_class(self.menu, ACTIVE)
    }

    fn close(&self, dom: &mut Dom) {
        dom.remove_class(self.hamburger, ACTIVE);
        dom.remove_class(self.menu, ACTIVE);
    }

    pub(crate) fn on_click(&self, dom: &mut Dom, node: NodeId) {
        if node == self.hamburger {
            dom.toggle_class(self.hamburger, ACTIVE);
            dom.toggle_class(self.menu, ACTIVE);
        } else if self.links.contains(&node) {
            self.close(dom);
        }
    }

    /// Document-level handler, reached only by clicks that were not stopped.
    pub(crate) fn on_document_click(&self, dom: &mut Dom, target: NodeId) {
        if !dom.contains(self.hamburger, target) && !dom.contains(self.menu, target) {
            self.close(dom);
        }
    }
}
