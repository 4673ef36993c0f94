pub mod accordion;
pub mod menu;
pub mod scroll;

pub use accordion::Accordion;
pub use menu::Menu;
pub use scroll::{ScrollBehavior, ScrollBlock, ScrollRequest, SmoothScroll};

use tracing::debug;

use crate::dom::{Dom, NodeId};
use crate::page::{FaqMounted, Page};

pub const ACTIVE: &str = "active";
pub const CONTROLLER_ATTR: &str = "data-controller";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attach {
    Registered,
    Refreshed,
    Missing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    pub scroll_to: Option<ScrollRequest>,
}

#[derive(Clone, Debug, Default)]
pub struct Controllers {
    accordion: Option<Accordion>,
    menu: Option<Menu>,
    scroll: Option<SmoothScroll>,
}

pub(crate) fn mark(dom: &mut Dom, node: NodeId, name: &str) {
    let current = dom.attr(node, CONTROLLER_ATTR).unwrap_or_default().to_string();
    if current.split_whitespace().any(|n| n == name) {
        return;
    }
    let value = if current.is_empty() {
        name.to_string()
    } else {
        format!("{current} {name}")
    };
    dom.set_attr(node, CONTROLLER_ATTR, &value);
}

fn registration<T>(slot: &mut Option<T>, found: Option<T>) -> Attach {
    match found {
        None => Attach::Missing,
        Some(controller) => {
            let attach = if slot.is_some() {
                Attach::Refreshed
            } else {
                Attach::Registered
            };
            *slot = Some(controller);
            attach
        }
    }
}

impl Controllers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_accordion(&mut self, page: &mut Page, mounted: &FaqMounted) -> Attach {
        let found = Accordion::collect(page.dom_mut(), mounted);
        let attach = registration(&mut self.accordion, found);
        debug!(?attach, "accordion");
        attach
    }

    pub fn attach_menu(&mut self, page: &mut Page) -> Attach {
        let found = Menu::collect(page.dom_mut());
        let attach = registration(&mut self.menu, found);
        debug!(?attach, "menu");
        attach
    }

    pub fn attach_smooth_scroll(&mut self, page: &mut Page) -> Attach {
        let found = SmoothScroll::collect(page.dom_mut());
        let attach = registration(&mut self.scroll, Some(found));
        debug!(?attach, "smooth scroll");
        attach
    }

    pub fn accordion(&self) -> Option<&Accordion> {
        self.accordion.as_ref()
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn smooth_scroll(&self) -> Option<&SmoothScroll> {
        self.scroll.as_ref()
    }

    /// Dispatches a click on `target`, bubbling from the target up to the
    /// document. Handlers on the same element run in registration order:
    /// smooth scroll, menu, accordion.
    pub fn click(&self, page: &mut Page, target: NodeId) -> ClickOutcome {
        let mut outcome = ClickOutcome::default();
        let dom = page.dom_mut();
        if !dom.is_attached(target) {
            return outcome;
        }

        let mut node = Some(target);
        while let Some(current) = node {
            if let Some(scroll) = self.scroll.as_ref() {
                scroll.on_click(dom, current, &mut outcome);
            }
            if let Some(menu) = self.menu.as_ref() {
                menu.on_click(dom, current);
            }
            if let Some(accordion) = self.accordion.as_ref() {
                accordion.on_click(dom, current, &mut outcome);
            }
            if outcome.propagation_stopped {
                return outcome;
            }
            node = dom.parent(current);
        }

        if let Some(menu) = self.menu.as_ref() {
            menu.on_document_click(dom, target);
        }
        outcome
    }
}
