pub mod faq;
pub mod skeleton;

pub use faq::{FaqEntry, FaqMounted, FAQ_ENTRIES, STRUCTURED_DATA_ID};
pub use skeleton::PageSettings;

use tracing::debug;

use crate::dom::{Dom, El, NodeId};
use crate::render::{self, SectionMarkup, CARDS_CONTAINER, MOBILE_CARDS, SECTION_NOTICE, UPDATED_NOTE};
use crate::view::SectionView;

pub const RUNTIME_SCRIPT_ID: &str = "page-runtime";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub cards: usize,
    pub rows: usize,
    pub notice: bool,
}

#[derive(Clone, Debug)]
pub struct Page {
    dom: Dom,
    settings: PageSettings,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(PageSettings::default())
    }
}

impl Page {
    pub fn new(settings: PageSettings) -> Self {
        let mut dom = Dom::new();
        let root = dom.root();
        dom.append(root, skeleton::document(&settings));
        Self { dom, settings }
    }

    pub fn from_dom(dom: Dom, settings: PageSettings) -> Self {
        Self { dom, settings }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    /// Replaces whatever a previous call rendered into the section.
    pub fn apply_section(&mut self, view: &SectionView) -> Applied {
        let mut applied = Applied::default();
        let section_id = view.kind.section_id();
        let container = match self.dom.class_within_id(section_id, "container") {
            Some(c) => c,
            None => {
                debug!(section = section_id, "section container missing, skipping");
                return applied;
            }
        };

        for class in [CARDS_CONTAINER, MOBILE_CARDS, SECTION_NOTICE, UPDATED_NOTE] {
            for stale in self.dom.all_by_class(container, class) {
                self.dom.remove(stale);
            }
        }
        let tbody = self.dom.element_by_id(view.kind.table_body_id());
        match tbody {
            Some(tbody) => self.dom.clear_children(tbody),
            None => debug!(table = view.kind.table_body_id(), "table body missing"),
        }

        let trust_bar = self.dom.first_by_class(container, "trust-bar");
        match render::section(view) {
            SectionMarkup::Offers {
                cards,
                mobile_cards,
                rows,
                updated,
            } => {
                match trust_bar {
                    Some(bar) => {
                        applied.cards = view.offer_count();
                        let anchor = match updated {
                            Some(note) => self.dom.insert_after(bar, note).unwrap_or(bar),
                            None => bar,
                        };
                        if let Some(cards) = self.dom.insert_after(anchor, cards) {
                            self.dom.insert_after(cards, mobile_cards);
                        }
                    }
                    None => debug!(section = section_id, "trust bar missing, cards skipped"),
                }
                if let Some(tbody) = tbody {
                    applied.rows = rows.len();
                    for row in rows {
                        self.dom.append(tbody, row);
                    }
                }
            }
            SectionMarkup::Notice(notice) => {
                match trust_bar {
                    Some(bar) => {
                        self.dom.insert_after(bar, notice);
                    }
                    None => {
                        self.dom.append(container, notice);
                    }
                }
                applied.notice = true;
            }
        }
        applied
    }

    /// Writes the FAQPage JSON-LD into `<head>`, replacing an earlier copy.
    pub fn inject_structured_data(&mut self) -> bool {
        let head = match self.dom.all_by_tag(self.dom.root(), "head").first() {
            Some(head) => *head,
            None => {
                debug!("document has no head, structured data skipped");
                return false;
            }
        };
        self.remove_by_id(STRUCTURED_DATA_ID);
        let json = faq::structured_data(&FAQ_ENTRIES).to_string();
        self.dom.append(
            head,
            El::new("script")
                .attr("type", "application/ld+json")
                .id(STRUCTURED_DATA_ID)
                .raw(&faq::json_for_script_tag(&json)),
        );
        true
    }

    pub fn mount_faq(&mut self, entries: &[FaqEntry]) -> Option<FaqMounted> {
        let list = match self.dom.class_within_id("faq", "faq-list") {
            Some(list) => list,
            None => {
                debug!("faq list missing, nothing mounted");
                return None;
            }
        };
        self.dom.clear_children(list);
        let items = entries
            .iter()
            .map(|entry| self.dom.append(list, faq::faq_item(entry)))
            .collect();
        Some(FaqMounted { items })
    }

    pub fn install_runtime(&mut self, script: &str) -> bool {
        let body = match self.dom.all_by_tag(self.dom.root(), "body").first() {
            Some(body) => *body,
            None => return false,
        };
        self.remove_by_id(RUNTIME_SCRIPT_ID);
        self.dom
            .append(body, El::new("script").id(RUNTIME_SCRIPT_ID).raw(script));
        true
    }

    fn remove_by_id(&mut self, id: &str) {
        while let Some(node) = self.dom.element_by_id(id) {
            self.dom.remove(node);
        }
    }

    pub fn section_container(&self, section_id: &str) -> Option<NodeId> {
        self.dom.class_within_id(section_id, "container")
    }

    pub fn to_html(&self) -> String {
        self.dom.document_html()
    }
}
