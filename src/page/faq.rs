use serde_json::{json, Value};

use crate::dom::{icon, El, NodeId};
use crate::format::Icon;

pub const STRUCTURED_DATA_ID: &str = "faq-structured-data";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ_ENTRIES: [FaqEntry; 3] = [
    FaqEntry {
        question: "Hvad koster bilforsikring i Danmark?",
        answer: "Prisen på bilforsikring varierer afhængigt af bilens værdi, din køreerfaring og valgte dækning. Basis ansvarforsikring starter typisk fra 400 kr. om måneden, mens fuld kasko kan koste 800-1500 kr. om måneden.",
    },
    FaqEntry {
        question: "Hvad er forskellen mellem privatleasing og erhvervsleasing?",
        answer: "Privatleasing er til private personer, mens erhvervsleasing er til virksomheder. Erhvervsleasing kan ofte være billigere på grund af skattefordele, men kræver at bilen bruges til erhvervsformål.",
    },
    FaqEntry {
        question: "Kan jeg lease en elbil uden udbetaling?",
        answer: "Ja, mange leasingudbydere tilbyder leasing uden udbetaling, især for elbiler. Dette kan dog betyde en højere månedlig ydelse sammenlignet med leasing med udbetaling.",
    },
];

/// Only handed out by [`super::Page::mount_faq`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqMounted {
    pub(crate) items: Vec<NodeId>,
}

impl FaqMounted {
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }
}

pub fn faq_item(entry: &FaqEntry) -> El {
    El::new("div")
        .class("faq-card")
        .child(
            El::new("button")
                .class("faq-header")
                .attr("type", "button")
                .child(El::new("span").class("faq-question").text(entry.question))
                .child(icon(Icon::ChevronDown)),
        )
        .child(
            El::new("div")
                .class("faq-body")
                .child(El::new("p").text(entry.answer)),
        )
}

pub fn structured_data(entries: &[FaqEntry]) -> Value {
    let main_entity: Vec<Value> = entries
        .iter()
        .map(|e| {
            json!({
                "@type": "Question",
                "name": e.question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": e.answer,
                }
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": main_entity,
    })
}

pub fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}
