use crate::dom::{icon, El};
use crate::format::Icon;
use crate::model::OfferKind;

pub const FONT_AWESOME_CDN: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css";
pub const DEFAULT_TITLE: &str = "Sammenlign bilforsikring og billeasing";
pub const SITE_NAME: &str = "Bilforsikring.dk";

const NAV_LINKS: [(&str, &str); 3] = [
    ("#bilforsikring", "Bilforsikring"),
    ("#leasing", "Leasing"),
    ("#faq", "FAQ"),
];

const TRUST_ITEMS: [(Icon, &str); 3] = [
    (Icon::UserShield, "Uafhængig sammenligning"),
    (Icon::Check, "Opdaterede priser"),
    (Icon::Handshake, "Gratis at bruge"),
];

const INSURANCE_COLUMNS: [&str; 7] = [
    "Selskab",
    "Produkt",
    "Pris/måned",
    "Dækning",
    "Tilvalg",
    "Kampagne",
    "",
];

const LEASING_COLUMNS: [&str; 7] = [
    "Mærke",
    "Model",
    "Pris/måned",
    "Udbetaling",
    "Løbetid",
    "Kampagne",
    "",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageSettings {
    pub title: String,
    pub stylesheet: Option<String>,
    pub lang: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            stylesheet: Some("styles.css".to_string()),
            lang: "da".to_string(),
        }
    }
}

fn head(settings: &PageSettings) -> El {
    let mut head = El::new("head")
        .child(El::new("meta").attr("charset", "UTF-8"))
        .child(
            El::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1.0"),
        )
        .child(El::new("title").text(&settings.title));
    if let Some(href) = settings.stylesheet.as_deref() {
        head = head.child(El::new("link").attr("rel", "stylesheet").attr("href", href));
    }
    head.child(
        El::new("link")
            .attr("rel", "stylesheet")
            .attr("href", FONT_AWESOME_CDN),
    )
}

fn navbar() -> El {
    let mut hamburger = El::new("button")
        .id("nav-hamburger")
        .class("nav-hamburger")
        .attr("type", "button")
        .attr("aria-label", "Menu");
    for _ in 0..3 {
        hamburger = hamburger.child(El::new("span").class("bar"));
    }
    El::new("header").class("navbar").child(
        El::new("nav")
            .class("nav-container")
            .child(El::new("a").class("nav-logo").attr("href", "#top").text(SITE_NAME))
            .child(
                El::new("ul")
                    .id("nav-menu")
                    .class("nav-menu")
                    .children(NAV_LINKS.iter().map(|(href, label)| {
                        El::new("li")
                            .class("nav-item")
                            .child(El::new("a").class("nav-link").attr("href", href).text(label))
                    })),
            )
            .child(hamburger),
    )
}

fn hero() -> El {
    El::new("section").id("top").class("hero").child(
        El::new("div")
            .class("container")
            .child(El::new("h1").text("Find den bedste pris på bilforsikring og leasing"))
            .child(El::new("p").text(
                "Sammenlign aktuelle tilbud fra danske selskaber og find den aftale der passer dig.",
            ))
            .child(
                El::new("a")
                    .class("btn-primary")
                    .attr("href", "#bilforsikring")
                    .text("Sammenlign nu"),
            ),
    )
}

fn trust_bar() -> El {
    El::new("div")
        .class("trust-bar")
        .children(TRUST_ITEMS.iter().map(|(i, label)| {
            El::new("div")
                .class("trust-item")
                .child(icon(*i))
                .text(&format!(" {label}"))
        }))
}

fn comparison_section(kind: OfferKind, heading: &str, columns: &[&str]) -> El {
    El::new("section")
        .id(kind.section_id())
        .class("comparison-section")
        .child(
            El::new("div")
                .class("container")
                .child(El::new("h2").class("section-title").text(heading))
                .child(trust_bar())
                .child(
                    El::new("div").class("table-wrapper").child(
                        El::new("table")
                            .class("comparison-table")
                            .child(El::new("thead").child(
                                El::new("tr").children(
                                    columns.iter().map(|c| El::new("th").text(c)),
                                ),
                            ))
                            .child(El::new("tbody").id(kind.table_body_id())),
                    ),
                ),
        )
}

fn faq_section() -> El {
    El::new("section").id("faq").class("faq-section").child(
        El::new("div")
            .class("container")
            .child(El::new("h2").class("section-title").text("Ofte stillede spørgsmål"))
            .child(El::new("div").class("faq-list")),
    )
}

fn footer() -> El {
    El::new("footer").class("footer").child(
        El::new("div")
            .class("container")
            .child(El::new("p").text(&format!(
                "{SITE_NAME} sammenligner priser fra offentligt tilgængelige kilder. Priser kan ændre sig."
            ))),
    )
}

pub fn document(settings: &PageSettings) -> El {
    El::new("html")
        .attr("lang", &settings.lang)
        .child(head(settings))
        .child(
            El::new("body")
                .child(navbar())
                .child(
                    El::new("main")
                        .child(hero())
                        .child(comparison_section(
                            OfferKind::Insurance,
                            "Sammenlign bilforsikringer",
                            &INSURANCE_COLUMNS,
                        ))
                        .child(comparison_section(
                            OfferKind::Leasing,
                            "Sammenlign privatleasing",
                            &LEASING_COLUMNS,
                        ))
                        .child(faq_section()),
                )
                .child(footer()),
        )
}
