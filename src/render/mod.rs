use crate::dom::{icon, El};
use crate::format::Icon;
use crate::view::{
    Campaign, CardView, DetailRow, Feature, Logo, MobileCardView, Notice, NoticeKind, SectionBody,
    SectionView, TableRowView, Value, CTA_CARD, CTA_MOBILE, MIN_PRICE_PREFIX,
};

pub const CARDS_CONTAINER: &str = "cards-container";
pub const MOBILE_CARDS: &str = "mobile-cards";
pub const SECTION_NOTICE: &str = "section-notice";
pub const UPDATED_NOTE: &str = "data-updated";

const RATING: &str = "5";
const RATING_STARS: usize = 5;

#[derive(Clone, Debug, PartialEq)]
pub enum SectionMarkup {
    Offers {
        cards: El,
        mobile_cards: El,
        rows: Vec<El>,
        updated: Option<El>,
    },
    Notice(El),
}

pub fn section(view: &SectionView) -> SectionMarkup {
    match &view.body {
        SectionBody::Offers {
            cards,
            mobile_cards,
            rows,
        } => SectionMarkup::Offers {
            cards: El::new("div")
                .class(CARDS_CONTAINER)
                .children(cards.iter().map(card)),
            mobile_cards: El::new("div")
                .class(MOBILE_CARDS)
                .children(mobile_cards.iter().map(mobile_card)),
            rows: rows.iter().map(table_row).collect(),
            updated: view
                .updated
                .as_deref()
                .map(|label| El::new("p").class(UPDATED_NOTE).text(label)),
        },
        SectionBody::Notice(notice) => SectionMarkup::Notice(notice_box(notice)),
    }
}

fn logo(class: &str, logo: &Logo) -> El {
    let el = El::new("div").class(class);
    match logo {
        Logo::Initials(text) => el.text(text),
        Logo::Icon(i) => el.child(icon(*i)),
    }
}

fn campaign_badge(campaign: &Campaign) -> El {
    El::new("span")
        .class("kampagne")
        .class(campaign.badge.css_class())
        .text(&campaign.label)
}

fn cta(label: &str, link: &str) -> El {
    El::new("a")
        .class("btn-primary")
        .attr("href", link)
        .attr("target", "_blank")
        .attr("rel", "noopener")
        .text(label)
}

fn value_node(value: &Value, text_class: &str, price_class: &str) -> El {
    match value {
        Value::Text(text) => El::new("span").class(text_class).text(text),
        Value::Price(text) => El::new("span").class(price_class).text(text),
        Value::Features(features) => El::new("span")
            .class(text_class)
            .children(features.iter().map(|f| feature("span", "tilvalg-item", f))),
    }
}

fn feature(tag: &str, class: &str, feature: &Feature) -> El {
    let el = El::new(tag).child(icon(feature.icon));
    let el = if class.is_empty() { el } else { el.class(class) };
    el.text(&format!(" {}", feature.label))
}

fn card_detail(row: &DetailRow) -> El {
    El::new("div")
        .class("card-detail-row")
        .child(El::new("span").class("card-detail-label").text(row.label))
        .child(value_node(
            &row.value,
            "card-detail-value",
            "card-detail-value price",
        ))
}

fn rating() -> El {
    El::new("div")
        .class("card-rating")
        .child(El::new("div").class("rating-badge").text(RATING))
        .child(
            El::new("div")
                .class("rating-stars")
                .children((0..RATING_STARS).map(|_| icon(Icon::Star))),
        )
}

pub fn card(view: &CardView) -> El {
    let mut el = El::new("div").class("comparison-card");
    if let Some(campaign) = view.campaign.as_ref() {
        el = el.child(
            El::new("div")
                .class("card-banner")
                .class(campaign.badge.css_class())
                .text(&campaign.label),
        );
    }
    el.child(
        El::new("div")
            .class("card-header")
            .child(logo("card-company-logo", &view.logo))
            .child(
                El::new("div")
                    .class("card-company-info")
                    .child(El::new("h3").text(&view.title))
                    .child(El::new("p").text(&view.subtitle)),
            )
            .child(rating()),
    )
    .child(
        El::new("div")
            .class("card-body")
            .child(
                El::new("div")
                    .class("card-minimum-price")
                    .text(&format!("{MIN_PRICE_PREFIX} {}", view.price)),
            )
            .child(
                El::new("div")
                    .class("card-details")
                    .children(view.details.iter().map(card_detail)),
            )
            .child(
                El::new("div")
                    .class("card-features")
                    .children(view.features.iter().map(|f| feature("div", "card-feature", f))),
            )
            .child(El::new("div").class("card-cta").child(cta(CTA_CARD, &view.link))),
    )
}

fn mobile_row(label: &str, value: El) -> El {
    El::new("div")
        .class("mobile-card-row")
        .child(El::new("span").class("mobile-card-label").text(label))
        .child(value)
}

pub fn mobile_card(view: &MobileCardView) -> El {
    let mut body = El::new("div").class("mobile-card-body").children(
        view.rows.iter().map(|row| {
            mobile_row(
                row.label,
                value_node(&row.value, "mobile-card-value", "mobile-card-value price"),
            )
        }),
    );
    if let Some(campaign) = view.campaign.as_ref() {
        body = body.child(mobile_row(
            "Kampagne",
            El::new("span")
                .class("mobile-card-value")
                .child(campaign_badge(campaign)),
        ));
    }
    body = body.child(
        El::new("div")
            .class("mobile-card-cta")
            .child(cta(CTA_MOBILE, &view.link).text(" ").child(icon(Icon::ArrowRight))),
    );

    El::new("div")
        .class("mobile-card")
        .child(
            El::new("div")
                .class("mobile-card-header")
                .child(logo("company-logo", &view.logo))
                .child(
                    El::new("div")
                        .child(El::new("h3").text(&view.title))
                        .child(El::new("p").text(&view.subtitle)),
                ),
        )
        .child(body)
}

fn table_cell(value: &Value) -> El {
    match value {
        Value::Text(text) => El::new("td").text(text),
        Value::Price(text) => El::new("td").class("price").text(text),
        Value::Features(features) => El::new("td").child(
            El::new("ul")
                .class("tilvalg-list")
                .children(features.iter().map(|f| feature("li", "", f))),
        ),
    }
}

pub fn table_row(view: &TableRowView) -> El {
    El::new("tr")
        .child(
            El::new("td").child(
                El::new("div")
                    .class("company-name")
                    .child(logo("company-logo", &view.logo))
                    .child(El::new("strong").text(&view.name)),
            ),
        )
        .children(view.cells.iter().map(table_cell))
        .child(match view.campaign.as_ref() {
            Some(campaign) => El::new("td").child(campaign_badge(campaign)),
            None => El::new("td"),
        })
        .child(El::new("td").child(cta(CTA_MOBILE, &view.link)))
}

pub fn notice_box(notice: &Notice) -> El {
    El::new("div")
        .class(SECTION_NOTICE)
        .class(match notice.kind {
            NoticeKind::Empty => "empty",
            NoticeKind::Unavailable => "unavailable",
        })
        .attr("role", "status")
        .text(&notice.message)
}
