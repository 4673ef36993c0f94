use serde::Serialize;

use crate::format::{self, BadgeClass, Icon};
use crate::model::{Dataset, InsuranceOffer, LeasingOffer, Offer, OfferKind};

pub const CTA_CARD: &str = "Se Tilbud";
pub const CTA_MOBILE: &str = "Se tilbud";
pub const MIN_PRICE_PREFIX: &str = "Mindstepris";
pub const LEASING_SUBTITLE: &str = "Privatleasing";
pub const EMPTY_MESSAGE: &str = "Der er ingen tilbud at vise lige nu.";
pub const UNAVAILABLE_MESSAGE: &str = "Tilbuddene kunne ikke hentes. Prøv igen senere.";

const LEASING_FEATURES: [&str; 2] = ["Oprettelse 0,-", "Ingen binding"];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Logo {
    Initials(String),
    Icon(Icon),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Campaign {
    pub label: String,
    pub badge: BadgeClass,
}

impl Campaign {
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Some(Self {
            label: label.to_string(),
            badge: format::badge_class_for(label),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Feature {
    pub icon: Icon,
    pub label: String,
}

impl Feature {
    fn addon(label: &str) -> Self {
        Self {
            icon: format::icon_for(label),
            label: label.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    Text(String),
    Price(String),
    Features(Vec<Feature>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: Value,
}

impl DetailRow {
    fn text(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: Value::Text(value.to_string()),
        }
    }

    fn price(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: Value::Price(value.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardView {
    pub logo: Logo,
    pub title: String,
    pub subtitle: String,
    pub campaign: Option<Campaign>,
    pub price: String,
    pub details: Vec<DetailRow>,
    pub features: Vec<Feature>,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MobileCardView {
    pub logo: Logo,
    pub title: String,
    pub subtitle: String,
    pub rows: Vec<DetailRow>,
    pub campaign: Option<Campaign>,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableRowView {
    pub logo: Logo,
    pub name: String,
    pub cells: Vec<Value>,
    pub campaign: Option<Campaign>,
    pub link: String,
}

pub trait OfferView: Offer {
    fn card(&self) -> CardView;
    fn mobile_card(&self) -> MobileCardView;
    fn table_row(&self) -> TableRowView;
}

impl OfferView for InsuranceOffer {
    fn card(&self) -> CardView {
        let mut details = vec![
            DetailRow::price("Pris måned", &self.monthly_price),
            DetailRow::text("Dækning", &self.coverage),
        ];
        if let Some(yearly) = self.yearly_price.as_deref() {
            details.push(DetailRow::price("Pris år", yearly));
        }
        CardView {
            logo: Logo::Initials(format::initials_of(&self.provider)),
            title: self.provider.clone(),
            subtitle: self.product.clone(),
            campaign: Campaign::from_label(&self.campaign),
            price: self.monthly_price.clone(),
            details,
            features: self.addons.iter().map(|a| Feature::addon(a)).collect(),
            link: self.link.clone(),
        }
    }

    fn mobile_card(&self) -> MobileCardView {
        MobileCardView {
            logo: Logo::Initials(format::first_letter_of(&self.provider)),
            title: self.provider.clone(),
            subtitle: self.product.clone(),
            rows: vec![
                DetailRow::price("Pris/måned", &self.monthly_price),
                DetailRow::text("Dækning", &self.coverage),
                DetailRow {
                    label: "Tilvalg",
                    value: Value::Features(self.addons.iter().map(|a| Feature::addon(a)).collect()),
                },
            ],
            // one badge mapping for banner, mobile row and table cell
            campaign: Campaign::from_label(&self.campaign),
            link: self.link.clone(),
        }
    }

    fn table_row(&self) -> TableRowView {
        TableRowView {
            logo: Logo::Initials(format::initials_of(&self.provider)),
            name: self.provider.clone(),
            cells: vec![
                Value::Text(self.product.clone()),
                Value::Price(self.monthly_price.clone()),
                Value::Text(self.coverage.clone()),
                Value::Features(self.addons.iter().map(|a| Feature::addon(a)).collect()),
            ],
            campaign: Campaign::from_label(&self.campaign),
            link: self.link.clone(),
        }
    }
}

impl LeasingOffer {
    fn model_line(&self) -> String {
        match self.variant.as_deref().map(str::trim) {
            Some(variant) if !variant.is_empty() => format!("{} {}", self.model, variant),
            _ => self.model.clone(),
        }
    }
}

impl OfferView for LeasingOffer {
    fn card(&self) -> CardView {
        let mut details = vec![
            DetailRow::price("Pris måned", &self.monthly_price),
            DetailRow::text("Udbetaling", &self.down_payment),
            DetailRow::text("Løbetid", &self.term),
        ];
        if let Some(km) = self.km_per_year.as_deref() {
            details.push(DetailRow::text("Km/år", km));
        }
        CardView {
            logo: Logo::Icon(format::brand_icon_for(&self.brand)),
            title: self.brand.clone(),
            subtitle: self.model_line(),
            campaign: Campaign::from_label(&self.campaign),
            price: self.monthly_price.clone(),
            details,
            features: LEASING_FEATURES
                .iter()
                .map(|label| Feature {
                    icon: Icon::Check,
                    label: label.to_string(),
                })
                .collect(),
            link: self.link.clone(),
        }
    }

    fn mobile_card(&self) -> MobileCardView {
        MobileCardView {
            logo: Logo::Icon(format::brand_icon_for(&self.brand)),
            title: format!("{} {}", self.brand, self.model_line()).trim().to_string(),
            subtitle: LEASING_SUBTITLE.to_string(),
            rows: vec![
                DetailRow::price("Pris/måned", &self.monthly_price),
                DetailRow::text("Udbetaling", &self.down_payment),
                DetailRow::text("Løbetid", &self.term),
            ],
            // one badge mapping for banner, mobile row and table cell
            campaign: Campaign::from_label(&self.campaign),
            link: self.link.clone(),
        }
    }

    fn table_row(&self) -> TableRowView {
        TableRowView {
            logo: Logo::Icon(format::brand_icon_for(&self.brand)),
            name: self.brand.clone(),
            cells: vec![
                Value::Text(self.model_line()),
                Value::Price(self.monthly_price.clone()),
                Value::Text(self.down_payment.clone()),
                Value::Text(self.term.clone()),
            ],
            campaign: Campaign::from_label(&self.campaign),
            link: self.link.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Empty,
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SectionBody {
    Offers {
        cards: Vec<CardView>,
        mobile_cards: Vec<MobileCardView>,
        rows: Vec<TableRowView>,
    },
    Notice(Notice),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SectionView {
    pub kind: OfferKind,
    pub updated: Option<String>,
    pub body: SectionBody,
}

impl SectionView {
    pub fn from_dataset<T: OfferView>(dataset: &Dataset<T>) -> Self {
        if dataset.is_empty() {
            return Self::notice(T::KIND, NoticeKind::Empty);
        }
        Self {
            kind: T::KIND,
            updated: dataset.metadata.last_updated.as_deref().map(updated_label),
            body: SectionBody::Offers {
                cards: dataset.data.iter().map(OfferView::card).collect(),
                mobile_cards: dataset.data.iter().map(OfferView::mobile_card).collect(),
                rows: dataset.data.iter().map(OfferView::table_row).collect(),
            },
        }
    }

    pub fn notice(kind: OfferKind, notice: NoticeKind) -> Self {
        let message = match notice {
            NoticeKind::Empty => EMPTY_MESSAGE,
            NoticeKind::Unavailable => UNAVAILABLE_MESSAGE,
        };
        Self {
            kind,
            updated: None,
            body: SectionBody::Notice(Notice {
                kind: notice,
                message: message.to_string(),
            }),
        }
    }

    pub fn offer_count(&self) -> usize {
        match &self.body {
            SectionBody::Offers { cards, .. } => cards.len(),
            SectionBody::Notice(_) => 0,
        }
    }
}

/// `2024-05-01T10:00:00` -> `Sidst opdateret: 2024-05-01`
fn updated_label(raw: &str) -> String {
    let date = raw.split('T').next().unwrap_or(raw).trim();
    format!("Sidst opdateret: {date}")
}
