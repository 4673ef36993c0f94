pub mod payload;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use payload::{Dataset, Metadata, SchemaVersion, CURRENT_SCHEMA_VERSION};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    Insurance,
    Leasing,
}

impl OfferKind {
    pub fn section_id(self) -> &'static str {
        match self {
            Self::Insurance => "bilforsikring",
            Self::Leasing => "leasing",
        }
    }

    pub fn table_body_id(self) -> &'static str {
        match self {
            Self::Insurance => "bilforsikring-table",
            Self::Leasing => "leasing-table",
        }
    }

    pub fn default_resource(self) -> &'static str {
        match self {
            Self::Insurance => "bilforsikring.json",
            Self::Leasing => "leasing.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Insurance => "insurance",
            Self::Leasing => "leasing",
        }
    }
}

pub trait Offer: for<'de> Deserialize<'de> + Serialize + Clone + std::fmt::Debug {
    const KIND: OfferKind;

    fn owner(&self) -> &str;
    fn link(&self) -> &str;
    fn campaign(&self) -> &str;

    /// Records without an owner or a link cannot be rendered meaningfully.
    fn is_renderable(&self) -> bool {
        !self.owner().trim().is_empty() && !self.link().trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct InsuranceOffer {
    #[serde(rename = "udbyder", default, deserialize_with = "nullable_string")]
    pub provider: String,
    #[serde(rename = "produkt", default, deserialize_with = "nullable_string")]
    pub product: String,
    #[serde(rename = "pris_mdr", default, deserialize_with = "nullable_string")]
    pub monthly_price: String,
    #[serde(
        rename = "pris_år",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub yearly_price: Option<String>,
    #[serde(rename = "dækning", default, deserialize_with = "nullable_string")]
    pub coverage: String,
    #[serde(rename = "tilvalg", default, deserialize_with = "nullable_list")]
    pub addons: Vec<String>,
    #[serde(rename = "kampagne", default, deserialize_with = "nullable_string")]
    pub campaign: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub link: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub reliability_score: Option<f32>,
}

impl Offer for InsuranceOffer {
    const KIND: OfferKind = OfferKind::Insurance;

    fn owner(&self) -> &str {
        &self.provider
    }

    fn link(&self) -> &str {
        &self.link
    }

    fn campaign(&self) -> &str {
        &self.campaign
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct LeasingOffer {
    #[serde(rename = "mærke", default, deserialize_with = "nullable_string")]
    pub brand: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub model: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(rename = "pris_mdr", default, deserialize_with = "nullable_string")]
    pub monthly_price: String,
    #[serde(rename = "udbetaling", default, deserialize_with = "nullable_string")]
    pub down_payment: String,
    #[serde(rename = "løbetid", default, deserialize_with = "nullable_string")]
    pub term: String,
    #[serde(
        rename = "km_år",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub km_per_year: Option<String>,
    #[serde(rename = "kampagne", default, deserialize_with = "nullable_string")]
    pub campaign: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub link: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub reliability_score: Option<f32>,
}

impl Offer for LeasingOffer {
    const KIND: OfferKind = OfferKind::Leasing;

    fn owner(&self) -> &str {
        &self.brand
    }

    fn link(&self) -> &str {
        &self.link
    }

    fn campaign(&self) -> &str {
        &self.campaign
    }
}

fn scalar_text(value: Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err("an array"),
        Value::Object(_) => Err("an object"),
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(Value::deserialize(deserializer)?)
        .map(Option::unwrap_or_default)
        .map_err(|found| D::Error::custom(format!("expected text, got {found}")))
}

// Numbers and booleans are kept as text; nested values are skipped.
fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| scalar_text(item).ok().flatten())
            .collect()),
        Value::Object(_) => Err(D::Error::custom("expected a list, got an object")),
        scalar => Ok(scalar_text(scalar).ok().flatten().into_iter().collect()),
    }
}

/// Text carried through from the scraper; anything that is not a scalar reads as absent.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or(None))
}

pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

pub(crate) fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}
