use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeClass {
    Positive,
    Standard,
    Limited,
}

impl BadgeClass {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Standard => "standard",
            Self::Limited => "limited",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    ShieldAlt,
    Search,
    Tools,
    Plane,
    ChargingStation,
    Check,
    Bolt,
    Car,
    BatteryFull,
    Leaf,
    CarSide,
    Star,
    ArrowRight,
    ChevronDown,
    UserShield,
    Handshake,
}

impl Icon {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::ShieldAlt => "fa-shield-alt",
            Self::Search => "fa-search",
            Self::Tools => "fa-tools",
            Self::Plane => "fa-plane",
            Self::ChargingStation => "fa-charging-station",
            Self::Check => "fa-check",
            Self::Bolt => "fa-bolt",
            Self::Car => "fa-car",
            Self::BatteryFull => "fa-battery-full",
            Self::Leaf => "fa-leaf",
            Self::CarSide => "fa-car-side",
            Self::Star => "fa-star",
            Self::ArrowRight => "fa-arrow-right",
            Self::ChevronDown => "fa-chevron-down",
            Self::UserShield => "fa-user-shield",
            Self::Handshake => "fa-handshake",
        }
    }
}

// checked in order, first category with a matching keyword wins
const BADGE_KEYWORDS: [(BadgeClass, &[&str]); 3] = [
    (BadgeClass::Positive, &["gratis", "rabat"]),
    (BadgeClass::Standard, &["online", "standard"]),
    (BadgeClass::Limited, &["kun", "begrænset"]),
];

const ADDON_ICONS: [(&str, Icon); 5] = [
    ("kasko", Icon::ShieldAlt),
    ("glasskade", Icon::Search),
    ("vejhjælp", Icon::Tools),
    ("rejse", Icon::Plane),
    ("elbil", Icon::ChargingStation),
];

const BRAND_ICONS: [(&str, Icon); 4] = [
    ("tesla", Icon::Bolt),
    ("volkswagen", Icon::Car),
    ("kia", Icon::BatteryFull),
    ("toyota", Icon::Leaf),
];

pub fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect()
}

/// First letter of a name, used as the compact logo on mobile cards.
pub fn first_letter_of(name: &str) -> String {
    name.trim().chars().next().map(String::from).unwrap_or_default()
}

pub fn badge_class_for(campaign: &str) -> BadgeClass {
    let lower = campaign.to_lowercase();
    BADGE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(class, _)| *class)
        .unwrap_or(BadgeClass::Standard)
}

pub fn icon_for(addon: &str) -> Icon {
    let lower = addon.to_lowercase();
    ADDON_ICONS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(Icon::Check)
}

pub fn brand_icon_for(brand: &str) -> Icon {
    let lower = brand.trim().to_lowercase();
    BRAND_ICONS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, icon)| *icon)
        .unwrap_or(Icon::CarSide)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_letters_of_first_two_words() {
        assert_eq!(initials_of("Alm. Brand"), "AB");
        assert_eq!(initials_of("Tryg"), "T");
        assert_eq!(initials_of("Det Sikre Selskab"), "DS");
        assert_eq!(initials_of("  If   Skadeforsikring "), "IS");
    }

    #[test]
    fn initials_never_exceed_two_chars_or_word_count() {
        for name in ["", "a", "Æble Øl Å", "x y z w", "Codan", "   "] {
            let out = initials_of(name);
            let words = name.split_whitespace().count();
            assert!(out.chars().count() <= 2, "{name:?} -> {out:?}");
            assert!(out.chars().count() <= words, "{name:?} -> {out:?}");
        }
        assert_eq!(initials_of("Æble Øl"), "ÆØ");
    }

    #[test]
    fn badge_class_follows_check_order() {
        assert_eq!(badge_class_for("Første måned gratis"), BadgeClass::Positive);
        assert_eq!(badge_class_for("10% RABAT"), BadgeClass::Positive);
        assert_eq!(badge_class_for("Online pris"), BadgeClass::Standard);
        assert_eq!(badge_class_for("Kun i dag"), BadgeClass::Limited);
        assert_eq!(badge_class_for("BEGRÆNSET antal"), BadgeClass::Limited);
        // positive is checked before limited
        assert_eq!(badge_class_for("Kun i dag: gratis vejhjælp"), BadgeClass::Positive);
        assert_eq!(badge_class_for(""), BadgeClass::Standard);
        assert_eq!(badge_class_for("Sommerkampagne"), BadgeClass::Standard);
    }

    #[test]
    fn addon_icons_match_first_keyword() {
        assert_eq!(icon_for("Kasko"), Icon::ShieldAlt);
        assert_eq!(icon_for("Glasskade"), Icon::Search);
        assert_eq!(icon_for("Vejhjælp"), Icon::Tools);
        assert_eq!(icon_for("VEJHJÆLP 24/7"), Icon::Tools);
        assert_eq!(icon_for("Rejseforsikring"), Icon::Plane);
        assert_eq!(icon_for("Elbil-dækning"), Icon::ChargingStation);
        assert_eq!(icon_for("Kasko inkl. glasskade"), Icon::ShieldAlt);
        assert_eq!(icon_for("Parkeringsskade"), Icon::Check);
        assert_eq!(icon_for(""), Icon::Check);
    }

    #[test]
    fn brand_icons_require_exact_name() {
        assert_eq!(brand_icon_for("Tesla"), Icon::Bolt);
        assert_eq!(brand_icon_for("VOLKSWAGEN"), Icon::Car);
        assert_eq!(brand_icon_for("kia"), Icon::BatteryFull);
        assert_eq!(brand_icon_for("Toyota"), Icon::Leaf);
        assert_eq!(brand_icon_for("Tesla Motors"), Icon::CarSide);
        assert_eq!(brand_icon_for(""), Icon::CarSide);
    }

    #[test]
    fn first_letter_handles_empty() {
        assert_eq!(first_letter_of("Topdanmark"), "T");
        assert_eq!(first_letter_of(""), "");
    }
}
