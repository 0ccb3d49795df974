//! The content types the site is built from.

use std::fmt;

use crate::normalize::{NaturalKey, NormalizeRules, SortRule};
use crate::types::ContentTypeUid;

use super::query::{ContentTypeQuery, SortDirection};

/// A content type known to the site, with its query and normalization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentKind {
    NavigationMenu,
    HeroSection,
    FeatureCard,
    BlogPost,
    CompanyLogo,
    CtaSection,
    FooterSection,
}

impl ContentKind {
    /// Every known content type.
    pub const ALL: [ContentKind; 7] = [
        ContentKind::NavigationMenu,
        ContentKind::HeroSection,
        ContentKind::FeatureCard,
        ContentKind::BlogPost,
        ContentKind::CompanyLogo,
        ContentKind::CtaSection,
        ContentKind::FooterSection,
    ];

    /// The content type UID in the stack.
    pub fn uid_str(&self) -> &'static str {
        match self {
            ContentKind::NavigationMenu => "navigation_menu",
            ContentKind::HeroSection => "hero_section",
            ContentKind::FeatureCard => "feature_card",
            ContentKind::BlogPost => "blog_post",
            ContentKind::CompanyLogo => "company_logo",
            ContentKind::CtaSection => "cta_section",
            ContentKind::FooterSection => "footer_section",
        }
    }

    pub fn content_type(&self) -> ContentTypeUid {
        ContentTypeUid::known(self.uid_str())
    }

    /// Look up a kind by its content type UID.
    pub fn from_uid(uid: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.uid_str() == uid)
    }

    /// Whether the site shows a single entry of this type.
    pub fn is_singleton(&self) -> bool {
        matches!(self, ContentKind::HeroSection | ContentKind::CtaSection)
    }

    /// The query used to fetch this type.
    pub fn query(&self) -> ContentTypeQuery {
        let query = ContentTypeQuery::new(self.content_type());
        match self {
            ContentKind::HeroSection | ContentKind::CtaSection => query.limit(1),
            ContentKind::BlogPost => query.order_by("publish_date", SortDirection::Desc),
            ContentKind::NavigationMenu
            | ContentKind::FeatureCard
            | ContentKind::CompanyLogo
            | ContentKind::FooterSection => query.order_by("order", SortDirection::Asc),
        }
    }

    /// How raw entries of this type are deduplicated and ordered.
    pub fn rules(&self) -> NormalizeRules {
        let (natural_key, sort) = match self {
            ContentKind::NavigationMenu => (
                NaturalKey::Composite(&["menu_label", "order"]),
                SortRule::OrderAscending,
            ),
            ContentKind::HeroSection | ContentKind::CtaSection => {
                (NaturalKey::FirstOf(&["uid"]), SortRule::Unordered)
            }
            ContentKind::FeatureCard => (NaturalKey::FirstOf(&["title"]), SortRule::OrderAscending),
            ContentKind::BlogPost => (
                NaturalKey::FirstOf(&["slug", "title"]),
                SortRule::DateDescending("publish_date"),
            ),
            ContentKind::CompanyLogo => (
                NaturalKey::FirstOf(&["company_name"]),
                SortRule::OrderAscending,
            ),
            ContentKind::FooterSection => (
                NaturalKey::FirstOf(&["section_title"]),
                SortRule::OrderAscending,
            ),
        };
        NormalizeRules { natural_key, sort }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uid_str())
    }
}
