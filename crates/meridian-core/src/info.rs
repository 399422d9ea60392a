//! Domain information served by the RPC engine.
//!
//! `InfoProvider` is the seam between the session machinery and the payload
//! it serves. `CompanyProfile` is the production implementation: a pure
//! formatter over configured strings, deterministic for every category.

/// Category selector for the `company.info` method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoCategory {
    Overview,
    Focus,
    Contact,
    Investment,
    All,
}

impl InfoCategory {
    /// Parse a client-supplied selector. The default branch is explicit:
    /// an absent or unrecognized value means `All`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("overview") => Self::Overview,
            Some("focus") => Self::Focus,
            Some("contact") => Self::Contact,
            Some("investment") => Self::Investment,
            Some(_) | None => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Focus => "focus",
            Self::Contact => "contact",
            Self::Investment => "investment",
            Self::All => "all",
        }
    }
}

/// External collaborator that turns a category into formatted text.
///
/// Implementations must be pure functions of the category — repeated calls
/// yield identical text.
pub trait InfoProvider: Send + Sync {
    fn describe(&self, category: InfoCategory) -> String;
}

/// Configured company facts, formatted per category.
#[derive(Clone, Debug)]
pub struct CompanyProfile {
    pub name: String,
    pub tagline: String,
    pub overview: String,
    pub focus_areas: Vec<String>,
    pub website: String,
    pub email: String,
    pub investment_thesis: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: "Meridian Ventures".into(),
            tagline: "Early-stage capital for systems software".into(),
            overview: "Meridian Ventures is an early-stage venture firm backing \
                       founders who build foundational software: the runtimes, \
                       protocols, and infrastructure other companies are built on."
                .into(),
            focus_areas: vec![
                "Developer tooling".into(),
                "Data infrastructure".into(),
                "Applied cryptography".into(),
                "Edge networking".into(),
            ],
            website: "https://meridian.vc".into(),
            email: "hello@meridian.vc".into(),
            investment_thesis: "We lead pre-seed and seed rounds of $500K to $3M, \
                                and we work hands-on with technical founders from \
                                first commit to Series A."
                .into(),
        }
    }
}

impl CompanyProfile {
    fn overview_text(&self) -> String {
        format!("{} — {}\n\n{}", self.name, self.tagline, self.overview)
    }

    fn focus_text(&self) -> String {
        let areas: Vec<String> = self.focus_areas.iter().map(|a| format!("- {a}")).collect();
        format!("{} focus areas:\n{}", self.name, areas.join("\n"))
    }

    fn contact_text(&self) -> String {
        format!(
            "Reach {} at {} or visit {}.",
            self.name, self.email, self.website
        )
    }

    fn investment_text(&self) -> String {
        format!("Investment approach: {}", self.investment_thesis)
    }
}

impl InfoProvider for CompanyProfile {
    fn describe(&self, category: InfoCategory) -> String {
        match category {
            InfoCategory::Overview => self.overview_text(),
            InfoCategory::Focus => self.focus_text(),
            InfoCategory::Contact => self.contact_text(),
            InfoCategory::Investment => self.investment_text(),
            InfoCategory::All => [
                self.overview_text(),
                self.focus_text(),
                self.investment_text(),
                self.contact_text(),
            ]
            .join("\n\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_selector_defaults_to_all() {
        assert_eq!(InfoCategory::parse(None), InfoCategory::All);
    }

    #[test]
    fn unrecognized_selector_falls_to_all() {
        assert_eq!(InfoCategory::parse(Some("finances")), InfoCategory::All);
        assert_eq!(InfoCategory::parse(Some("")), InfoCategory::All);
        // Matching is exact; case variants take the default branch too.
        assert_eq!(InfoCategory::parse(Some("Overview")), InfoCategory::All);
    }

    #[test]
    fn known_selectors_parse() {
        assert_eq!(InfoCategory::parse(Some("overview")), InfoCategory::Overview);
        assert_eq!(InfoCategory::parse(Some("focus")), InfoCategory::Focus);
        assert_eq!(InfoCategory::parse(Some("contact")), InfoCategory::Contact);
        assert_eq!(
            InfoCategory::parse(Some("investment")),
            InfoCategory::Investment
        );
        assert_eq!(InfoCategory::parse(Some("all")), InfoCategory::All);
    }

    #[test]
    fn describe_is_deterministic() {
        let profile = CompanyProfile::default();
        for category in [
            InfoCategory::Overview,
            InfoCategory::Focus,
            InfoCategory::Contact,
            InfoCategory::Investment,
            InfoCategory::All,
        ] {
            assert_eq!(profile.describe(category), profile.describe(category));
        }
    }

    #[test]
    fn categories_yield_distinct_text() {
        let profile = CompanyProfile::default();
        let overview = profile.describe(InfoCategory::Overview);
        let focus = profile.describe(InfoCategory::Focus);
        let contact = profile.describe(InfoCategory::Contact);
        let investment = profile.describe(InfoCategory::Investment);
        assert_ne!(overview, focus);
        assert_ne!(focus, contact);
        assert_ne!(contact, investment);
    }

    #[test]
    fn contact_contains_website_and_email() {
        let profile = CompanyProfile::default();
        let text = profile.describe(InfoCategory::Contact);
        assert!(text.contains(&profile.website));
        assert!(text.contains(&profile.email));
    }

    #[test]
    fn all_concatenates_every_section() {
        let profile = CompanyProfile::default();
        let all = profile.describe(InfoCategory::All);
        assert!(all.contains(&profile.overview));
        assert!(all.contains(&profile.focus_areas[0]));
        assert!(all.contains(&profile.email));
        assert!(all.contains(&profile.investment_thesis));
    }
}
