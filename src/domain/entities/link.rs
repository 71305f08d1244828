//! Tracked links and their grouping by destination URL.

use std::collections::HashMap;
use std::fmt;

/// Identifier of one tracked hyperlink instance inside a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkId(String);

impl LinkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tracked link as listed in the campaign click report.
///
/// The percentages are the provider's own per-link figures; they are only
/// used when the batch aggregation is bypassed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedLink {
    pub id: LinkId,
    pub url: String,
    pub click_percentage: f64,
    pub unique_click_percentage: f64,
}

impl TrackedLink {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        click_percentage: f64,
        unique_click_percentage: f64,
    ) -> Self {
        Self {
            id: LinkId::new(id),
            url: url.into(),
            click_percentage,
            unique_click_percentage,
        }
    }
}

/// All link ids pointing at one destination URL.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlGroup {
    pub url: String,
    pub link_ids: Vec<LinkId>,
    /// The first link seen for this URL.
    pub representative: TrackedLink,
}

/// Links grouped by destination URL, in order of first occurrence.
///
/// Every [`LinkId`] lands in exactly one group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkGroups {
    groups: Vec<UrlGroup>,
}

impl LinkGroups {
    pub fn from_links(links: impl IntoIterator<Item = TrackedLink>) -> Self {
        let mut groups: Vec<UrlGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for link in links {
            match index.get(&link.url) {
                Some(&pos) => groups[pos].link_ids.push(link.id),
                None => {
                    index.insert(link.url.clone(), groups.len());
                    groups.push(UrlGroup {
                        url: link.url.clone(),
                        link_ids: vec![link.id.clone()],
                        representative: link,
                    });
                }
            }
        }

        Self { groups }
    }

    pub fn iter(&self) -> impl Iterator<Item = &UrlGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_links(&self) -> usize {
        self.groups.iter().map(|g| g.link_ids.len()).sum()
    }
}
