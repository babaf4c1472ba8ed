//! Atom feeds.
//!
//! A directory with `feed_atom` set gets an Atom document listing its
//! pages by their latest revision date, newest first. Entries come from
//! the pages' cache fragments, so any format with revision info in its
//! cache data takes part.

use chrono::{NaiveDate, Utc};
use pintail_xml::{Document, Element, ns};

use crate::directory::{Directory, DirectoryId};
use crate::paths::write_file;
use crate::tree::SiteTree;
use crate::{Site, SiteError};

/// One feed entry taken from a page's cache fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FeedEntry {
    title: String,
    link: String,
    updated: NaiveDate,
    summary: String,
}

impl Site {
    /// Write the Atom feed of every directory that configures one.
    ///
    /// # Errors
    ///
    /// Returns error if a feed file can't be written.
    pub fn build_feeds(&self) -> Result<(), SiteError> {
        let tree = self.scan_site()?;
        self.visit_post_order(tree, DirectoryId::ROOT, &mut |directory| {
            let Some(file) = self.config().get("feed_atom", Some(directory.path())) else {
                return Ok(());
            };
            self.log("ATOM", &format!("{}{file}", directory.path()));
            let target = self.paths().target_dir(directory.path()).join(&file);
            let feed = self.atom_feed(tree, directory, &file);
            write_file(&target, &feed.to_xml_string())
        })
    }

    /// Atom document for the pages of `directory`.
    pub fn atom_feed(&self, tree: &SiteTree, directory: &Directory, file: &str) -> Document {
        let path = directory.path();
        let root = self
            .config()
            .get("feed_root", Some(path))
            .unwrap_or_else(|| self.config().get_site_root(Some(path)));
        let excluded = self.config().get_list("feed_exclude_styles", Some(path));
        let link_extension = self.link_extension();

        let mut entries: Vec<FeedEntry> = tree
            .directory_pages(directory.id())
            .filter_map(|page| page.get_cache_data(self, None))
            .filter_map(|fragment| feed_entry(&fragment, &excluded, &root, &link_extension))
            .collect();
        entries.sort_by(|a, b| b.updated.cmp(&a.updated).then_with(|| a.link.cmp(&b.link)));

        let base = format!("{root}{}", path.trim_start_matches('/'));
        let title = self
            .config()
            .get("feed_title", Some(path))
            .unwrap_or_else(|| path.to_owned());
        let updated = entries
            .first()
            .map_or_else(|| Utc::now().date_naive(), |e| e.updated);

        let mut feed = Element::with_ns(ns::ATOM, "feed")
            .with_attr("xmlns", ns::ATOM)
            .with_child(atom("title", &title))
            .with_child(atom("id", &base))
            .with_child(
                Element::with_ns(ns::ATOM, "link")
                    .with_attr("rel", "self")
                    .with_attr("href", format!("{base}{file}")),
            )
            .with_child(atom("updated", &atom_date(updated)));
        for entry in entries {
            let mut element = Element::with_ns(ns::ATOM, "entry")
                .with_child(atom("title", &entry.title))
                .with_child(Element::with_ns(ns::ATOM, "link").with_attr("href", &entry.link))
                .with_child(atom("id", &entry.link))
                .with_child(atom("updated", &atom_date(entry.updated)));
            if !entry.summary.is_empty() {
                element.children.push(atom("summary", &entry.summary));
            }
            feed.children.push(element);
        }
        Document::new(feed)
    }
}

/// Entry for a cache fragment with at least one revision date.
fn feed_entry(
    fragment: &Element,
    excluded_styles: &[String],
    root: &str,
    link_extension: &str,
) -> Option<FeedEntry> {
    let styles = fragment.attr("style").unwrap_or_default();
    if styles
        .split_whitespace()
        .any(|s| excluded_styles.iter().any(|x| x == s))
    {
        return None;
    }

    let info = fragment.child(ns::MALLARD, "info")?;
    let updated = info
        .children_named(ns::MALLARD, "revision")
        .filter_map(|r| r.attr("date"))
        .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .max()?;

    let site_id = fragment.attr("id")?;
    let title = fragment
        .child(ns::MALLARD, "title")
        .map(|t| normalize_space(&t.string_value()))
        .unwrap_or_default();
    let summary = info
        .child(ns::MALLARD, "desc")
        .map(|d| normalize_space(&d.string_value()))
        .unwrap_or_default();

    Some(FeedEntry {
        title,
        link: format!(
            "{root}{}{link_extension}",
            site_id.strip_prefix('/').unwrap_or(site_id)
        ),
        updated,
        summary,
    })
}

fn atom(name: &str, text: &str) -> Element {
    Element::with_ns(ns::ATOM, name).with_text(text)
}

fn atom_date(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragment(xml: &str) -> Element {
        Document::parse(xml).unwrap().root
    }

    #[test]
    fn test_entry_uses_latest_revision() {
        let page = fragment(
            r#"<page xmlns="http://projectmallard.org/1.0/" id="/blog/post">
                 <info>
                   <revision date="2021-03-01"/>
                   <revision date="2022-01-15"/>
                   <revision date="not a date"/>
                   <desc>  A   post </desc>
                 </info>
                 <title>First
                   post</title>
               </page>"#,
        );
        let entry = feed_entry(&page, &[], "https://example.com/", ".html").unwrap();
        assert_eq!(
            entry,
            FeedEntry {
                title: "First post".to_owned(),
                link: "https://example.com/blog/post.html".to_owned(),
                updated: NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
                summary: "A post".to_owned(),
            }
        );
    }

    #[test]
    fn test_entry_requires_revision() {
        let page = fragment(
            r#"<page xmlns="http://projectmallard.org/1.0/" id="/x"><info/><title>X</title></page>"#,
        );
        assert!(feed_entry(&page, &[], "/", ".html").is_none());
    }

    #[test]
    fn test_entry_excluded_by_style() {
        let page = fragment(
            r#"<page xmlns="http://projectmallard.org/1.0/" id="/x" style="guide hidden">
                 <info><revision date="2022-01-01"/></info>
               </page>"#,
        );
        let excluded = vec!["hidden".to_owned()];
        assert!(feed_entry(&page, &excluded, "/", ".html").is_none());
        assert!(feed_entry(&page, &[], "/", ".html").is_some());
    }

    #[test]
    fn test_atom_date() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(atom_date(date), "2020-02-29T00:00:00Z");
    }
}
