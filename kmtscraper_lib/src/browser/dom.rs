//! Queries over a rendered page snapshot.
//!
//! Each function parses the HTML it is given and returns owned data, so no
//! parsed document is held across an `.await`.

use kmt_archive::types::{CollectionRef, DetailLinkRef};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::BrowserError;

/// "Details" buttons on a collection page: outlined info buttons whose id
/// carries the `title-` prefix.
pub const DETAIL_LINK_SELECTOR: &str = "a.btn.btn-outline-info[id^='title-']";
pub const DETAIL_LABEL: &str = "Details";
pub const NEXT_LABEL: &str = "Next";
pub const COLLECTION_LABEL: &str = "reaction data";
/// Class set on the pagination item wrapping an inactive control.
pub const DISABLED_CLASS: &str = "disabled";

/// An `<a>` element of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Position among all anchors of the document, in document order.
    pub index: usize,
    /// Visible text with whitespace collapsed.
    pub text: String,
    pub href: Option<String>,
    /// Class list of the immediate parent element.
    pub parent_classes: Vec<String>,
}

impl Anchor {
    pub fn parent_has_class(&self, class: &str) -> bool {
        self.parent_classes.iter().any(|c| c == class)
    }
}

/// The pagination control chosen on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextControl {
    pub anchor: Anchor,
    pub disabled: bool,
}

fn selector(css: &str) -> Result<Selector, BrowserError> {
    Selector::parse(css).map_err(|e| BrowserError::Dom(format!("invalid selector {}: {:?}", css, e)))
}

fn visible_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_anchor(index: usize, element: ElementRef<'_>) -> Anchor {
    let parent_classes = element
        .parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.value().classes().map(str::to_string).collect())
        .unwrap_or_default();
    Anchor {
        index,
        text: visible_text(&element),
        href: element.value().attr("href").map(str::to_string),
        parent_classes,
    }
}

/// Every anchor of the document, in document order.
///
/// Indices line up with the live DOM's `document.querySelectorAll('a')`
/// except for anchors inside `<template>`, which the parser counts and the
/// live DOM does not. A drifted index fails the text check in
/// [`BrowserContext::click_anchor`](super::BrowserContext::click_anchor) and
/// ends pagination instead of clicking the wrong link.
pub fn anchors(html: &str) -> Result<Vec<Anchor>, BrowserError> {
    let document = Html::parse_document(html);
    let all = selector("a")?;
    Ok(document
        .select(&all)
        .enumerate()
        .map(|(index, element)| to_anchor(index, element))
        .collect())
}

/// Resolves `href` the way the browser does for an anchor on `page_url`.
pub fn resolve_href(page_url: &str, href: &str) -> Option<String> {
    match Url::parse(page_url) {
        Ok(base) => base.join(href).ok().map(String::from),
        Err(_) => Url::parse(href).ok().map(String::from),
    }
}

/// Detail-page links of a collection listing, in page order.
///
/// Only styled buttons whose label contains "Details" count.
pub fn detail_links(html: &str, page_url: &str) -> Result<Vec<DetailLinkRef>, BrowserError> {
    let document = Html::parse_document(html);
    let buttons = selector(DETAIL_LINK_SELECTOR)?;
    Ok(document
        .select(&buttons)
        .filter(|button| visible_text(button).contains(DETAIL_LABEL))
        .filter_map(|button| button.value().attr("href"))
        .filter_map(|href| resolve_href(page_url, href))
        .collect())
}

/// Collection entry points listed on the archive root, in document order.
pub fn collection_links(html: &str, page_url: &str) -> Result<Vec<CollectionRef>, BrowserError> {
    Ok(anchors(html)?
        .into_iter()
        .filter(|anchor| anchor.text.contains(COLLECTION_LABEL))
        .filter_map(|anchor| anchor.href)
        .filter_map(|href| resolve_href(page_url, &href))
        .collect())
}

/// The authoritative "Next" control of a page, if there is one.
///
/// Listings may render the control more than once; the last one wins.
pub fn next_control(html: &str) -> Result<Option<NextControl>, BrowserError> {
    let last = anchors(html)?
        .into_iter()
        .filter(|anchor| anchor.text.contains(NEXT_LABEL))
        .last();
    Ok(last.map(|anchor| NextControl {
        disabled: anchor.parent_has_class(DISABLED_CLASS),
        anchor,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://kmt.vander-lingen.nl/data/reaction/doi/10.1021/x?page=2";

    fn listing(next_item_class: &str) -> String {
        format!(
            r#"<html><body>
<div class="card">
  <a id="title-1" class="btn btn-outline-info" href="/data/reaction/details/1">Details</a>
  <a id="title-2" class="btn btn-outline-info btn-sm" href="https://kmt.vander-lingen.nl/data/reaction/details/2">
      Details
  </a>
  <a id="title-3" class="btn btn-outline-info" href="/data/reaction/details/3">Download</a>
  <a id="other-4" class="btn btn-outline-info" href="/data/reaction/details/4">Details</a>
  <a id="title-5" class="btn btn-primary" href="/data/reaction/details/5">Details</a>
  <a id="title-6" class="btn btn-outline-info">Details</a>
</div>
<ul class="pagination">
  <li class="page-item"><a class="page-link" href="?page=1">Previous</a></li>
  <li class="page-item"><a class="page-link" href="?page=3">Next</a></li>
</ul>
<ul class="pagination">
  <li class="{next_item_class}"><a class="page-link" href="?page=3">Next &raquo;</a></li>
</ul>
</body></html>"#
        )
    }

    #[test]
    fn detail_links_match_class_prefix_and_label() {
        let links = detail_links(&listing("page-item"), PAGE_URL).unwrap();
        assert_eq!(
            links,
            vec![
                "https://kmt.vander-lingen.nl/data/reaction/details/1".to_string(),
                "https://kmt.vander-lingen.nl/data/reaction/details/2".to_string(),
            ]
        );
    }

    #[test]
    fn last_next_control_is_authoritative() {
        let control = next_control(&listing("page-item")).unwrap().unwrap();
        assert_eq!(control.anchor.text, "Next »");
        assert!(!control.disabled);
        // six detail buttons, then Previous and two Next anchors
        assert_eq!(control.anchor.index, 8);
    }

    #[test]
    fn disabled_parent_marks_end_of_listing() {
        let control = next_control(&listing("page-item disabled"))
            .unwrap()
            .unwrap();
        assert!(control.disabled);
    }

    #[test]
    fn page_without_next_has_no_control() {
        let html = r#"<a href="/x">Previous</a><span>Next</span>"#;
        assert_eq!(next_control(html).unwrap(), None);
    }

    #[test]
    fn collection_links_filter_on_label() {
        let html = r#"<html><body>
<a href="/data/reaction/doi/10.1021/a">Download reaction data</a>
<a href="/about">About</a>
<a href="https://kmt.vander-lingen.nl/data/reaction/doi/10.1021/b">reaction data (42)</a>
<a>reaction data without target</a>
<a href="/data/c">Reaction Data</a>
</body></html>"#;
        let links = collection_links(html, "https://kmt.vander-lingen.nl/archive").unwrap();
        assert_eq!(
            links,
            vec![
                "https://kmt.vander-lingen.nl/data/reaction/doi/10.1021/a".to_string(),
                "https://kmt.vander-lingen.nl/data/reaction/doi/10.1021/b".to_string(),
            ]
        );
    }

    #[test]
    fn resolve_href_handles_relative_forms() {
        assert_eq!(
            resolve_href(PAGE_URL, "?page=3").as_deref(),
            Some("https://kmt.vander-lingen.nl/data/reaction/doi/10.1021/x?page=3")
        );
        assert_eq!(
            resolve_href(PAGE_URL, "/archive").as_deref(),
            Some("https://kmt.vander-lingen.nl/archive")
        );
        assert_eq!(
            resolve_href("not a url", "https://example.org/a").as_deref(),
            Some("https://example.org/a")
        );
        assert_eq!(resolve_href("not a url", "/relative"), None);
    }
}
