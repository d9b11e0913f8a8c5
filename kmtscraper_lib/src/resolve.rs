//! Resolution of a reaction detail page into a [`ReactionRecord`].

use kmt_archive::types::ReactionRecord;
use kmt_archive::Client;
use regex::Regex;

use crate::extract::extract;

/// Anchor whose whole visible text is "XML", any case.
const XML_LINK_PATTERN: &str = r#"(?i)<a[^>]+href="([^"]+)"[^>]*>\s*XML\s*</a>"#;

/// Turns detail-page URLs into reaction records over plain HTTP.
///
/// Each detail page links its structured data as a separate XML document;
/// both requests go through the lightweight client, so its session must be
/// in step with the browser (see [`crate::bridge::sync_session`]).
pub struct DetailResolver<'a> {
    client: &'a Client,
    xml_link: Option<Regex>,
}

impl<'a> DetailResolver<'a> {
    pub fn new(client: &'a Client) -> Self {
        let xml_link = Regex::new(XML_LINK_PATTERN)
            .map_err(|e| tracing::error!("XML link pattern failed to compile: {}", e))
            .ok();
        Self { client, xml_link }
    }

    /// Resolves one detail page, or `None` if any step comes up empty.
    pub async fn resolve(&self, detail_url: &str) -> Option<ReactionRecord> {
        let html = self.client.get(detail_url).await?;

        let Some(href) = self.find_xml_link(&html) else {
            tracing::debug!("No XML link on {}", detail_url);
            return None;
        };
        let xml_url = self.client.absolute_url(&href);

        let payload = self.client.get(&xml_url).await?;
        let extracted = extract(&payload);
        if extracted.is_empty() {
            tracing::debug!("XML payload {} carried no reaction data", xml_url);
        }
        Some(ReactionRecord::new(detail_url.to_string(), extracted))
    }

    /// Target of the page's "XML" download link, entity-decoded.
    pub fn find_xml_link(&self, html: &str) -> Option<String> {
        let cap = self.xml_link.as_ref()?.captures(html)?;
        let href = cap.get(1)?.as_str();
        Some(html_escape::decode_html_entities(href).into_owned())
    }
}
