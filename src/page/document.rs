//! Static HTML documents and their visible-text rendering.

use super::{Element, Locator};
use crate::{Result, ScrapeError};
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose content is never visible.
const HIDDEN: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe", "object",
];

/// Elements rendered on their own lines.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul", "button", "option",
];

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector(format!("{selector}: {e:?}")))
}

/// Render the visible text of `element` the way a browser lays it out:
/// block elements start new lines, runs of whitespace collapse, blank lines
/// are dropped.
pub fn render_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_children(element, &mut raw);
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_inline(out, text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_element(child, out);
                }
            }
            _ => {}
        }
    }
}

fn push_element(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if HIDDEN.contains(&name) {
        return;
    }
    if name == "br" {
        out.push('\n');
        return;
    }

    let block = BLOCKS.contains(&name);
    if block {
        out.push('\n');
    }
    push_children(element, out);
    if block {
        out.push('\n');
    }
}

fn push_inline(out: &mut String, text: &str) {
    let mut words = text.split_whitespace().peekable();
    if words.peek().is_none() {
        if !text.is_empty() && !out.ends_with([' ', '\n']) {
            out.push(' ');
        }
        return;
    }
    if text.starts_with(char::is_whitespace) && !out.ends_with([' ', '\n']) {
        out.push(' ');
    }
    let joined = words.collect::<Vec<_>>().join(" ");
    out.push_str(&joined);
    if text.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

fn snapshot(element: ElementRef<'_>) -> Element {
    element
        .value()
        .attrs()
        .fold(Element::new(render_text(element)), |snapshot, (name, value)| {
            snapshot.with_attribute(name, value)
        })
}

/// A parsed page plus the source it was parsed from.
///
/// Pages can grow: [`HtmlPage::append`] merges the body of another document
/// into this one, which is how "load more" links are emulated without a
/// script engine.
pub struct HtmlPage {
    url: String,
    source: String,
    document: Html,
}

impl HtmlPage {
    pub fn parse(url: &str, source: String) -> Self {
        let document = Html::parse_document(&source);
        Self {
            url: url.to_string(),
            source,
            document,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Visible text of `<body>`, or of the whole document if it has none.
    pub fn body_text(&self) -> String {
        let body = Selector::parse("body").unwrap();
        match self.document.select(&body).next() {
            Some(body) => render_text(body),
            None => render_text(self.document.root_element()),
        }
    }

    pub fn title(&self) -> String {
        let title = Selector::parse("title").unwrap();
        self.document
            .select(&title)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Snapshots of every element matching `locator`, in document order.
    pub fn select(&self, locator: &Locator) -> Result<Vec<Element>> {
        let selector = parse_selector(locator.selector())?;
        let descendant = locator
            .descendant_selector()
            .map(parse_selector)
            .transpose()?;

        let mut elements = Vec::new();
        for element in self.document.select(&selector) {
            if locator.text_filter().is_some() && !locator.accepts_text(&render_text(element)) {
                continue;
            }
            match &descendant {
                Some(descendant) => elements.extend(element.select(descendant).map(snapshot)),
                None => elements.push(snapshot(element)),
            }
        }
        Ok(elements)
    }

    /// Merge the body of `other` into the end of this page's body.
    pub fn append(&mut self, other: &str) {
        let body = Selector::parse("body").unwrap();
        let incoming = Html::parse_document(other);
        let fragment = match incoming.select(&body).next() {
            Some(body) => body.inner_html(),
            None => other.to_string(),
        };

        match self.source.to_ascii_lowercase().rfind("</body>") {
            Some(position) => self.source.insert_str(position, &fragment),
            None => self.source.push_str(&fragment),
        }
        self.document = Html::parse_document(&self.source);
    }
}
