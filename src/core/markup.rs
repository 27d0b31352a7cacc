// src/core/markup.rs

// Narrow fragment view over a parsed page. The result parsers only ever
// need these few operations, so the scraper API stays contained here.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::core::sanitize::normalize_ws;

static ANY_ID: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[id]").unwrap());
static ANY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("*").unwrap());
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

/// One parsed HTML document, ready for fragment lookup.
pub struct Page {
    doc: Html,
}

impl Page {
    pub fn parse(html: &str) -> Page {
        Page { doc: Html::parse_document(html) }
    }

    /// All elements whose id matches `pattern`, in document order.
    pub fn find_by_id_pattern(&self, pattern: &Regex) -> Vec<Fragment<'_>> {
        find_by_id_pattern(self.doc.root_element(), pattern)
    }

    /// All elements carrying attribute `name` with exactly `value`,
    /// in document order.
    pub fn find_by_attr(&self, name: &str, value: &str) -> Vec<Fragment<'_>> {
        self.doc
            .root_element()
            .select(&ANY)
            .filter(|el| el.value().attr(name) == Some(value))
            .map(Fragment::new)
            .collect()
    }
}

/// A tagged sub-tree of a page. Cheap to copy; borrows the page.
#[derive(Clone, Copy)]
pub struct Fragment<'a> {
    el: ElementRef<'a>,
}

impl<'a> Fragment<'a> {
    fn new(el: ElementRef<'a>) -> Self {
        Fragment { el }
    }

    pub fn id(&self) -> Option<&'a str> {
        self.el.value().attr("id")
    }

    /// Descendants whose id matches `pattern`, in document order.
    pub fn find_by_id_pattern(&self, pattern: &Regex) -> Vec<Fragment<'a>> {
        find_by_id_pattern(self.el, pattern)
    }

    /// Text of the index-th `<td>` below this fragment, normalized.
    pub fn cell_text(&self, index: usize) -> Option<String> {
        self.el.select(&TD).nth(index).map(element_text)
    }

    /// Text of every `<td>` below this fragment, in document order.
    pub fn cells(&self) -> Vec<String> {
        self.el.select(&TD).map(element_text).collect()
    }

    /// Every `<tr>` below this fragment, in document order.
    pub fn child_rows(&self) -> Vec<Fragment<'a>> {
        self.el.select(&TR).map(Fragment::new).collect()
    }

    /// Full text content of the fragment, normalized.
    pub fn text(&self) -> String {
        element_text(self.el)
    }
}

fn find_by_id_pattern<'a>(root: ElementRef<'a>, pattern: &Regex) -> Vec<Fragment<'a>> {
    root.select(&ANY_ID)
        .filter(|el| el.value().attr("id").is_some_and(|id| pattern.is_match(id)))
        .map(Fragment::new)
        .collect()
}

fn element_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}
