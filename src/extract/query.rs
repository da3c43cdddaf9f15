//! Tree queries over a parsed page. Every extractor is written against these primitives
//! rather than against raw markup.

use scraper::{ElementRef, Selector};

/// Parse a CSS selector. An invalid one is logged and matches nothing.
fn parse_selector(css: &str) -> Option<Selector> {
    Selector::parse(css)
        .map_err(|e| tracing::warn!(selector = css, error = %e, "invalid selector"))
        .ok()
}

/// Element children in document order. Text and comment nodes are skipped.
pub fn children<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

/// Descendants of `el` matching `css`, in document order, never `el` itself.
pub fn select_all<'a>(el: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = parse_selector(css) else {
        return Vec::new();
    };
    el.select(&selector).filter(|e| e.id() != el.id()).collect()
}

/// Descendant elements named `tag` in document order, not including `el` itself.
pub fn find_all<'a>(el: ElementRef<'a>, tag: &'static str) -> impl Iterator<Item = ElementRef<'a>> {
    select_all(el, tag).into_iter()
}

/// The `n`th (zero-based) descendant named `tag`.
pub fn find_nth<'a>(el: ElementRef<'a>, tag: &'static str, n: usize) -> Option<ElementRef<'a>> {
    find_all(el, tag).nth(n)
}

pub fn find_first<'a>(el: ElementRef<'a>, tag: &'static str) -> Option<ElementRef<'a>> {
    find_nth(el, tag, 0)
}

/// First descendant whose `id` attribute equals `id`.
pub fn by_id<'a>(el: ElementRef<'a>, id: &str) -> Option<ElementRef<'a>> {
    select_all(el, &format!("#{}", id)).into_iter().next()
}

pub fn is_named(el: ElementRef<'_>, tag: &str) -> bool {
    el.value().name().eq_ignore_ascii_case(tag)
}

pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value()
        .attr("class")
        .is_some_and(|c| c.split_whitespace().any(|token| token == class))
}

/// First whitespace-delimited token of the raw class attribute, in source order.
pub fn class_token<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.value()
        .attr("class")
        .and_then(|c| c.split_whitespace().next())
}

pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

/// Concatenated text of all descendant text nodes, entities decoded.
pub fn inner_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Serialized markup of the element's contents.
pub fn inner_markup(el: ElementRef<'_>) -> String {
    el.inner_html()
}

/// First direct child text node that is not pure whitespace.
pub fn first_text<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .find(|text| !text.trim().is_empty())
}
