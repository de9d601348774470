// src/core/html.rs
//
// Small helpers over `scraper` element refs. All text comes back
// whitespace-normalized; "missing" is `None`/empty, never an error.

use scraper::{ElementRef, Selector};

use super::sanitize::normalize_ws;

/// Visible text of an element, whitespace collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Text of the first match, if it has any.
pub fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .map(text_of)
        .find(|t| !t.is_empty())
}

/// Prefer the `title` attribute over visible text. The site puts the full
/// value there for symbol spans; the inner text is sometimes abbreviated.
pub fn first_title_or_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    let el = scope.select(sel).next()?;
    el.value()
        .attr("title")
        .map(normalize_ws)
        .filter(|t| !t.is_empty())
        .or_else(|| Some(text_of(el)).filter(|t| !t.is_empty()))
}

/// Texts of up to `limit` matches, skipping empties.
pub fn all_texts(scope: ElementRef<'_>, sel: &Selector, limit: usize) -> Vec<String> {
    scope
        .select(sel)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .take(limit)
        .collect()
}

pub fn first_attr<'a>(scope: ElementRef<'a>, sel: &Selector, attr: &str) -> Option<&'a str> {
    scope.select(sel).next()?.value().attr(attr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn sel(css: &str) -> Selector {
        Selector::parse(css).unwrap()
    }

    #[test]
    fn text_helpers_normalize_and_skip_empties() {
        let doc = Html::parse_fragment(
            r#"<div><p class="x">  </p><p class="x">Hello
                 <b>world</b></p><p class="x">again</p></div>"#,
        );
        let root = doc.root_element();
        assert_eq!(first_text(root, &sel("p.x")).as_deref(), Some("Hello world"));
        assert_eq!(all_texts(root, &sel("p.x"), 10), vec!["Hello world", "again"]);
        assert_eq!(all_texts(root, &sel("p.x"), 1), vec!["Hello world"]);
        assert_eq!(first_text(root, &sel("p.missing")), None);
    }

    #[test]
    fn title_attribute_wins_over_text() {
        let doc = Html::parse_fragment(
            r#"<span class="rating" title="Teen And Up Audiences"><span>T</span></span>
               <span class="category"><span>Gen</span></span>"#,
        );
        let root = doc.root_element();
        assert_eq!(
            first_title_or_text(root, &sel("span.rating")).as_deref(),
            Some("Teen And Up Audiences")
        );
        assert_eq!(first_title_or_text(root, &sel("span.category")).as_deref(), Some("Gen"));
    }

    #[test]
    fn attr_lookup() {
        let doc = Html::parse_fragment(r#"<h4><a href="/works/7">T</a></h4>"#);
        assert_eq!(first_attr(doc.root_element(), &sel("h4 a"), "href"), Some("/works/7"));
        assert_eq!(first_attr(doc.root_element(), &sel("h4 a"), "rel"), None);
    }
}
