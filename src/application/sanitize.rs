//! Markdown-source sanitation applied once per post before persistence.
//!
//! Post bodies are markdown, but markdown admits inline HTML, so raw bodies
//! pass through ammonia with an explicit allow-list: basic text formatting,
//! links, lists, headings, blockquote, code, and images. Every other tag and
//! attribute is stripped.

use std::collections::HashSet;

use ammonia::Builder;

pub(crate) fn post_sanitizer() -> Builder<'static> {
    let mut builder = Builder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "b",
        "blockquote",
        "br",
        "code",
        "del",
        "em",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "i",
        "img",
        "ins",
        "li",
        "ol",
        "p",
        "pre",
        "s",
        "strong",
        "sub",
        "sup",
        "u",
        "ul",
    ]);
    builder.tags(tags);

    builder.generic_attributes(HashSet::new());
    builder.add_tag_attributes("a", &["href", "title"]);
    builder.add_tag_attributes("img", &["src", "alt", "title"]);

    builder
}
