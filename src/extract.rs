use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static META_NAMED: LazyLock<Selector> = LazyLock::new(|| selector("meta[name]"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|err| panic!("invalid built-in selector {css:?}: {err}"))
}

/// SEO fields pulled out of a fetched page. Missing elements become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMarkup {
    pub title: String,
    pub h1: String,
    pub description: String,
}

pub fn extract(html: &str) -> PageMarkup {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(element_text)
        .unwrap_or_default();
    let h1 = document
        .select(&H1)
        .next()
        .map(element_text)
        .unwrap_or_default();
    let description = document
        .select(&META_NAMED)
        .find(|meta| {
            meta.value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_owned())
        .unwrap_or_default();

    PageMarkup {
        title,
        h1,
        description,
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    let text = element.text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
