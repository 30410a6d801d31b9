//! Extraction adapter: raw document bytes to tokens, title, and links
//!
//! Given a downloaded page, this module produces everything the indexing
//! step needs: the ordered word tokens (maximal runs of alphanumeric
//! characters, with `style`/`script` content excluded), the document title,
//! the outbound hyperlink values, and the sentence snippets each token
//! belongs to.

use scraper::{ElementRef, Html, Node, Selector};

/// One word-like token and the sentence it was found in
#[derive(Debug, Clone)]
pub struct Token {
    /// The raw token text (not yet stemmed)
    pub word: String,
    /// Index into [`Extraction::sentences`]
    pub sentence: usize,
}

/// Everything extracted from one document
#[derive(Debug, Default)]
pub struct Extraction {
    /// First `<title>` under `<head>`, trimmed
    pub title: Option<String>,
    /// Word tokens in document order
    pub tokens: Vec<Token>,
    /// Sentence snippets referenced by tokens
    pub sentences: Vec<String>,
    /// Every `href` attribute value in document order
    pub hyperlinks: Vec<String>,
}

/// Extracts tokens, title, sentences, and hyperlinks from raw page bytes
///
/// The HTML parser is error-tolerant, so malformed markup degrades into a
/// partial extraction rather than a failure.
pub fn extract(body: &[u8]) -> Extraction {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let mut result = Extraction {
        title: extract_title(&document),
        ..Default::default()
    };

    for node in document.root_element().descendants() {
        match node.value() {
            Node::Element(element) => {
                if let Some(href) = element.attr("href") {
                    result.hyperlinks.push(href.to_string());
                }
            }
            Node::Text(text) => {
                let parent_tag = node
                    .parent()
                    .and_then(ElementRef::wrap)
                    .map(|el| el.value().name().to_string());
                match parent_tag.as_deref() {
                    Some("script") | Some("style") | None => {}
                    Some(_) => collect_text(text, &mut result),
                }
            }
            _ => {}
        }
    }

    result
}

/// Splits a text node into sentence snippets and word tokens
fn collect_text(text: &str, result: &mut Extraction) {
    for chunk in text.split(['.', '!', '?']) {
        let snippet = chunk.trim();
        if !snippet.chars().any(char::is_alphanumeric) {
            continue;
        }

        let sentence = result.sentences.len();
        result.sentences.push(snippet.to_string());

        for word in snippet.split(|c: char| !c.is_alphanumeric()) {
            if !word.is_empty() {
                result.tokens.push(Token {
                    word: word.to_string(),
                    sentence,
                });
            }
        }
    }
}

/// Extracts the first `<title>` under `<head>`
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("head > title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}
