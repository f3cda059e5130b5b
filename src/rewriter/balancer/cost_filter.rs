use url::form_urlencoded::byte_serialize;

/// Prices markup for the balancer.
///
/// Tags are priced as a whole with [`markup_cost`](CostFilter::markup_cost),
/// text character by character with [`char_cost`](CostFilter::char_cost), so
/// that text can be cut at any character.
pub trait CostFilter {
    fn markup_cost(&self, markup: &str) -> u32;

    fn char_cost(&self, ch: char) -> u32;

    fn text_cost(&self, text: &str) -> u32 {
        text.chars()
            .fold(0u32, |total, ch| total.saturating_add(self.char_cost(ch)))
    }

    /// Returns the longest prefix of `text` that costs at most `max_cost`,
    /// shortened to the last word boundary if the cut falls inside a word.
    /// Trailing whitespace is removed and a character reference is never
    /// split.
    fn truncate_text<'t>(&self, text: &'t str, max_cost: u32) -> &'t str {
        truncate_at_word_boundary(text, max_cost, |ch| self.char_cost(ch))
    }
}

/// Every character costs one, tags cost their length.
#[derive(Debug, Default, Clone, Copy)]
pub struct CharCount;

impl CostFilter for CharCount {
    #[inline]
    fn markup_cost(&self, markup: &str) -> u32 {
        u32::try_from(markup.chars().count()).unwrap_or(u32::MAX)
    }

    #[inline]
    fn char_cost(&self, _ch: char) -> u32 {
        1
    }
}

/// Prices markup by the length it takes up once form-urlencoded, for content
/// that ends up in a query string.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlEncodedLength;

impl CostFilter for UrlEncodedLength {
    fn markup_cost(&self, markup: &str) -> u32 {
        encoded_len(markup.as_bytes())
    }

    fn char_cost(&self, ch: char) -> u32 {
        let mut buf = [0; 4];

        encoded_len(ch.encode_utf8(&mut buf).as_bytes())
    }
}

/// Tags are free; only the characters of text runs count.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextOnly;

impl CostFilter for TextOnly {
    #[inline]
    fn markup_cost(&self, _markup: &str) -> u32 {
        0
    }

    #[inline]
    fn char_cost(&self, _ch: char) -> u32 {
        1
    }
}

fn encoded_len(bytes: &[u8]) -> u32 {
    byte_serialize(bytes).fold(0u32, |total, chunk| {
        total.saturating_add(u32::try_from(chunk.len()).unwrap_or(u32::MAX))
    })
}

fn truncate_at_word_boundary(
    text: &str,
    max_cost: u32,
    char_cost: impl Fn(char) -> u32,
) -> &str {
    let mut spent = 0u32;
    let mut cut = None;

    for (idx, ch) in text.char_indices() {
        let cost = char_cost(ch);

        if spent.saturating_add(cost) > max_cost {
            cut = Some(idx);
            break;
        }

        spent += cost;
    }

    let Some(cut) = cut else {
        return text;
    };

    let mut kept = &text[..cut];

    if text[cut..].starts_with(|c: char| !c.is_whitespace()) {
        if let Some(ws) = kept.rfind(char::is_whitespace) {
            kept = &kept[..ws];
        }
    }

    kept = kept.trim_end();

    // NOTE: `&` followed only by name characters up to the cut is the
    // beginning of a reference whose `;` didn't make it.
    if let Some(amp) = kept.rfind('&') {
        let tail = &kept.as_bytes()[amp + 1..];

        if tail.iter().all(|&b| b == b'#' || b.is_ascii_alphanumeric()) {
            kept = kept[..amp].trim_end();
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encoded_costs() {
        assert_eq!(UrlEncodedLength.markup_cost("<b>"), 7);
        assert_eq!(UrlEncodedLength.markup_cost("</b>"), 10);
        assert_eq!(UrlEncodedLength.markup_cost("a b"), 3);
        assert_eq!(UrlEncodedLength.char_cost('é'), 6);
        assert_eq!(UrlEncodedLength.text_cost("tést"), 9);
    }

    #[test]
    fn char_count_costs() {
        assert_eq!(CharCount.markup_cost("<a href=foo>"), 12);
        assert_eq!(CharCount.text_cost("naïve"), 5);
        assert_eq!(TextOnly.markup_cost("<table border=1>"), 0);
    }

    #[test]
    fn truncation_prefers_word_boundaries() {
        assert_eq!(CharCount.truncate_text("test test", 8), "test");
        assert_eq!(CharCount.truncate_text("test test", 5), "test");
        assert_eq!(CharCount.truncate_text("test test", 100), "test test");
        assert_eq!(CharCount.truncate_text("testing", 4), "test");
        assert_eq!(CharCount.truncate_text("one two  three", 9), "one two");
    }

    #[test]
    fn truncation_never_splits_references() {
        assert_eq!(CharCount.truncate_text("abcd&blacksquare;efghijklmnop", 7), "abcd");
        assert_eq!(CharCount.truncate_text("abcd&blacksquare;efg", 17), "abcd&blacksquare;");
        assert_eq!(CharCount.truncate_text("x &#1234;", 6), "x");
        assert_eq!(CharCount.truncate_text("a&", 1), "a");
    }
}
