//! Tag/text segmentation.
//!
//! A fragment is split on `<...>` runs. The result always alternates
//! text, tag, text, ..., text: even positions are text (possibly empty) and
//! odd positions are tags. Anything not enclosed in a `<...>` pair, including
//! a stray `<` or an empty `<>`, stays in a text chunk.

use crate::Chunk;

pub(crate) fn segment(html: &str) -> Vec<Chunk<'_>> {
    let tag = regex!(r"<[^>]+>");

    let mut chunks = Vec::new();
    let mut last = 0;
    for m in tag.find_iter(html) {
        chunks.push(Chunk::Text(&html[last..m.start()]));
        chunks.push(Chunk::Tag(m.as_str()));
        last = m.end();
    }
    chunks.push(Chunk::Text(&html[last..]));
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(chunks: &[Chunk<'_>]) -> String {
        chunks.iter().map(|c| c.as_str()).collect()
    }

    #[test]
    fn alternates_text_and_tags() {
        let html = r#"<a title="red">red</a> fox"#;
        let chunks = segment(html);

        assert_eq!(
            chunks,
            vec![Chunk::Text(""), Chunk::Tag(r#"<a title="red">"#), Chunk::Text("red"), Chunk::Tag("</a>"), Chunk::Text(" fox")]
        );
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(matches!(chunk, Chunk::Text(_)), i % 2 == 0);
        }
        assert_eq!(joined(&chunks), html);
    }

    #[test]
    fn plain_text_is_one_chunk() {
        assert_eq!(segment("just words"), vec![Chunk::Text("just words")]);
        assert_eq!(segment(""), vec![Chunk::Text("")]);
    }

    #[test]
    fn unbalanced_markup_stays_text() {
        let html = "x <> y <i>z and 3 < 4";
        let chunks = segment(html);

        assert_eq!(chunks, vec![Chunk::Text("x <> y "), Chunk::Tag("<i>"), Chunk::Text("z and 3 < 4")]);
        assert_eq!(joined(&chunks), html);
    }
}
