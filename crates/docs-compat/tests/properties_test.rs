use docs_compat::segment::reassemble;
use docs_compat::{rewrite_document, segment};
use proptest::prelude::*;

/// Documents assembled from realistic page fragments, fences included.
fn page() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("Some prose.\n"),
        Just("\n"),
        Just("<CardGroup cols={2}>\n"),
        Just("</CardGroup>\n"),
        Just("<Card title=\"A\" icon={icon} />\n"),
        Just("<List items={list} data-n={10}>\n"),
        Just("<iframe src=\"x\" />\n"),
        Just("<iframe\n  src=\"y\"\n  frameBorder=\"0\"\n  allowFullScreen\n/>\n"),
        Just("<Note>\n"),
        Just("</Note>\n"),
        Just("<Tip title={t}>hint</Tip>\n"),
        Just("```\n"),
        Just("```jsx\n"),
        Just("````\n"),
        Just("~~~\n"),
        Just("    ```\n"),
        Just("Inline `cols={1}` and ```x``` spans.\n"),
        Just("cols={3} outside a tag\n"),
        Just("<div style={{color: 'red'}}>\n"),
        Just("tail <iframe />"),
    ];
    prop::collection::vec(fragment, 0..24).prop_map(|parts| parts.concat())
}

fn verbatim_texts(doc: &str) -> Vec<&str> {
    segment(doc)
        .filter(|s| s.is_verbatim())
        .map(|s| s.text)
        .collect()
}

proptest! {
    #[test]
    fn segmentation_is_lossless_for_any_text(doc in any::<String>()) {
        prop_assert_eq!(reassemble(segment(&doc)), doc);
    }

    #[test]
    fn segmentation_is_lossless_for_pages(doc in page()) {
        prop_assert_eq!(reassemble(segment(&doc)), doc.clone());
        prop_assert!(segment(&doc).all(|s| !s.text.is_empty()));
    }

    #[test]
    fn segments_alternate(doc in page()) {
        let segments: Vec<_> = segment(&doc).collect();
        for pair in segments.windows(2) {
            // Two verbatim blocks may be adjacent; two prose runs never are.
            prop_assert!(!(pair[0].is_prose() && pair[1].is_prose()));
        }
    }

    #[test]
    fn verbatim_segments_are_never_rewritten(doc in page()) {
        let out = rewrite_document(&doc);
        prop_assert_eq!(verbatim_texts(&out), verbatim_texts(&doc));
    }

    #[test]
    fn rewriting_is_idempotent(doc in page()) {
        let once = rewrite_document(&doc).into_owned();
        let twice = rewrite_document(&once).into_owned();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn rewriting_never_panics(doc in any::<String>()) {
        let _ = rewrite_document(&doc);
    }
}
