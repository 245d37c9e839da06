use podsmith::application::ports::{ContentFetchError, ContentFetcher};
use podsmith::domain::SourceReference;
use podsmith::infrastructure::scraper::{HttpContentFetcher, html_to_text};

#[test]
fn given_markup_when_reducing_then_tags_are_dropped_and_text_kept() {
    let html = "<html><body><h1>Bees</h1><p>They <b>dance</b> to communicate.</p></body></html>";

    assert_eq!(html_to_text(html), "Bees They dance to communicate.");
}

#[test]
fn given_script_and_style_blocks_when_reducing_then_their_content_is_dropped() {
    let html = "<head><style>p { color: red; }</style>\
                <script>var tracking = true;</script></head><p>Visible</p>";

    let text = html_to_text(html);

    assert_eq!(text, "Visible");
    assert!(!text.contains("tracking"));
}

#[test]
fn given_entities_when_reducing_then_common_ones_are_decoded() {
    let html = "<p>Bees &amp; wasps &lt;together&gt; &quot;again&quot;&nbsp;&#39;soon&#39;</p>";

    assert_eq!(html_to_text(html), "Bees & wasps <together> \"again\" 'soon'");
}

#[test]
fn given_ragged_whitespace_when_reducing_then_it_collapses_to_single_spaces() {
    let html = "<div>\n  one\n\n  <span>two</span>\t three </div>";

    assert_eq!(html_to_text(html), "one two three");
}

#[tokio::test]
async fn given_a_raw_text_source_when_fetching_then_it_passes_through() {
    let fetcher = HttpContentFetcher::new(10_000);

    let content = fetcher
        .fetch(&SourceReference::raw_text("  plain notes  "))
        .await
        .unwrap();

    assert_eq!(content, "plain notes");
}

#[tokio::test]
async fn given_an_empty_raw_text_source_when_fetching_then_empty_content_error() {
    let fetcher = HttpContentFetcher::new(10_000);

    let result = fetcher.fetch(&SourceReference::raw_text("   ")).await;

    assert!(matches!(result, Err(ContentFetchError::EmptyContent(_))));
}

#[tokio::test]
async fn given_content_over_the_budget_when_fetching_then_it_is_truncated() {
    let fetcher = HttpContentFetcher::new(5);

    let content = fetcher
        .fetch(&SourceReference::raw_text("abcdefghij"))
        .await
        .unwrap();

    assert_eq!(content, "abcde");
}
