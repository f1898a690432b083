// tests/ingest_to_pipeline.rs
//
// Fixture-driven flow from provider parsing straight into the pipeline:
// what the crawlers emit must be acceptable pipeline input as-is.

use timnas_sentiment_analyzer::config::AnalyzerConfig;
use timnas_sentiment_analyzer::ingest::providers::google_news_rss::parse_feed;
use timnas_sentiment_analyzer::ingest::providers::youtube::parse_comment_threads;
use timnas_sentiment_analyzer::pipeline::Pipeline;
use timnas_sentiment_analyzer::record::SourceCategory;

const RSS_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"naturalisasi timnas" - Google News</title>
    <item>
      <title>Naturalisasi dinilai memperkuat Timnas Indonesia</title>
      <link>https://news.example.test/artikel/1</link>
      <pubDate>Mon, 02 Jun 2025 08:30:00 GMT</pubDate>
      <description>Dukungan penuh, skuad makin bagus dan solid</description>
      <source url="https://kompas.example.test">Kompas</source>
    </item>
  </channel>
</rss>"#;

const COMMENTS_FIXTURE: &str = r#"{
  "items": [
    {
      "snippet": {
        "topLevelComment": {
          "id": "UgxComment1",
          "snippet": {
            "textDisplay": "tolak naturalisasi, timnas indonesia makin lemah dan gagal",
            "authorDisplayName": "Budi",
            "videoId": "vid123",
            "publishedAt": "2025-06-02T09:00:00Z"
          }
        }
      }
    }
  ]
}"#;

#[test]
fn crawled_fixtures_flow_through_the_pipeline() {
    let mut raw = parse_feed(RSS_FIXTURE, "naturalisasi timnas").unwrap();
    raw.extend(parse_comment_threads(COMMENTS_FIXTURE).unwrap());
    assert_eq!(raw.len(), 2);

    let pipeline = Pipeline::from_config(&AnalyzerConfig::seed());
    let out = pipeline.run(raw).unwrap();
    assert_eq!(out.records.len(), 2);

    let article = out
        .records
        .iter()
        .find(|r| r.source_category == SourceCategory::News)
        .unwrap();
    assert_eq!(article.source_name, "Kompas");
    assert!(article.score > 0);
    assert!(article.identity_key.starts_with("https://news.example.test/artikel/1_"));

    let comment = out
        .records
        .iter()
        .find(|r| r.source_category == SourceCategory::VideoComment)
        .unwrap();
    assert!(comment.score < 0);
    assert!(comment.identity_key.starts_with("UgxComment1_"));
    assert_eq!(comment.extras.get("author").map(String::as_str), Some("Budi"));
}
