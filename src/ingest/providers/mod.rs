pub mod google_news_rss;
pub mod youtube;

pub use google_news_rss::GoogleNewsRssProvider;
pub use youtube::YouTubeCommentsProvider;
