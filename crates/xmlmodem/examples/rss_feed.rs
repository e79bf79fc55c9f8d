//! Reads an RSS channel into plain Rust structs.
//!
//! RSS repeats `<item>` directly under `<channel>` without a wrapping list
//! element, so the reader is configured with `same_name_list`: the run of
//! `<item>` siblings becomes one list as soon as `Channel::items` asks for
//! it. The `<rss>` root only carries a version attribute and is skipped.
//!
//! Run with
//!
//! ```bash
//! cargo run -p xmlmodem --example rss_feed
//! ```

use serde::Deserialize;
use xmlmodem::{ReaderError, ReaderOptions};

const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
  <channel>
    <title>channel title</title>
    <item>
      <id>1</id>
      <pubDate><![CDATA[Tue, 10 Jul 2012 10:43:36 +0300]]></pubDate>
      <title><![CDATA[Some text]]></title>
    </item>
    <item>
      <title/>
      <description>


must be


 skipped</description>
      <id>2</id>
    </item>
  </channel>
</rss>"#;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    title: String,
    #[serde(rename = "item")]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    id: u64,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    title: String,
}

fn main() -> Result<(), ReaderError> {
    let options = ReaderOptions {
        skip_root: true,
        same_name_list: true,
        ..Default::default()
    };
    let feed: Rss = xmlmodem::from_reader(FEED.as_bytes(), options)?;

    println!("{}", feed.channel.title);
    for item in &feed.channel.items {
        let title = if item.title.is_empty() {
            "(untitled)"
        } else {
            &item.title
        };
        match &item.pub_date {
            Some(date) => println!("  #{} {title} [{date}]", item.id),
            None => println!("  #{} {title}", item.id),
        }
    }
    Ok(())
}
