#![allow(dead_code)]
use async_trait::async_trait;
use audiomack_metrics::catalog::TRACK_LINK_SELECTOR;
use audiomack_metrics::{
    Element, HtmlSession, Locator, PageSession, Result, RunConfig, ScrapeError, StaticPages,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::time::Duration;

pub const ARTIST_URL: &str = "https://audiomack.com/nahj";

pub const ARTIST_PAGE: &str = r#"<html>
<head><title>Nahj - Listen Free on Audiomack</title></head>
<body>
  <div class="ArtistSidebar">
    <div class="ArtistSidebar-avatar"><img src="https://assets.audiomack.com/nahj/avatar.jpg"></div>
    <a class="ArtistSidebar-name-link" href="/nahj">Nahj</a>
    <p>12.5K Followers</p>
    <p>1.2M Total Account Plays</p>
    <p>40,210 Monthly Listeners</p>
    <p>Member since</p>
    <p>March 5, 2019</p>
  </div>
  <section>
    <h1>Nahj</h1>
    <a href="/nahj/song/ballon-dor">Ballon d'Or</a>
  </section>
</body>
</html>"#;

pub const SONGS_PAGE: &str = r#"<html>
<head><title>Nahj Songs | Audiomack</title></head>
<body>
  <h1>Songs</h1>
  <a href="/nahj/song/ballon-dor">Ballon d'Or</a>
  <a href="https://audiomack.com/nahj/song/gbese">Gbese</a>
  <a href="/nahj/song/ballon-dor">Ballon d'Or</a>
  <a class="load-more" href="/nahj/songs?page=2">Load More</a>
</body>
</html>"#;

pub const SONGS_PAGE_2: &str = r#"<html><body>
  <a href="/nahj/song/water">Water</a>
</body></html>"#;

pub const BALLON_DOR_PAGE: &str = r#"<html>
<head><title>Nahj - Ballon d'Or | Audiomack</title></head>
<body>
  <div class="SinglePageMusicCard"><img src="https://assets.audiomack.com/nahj/ballon-dor.jpg"></div>
  <h1>Ballon d'Or</h1>
  <div><span>1.2K</span> <span>Plays</span></div>
  <div>87 Likes</div>
  <div>12 Reposts</div>
  <div>300 Playlist Adds</div>
  <ul>
    <li class="SinglePageMusicCardInfo-row">
      <span>Release Date</span>
      <span class="SinglePageMusicCardInfo-value"><span><span>March 5, 2021</span></span></span>
    </li>
  </ul>
</body>
</html>"#;

pub const GBESE_PAGE: &str = r#"<html>
<head><title>Nahj - Gbese | Audiomack</title></head>
<body>
  <div>Favorites</div>
  <div>3.4K</div>
</body>
</html>"#;

/// The Nahj pages. The third track, `water`, is listed but unreachable.
pub fn nahj_pages() -> StaticPages {
    StaticPages::new()
        .with_page(ARTIST_URL, ARTIST_PAGE)
        .with_page("https://audiomack.com/nahj/songs", SONGS_PAGE)
        .with_page("https://audiomack.com/nahj/songs?page=2", SONGS_PAGE_2)
        .with_page("https://audiomack.com/nahj/song/ballon-dor", BALLON_DOR_PAGE)
        .with_page("https://audiomack.com/nahj/song/gbese", GBESE_PAGE)
}

pub fn static_session(pages: StaticPages) -> HtmlSession<StaticPages> {
    HtmlSession::new(pages, "https://audiomack.com")
}

/// A configuration that never sleeps.
pub fn test_config(artists: &[&str]) -> RunConfig {
    RunConfig {
        artists: artists.iter().map(|a| a.to_string()).collect(),
        settle_timeout_ms: 0,
        track_delay_ms: 0,
        artist_delay_ms: 0,
        ..RunConfig::default()
    }
}

/// A session whose track link count follows a script.
///
/// `stages[n]` is the number of track links shown after `n` successful
/// expansions. The first expansion control succeeds while there is a next
/// stage.
pub struct ScriptedSession {
    pub stages: Vec<usize>,
    pub stage: usize,
    pub activations: usize,
    pub link_checks: Cell<usize>,
    pub navigations: Vec<String>,
    pub unreachable: HashSet<String>,
    pub body: String,
    pub page_title: String,
}

impl ScriptedSession {
    pub fn new(stages: &[usize]) -> Self {
        Self {
            stages: stages.to_vec(),
            stage: 0,
            activations: 0,
            link_checks: Cell::new(0),
            navigations: Vec::new(),
            unreachable: HashSet::new(),
            body: String::new(),
            page_title: String::new(),
        }
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.insert(url.to_string());
        self
    }

    fn links(&self) -> Vec<Element> {
        let count = self.stages.get(self.stage).copied().unwrap_or_default();
        (0..count)
            .map(|i| {
                Element::new(format!("Track {i}"))
                    .with_attribute("href", format!("/nahj/song/track-{i}"))
            })
            .collect()
    }
}

#[async_trait(?Send)]
impl PageSession for ScriptedSession {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<()> {
        self.navigations.push(url.to_string());
        if self.unreachable.contains(url) {
            return Err(ScrapeError::Navigation {
                url: url.to_string(),
                message: "unreachable".to_string(),
            });
        }
        Ok(())
    }

    async fn body_text(&self) -> Result<String> {
        Ok(self.body.clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.page_title.clone())
    }

    async fn query(&self, locator: &Locator) -> Result<Vec<Element>> {
        if locator.selector() == TRACK_LINK_SELECTOR {
            self.link_checks.set(self.link_checks.get() + 1);
            return Ok(self.links());
        }
        Ok(Vec::new())
    }

    async fn activate(&mut self, locator: &Locator) -> Result<bool> {
        let is_load_more = locator.selector() == "button" && locator.text_filter() == Some("Load More");
        if !is_load_more || self.stage + 1 >= self.stages.len() {
            return Ok(false);
        }
        self.stage += 1;
        self.activations += 1;
        Ok(true)
    }
}
