//! Synthetic work page used by the extractor tests. Each region is a separate piece so tests
//! can swap one out and keep the rest of the layout intact.

pub(crate) const NAV_MENU: &str = r#"<ul class="work navigation actions">
      <li class="chapter entire"><a href="/works/123?view_full_work=true">Entire Work</a></li>
      <li class="comments" id="show_comments_link_top"><a href="/works/123?show_comments=true">Comments</a></li>
    </ul>"#;

pub(crate) const DOWNLOAD_MENU: &str = r##"<ul class="work navigation actions">
      <li class="share"><a href="/works/123/share">Share</a></li>
      <li class="download" aria-haspopup="true">
        <a href="#">Download</a>
        <ul class="expandable secondary">
          <li><a href="/downloads/123/The_Long_Way_Round.azw3?updated_at=1">AZW3</a></li>
          <li><a href="/downloads/123/The_Long_Way_Round.epub?updated_at=1">EPUB</a></li>
          <li><a href="/downloads/123/The_Long_Way_Round.mobi?updated_at=1">MOBI</a></li>
          <li><a href="/downloads/123/The_Long_Way_Round.pdf?updated_at=1">PDF</a></li>
          <li><a href="/downloads/123/The_Long_Way_Round.html?updated_at=1">HTML</a></li>
        </ul>
      </li>
    </ul>"##;

pub(crate) const META: &str = r#"<div class="wrapper">
      <dl class="work meta group">
        <dt class="rating tags">Rating:</dt>
        <dd class="rating tags"><ul class="commas"><li><a class="tag" href="/tags/Teen%20And%20Up%20Audiences/works">Teen And Up Audiences</a></li></ul></dd>
        <dt class="warning tags"><a href="/tos_faq#tags">Archive Warning</a>:</dt>
        <dd class="warning tags"><ul class="commas"><li><a class="tag" href="/tags/No%20Archive%20Warnings%20Apply/works">No Archive Warnings Apply</a></li></ul></dd>
        <dt class="category tags">Category:</dt>
        <dd class="category tags"><ul class="commas"><li><a class="tag" href="/tags/F*s*M/works">F/M</a></li><li><a class="tag" href="/tags/Gen/works">Gen</a></li></ul></dd>
        <dt class="fandom tags">Fandom:</dt>
        <dd class="fandom tags"><ul class="commas"><li><a class="tag" href="/tags/Original%20Work/works">Original Work</a></li></ul></dd>
        <dt class="relationship tags">Relationship:</dt>
        <dd class="relationship tags"><ul class="commas"><li><a class="tag" href="/tags/Mara*s*Jun/works">Mara/Jun</a></li></ul></dd>
        <dt class="character tags">Characters:</dt>
        <dd class="character tags"><ul class="commas"><li><a class="tag" href="/tags/Mara/works">Mara</a></li><li><a class="tag" href="/tags/Jun/works">Jun</a></li></ul></dd>
        <dt class="freeform tags">Additional Tags:</dt>
        <dd class="freeform tags"><ul class="commas">
          <li><a class="tag" href="/tags/Angst/works">Angst</a></li>
          <li><a class="tag" href="/tags/blank/works">  </a></li>
          <li><a class="tag" href="/tags/Can't%20Sleep/works">Can&#39;t Sleep</a></li>
          <li><a class="tag" href="/tags/Fluff/works">Fluff</a></li>
        </ul></dd>
        <dt class="language">Language:</dt>
        <dd class="language" lang="en">
          English
        </dd>
        <dt class="stats">Stats:</dt>
        <dd class="stats"><dl class="stats">
          <dt class="published">Published:</dt><dd class="published">2020-01-01</dd>
          <dt class="status">Updated:</dt><dd class="status">2021-02-03</dd>
          <dt class="words">Words:</dt><dd class="words">12,345</dd>
          <dt class="chapters">Chapters:</dt><dd class="chapters">5/?</dd>
          <dt class="comments">Comments:</dt><dd class="comments">67</dd>
          <dt class="kudos">Kudos:</dt><dd class="kudos">1,024</dd>
          <dt class="bookmarks">Bookmarks:</dt><dd class="bookmarks"><a href="/works/123/bookmarks">89</a></dd>
          <dt class="hits">Hits:</dt><dd class="hits">20,480</dd>
        </dl></dd>
      </dl>
    </div>"#;

pub(crate) const PREFACE: &str = r#"<div id="workskin">
      <div class="preface group">
        <h2 class="title heading">
          The Long Way Round
        </h2>
        <h3 class="byline heading"><a rel="author" href="/users/quietfox/pseuds/quietfox">quietfox</a></h3>
        <div class="summary module">
          <h3 class="heading">Summary:</h3>
          <blockquote class="userstuff">
            <p>A slow road trip.</p>
          </blockquote>
        </div>
      </div>
      <div id="chapters" role="article"><div class="userstuff"><p>Chapter text.</p></div></div>
    </div>"#;

/// Assemble a work page; `main_children` is placed inside `#main` verbatim.
pub(crate) fn work_page(main_children: &[&str]) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en"><head><title>The Long Way Round - quietfox - Original Work [Archive of Our Own]</title></head>
<body>
<div id="outer" class="wrapper">
  <ul id="skiplinks"><li><a href="#main">Main Content</a></li></ul>
  <div id="header" class="region"><ul class="primary navigation actions"><li><a href="/">Home</a></li></ul></div>
  <div id="inner" class="wrapper">
    <div id="main" class="works-show region" role="main">
    {}
    </div>
  </div>
</div>
</body></html>"##,
        main_children.join("\n    ")
    )
}

/// The canonical page with every region present.
pub(crate) fn full_work_page() -> String {
    work_page(&[NAV_MENU, DOWNLOAD_MENU, META, PREFACE])
}
