use crate::config::ScraperSettings;
use crate::domain::model::Book;
use crate::utils::error::{Result, RunnerError};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// One catalogue page: its books and the resolved "next" link, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub books: Vec<Book>,
    pub next: Option<Url>,
}

pub struct BookScraper {
    client: Client,
    settings: ScraperSettings,
}

impl BookScraper {
    pub fn new(settings: ScraperSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self { client, settings })
    }

    /// Follows the pagination from the base URL until a page has no books
    /// or no "next" link.
    pub async fn scrape_all(&self) -> Result<Vec<Book>> {
        let mut url = self.base_url()?;
        let mut visited = HashSet::new();
        let mut books = Vec::new();
        let mut page_num = 1;

        loop {
            visited.insert(url.clone());
            let html = self.fetch(&url).await?;
            let page = parse_page(&html, &url)?;

            if page.books.is_empty() {
                tracing::debug!("No books on {}, stopping", url);
                break;
            }

            tracing::info!("Scraped page {}: {} books", page_num, page.books.len());
            books.extend(page.books);
            page_num += 1;

            match page.next {
                Some(next) if visited.contains(&next) => {
                    tracing::warn!("Pagination loops back to {}, stopping", next);
                    break;
                }
                Some(next) => {
                    if self.settings.delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.settings.delay_ms)).await;
                    }
                    url = next;
                }
                None => break,
            }
        }

        Ok(books)
    }

    /// Quick check: the first `count` books of the first page only.
    pub async fn scrape_first_page(&self, count: usize) -> Result<Vec<Book>> {
        let url = self.base_url()?;
        let html = self.fetch(&url).await?;
        let page = parse_page_limited(&html, &url, Some(count))?;
        Ok(page.books)
    }

    fn base_url(&self) -> Result<Url> {
        Url::parse(&self.settings.base_url).map_err(|e| RunnerError::InvalidConfigValueError {
            field: "scraper.base_url".to_string(),
            value: self.settings.base_url.clone(),
            reason: e.to_string(),
        })
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("Response status: {}", response.status());
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| RunnerError::ParseError {
        message: format!("bad selector '{}': {}", css, e),
    })
}

/// Extracts every `article.product_pod` of a catalogue page.
pub fn parse_page(html: &str, page_url: &Url) -> Result<Page> {
    parse_page_limited(html, page_url, None)
}

/// Like [`parse_page`], but only the first `limit` entries are parsed;
/// the rest of the page is never looked at.
pub fn parse_page_limited(html: &str, page_url: &Url, limit: Option<usize>) -> Result<Page> {
    let document = Html::parse_document(html);
    let pod_selector = selector("article.product_pod")?;
    let next_selector = selector("li.next a[href]")?;

    let books = document
        .select(&pod_selector)
        .take(limit.unwrap_or(usize::MAX))
        .map(parse_book)
        .collect::<Result<Vec<_>>>()?;

    let next = match document
        .select(&next_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
    {
        Some(href) => Some(page_url.join(href).map_err(|e| RunnerError::ParseError {
            message: format!("bad next link '{}': {}", href, e),
        })?),
        None => None,
    };

    Ok(Page { books, next })
}

fn parse_book(pod: ElementRef<'_>) -> Result<Book> {
    let title_selector = selector("h3 a")?;
    let price_selector = selector("p.price_color")?;
    let rating_selector = selector("p.star-rating")?;

    let title = pod
        .select(&title_selector)
        .next()
        .ok_or_else(|| RunnerError::ParseError {
            message: "book entry without a title link".to_string(),
        })?
        .value()
        .attr("title")
        .unwrap_or("")
        .trim()
        .to_string();

    let price_text = pod
        .select(&price_selector)
        .next()
        .map(|p| p.text().collect::<String>())
        .ok_or_else(|| RunnerError::ParseError {
            message: format!("no price for '{}'", title),
        })?;
    let price = parse_price(&price_text)?;

    let rating = pod
        .select(&rating_selector)
        .next()
        .and_then(|p| parse_rating(p.value().classes()));

    Ok(Book {
        title,
        price,
        rating,
    })
}

/// "£51.77" -> 51.77
pub fn parse_price(text: &str) -> Result<f64> {
    let trimmed = text
        .trim()
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'));
    trimmed.parse::<f64>().map_err(|e| RunnerError::ParseError {
        message: format!("bad price '{}': {}", text.trim(), e),
    })
}

/// Maps the rating word among the classes (`star-rating Three`) to 1-5.
pub fn parse_rating<'a>(classes: impl IntoIterator<Item = &'a str>) -> Option<u8> {
    let word = classes
        .into_iter()
        .find(|c| !c.eq_ignore_ascii_case("star-rating"))?;

    match word.to_ascii_lowercase().as_str() {
        "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        _ => None,
    }
}

/// Writes `title,price,rating`; the header is present even with no books.
pub fn write_csv<P: AsRef<Path>>(path: P, books: &[Book]) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;
    writer.write_record(["title", "price", "rating"])?;
    for book in books {
        writer.serialize(book)?;
    }
    writer.flush()?;
    Ok(())
}
