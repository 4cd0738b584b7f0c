//! HTML extraction for IMDb person and title pages
//!
//! Parsing is synchronous and returns owned data only: a parsed document
//! never outlives the call, so nothing here is held across an await.

use crate::error::{ImdbError, Result};
use crate::ids::extract_id;
use costar_core::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

const FILMOGRAPHY: &str = "div#filmography";
const FILMOGRAPHY_ROWS: &str =
    r#"div#filmography div[id^="actor"], div#filmography div[id^="actress"]"#;
const YEAR_COLUMN: &str = "span.year_column";
const TITLE_LINK: &str = r#"a[href^="/title/"]"#;
const FULL_CAST_LINK: &str =
    r#"a.ipc-metadata-list-item__icon-link[aria-label="See full cast and crew"]"#;
const CAST_TABLE: &str = "table.cast_list";
const CAST_LINKS: &str = r#"table.cast_list a[href^="/name/nm"]"#;
const PLOT: &str =
    r#"span[data-testid="plot-xl"], span[data-testid="plot-l"], span[data-testid="plot"]"#;

/// Credits that are not theatrical movies
const NON_MOVIE_MARKERS: &str = r"\((TV (Series|Episode|Movie|Special|Mini[- ]Series|Short)|Short|Video Game|Video|Documentary)\)";

/// A linked entry on a page: a movie in a filmography or an actor in a cast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    pub id: NodeId,
    pub name: String,
}

/// Compiled selectors and patterns for IMDb pages
#[derive(Debug)]
pub struct PageParser {
    filmography: Selector,
    filmography_rows: Selector,
    year_column: Selector,
    title_link: Selector,
    full_cast_link: Selector,
    cast_table: Selector,
    cast_links: Selector,
    plot: Selector,
    non_movie: Regex,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ImdbError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn truncate<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

impl PageParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            filmography: selector(FILMOGRAPHY)?,
            filmography_rows: selector(FILMOGRAPHY_ROWS)?,
            year_column: selector(YEAR_COLUMN)?,
            title_link: selector(TITLE_LINK)?,
            full_cast_link: selector(FULL_CAST_LINK)?,
            cast_table: selector(CAST_TABLE)?,
            cast_links: selector(CAST_LINKS)?,
            plot: selector(PLOT)?,
            non_movie: Regex::new(NON_MOVIE_MARKERS)?,
        })
    }

    /// Movies in an actor page's filmography, in page order
    ///
    /// Only acting credits with a release year count; series, episodes,
    /// shorts, videos, games and documentaries are skipped.
    pub fn movies(&self, html: &str, limit: Option<usize>) -> Result<Vec<Credit>> {
        let document = Html::parse_document(html);

        if document.select(&self.filmography).next().is_none() {
            return Err(ImdbError::parse("no filmography section"));
        }

        let movies = document
            .select(&self.filmography_rows)
            .filter(|row| self.is_movie(*row))
            .filter_map(|row| {
                let link = row.select(&self.title_link).next()?;
                let id = extract_id(link.value().attr("href")?).ok()?;
                Some(Credit {
                    id,
                    name: text_of(link),
                })
            })
            .collect();

        Ok(truncate(movies, limit))
    }

    fn is_movie(&self, row: ElementRef<'_>) -> bool {
        let has_year = row
            .select(&self.year_column)
            .next()
            .map(|year| !text_of(year).is_empty())
            .unwrap_or(false);

        has_year && !self.non_movie.is_match(&row.text().collect::<String>())
    }

    /// Link to the full cast listing of a title page, if present
    pub fn full_cast_href(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let href = document
            .select(&self.full_cast_link)
            .next()?
            .value()
            .attr("href")?;
        Some(href.to_string())
    }

    /// Actors in a full credits page's cast table, in page order
    pub fn cast(&self, html: &str, limit: Option<usize>) -> Result<Vec<Credit>> {
        let document = Html::parse_document(html);

        if document.select(&self.cast_table).next().is_none() {
            return Err(ImdbError::parse("no cast table"));
        }

        let actors = document
            .select(&self.cast_links)
            .filter_map(|link| {
                let name = text_of(link);
                if name.is_empty() {
                    return None;
                }
                let id = extract_id(link.value().attr("href")?).ok()?;
                Some(Credit { id, name })
            })
            .collect();

        Ok(truncate(actors, limit))
    }

    /// Plot summary of a title page
    pub fn description(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let plot = document.select(&self.plot).next().map(text_of)?;
        (!plot.is_empty()).then_some(plot)
    }
}
