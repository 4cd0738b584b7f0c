//! IMDb identifiers

use crate::error::{ImdbError, Result};
use costar_core::NodeId;
use url::Url;

/// Kind of page an identifier points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// `nm…`, a person page
    Name,
    /// `tt…`, a title page
    Title,
}

impl IdKind {
    pub fn of(id: &str) -> Option<Self> {
        let digits = id.get(2..)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match id.get(..2)? {
            "nm" => Some(Self::Name),
            "tt" => Some(Self::Title),
            _ => None,
        }
    }

    /// Path segment of this kind's pages
    pub fn path(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
        }
    }
}

pub fn is_imdb_id(id: &str) -> bool {
    IdKind::of(id).is_some()
}

/// Extract the `nm…`/`tt…` id from an IMDb URL, a site-relative link, or
/// a bare id
pub fn extract_id(input: &str) -> Result<NodeId> {
    let input = input.trim();
    if is_imdb_id(input) {
        return Ok(NodeId::new(input));
    }

    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("https://www.imdb.com/")?.join(input)?
        }
        Err(e) => return Err(e.into()),
    };

    url.path_segments()
        .into_iter()
        .flatten()
        .find(|segment| is_imdb_id(segment))
        .map(NodeId::new)
        .ok_or_else(|| ImdbError::InvalidId(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_ids() {
        assert_eq!(extract_id("nm0000158").unwrap(), NodeId::from("nm0000158"));
        assert_eq!(extract_id(" tt0111161 ").unwrap(), NodeId::from("tt0111161"));
    }

    #[test]
    fn test_ids_from_urls() {
        assert_eq!(
            extract_id("https://www.imdb.com/name/nm0000158/").unwrap(),
            NodeId::from("nm0000158")
        );
        assert_eq!(
            extract_id("https://www.imdb.com/title/tt0111161/?ref_=nm_flmg_t_1").unwrap(),
            NodeId::from("tt0111161")
        );
        assert_eq!(
            extract_id("/title/tt0111161/fullcredits").unwrap(),
            NodeId::from("tt0111161")
        );
    }

    #[test]
    fn test_rejects_non_ids() {
        assert!(extract_id("https://www.imdb.com/chart/top/").is_err());
        assert!(extract_id("nm").is_err());
        assert!(extract_id("xx0000001").is_err());
        assert!(!is_imdb_id("nm12a"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(IdKind::of("nm0000001"), Some(IdKind::Name));
        assert_eq!(IdKind::of("tt0000001"), Some(IdKind::Title));
        assert_eq!(IdKind::of("tt"), None);
        assert_eq!(IdKind::Title.path(), "title");
    }
}
