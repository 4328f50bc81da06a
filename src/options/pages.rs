//! Page selection for resize and split runs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Which source pages to process (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageSelection {
    /// Every page
    #[default]
    All,
    /// A contiguous range (inclusive)
    Range(RangeInclusive<u32>),
    /// Listed pages and ranges, sorted by start; single pages are
    /// one-element ranges
    Pages(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                check_order(start, end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        // Ranges stay unexpanded until the page count is known.
        let mut ranges = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                check_order(start, end)?;
                ranges.push(start..=end);
            } else {
                let page = parse_page(part)?;
                ranges.push(page..=page);
            }
        }

        ranges.sort_unstable_by_key(|r| (*r.start(), *r.end()));
        ranges.dedup();
        Ok(PageSelection::Pages(ranges))
    }

    /// Resolve against a document with `total` pages, in ascending order.
    ///
    /// Explicitly named pages beyond the document fail with
    /// [`Error::PageOutOfRange`]; `All` never fails.
    pub fn resolve(&self, total: u32) -> Result<Vec<u32>> {
        match self {
            PageSelection::All => Ok((1..=total).collect()),
            PageSelection::Range(range) => {
                if *range.end() > total {
                    return Err(Error::PageOutOfRange(*range.end(), total));
                }
                Ok(range.clone().collect())
            }
            PageSelection::Pages(ranges) => {
                let first_missing = ranges
                    .iter()
                    .filter(|r| *r.end() > total)
                    .map(|r| (*r.start()).max(total.saturating_add(1)))
                    .min();
                if let Some(bad) = first_missing {
                    return Err(Error::PageOutOfRange(bad, total));
                }
                Ok((1..=total).filter(|&p| self.includes(p)).collect())
            }
        }
    }
}

impl std::fmt::Display for PageSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSelection::All => f.write_str("all"),
            PageSelection::Range(range) => write!(f, "{}-{}", range.start(), range.end()),
            PageSelection::Pages(ranges) => {
                let parts: Vec<String> = ranges
                    .iter()
                    .map(|r| {
                        if r.start() == r.end() {
                            r.start().to_string()
                        } else {
                            format!("{}-{}", r.start(), r.end())
                        }
                    })
                    .collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}

impl TryFrom<String> for PageSelection {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        PageSelection::parse(&value)
    }
}

impl From<PageSelection> for String {
    fn from(selection: PageSelection) -> Self {
        selection.to_string()
    }
}

fn parse_page(s: &str) -> Result<u32> {
    let s = s.trim();
    match s.parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!(
            "'{}' is not a page number",
            s
        ))),
        Ok(page) => Ok(page),
    }
}

fn check_order(start: u32, end: u32) -> Result<()> {
    if start > end {
        return Err(Error::InvalidPageRange(format!(
            "range {}-{} runs backwards",
            start, end
        )));
    }
    Ok(())
}
