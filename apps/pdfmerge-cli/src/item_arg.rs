//! Command line item syntax
//!
//! `report.pdf`, `report.pdf#1-3,5`, `report.pdf!`, `report.pdf#2-4!`, `:blank`

use std::path::PathBuf;
use std::str::FromStr;

pub const BLANK_TOKEN: &str = ":blank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemArg {
    File {
        path: PathBuf,
        range: Option<String>,
        reverse: bool,
    },
    Blank,
}

impl FromStr for ItemArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == BLANK_TOKEN {
            return Ok(ItemArg::Blank);
        }

        let (rest, reverse) = match s.strip_suffix('!') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let (path, range) = match rest.rsplit_once('#') {
            Some((path, range)) => (path, Some(range.to_string())),
            None => (rest, None),
        };

        if path.is_empty() {
            return Err(format!("missing file path in {:?}", s));
        }

        Ok(ItemArg::File {
            path: PathBuf::from(path),
            range,
            reverse,
        })
    }
}

/// `--split I:N`: split the I-th item (1-based) after N pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitArg {
    pub position: usize,
    pub after: usize,
}

impl FromStr for SplitArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (position, after) = s
            .split_once(':')
            .ok_or_else(|| format!("expected ITEM:PAGES, got {:?}", s))?;
        let position: usize = position
            .trim()
            .parse()
            .map_err(|_| format!("invalid item number {:?}", position))?;
        let after = after
            .trim()
            .parse()
            .map_err(|_| format!("invalid page count {:?}", after))?;

        if position == 0 {
            return Err("item numbers start at 1".to_string());
        }
        Ok(Self { position, after })
    }
}

/// `--page-size WxH` in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSizeArg {
    pub width: f32,
    pub height: f32,
}

impl FromStr for PageSizeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", s))?;
        let parse = |v: &str| -> Result<f32, String> {
            match v.trim().parse::<f32>() {
                Ok(n) if n > 0.0 => Ok(n),
                _ => Err(format!("invalid dimension {:?}", v)),
            }
        };
        Ok(Self {
            width: parse(width)?,
            height: parse(height)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_file() {
        assert_eq!(
            "docs/a.pdf".parse::<ItemArg>().unwrap(),
            ItemArg::File {
                path: PathBuf::from("docs/a.pdf"),
                range: None,
                reverse: false,
            }
        );
    }

    #[test]
    fn test_parse_range_and_reverse() {
        assert_eq!(
            "a.pdf#1-3,5!".parse::<ItemArg>().unwrap(),
            ItemArg::File {
                path: PathBuf::from("a.pdf"),
                range: Some("1-3,5".to_string()),
                reverse: true,
            }
        );
        assert_eq!(
            "a.pdf!".parse::<ItemArg>().unwrap(),
            ItemArg::File {
                path: PathBuf::from("a.pdf"),
                range: None,
                reverse: true,
            }
        );
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(":blank".parse::<ItemArg>().unwrap(), ItemArg::Blank);
        assert!("#1-2".parse::<ItemArg>().is_err());
    }

    #[test]
    fn test_parse_split() {
        assert_eq!(
            "2:3".parse::<SplitArg>().unwrap(),
            SplitArg {
                position: 2,
                after: 3
            }
        );
        assert!("0:3".parse::<SplitArg>().is_err());
        assert!("2".parse::<SplitArg>().is_err());
        assert!("a:b".parse::<SplitArg>().is_err());
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(
            "612x792".parse::<PageSizeArg>().unwrap(),
            PageSizeArg {
                width: 612.0,
                height: 792.0
            }
        );
        assert!("612".parse::<PageSizeArg>().is_err());
        assert!("0x792".parse::<PageSizeArg>().is_err());
    }
}
