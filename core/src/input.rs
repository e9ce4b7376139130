use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::date::parse_human_date;
use crate::model::record::{coerce_price, DrinkDraft};

pub const DRAFT_KEYS: [&str; 6] = ["shop", "item", "sweetness", "ice", "price", "date"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub words: Vec<String>,
    pub metadata: HashMap<String, String>,
}

/// A draft typed as `<shop> <item...> key:value...`, plus the day it is for.
#[derive(Debug, PartialEq)]
pub struct ParsedDraft {
    pub draft: DrinkDraft,
    pub date: Option<NaiveDate>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut words = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        words.push(arg.clone());
    }

    ParsedInput { words, metadata }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Builds a draft from command words. Without `shop:`, the first word is the
/// shop and the rest is the item name.
pub fn parse_draft(args: &[String], today: NaiveDate) -> Result<ParsedDraft> {
    let parsed = parse_args(args);

    let mut fields = HashMap::new();
    for (key, value) in parsed.metadata {
        let full_key = expand_key(&key.to_lowercase(), &DRAFT_KEYS)?;
        fields.insert(full_key, value);
    }

    let mut words = parsed.words.into_iter();
    let shop = match fields.remove("shop") {
        Some(shop) => shop,
        None => words.next().unwrap_or_default(),
    };
    let rest: Vec<String> = words.collect();
    let item = match fields.remove("item") {
        Some(item) => item,
        None => rest.join(" "),
    };

    let mut draft = DrinkDraft::new(shop, item);
    if let Some(level) = fields.get("sweetness") {
        draft.sweetness = level.parse()?;
    }
    if let Some(level) = fields.get("ice") {
        draft.ice = level.parse()?;
    }
    draft.price = coerce_price(fields.get("price").map(String::as_str));

    let date = fields
        .get("date")
        .map(|d| parse_human_date(d, today))
        .transpose()?;

    Ok(ParsedDraft { draft, date })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{IceLevel, Sweetness};

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&args(&["50嵐", "珍珠", "奶茶", "price:55", "ice:去冰"]));
        assert_eq!(parsed.words, args(&["50嵐", "珍珠", "奶茶"]));
        assert_eq!(parsed.metadata.get("price"), Some(&"55".to_string()));
        assert_eq!(parsed.metadata.get("ice"), Some(&"去冰".to_string()));
    }

    #[test]
    fn test_expand_key() {
        assert!(expand_key("s", &DRAFT_KEYS).is_err()); // shop, sweetness
        assert_eq!(expand_key("sw", &DRAFT_KEYS).unwrap(), "sweetness");
        assert_eq!(expand_key("sh", &DRAFT_KEYS).unwrap(), "shop");
        assert_eq!(expand_key("p", &DRAFT_KEYS).unwrap(), "price");
        assert_eq!(expand_key("ice", &DRAFT_KEYS).unwrap(), "ice");
        assert!(expand_key("x", &DRAFT_KEYS).is_err());
    }

    #[test]
    fn test_parse_draft_positional() {
        let parsed = parse_draft(&args(&["50嵐", "珍珠", "奶茶", "sw:無糖", "ice:hot", "p:55", "d:yest"]), today()).unwrap();
        assert_eq!(parsed.draft.shop, "50嵐");
        assert_eq!(parsed.draft.item, "珍珠 奶茶");
        assert_eq!(parsed.draft.sweetness, Sweetness::SugarFree);
        assert_eq!(parsed.draft.ice, IceLevel::Hot);
        assert_eq!(parsed.draft.price, 55.0);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2026, 1, 9));
    }

    #[test]
    fn test_parse_draft_defaults_and_bad_price() {
        let parsed = parse_draft(&args(&["shop:迷客夏", "item:大正紅茶拿鐵", "price:free"]), today()).unwrap();
        assert_eq!(parsed.draft.shop, "迷客夏");
        assert_eq!(parsed.draft.item, "大正紅茶拿鐵");
        assert_eq!(parsed.draft.sweetness, Sweetness::ThreeTenths);
        assert_eq!(parsed.draft.ice, IceLevel::Light);
        assert_eq!(parsed.draft.price, 0.0);
        assert_eq!(parsed.date, None);
    }

    #[test]
    fn test_parse_draft_incomplete() {
        let parsed = parse_draft(&args(&["五桐號"]), today()).unwrap();
        assert!(!parsed.draft.is_complete());
        assert!(parse_draft(&args(&["A", "B", "ice:lots"]), today()).is_err());
    }
}
