use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Opaque article identifier. The listing may send ids as JSON numbers or
/// strings; both are kept as their string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for ArticleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Signed(i64),
            Unsigned(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// The user's in/out classification for one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    In,
    Out,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::In => "in",
            Choice::Out => "out",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(Choice::In),
            "out" => Ok(Choice::Out),
            other => Err(format!("Invalid choice: {:?}. Use 'in' or 'out'", other)),
        }
    }
}

/// Article descriptor as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    /// Decision already stored by the remote service, if any
    #[serde(default, deserialize_with = "keyword_choice")]
    pub keyword: Option<Choice>,
}

impl Article {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ArticleId::new(id),
            title: title.into(),
            keyword: None,
        }
    }
}

// The service stores free-form keywords; anything other than in/out means "undecided".
fn keyword_choice<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Choice>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|keyword| keyword.parse().ok()))
}

/// Mapping from article id to the chosen value, as sent to the persistence endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Decisions(BTreeMap<ArticleId, Choice>);

impl Decisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ArticleId, choice: Choice) {
        self.0.insert(id, choice);
    }

    pub fn get(&self, id: &ArticleId) -> Option<Choice> {
        self.0.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArticleId, &Choice)> {
        self.0.iter()
    }
}

impl FromIterator<(ArticleId, Choice)> for Decisions {
    fn from_iter<I: IntoIterator<Item = (ArticleId, Choice)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One generated summary for an accepted article
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryResult {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl SummaryResult {
    pub fn new(title: impl Into<String>, summary: Option<&str>) -> Self {
        Self {
            title: title.into(),
            summary: summary.map(str::to_string),
            link: None,
        }
    }

    /// The summary as sent, or `None` when it is missing or blank
    pub fn summary_text(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Article Tests ====================

    #[test]
    fn test_article_numeric_and_string_ids() {
        let articles: Vec<Article> =
            serde_json::from_str(r#"[{"id": 7, "title": "Seven"}, {"id": "a-8", "title": "Eight"}]"#)
                .unwrap();
        assert_eq!(articles[0].id, ArticleId::new("7"));
        assert_eq!(articles[1].id, ArticleId::new("a-8"));
    }

    #[test]
    fn test_article_keyword_prefill() {
        let articles: Vec<Article> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "A", "keyword": "IN"},
                {"id": 2, "title": "B", "keyword": ""},
                {"id": 3, "title": "C", "keyword": null, "summary": "ignored"},
                {"id": 4, "title": "D", "keyword": "out"}
            ]"#,
        )
        .unwrap();
        let keywords: Vec<_> = articles.iter().map(|a| a.keyword).collect();
        assert_eq!(keywords, vec![Some(Choice::In), None, None, Some(Choice::Out)]);
    }

    #[test]
    fn test_article_missing_title_is_rejected() {
        let parsed = serde_json::from_str::<Vec<Article>>(r#"[{"id": 1}]"#);
        assert!(parsed.is_err());
    }

    // ==================== Decision Tests ====================

    #[test]
    fn test_decisions_serialize_as_object() {
        let decisions: Decisions = vec![
            (ArticleId::new("3"), Choice::Out),
            (ArticleId::new("1"), Choice::In),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&decisions).unwrap();
        assert_eq!(json, serde_json::json!({"1": "in", "3": "out"}));
    }

    #[test]
    fn test_empty_decisions_serialize_as_empty_object() {
        let json = serde_json::to_string(&Decisions::new()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_choice_from_str() {
        assert_eq!(" In ".parse::<Choice>(), Ok(Choice::In));
        assert_eq!("out".parse::<Choice>(), Ok(Choice::Out));
        assert!("maybe".parse::<Choice>().is_err());
    }

    // ==================== SummaryResult Tests ====================

    #[test]
    fn test_summary_missing_null_and_blank() {
        let results: Vec<SummaryResult> = serde_json::from_str(
            r#"[
                {"title": "A", "summary": "X"},
                {"title": "B"},
                {"title": "C", "summary": null},
                {"title": "D", "summary": "   "}
            ]"#,
        )
        .unwrap();
        let texts: Vec<_> = results.iter().map(|r| r.summary_text()).collect();
        assert_eq!(texts, vec![Some("X"), None, None, None]);
    }

    #[test]
    fn test_summary_text_is_not_trimmed() {
        let result = SummaryResult::new("A", Some("  indented\nsecond line \n"));
        assert_eq!(result.summary_text(), Some("  indented\nsecond line \n"));
    }
}
