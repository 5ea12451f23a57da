use std::collections::BTreeMap;

/// Type-name transform between singular model names and plural wire keys.
pub trait Inflector: Send + Sync {
    fn pluralize(&self, word: &str) -> String;
    fn singularize(&self, word: &str) -> String;
}

/// English suffix rules plus an explicit irregular table.
#[derive(Debug, Clone, Default)]
pub struct SuffixInflector {
    irregular: BTreeMap<String, String>,
}

impl SuffixInflector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_irregular(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.irregular.insert(singular.into(), plural.into());
        self
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

impl Inflector for SuffixInflector {
    fn pluralize(&self, word: &str) -> String {
        if let Some(plural) = self.irregular.get(word) {
            return plural.clone();
        }
        if let Some(stem) = word.strip_suffix('y') {
            if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
                return format!("{}ies", stem);
            }
        }
        if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
            return format!("{}es", word);
        }
        format!("{}s", word)
    }

    fn singularize(&self, word: &str) -> String {
        if let Some((singular, _)) = self.irregular.iter().find(|(_, p)| p.as_str() == word) {
            return singular.clone();
        }
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{}y", stem);
        }
        //"boxes" -> "box" and "statuses" -> "status", but "cases" -> "case"
        let es_stem = ["xes", "ches", "shes", "sses", "zzes"].iter().any(|s| word.ends_with(s))
            || ["status", "alias", "bus", "campus", "virus"]
                .iter()
                .any(|stem| word.strip_suffix("es").is_some_and(|w| w.ends_with(stem)));
        if es_stem {
            return word[..word.len() - 2].to_string();
        }
        match word.strip_suffix('s') {
            Some(stem) => stem.to_string(),
            None => word.to_string(),
        }
    }
}
