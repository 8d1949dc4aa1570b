//! Evaluation categories and gold-record membership.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::record::GoldRecord;

/// Position of a membership flag column in the loaded gold standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagId(usize);

impl FlagId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The membership flag columns carried by a gold standard, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSchema {
    names: Vec<String>,
}

impl FlagSchema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !out.iter().any(|n| n == name) {
                out.push(name.to_string());
            }
        }
        Self { names: out }
    }

    pub fn id_of(&self, name: &str) -> Option<FlagId> {
        self.names.iter().position(|n| n == name.trim()).map(FlagId)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn ids(&self) -> impl Iterator<Item = FlagId> + '_ {
        (0..self.names.len()).map(FlagId)
    }
}

/// Anything that decides whether a gold record counts for a category.
pub trait MembershipTest {
    fn admits(&self, gold: &GoldRecord) -> bool;
}

/// Membership rule resolved against a [`FlagSchema`] at configuration load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// Every gold record belongs (the "no filter" category).
    All,
    /// Only records whose flag is set belong.
    Flag(FlagId),
}

impl MembershipTest for Membership {
    fn admits(&self, gold: &GoldRecord) -> bool {
        match self {
            Self::All => true,
            Self::Flag(flag) => gold.is_flagged(*flag),
        }
    }
}

/// One evaluation category: a membership rule plus the search expression
/// sent to the external source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Configuration code the category was expanded from (e.g. `G`).
    pub code: String,
    /// Programmatic name, unique within a run (e.g. `GO_1`).
    pub name: String,
    pub display_name: String,
    pub membership: Membership,
    pub query: String,
}

impl Category {
    pub fn admits(&self, gold: &GoldRecord) -> bool {
        self.membership.admits(gold)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.membership == Membership::All
    }
}

impl MembershipTest for Category {
    fn admits(&self, gold: &GoldRecord) -> bool {
        self.membership.admits(gold)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// Category as written in configuration, before flag resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub code: String,
    pub name: String,
    pub display_name: String,
    /// Gold-standard column flagging membership. Empty matches every record.
    #[serde(default)]
    pub membership_field: String,
    pub queries: Vec<String>,
}

impl CategoryDefinition {
    /// Resolves the membership field and expands one category per query.
    ///
    /// Query `i` (1-based) becomes `<name>_<i>` displayed as
    /// `<display_name>; Query <i>`.
    pub fn expand(&self, schema: &FlagSchema) -> Result<Vec<Category>> {
        for (field, value) in [("code", &self.code), ("name", &self.name)] {
            if value.trim().is_empty() {
                return Err(ModelError::MissingField { field });
            }
        }
        let membership = self.membership(schema)?;
        if self.queries.is_empty() {
            return Err(ModelError::NoQueries {
                category: self.code.clone(),
            });
        }
        Ok(self
            .queries
            .iter()
            .enumerate()
            .map(|(idx, query)| Category {
                code: self.code.clone(),
                name: format!("{}_{}", self.name, idx + 1),
                display_name: format!("{}; Query {}", self.display_name, idx + 1),
                membership,
                query: query.clone(),
            })
            .collect())
    }

    fn membership(&self, schema: &FlagSchema) -> Result<Membership> {
        let field = self.membership_field.trim();
        if field.is_empty() {
            return Ok(Membership::All);
        }
        schema
            .id_of(field)
            .map(Membership::Flag)
            .ok_or_else(|| ModelError::UnknownMembershipField {
                category: self.code.clone(),
                field: field.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::Accession;

    fn definition(field: &str, queries: &[&str]) -> CategoryDefinition {
        CategoryDefinition {
            code: "G".to_string(),
            name: "GO".to_string(),
            display_name: "Gene Ontology".to_string(),
            membership_field: field.to_string(),
            queries: queries.iter().map(|q| q.to_string()).collect(),
        }
    }

    #[test]
    fn expands_one_category_per_query() {
        let schema = FlagSchema::new(["go"]);
        let categories = definition("go", &["q1", "q2"]).expand(&schema).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].name, "GO_2");
        assert_eq!(categories[1].display_name, "Gene Ontology; Query 2");
        assert_eq!(categories[1].query, "q2");
    }

    #[test]
    fn empty_field_matches_everything() {
        let schema = FlagSchema::default();
        let category = &definition("", &["q"]).expand(&schema).unwrap()[0];
        let gold = GoldRecord::new(Accession::new("J:1").unwrap(), "Cell");
        assert!(category.is_unfiltered());
        assert!(category.admits(&gold));
    }

    #[test]
    fn flag_membership_follows_record() {
        let schema = FlagSchema::new(["ap", "go"]);
        let go = schema.id_of("go").unwrap();
        let category = &definition("go", &["q"]).expand(&schema).unwrap()[0];
        let member = GoldRecord::new(Accession::new("J:1").unwrap(), "Cell").with_flag(go);
        let other = GoldRecord::new(Accession::new("J:2").unwrap(), "Cell");
        assert!(category.admits(&member));
        assert!(!category.admits(&other));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let schema = FlagSchema::new(["ap"]);
        let err = definition("tumor", &["q"]).expand(&schema).unwrap_err();
        assert!(matches!(err, ModelError::UnknownMembershipField { .. }));
    }

    #[test]
    fn missing_queries_are_rejected() {
        let err = definition("", &[]).expand(&FlagSchema::default()).unwrap_err();
        assert_eq!(
            err,
            ModelError::NoQueries {
                category: "G".to_string()
            }
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut blank = definition("", &["q"]);
        blank.name = "  ".to_string();
        let err = blank.expand(&FlagSchema::default()).unwrap_err();
        assert_eq!(err, ModelError::MissingField { field: "name" });
    }
}
