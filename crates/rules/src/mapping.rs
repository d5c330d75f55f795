//! Layered mapping tables: `(subject, rule set)` to record, with cascade.

use std::collections::HashMap;
use std::fmt;

use modelforge_core::{ConfigError, RuleSetName};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::chain::RuleSetChain;

/// Composite key of a mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MappingKey {
    /// The mapped subject, usually a model type name. Case-sensitive.
    pub subject: String,
    /// The encoding rule the entry is declared under.
    pub rule_set: RuleSetName,
}

impl MappingKey {
    /// Build a key.
    pub fn new(subject: impl Into<String>, rule_set: impl Into<RuleSetName>) -> Self {
        Self {
            subject: subject.into(),
            rule_set: rule_set.into(),
        }
    }
}

impl fmt::Display for MappingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} under {}", self.subject, self.rule_set)
    }
}

/// An ordered tuple of one to four string fields.
///
/// The table never interprets the fields; callers decide what each position
/// means.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct MappingRecord(SmallVec<[String; 4]>);

impl MappingRecord {
    /// Most fields a record can hold.
    pub const MAX_FIELDS: usize = 4;

    /// Build a record, rejecting zero or more than four fields.
    pub fn from_fields<I, S>(fields: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: SmallVec<[String; 4]> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() || fields.len() > Self::MAX_FIELDS {
            return Err(ConfigError::InvalidMappingRecord(fields.len()));
        }
        Ok(Self(fields))
    }

    /// A one-field record.
    pub fn single(field: impl Into<String>) -> Self {
        let mut fields = SmallVec::new();
        fields.push(field.into());
        Self(fields)
    }

    /// The field at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// The first field (always present).
    #[must_use]
    pub fn first(&self) -> &str {
        self.0.first().map_or("", String::as_str)
    }

    /// All fields in order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<String>> for MappingRecord {
    type Error = ConfigError;

    fn try_from(fields: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_fields(fields)
    }
}

impl From<MappingRecord> for Vec<String> {
    fn from(record: MappingRecord) -> Self {
        record.0.into_vec()
    }
}

/// A keyed store of records with cascade lookup.
///
/// Entries are stored per subject, then per rule set, so probing one
/// ancestor after another never allocates a key.
#[derive(Debug, Clone)]
pub struct MappingTable<R = MappingRecord> {
    entries: HashMap<String, HashMap<RuleSetName, R>>,
    len: usize,
}

impl<R> Default for MappingTable<R> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            len: 0,
        }
    }
}

impl<R> MappingTable<R> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the record previously stored under the key.
    pub fn put(
        &mut self,
        subject: impl Into<String>,
        rule_set: impl Into<RuleSetName>,
        record: R,
    ) -> Option<R> {
        let previous = self
            .entries
            .entry(subject.into())
            .or_default()
            .insert(rule_set.into(), record);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Insert under a composite key.
    pub fn put_key(&mut self, key: MappingKey, record: R) -> Option<R> {
        self.put(key.subject, key.rule_set, record)
    }

    /// Remove the entry stored exactly under `(subject, rule_set)`.
    pub fn remove(&mut self, subject: &str, rule_set: &RuleSetName) -> Option<R> {
        let per_subject = self.entries.get_mut(subject)?;
        let removed = per_subject.remove(rule_set)?;
        if per_subject.is_empty() {
            self.entries.remove(subject);
        }
        self.len -= 1;
        Some(removed)
    }

    /// The entry stored exactly under `(subject, rule_set)`, without cascade.
    #[must_use]
    pub fn get_exact(&self, subject: &str, rule_set: &RuleSetName) -> Option<&R> {
        self.entries.get(subject)?.get(rule_set)
    }

    /// Resolve `subject` under `rule_set`, walking its ancestors.
    ///
    /// The entry of the nearest rule set on the chain wins. Returns `None`
    /// when no rule set on the chain has an entry for the subject.
    pub fn lookup<C>(&self, subject: &str, rule_set: &RuleSetName, chain: &C) -> Option<&R>
    where
        C: RuleSetChain + ?Sized,
    {
        let per_subject = self.entries.get(subject)?;
        chain
            .ancestors_of(rule_set)
            .find_map(|ancestor| per_subject.get(ancestor))
    }

    /// Like [`lookup`](Self::lookup), also reporting which rule set matched.
    pub fn lookup_with_origin<'a, C>(
        &'a self,
        subject: &str,
        rule_set: &'a RuleSetName,
        chain: &'a C,
    ) -> Option<(&'a RuleSetName, &'a R)>
    where
        C: RuleSetChain + ?Sized,
    {
        let per_subject = self.entries.get(subject)?;
        chain
            .ancestors_of(rule_set)
            .find_map(|ancestor| per_subject.get(ancestor).map(|record| (ancestor, record)))
    }

    /// Whether any rule set has an entry for `subject`.
    #[must_use]
    pub fn contains_subject(&self, subject: &str) -> bool {
        self.entries.contains_key(subject)
    }

    /// Iterate over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSetName, &R)> {
        self.entries.iter().flat_map(|(subject, per_rule_set)| {
            per_rule_set
                .iter()
                .map(move |(rule_set, record)| (subject.as_str(), rule_set, record))
        })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Mapping tables partitioned by an owning stage identity.
///
/// Owners never see each other's entries; within one owner the cascade is
/// the same as [`MappingTable::lookup`].
#[derive(Debug, Clone)]
pub struct NamespacedMappingTable<R = MappingRecord> {
    owners: HashMap<String, MappingTable<R>>,
}

impl<R> Default for NamespacedMappingTable<R> {
    fn default() -> Self {
        Self {
            owners: HashMap::new(),
        }
    }
}

impl<R> NamespacedMappingTable<R> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry of `owner`.
    pub fn put(
        &mut self,
        owner: impl Into<String>,
        subject: impl Into<String>,
        rule_set: impl Into<RuleSetName>,
        record: R,
    ) -> Option<R> {
        self.owners
            .entry(owner.into())
            .or_default()
            .put(subject, rule_set, record)
    }

    /// Resolve `subject` under `rule_set` within `owner`'s entries.
    pub fn lookup<C>(
        &self,
        owner: &str,
        subject: &str,
        rule_set: &RuleSetName,
        chain: &C,
    ) -> Option<&R>
    where
        C: RuleSetChain + ?Sized,
    {
        self.owners.get(owner)?.lookup(subject, rule_set, chain)
    }

    /// The table of one owner.
    #[must_use]
    pub fn table(&self, owner: &str) -> Option<&MappingTable<R>> {
        self.owners.get(owner)
    }

    /// Owners with at least one entry.
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.owners.keys().map(String::as_str)
    }

    /// Total number of entries across owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.values().map(MappingTable::len).sum()
    }

    /// Whether no owner has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.values().all(MappingTable::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RuleRegistry;
    use modelforge_core::RuleName;
    use pretty_assertions::assert_eq;

    fn rs(name: &str) -> RuleSetName {
        RuleSetName::new(name)
    }

    fn rec(value: &str) -> MappingRecord {
        MappingRecord::single(value)
    }

    /// B extends A extends root.
    fn a_b_registry() -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        registry.declare_rule_set("A", None, Vec::<RuleName>::new());
        registry.declare_rule_set("B", Some(rs("A")), Vec::<RuleName>::new());
        registry
    }

    #[test]
    fn record_arity_is_checked() {
        assert_eq!(
            MappingRecord::from_fields(Vec::<String>::new()),
            Err(ConfigError::InvalidMappingRecord(0))
        );
        assert_eq!(
            MappingRecord::from_fields(["a", "b", "c", "d", "e"]),
            Err(ConfigError::InvalidMappingRecord(5))
        );
        let record = MappingRecord::from_fields(["direct", "gml:PointPropertyType"]).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.first(), "direct");
        assert_eq!(record.get(1), Some("gml:PointPropertyType"));
        assert_eq!(record.get(2), None);
    }

    #[test]
    fn record_deserializes_from_array() {
        let record: MappingRecord = serde_json::from_str(r#"["direct","x"]"#).unwrap();
        assert_eq!(record.fields(), &["direct".to_owned(), "x".to_owned()]);
        assert!(serde_json::from_str::<MappingRecord>("[]").is_err());
    }

    #[test]
    fn last_write_wins() {
        let mut table = MappingTable::new();
        assert_eq!(table.put("Foo", "A", rec("one")), None);
        assert_eq!(table.put("Foo", "a", rec("two")), Some(rec("one")));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get_exact("Foo", &rs("A")), Some(&rec("two")));
    }

    #[test]
    fn nearest_wins_and_removal_falls_back() {
        let registry = a_b_registry();
        let mut table = MappingTable::new();
        table.put("Foo", "A", rec("rec1"));
        table.put("Foo", "B", rec("rec2"));

        assert_eq!(table.lookup("Foo", &rs("B"), &registry), Some(&rec("rec2")));
        assert_eq!(table.lookup("Foo", &rs("A"), &registry), Some(&rec("rec1")));

        assert_eq!(table.remove("Foo", &rs("B")), Some(rec("rec2")));
        assert_eq!(table.lookup("Foo", &rs("B"), &registry), Some(&rec("rec1")));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn lookup_reports_matching_rule_set() {
        let registry = a_b_registry();
        let mut table = MappingTable::new();
        table.put("Foo", "*", rec("root"));
        let b = rs("B");
        let (origin, record) = table.lookup_with_origin("Foo", &b, &registry).unwrap();
        assert!(origin.is_root());
        assert_eq!(record, &rec("root"));
    }

    #[test]
    fn lookup_misses_are_none() {
        let registry = a_b_registry();
        let mut table = MappingTable::new();
        table.put("Foo", "B", rec("rec2"));
        assert_eq!(table.lookup("Foo", &rs("A"), &registry), None);
        assert_eq!(table.lookup("Bar", &rs("B"), &registry), None);
        assert_eq!(table.lookup("Foo", &rs("unrelated"), &registry), None);
    }

    #[test]
    fn subjects_are_case_sensitive() {
        let registry = a_b_registry();
        let mut table = MappingTable::new();
        table.put("Point", "A", rec("gml:PointPropertyType"));
        assert!(table.lookup("point", &rs("A"), &registry).is_none());
        assert!(table.contains_subject("Point"));
    }

    #[test]
    fn namespaced_owners_are_isolated() {
        let registry = a_b_registry();
        let mut table = NamespacedMappingTable::new();
        table.put("sql", "CharacterString", "A", rec("text"));
        table.put("owl", "CharacterString", "A", rec("xsd:string"));

        assert_eq!(
            table.lookup("sql", "CharacterString", &rs("B"), &registry),
            Some(&rec("text"))
        );
        assert_eq!(
            table.lookup("owl", "CharacterString", &rs("B"), &registry),
            Some(&rec("xsd:string"))
        );
        assert_eq!(table.lookup("json", "CharacterString", &rs("B"), &registry), None);
        assert_eq!(table.len(), 2);
        assert!(table.table("sql").is_some());
    }
}
