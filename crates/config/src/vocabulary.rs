//! Aliases, descriptor sources, package infos and XML namespaces.

use std::collections::HashMap;

use serde::Serialize;

use crate::descriptor::{
    DescriptorSourceDescriptor, InputDescriptor, PackageInfoDescriptor, XmlNamespaceDescriptor,
};

/// Schema information registered for a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    /// Target namespace.
    pub ns: String,
    /// Namespace prefix.
    pub nsabr: String,
    /// Schema document name.
    pub xsd_document: String,
    /// Schema version.
    pub version: Option<String>,
}

/// A namespace known by prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Namespace {
    /// Namespace URI.
    pub ns: String,
    /// Schema location.
    pub location: Option<String>,
}

/// Lookup tables for model vocabulary.
///
/// Aliases and descriptor sources are looked up in lower case. Well-known
/// stereotypes are stored in lower case, well-known tags as given.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    stereotype_aliases: HashMap<String, String>,
    tag_aliases: HashMap<String, String>,
    descriptor_sources: HashMap<String, String>,
    packages: HashMap<String, PackageInfo>,
    namespaces: HashMap<String, Namespace>,
    schema_locations: HashMap<String, String>,
}

impl Vocabulary {
    /// Empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take aliases, descriptor sources and package infos from the input.
    pub fn add_input(&mut self, input: &InputDescriptor) {
        for (alias, wellknown) in &input.stereotype_aliases {
            self.add_stereotype_alias(alias, wellknown);
        }
        for (alias, wellknown) in &input.tag_aliases {
            self.add_tag_alias(alias, wellknown);
        }
        for source in &input.descriptor_sources {
            self.add_descriptor_source(source);
        }
        for package in &input.package_infos {
            self.add_package(package);
        }
    }

    /// Map a stereotype alias to a well-known stereotype.
    pub fn add_stereotype_alias(&mut self, alias: &str, wellknown: &str) {
        self.stereotype_aliases
            .insert(alias.to_lowercase(), wellknown.to_lowercase());
    }

    /// Map a tag alias to a well-known tag.
    pub fn add_tag_alias(&mut self, alias: &str, wellknown: &str) {
        self.tag_aliases
            .insert(alias.to_lowercase(), wellknown.to_owned());
    }

    /// Register where a descriptor is read from.
    ///
    /// `sc:extract` and `tag` sources keep their token or tag after a `#`.
    pub fn add_descriptor_source(&mut self, entry: &DescriptorSourceDescriptor) {
        let mut source = entry.source.to_lowercase();
        let qualifier = match source.as_str() {
            "sc:extract" => Some(entry.token.as_deref().unwrap_or_default()),
            "tag" => Some(entry.tag.as_deref().unwrap_or_default()),
            _ => None,
        };
        if let Some(qualifier) = qualifier {
            source.push('#');
            source.push_str(qualifier);
        }
        self.descriptor_sources
            .insert(entry.descriptor.to_lowercase(), source);
    }

    /// Register a package and its schema location.
    pub fn add_package(&mut self, package: &PackageInfoDescriptor) {
        self.packages.insert(
            package.package_name.clone(),
            PackageInfo {
                ns: package.ns.clone(),
                nsabr: package.nsabr.clone(),
                xsd_document: package.xsd_document.clone(),
                version: package.version.clone(),
            },
        );
        self.schema_locations
            .insert(package.ns.clone(), package.xsd_document.clone());
    }

    /// Register a namespace prefix and its schema location.
    ///
    /// A namespace without a location clears a previously known location.
    pub fn add_namespace(&mut self, namespace: &XmlNamespaceDescriptor) {
        self.namespaces.insert(
            namespace.nsabr.clone(),
            Namespace {
                ns: namespace.ns.clone(),
                location: namespace.location.clone(),
            },
        );
        match &namespace.location {
            Some(location) => {
                self.schema_locations
                    .insert(namespace.ns.clone(), location.clone());
            }
            None => {
                self.schema_locations.remove(&namespace.ns);
            }
        }
    }

    /// The well-known stereotype `stereotype` stands for, or itself.
    #[must_use]
    pub fn normalize_stereotype<'a>(&'a self, stereotype: &'a str) -> &'a str {
        self.stereotype_aliases
            .get(&stereotype.trim().to_lowercase())
            .map_or(stereotype, String::as_str)
    }

    /// The well-known tag `tag` stands for, or itself.
    #[must_use]
    pub fn normalize_tag<'a>(&'a self, tag: &'a str) -> &'a str {
        self.tag_aliases
            .get(&tag.trim().to_lowercase())
            .map_or(tag, String::as_str)
    }

    /// Where `descriptor` is read from.
    #[must_use]
    pub fn descriptor_source(&self, descriptor: &str) -> Option<&str> {
        self.descriptor_sources
            .get(&descriptor.to_lowercase())
            .map(String::as_str)
    }

    /// Schema information of a package.
    #[must_use]
    pub fn package_info(&self, package: &str) -> Option<&PackageInfo> {
        self.packages.get(package)
    }

    /// The namespace registered under `prefix`.
    #[must_use]
    pub fn namespace_for_prefix(&self, prefix: &str) -> Option<&Namespace> {
        self.namespaces.get(prefix)
    }

    /// A prefix registered for `ns`. If several are, which one is unspecified.
    #[must_use]
    pub fn prefix_for_namespace(&self, ns: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(_, namespace)| namespace.ns == ns)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Schema location of a namespace; the last registration wins.
    #[must_use]
    pub fn schema_location(&self, ns: &str) -> Option<&str> {
        self.schema_locations.get(ns).map(String::as_str)
    }
}
