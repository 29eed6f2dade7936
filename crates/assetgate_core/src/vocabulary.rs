//! Closed vocabulary of asset type names.

use crate::asset::{self, AssetType, Target};
use crate::error::{CoreError, CoreResult};
use indexmap::IndexSet;

/// Rule key delimiter; never part of an asset type name
const DELIMITER: &str = "->";

/// Asset types known to the enumeration engine, in declaration order.
const OAM_ASSET_TYPES: &[&str] = &[
    "fqdn",
    "ipaddress",
    "netblock",
    "autonomoussystem",
    "autnumrecord",
    "ipnetrecord",
    "rirorg",
    "whois",
    "domainrecord",
    "contactrecord",
    "tls",
    "tlscertificate",
    "url",
    "service",
    "socketaddress",
    "fingerprint",
    "emailaddress",
    "location",
    "organization",
    "person",
    "phone",
    "file",
    "product",
    "productrelease",
    "account",
    "fundstransfer",
    "identifier",
];

/// Ordered, case-folded set of valid asset type names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    names: IndexSet<String>,
}

impl Vocabulary {
    /// Build a vocabulary from an externally supplied list
    ///
    /// Names are trimmed and lower-cased; duplicates collapse onto the first
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns error if a name is empty, contains whitespace or `->`, or
    /// collides with `none`/`all`
    pub fn new<I, S>(names: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = IndexSet::new();
        for raw in names {
            let raw = raw.as_ref();
            let name = fold(raw);
            if name.is_empty() {
                return Err(CoreError::InvalidAssetType {
                    name: raw.to_string(),
                    reason: "empty name".to_string(),
                });
            }
            if name.contains(DELIMITER) || name.chars().any(char::is_whitespace) {
                return Err(CoreError::InvalidAssetType {
                    name: raw.to_string(),
                    reason: "contains whitespace or the rule delimiter".to_string(),
                });
            }
            if asset::is_reserved(&name) {
                return Err(CoreError::InvalidAssetType {
                    name: raw.to_string(),
                    reason: "reserved target name".to_string(),
                });
            }
            set.insert(name);
        }
        Ok(Self { names: set })
    }

    /// The default Open Asset Model vocabulary
    #[must_use]
    pub fn oam() -> Self {
        Self {
            names: OAM_ASSET_TYPES.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Check whether a name belongs to the vocabulary (case-insensitive)
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&fold(name))
    }

    /// Look up a name, returning the validated asset type
    #[must_use]
    pub fn get(&self, name: &str) -> Option<AssetType> {
        let name = fold(name);
        self.names
            .contains(&name)
            .then(|| AssetType::from_checked(name))
    }

    /// Look up a name that must be part of the vocabulary
    ///
    /// # Errors
    ///
    /// Returns error if the name is unknown
    pub fn asset(&self, name: &str) -> CoreResult<AssetType> {
        self.get(name).ok_or_else(|| CoreError::InvalidAssetType {
            name: name.to_string(),
            reason: "not in vocabulary".to_string(),
        })
    }

    /// Resolve the right-hand side of a rule: a vocabulary entry or a sentinel
    #[must_use]
    pub fn target(&self, name: &str) -> Option<Target> {
        match fold(name).as_str() {
            asset::NONE => Some(Target::None),
            asset::ALL => Some(Target::All),
            _ => self.get(name).map(Target::Asset),
        }
    }

    /// Iterate names in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of asset types
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if vocabulary is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::oam()
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}
