//! Input and output data model of the compiler.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Value type of a resource-adapter config property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigPropertyType {
    /// `java.lang.String`
    String,
    /// `java.lang.Integer`
    Integer,
    /// `java.lang.Long`
    Long,
    /// `java.lang.Boolean`
    Boolean,
    /// `java.lang.Double`
    Double,
}

impl ConfigPropertyType {
    /// Fully qualified type name as expected by the resource-adapter descriptor.
    #[must_use]
    pub const fn java_type(self) -> &'static str {
        match self {
            Self::String => "java.lang.String",
            Self::Integer => "java.lang.Integer",
            Self::Long => "java.lang.Long",
            Self::Boolean => "java.lang.Boolean",
            Self::Double => "java.lang.Double",
        }
    }
}

/// A single resource-adapter config property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigProperty {
    /// Property name.
    pub name: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub kind: ConfigPropertyType,
    /// Rendered value.
    pub value: String,
}

impl ConfigProperty {
    /// Create a property.
    pub fn new(name: impl Into<String>, kind: ConfigPropertyType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
        }
    }

    /// Shorthand for a `String` property.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ConfigPropertyType::String, value)
    }
}

impl fmt::Display for ConfigProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})={}", self.name, self.kind.java_type(), self.value)
    }
}

/// Config properties partitioned by direction. Each list keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPropertyBag {
    /// Properties of the resource adapter itself.
    pub generic: Vec<ConfigProperty>,
    /// Activation-spec (inbound) properties.
    pub inbound: Vec<ConfigProperty>,
    /// Managed connection factory (outbound) properties.
    pub outbound: Vec<ConfigProperty>,
}

impl ConfigPropertyBag {
    /// Look up a generic property by name.
    #[must_use]
    pub fn generic(&self, name: &str) -> Option<&ConfigProperty> {
        self.generic.iter().find(|p| p.name == name)
    }

    /// Look up an inbound property by name.
    #[must_use]
    pub fn inbound(&self, name: &str) -> Option<&ConfigProperty> {
        self.inbound.iter().find(|p| p.name == name)
    }

    /// Look up an outbound property by name.
    #[must_use]
    pub fn outbound(&self, name: &str) -> Option<&ConfigProperty> {
        self.outbound.iter().find(|p| p.name == name)
    }

    /// Total number of properties across all partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generic.len() + self.inbound.len() + self.outbound.len()
    }

    /// True when no partition holds a property.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A resolved option value. Expressions are already expanded upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean value.
    Bool(bool),
    /// Integral value (int or long attributes).
    Integer(i64),
    /// Decimal value.
    Decimal(f64),
    /// Text value.
    Text(String),
    /// List of strings.
    List(Vec<String>),
}

impl OptionValue {
    /// Boolean view. Text follows "equals ignoring case `true`" semantics.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) => Some(s.trim().eq_ignore_ascii_case("true")),
            _ => None,
        }
    }

    /// Integer view. Text is parsed.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text view for string-typed values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value the way the resource adapter reads it.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Integer(v) => v.to_string(),
            Self::Decimal(v) if v.fract() == 0.0 && v.is_finite() => format!("{v:.1}"),
            Self::Decimal(v) => v.to_string(),
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(","),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

/// Reference to a secret held in a credential store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CredentialReference {
    /// Credential store name.
    #[serde(default)]
    pub store: Option<String>,
    /// Alias of the secret inside the store.
    #[serde(default)]
    pub alias: Option<String>,
    /// Inline secret; used when no store is given.
    #[serde(default)]
    pub clear_text: Option<String>,
}

impl fmt::Display for CredentialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.store, &self.alias) {
            (Some(store), Some(alias)) => write!(f, "{store}/{alias}"),
            (Some(store), None) => write!(f, "{store}"),
            (None, Some(alias)) => write!(f, "{alias}"),
            (None, None) => write!(f, "<inline>"),
        }
    }
}

/// Primary JNDI name plus aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JndiBindings {
    /// Name the connection definition is bound under.
    pub primary: String,
    /// Additional names bound to the same factory.
    pub aliases: Vec<String>,
}

impl JndiBindings {
    /// Split entries into primary and aliases. `None` when `entries` is empty.
    #[must_use]
    pub fn from_entries(entries: &[String]) -> Option<Self> {
        let (primary, aliases) = entries.split_first()?;
        Some(Self {
            primary: primary.clone(),
            aliases: aliases.to_vec(),
        })
    }
}

/// Immutable description of one pooled connection factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionFactorySpec {
    /// Factory name.
    pub name: String,
    /// JNDI names; the first is primary, the rest are aliases.
    pub entries: Vec<String>,
    /// Explicit connector names (exclusive with `discovery_group`).
    pub connectors: Vec<String>,
    /// Discovery group name (exclusive with `connectors`).
    pub discovery_group: Option<String>,
    /// Resolved named options.
    pub options: BTreeMap<String, OptionValue>,
    /// Minimum pool size; `-1` or `None` means container default.
    pub min_pool_size: Option<i32>,
    /// Maximum pool size; `-1` or `None` means container default.
    pub max_pool_size: Option<i32>,
    /// User-facing transaction mode (`none`, `local`, `xa`).
    pub transaction: String,
    /// Managed connection pool implementation class.
    pub managed_connection_pool: Option<String>,
    /// Enlistment tracing; `None` leaves it to the container.
    pub enlistment_trace: Option<bool>,
    /// Credential reference used instead of a plain `password` option.
    pub credential_reference: Option<CredentialReference>,
    /// Fall back to the first known connector when no transport is given.
    pub pick_any_connector: bool,
}

impl ConnectionFactorySpec {
    /// Create a spec with no transport, no options and `xa` transactions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            connectors: Vec::new(),
            discovery_group: None,
            options: BTreeMap::new(),
            min_pool_size: None,
            max_pool_size: None,
            transaction: "xa".into(),
            managed_connection_pool: None,
            enlistment_trace: None,
            credential_reference: None,
            pick_any_connector: false,
        }
    }

    /// Set JNDI entries.
    #[must_use]
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Set connector names.
    #[must_use]
    pub fn with_connectors<I, S>(mut self, connectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.connectors = connectors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the discovery group.
    #[must_use]
    pub fn with_discovery_group(mut self, group: impl Into<String>) -> Self {
        self.discovery_group = Some(group.into());
        self
    }

    /// Set a named option.
    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Set both pool bounds.
    #[must_use]
    pub const fn with_pool_size(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_pool_size = min;
        self.max_pool_size = max;
        self
    }

    /// Set the transaction mode.
    #[must_use]
    pub fn with_transaction(mut self, transaction: impl Into<String>) -> Self {
        self.transaction = transaction.into();
        self
    }

    /// Set the managed connection pool class.
    #[must_use]
    pub fn with_managed_connection_pool(mut self, class_name: impl Into<String>) -> Self {
        self.managed_connection_pool = Some(class_name.into());
        self
    }

    /// Set enlistment tracing.
    #[must_use]
    pub const fn with_enlistment_trace(mut self, trace: Option<bool>) -> Self {
        self.enlistment_trace = trace;
        self
    }

    /// Set the credential reference.
    #[must_use]
    pub fn with_credential_reference(mut self, reference: CredentialReference) -> Self {
        self.credential_reference = Some(reference);
        self
    }

    /// Allow falling back to any known connector.
    #[must_use]
    pub const fn with_pick_any_connector(mut self, pick: bool) -> Self {
        self.pick_any_connector = pick;
        self
    }

    /// JNDI bindings derived from `entries`.
    #[must_use]
    pub fn bindings(&self) -> Option<JndiBindings> {
        JndiBindings::from_entries(&self.entries)
    }
}
