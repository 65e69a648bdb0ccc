//! Suite schema types for configuration-driven UI runs.
//!
//! The configuration layer hands the engine an already-shaped tree: test
//! cases made of operation groups made of named, attribute-parameterized
//! operations, plus the ordered run selection. The types here define that
//! shape; serde does the parsing.

use crate::result::{ConducirError, ConducirResult};
use crate::settings::EngineSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Attribute carrying the target locator
pub const ATTR_XPATH: &str = "xpath";
/// Attribute carrying the literal input value
pub const ATTR_VALUE: &str = "value";
/// Attribute selecting a dropdown option by 0-based position
pub const ATTR_SELECT_INDEX: &str = "select-index";
/// Attribute selecting a dropdown option by visible text
pub const ATTR_SELECT_TEXT: &str = "select-text";
/// Attribute carrying the desired checkbox state
pub const ATTR_SELECT: &str = "select";
/// Flag appending a timestamp to the input value
pub const ATTR_DYNAMIC_TIMESTAMP: &str = "dynamic-time-stamp";
/// Flag prefixing the input value with the configured base path
pub const ATTR_RELATIVE_PATH: &str = "relative-path";
/// Attribute naming the element to click for a custom refresh
pub const ATTR_CUSTOM_REFRESH: &str = "customize-refresh-xpath";

/// One declaratively specified UI action: a name that selects the handler
/// plus an attribute map. Immutable once read from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Handler name, e.g. `Click` or `WaitForAppear`
    pub name: String,
    /// Attribute name → string value
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Nested secondary-element config, used only by the deprecated
    /// row-correlation handler
    #[serde(default)]
    pub element: Option<ElementProbe>,
}

impl Operation {
    /// Create an operation with no attributes
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            element: None,
        }
    }

    /// Attach an attribute
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Attach the nested element probe
    #[must_use]
    pub fn with_element(mut self, element: ElementProbe) -> Self {
        self.element = Some(element);
        self
    }

    /// Look up an attribute
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Look up a required attribute, failing with `MissingAttribute`
    pub fn require_attr(&self, key: &str) -> ConducirResult<&str> {
        self.attr(key)
            .ok_or_else(|| ConducirError::missing_attribute(&self.name, key))
    }

    /// Whether a flag attribute is present (its value is irrelevant)
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Parse an optional attribute as a 0-based index
    pub fn index_attr(&self, key: &str) -> ConducirResult<Option<usize>> {
        match self.attr(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<usize>().map(Some).map_err(|e| {
                ConducirError::invalid_attribute(key, format!("\"{raw}\" is not an index: {e}"))
            }),
        }
    }

    /// Parse a required attribute as a boolean (`true` / `false`)
    pub fn bool_attr(&self, key: &str) -> ConducirResult<bool> {
        let raw = self.require_attr(key)?;
        raw.parse::<bool>().map_err(|_| {
            ConducirError::invalid_attribute(key, format!("\"{raw}\" is not a boolean"))
        })
    }
}

/// Secondary-element config for the deprecated row-correlation handler:
/// which element to read, which attribute, and the regex whose first capture
/// group extracts the correlation token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementProbe {
    /// Locator of the secondary element
    pub xpath: String,
    /// Attribute to read from it
    #[serde(rename = "extract-attribute")]
    pub extract_attribute: String,
    /// Regex with one capture group applied to the attribute value
    #[serde(rename = "attribute-regex")]
    pub attribute_regex: String,
}

/// An ordered sub-sequence of operations within a test case. The numeric
/// `group` tag is carried from configuration but not consumed as a filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationGroup {
    /// Group tag; 0 means "applies to all groups"
    #[serde(default)]
    pub group: i64,
    /// Operations in declared order
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl OperationGroup {
    /// Create a group with tag 0
    #[must_use]
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            group: 0,
            operations,
        }
    }

    /// Set the group tag
    #[must_use]
    pub const fn with_group(mut self, group: i64) -> Self {
        self.group = group;
        self
    }
}

/// A named test case: an ordered sequence of operation groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Case name, unique within the declared set
    pub name: String,
    /// Operation groups in declared order
    #[serde(default)]
    pub groups: Vec<OperationGroup>,
}

impl TestCase {
    /// Create an empty test case
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    /// Append an operation group
    #[must_use]
    pub fn with_group(mut self, group: OperationGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Total number of operations across all groups
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.groups.iter().map(|g| g.operations.len()).sum()
    }
}

/// The ordered list of test names actually requested for execution.
/// Order here is authoritative over declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunSelection(Vec<String>);

impl RunSelection {
    /// Create a selection from names in run order
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Names in run order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Whether no test was requested
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RunSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Root suite document: engine settings, the declared test cases, and the
/// run selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suite {
    /// Scalar engine settings
    #[serde(default)]
    pub settings: EngineSettings,
    /// Declared test cases
    #[serde(default)]
    pub tests: Vec<TestCase>,
    /// Names to run, in run order
    #[serde(default)]
    pub run: RunSelection,
}

impl Suite {
    /// Parse a suite from a YAML string.
    ///
    /// # Errors
    /// Returns a configuration-fatal error if the YAML is invalid.
    pub fn from_yaml(yaml: &str) -> ConducirResult<Self> {
        let suite: Self = serde_yaml_ng::from_str(yaml)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Load a suite from a YAML file.
    ///
    /// # Errors
    /// Returns a configuration-fatal error if the file is unreadable or the
    /// YAML is invalid.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConducirResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Validate the suite structure.
    fn validate(&self) -> ConducirResult<()> {
        let mut seen = std::collections::HashSet::new();
        for case in &self.tests {
            if case.name.is_empty() {
                return Err(ConducirError::configuration("test case with empty name"));
            }
            if !seen.insert(case.name.as_str()) {
                return Err(ConducirError::configuration(format!(
                    "duplicate test case name \"{}\"",
                    case.name
                )));
            }
        }
        Ok(())
    }
}
