//! Centralized configuration values shared across the CGA generation pipeline.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// RULE DEFAULTS
// =============================================================================

/// Rule file used when a shape's attributes do not name one.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_RULE_FILE;
/// assert_eq!(DEFAULT_RULE_FILE, "bin/rule.cgb");
/// ```
pub const DEFAULT_RULE_FILE: &str = "bin/rule.cgb";

/// Start rule used when a shape's attributes do not name one.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_START_RULE;
/// assert!(DEFAULT_START_RULE.starts_with("default$"));
/// ```
pub const DEFAULT_START_RULE: &str = "default$init";

/// Random seed used when a shape's attributes do not provide one.
///
/// # Examples
/// ```
/// use config::constants::DEFAULT_SEED;
/// assert_eq!(DEFAULT_SEED, 666);
/// ```
pub const DEFAULT_SEED: i32 = 666;

/// Shape name used when a shape's attributes do not provide one.
pub const DEFAULT_SHAPE_NAME: &str = "InitialShape";

// =============================================================================
// RESERVED ATTRIBUTE KEYS
// =============================================================================

/// Attribute key selecting the rule file (string).
pub const ATTR_RULE_FILE: &str = "ruleFile";

/// Attribute key selecting the start rule (string).
pub const ATTR_START_RULE: &str = "startRule";

/// Attribute key selecting the random seed (int).
pub const ATTR_SEED: &str = "seed";

/// Attribute key selecting the shape name (string).
pub const ATTR_SHAPE_NAME: &str = "shapeName";

/// All keys routed to shape construction instead of rule attributes.
///
/// # Examples
/// ```
/// use config::constants::RESERVED_ATTRIBUTE_KEYS;
/// assert_eq!(RESERVED_ATTRIBUTE_KEYS.len(), 4);
/// ```
pub const RESERVED_ATTRIBUTE_KEYS: [&str; 4] =
    [ATTR_RULE_FILE, ATTR_START_RULE, ATTR_SEED, ATTR_SHAPE_NAME];

// =============================================================================
// ENCODERS
// =============================================================================

/// Encoder that streams generated geometry and reports back through the
/// output callbacks instead of writing files.
///
/// # Examples
/// ```
/// use config::constants::IN_MEMORY_ENCODER_ID;
/// assert!(IN_MEMORY_ENCODER_ID.ends_with("ModelEncoder"));
/// ```
pub const IN_MEMORY_ENCODER_ID: &str = "com.esri.prt.memory.ModelEncoder";

/// Engine encoder that redirects CGA reports into a text file.
pub const CGA_REPORT_ENCODER_ID: &str = "com.esri.prt.core.CGAReportEncoder";

/// Engine encoder that redirects CGA print output into a text file.
pub const CGA_PRINT_ENCODER_ID: &str = "com.esri.prt.core.CGAPrintEncoder";

/// Engine encoder that writes generated geometry as Wavefront OBJ files.
pub const OBJ_ENCODER_ID: &str = "com.esri.prt.codecs.OBJEncoder";

/// File name both redirect encoders write to inside the output directory.
pub const CGA_REPORT_FILE: &str = "CGAReport.txt";

/// Option key naming the redirect encoders' target file.
pub const ENCODER_OPT_NAME: &str = "name";

/// Option key naming the output directory of file encoders.
///
/// # Examples
/// ```
/// use config::constants::OUTPUT_PATH_OPTION;
/// assert_eq!(OUTPUT_PATH_OPTION, "outputPath");
/// ```
pub const OUTPUT_PATH_OPTION: &str = "outputPath";

// =============================================================================
// GENERATION DEFAULTS
// =============================================================================

/// Immutable snapshot of the per-shape defaults applied before attribute
/// overrides.
///
/// # Examples
/// ```
/// use config::constants::GenerationDefaults;
/// let defaults = GenerationDefaults::default();
/// assert_eq!(defaults.rule_file, "bin/rule.cgb");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationDefaults {
    /// Rule file inside the resolved rule package.
    pub rule_file: String,
    /// Rule evaluation starts from, as `style$rule`.
    pub start_rule: String,
    /// Seed for the rule's random functions.
    pub seed: i32,
    /// Name given to the initial shape.
    pub shape_name: String,
}

impl GenerationDefaults {
    /// Builds a set of defaults, rejecting empty names.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GenerationDefaults;
    /// let defaults = GenerationDefaults::new("rules/a.cgb", "Lot$Generate", 7, "Lot")
    ///     .expect("valid defaults");
    /// assert_eq!(defaults.seed, 7);
    /// ```
    pub fn new(
        rule_file: impl Into<String>,
        start_rule: impl Into<String>,
        seed: i32,
        shape_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let rule_file = rule_file.into();
        let start_rule = start_rule.into();
        let shape_name = shape_name.into();
        if rule_file.trim().is_empty() {
            return Err(ConfigError::EmptyRuleFile);
        }
        if start_rule.trim().is_empty() {
            return Err(ConfigError::EmptyStartRule);
        }
        if shape_name.trim().is_empty() {
            return Err(ConfigError::EmptyShapeName);
        }
        Ok(Self {
            rule_file,
            start_rule,
            seed,
            shape_name,
        })
    }
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            rule_file: DEFAULT_RULE_FILE.to_string(),
            start_rule: DEFAULT_START_RULE.to_string(),
            seed: DEFAULT_SEED,
            shape_name: DEFAULT_SHAPE_NAME.to_string(),
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the rule file is empty.
    EmptyRuleFile,
    /// Raised when the start rule is empty.
    EmptyStartRule,
    /// Raised when the shape name is empty.
    EmptyShapeName,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyRuleFile => write!(f, "rule_file must not be empty"),
            ConfigError::EmptyStartRule => write!(f, "start_rule must not be empty"),
            ConfigError::EmptyShapeName => write!(f, "shape_name must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
