//! # Encoder Selection
//!
//! Turns a host encoder id and option mapping into the engine encoder specs
//! of one generate call.
//!
//! | Encoder id                | Specs                                   |
//! |---------------------------|-----------------------------------------|
//! | in-memory model encoder   | `[primary]`                             |
//! | anything else             | `[primary, report, print]`              |
//!
//! The report and print specs redirect CGA report and print output into
//! [`CGA_REPORT_FILE`] next to the primary encoder's output.

use cga_engine::{AttributeMap, AttributeValue, EncoderSpec, RuleEngine};
use config::constants::{
    CGA_PRINT_ENCODER_ID, CGA_REPORT_ENCODER_ID, CGA_REPORT_FILE, ENCODER_OPT_NAME,
    IN_MEMORY_ENCODER_ID,
};
use serde_json::Value;
use tracing::debug;

use crate::attributes::to_attribute_map;
use crate::error::{GenerationError, GenerationResult};

/// Encoder options as supplied by the host.
pub type EncoderOptions = serde_json::Map<String, Value>;

/// True for the encoder whose output is collected in memory.
pub fn is_in_memory(encoder_id: &str) -> bool {
    encoder_id == IN_MEMORY_ENCODER_ID
}

pub struct EncoderSelector<'a> {
    engine: &'a dyn RuleEngine,
}

impl<'a> EncoderSelector<'a> {
    pub fn new(engine: &'a dyn RuleEngine) -> Self {
        Self { engine }
    }

    /// Validates `options` for `encoder_id` and builds the encoder list.
    pub fn select(
        &self,
        encoder_id: &str,
        options: &EncoderOptions,
    ) -> GenerationResult<Vec<EncoderSpec>> {
        let validated = self.validate(encoder_id, &to_attribute_map(options))?;

        let mut specs = vec![EncoderSpec::new(encoder_id, validated)];
        if !is_in_memory(encoder_id) {
            specs.push(self.redirect(CGA_REPORT_ENCODER_ID)?);
            specs.push(self.redirect(CGA_PRINT_ENCODER_ID)?);
        }
        debug!(encoder = encoder_id, specs = specs.len(), "encoders selected");
        Ok(specs)
    }

    /// Spec sending CGA report or print output to the report file.
    fn redirect(&self, encoder_id: &str) -> GenerationResult<EncoderSpec> {
        let mut options = AttributeMap::new();
        options.insert(
            ENCODER_OPT_NAME.to_string(),
            AttributeValue::String(CGA_REPORT_FILE.to_string()),
        );
        let validated = self.validate(encoder_id, &options)?;
        Ok(EncoderSpec::new(encoder_id, validated))
    }

    fn validate(&self, encoder_id: &str, options: &AttributeMap) -> GenerationResult<AttributeMap> {
        self.engine
            .validate_options(encoder_id, options)
            .map_err(|e| GenerationError::OptionValidation {
                encoder: encoder_id.to_string(),
                message: e.to_string(),
            })
    }
}
