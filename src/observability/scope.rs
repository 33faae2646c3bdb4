//! Pass scope for begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` when completed
//! - Logs `{name}_INCOMPLETE` on drop if a fatal error short-circuited the pass

use std::time::Instant;

use super::logger::Logger;

/// Brackets one pass over the block range in the log.
///
/// ```ignore
/// let scope = PassScope::with_fields(&logger, "WRITE_PASS", &[("start", "0")]);
/// // ... write blocks ...
/// scope.complete_with_fields(&[("blocks", "10")]);
/// ```
pub struct PassScope<'a> {
    logger: &'a Logger,
    name: &'a str,
    completed: bool,
    fields: Vec<(&'a str, String)>,
    started: Instant,
}

impl<'a> PassScope<'a> {
    pub fn new(logger: &'a Logger, name: &'a str) -> Self {
        Self::with_fields(logger, name, &[])
    }

    /// Create a new pass scope with fields repeated on the completion line
    pub fn with_fields(logger: &'a Logger, name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        logger.info(&format!("{}_BEGIN", name), fields);

        Self {
            logger,
            name,
            completed: false,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            started: Instant::now(),
        }
    }

    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Logs `{name}_COMPLETE` with the begin fields, elapsed time and `extra_fields`
    pub fn complete_with_fields(mut self, extra_fields: &[(&str, &str)]) {
        self.completed = true;
        let elapsed_ms = self.started.elapsed().as_millis().to_string();

        let mut all_fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all_fields.extend(extra_fields.iter().copied());
        all_fields.push(("elapsed_ms", elapsed_ms.as_str()));

        self.logger
            .info(&format!("{}_COMPLETE", self.name), &all_fields);
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Drop for PassScope<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.logger.warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "pass aborted before completion")],
            );
        }
    }
}
