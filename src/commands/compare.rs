//! Definition equality
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation
//!
//! Deep equality between command definitions, used by the synchronizer to
//! classify remote records as kept or stale. Only the fields the remote
//! service reflects back verbatim participate: name, description, the
//! default-permission flag and the parameter tree. Choices, scope and
//! required permissions are ignored. Parameter order is significant: a
//! reordered parameter list counts as a changed command.

use super::definition::{CommandDefinition, ParameterSpec};

/// Compare two (possibly absent) command definitions.
///
/// Two absent definitions are equal; one absent and one present are not.
pub fn commands_equal(a: Option<&CommandDefinition>, b: Option<&CommandDefinition>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.name == b.name
                && a.description == b.description
                && a.default_permission == b.default_permission
                && options_equal(&a.options, &b.options)
        }
        _ => false,
    }
}

fn options_equal(a: &[ParameterSpec], b: &[ParameterSpec]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(a, b)| {
            a.name == b.name
                && a.description == b.description
                && a.required == b.required
                && a.kind == b.kind
                && options_equal(&a.options, &b.options)
        })
}
