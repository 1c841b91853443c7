//! Variable resolution
//!
//! Substitutes `{{key}}` tokens using the active environment. Applies
//! independently to URLs, header values, param values, bodies, and
//! auth credential fields.

use reqatlas_domain::Environment;

/// Resolves every `{{key}}` token in `text` against the environment.
///
/// With no active environment the text is returned unchanged.
/// Otherwise each enabled variable with a non-empty key is applied in
/// the environment's declared order, replacing every literal
/// occurrence of `{{key}}` with the variable's value.
///
/// Substitution is sequential, not simultaneous: a later variable can
/// rewrite text produced by an earlier one. That left-to-right,
/// non-recursive-per-pass behavior is a known sharp edge and is kept
/// deliberately.
#[must_use]
pub fn resolve(text: &str, env: Option<&Environment>) -> String {
    let Some(env) = env else {
        return text.to_string();
    };

    let mut result = text.to_string();
    for variable in env.active_variables() {
        let token = format!("{{{{{}}}}}", variable.key);
        result = result.replace(&token, &variable.value);
    }
    result
}
