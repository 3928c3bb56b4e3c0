//! Scenario variable store

use std::collections::HashMap;

use restcheck_domain::{DomainError, DomainResult, ExtractedValue, Parameter};

use super::model::{ParamSource, StepParam};

/// Values bound by earlier steps of a scenario.
///
/// Rebinding a name replaces its value.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, ExtractedValue>,
}

impl Variables {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`.
    pub fn bind(&mut self, name: impl Into<String>, value: ExtractedValue) {
        self.values.insert(name.into(), value);
    }

    /// Looks up a bound value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExtractedValue> {
        self.values.get(name)
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Turns step parameters into concrete parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnboundVariable`] for the first reference to
    /// a name that is not bound.
    pub fn resolve(&self, params: &[StepParam]) -> DomainResult<Vec<Parameter>> {
        params
            .iter()
            .map(|param| {
                let value = match &param.source {
                    ParamSource::Literal(value) => value.clone(),
                    ParamSource::Variable(name) => self
                        .get(name)
                        .cloned()
                        .ok_or_else(|| DomainError::UnboundVariable(name.clone()))?,
                };
                Ok(Parameter {
                    name: param.name.clone(),
                    value,
                    kind: param.kind,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restcheck_domain::{ParamKind, ScalarValue};

    fn var_param(name: &str, variable: &str) -> StepParam {
        StepParam {
            name: name.to_string(),
            kind: ParamKind::Path,
            source: ParamSource::Variable(variable.to_string()),
        }
    }

    #[test]
    fn test_resolve_literal_and_variable() {
        let mut vars = Variables::new();
        vars.bind("total", ScalarValue::Integer(12));

        let params = vec![
            var_param("id", "total"),
            StepParam {
                name: "page".to_string(),
                kind: ParamKind::Query,
                source: ParamSource::Literal(ScalarValue::from("2")),
            },
        ];

        let resolved = vars.resolve(&params);
        assert_eq!(
            resolved,
            Ok(vec![Parameter::path("id", 12), Parameter::query("page", "2")])
        );
    }

    #[test]
    fn test_resolve_unbound_variable() {
        let vars = Variables::new();
        let result = vars.resolve(&[var_param("id", "total")]);
        assert_eq!(result, Err(DomainError::UnboundVariable("total".to_string())));
    }

    #[test]
    fn test_rebind_replaces_value() {
        let mut vars = Variables::new();
        vars.bind("id", ScalarValue::Integer(1));
        vars.bind("id", ScalarValue::Integer(2));
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("id"), Some(&ScalarValue::Integer(2)));
    }
}
