//! Call validation.
//!
//! Wraps a callable so that its arguments are validated against a parameter
//! record before the call, and optionally its return value after it:
//!
//! - argument failures invoke the `on_call_error` hook and return
//!   [`CallError::ArgumentValidation`] without running the callable
//! - return failures invoke the `on_return_error` hook and return
//!   [`CallError::ReturnValidation`], carrying the untrusted value
//!
//! Default hooks log the report with `tracing::warn!`.

use crate::descriptor::{RecordDescriptor, ValueDescriptor};
use crate::engine::{validate, validate_value};
use crate::record::ValidatedRecord;
use crate::report::{ErrorKind, ValidationError, ValidationReport};
use crate::{CallError, SchemaConfigurationError, compile_value};
use std::fmt;
use std::sync::Arc;
use tracing::warn;
use tyck_core::{ConstraintSpec, SchemaConfig, Value};

/// Hook invoked with the report of a failed validation.
pub type ErrorHook = Arc<dyn Fn(&ValidationReport) + Send + Sync>;

fn warn_arguments(report: &ValidationReport) {
    warn!(errors = report.len(), "Call arguments rejected:\n{report}");
}

fn warn_return(report: &ValidationReport) {
    warn!(errors = report.len(), "Return value rejected:\n{report}");
}

/// A callable guarded by argument and return validation.
pub struct ValidatedCall<F> {
    func: F,
    params: RecordDescriptor,
    returns: Option<ValueDescriptor>,
    on_call_error: ErrorHook,
    on_return_error: ErrorHook,
}

/// Wraps `func` with explicit hooks.
pub fn wrap_call<F, C, R>(
    func: F,
    params: RecordDescriptor,
    returns: Option<ValueDescriptor>,
    on_call_error: C,
    on_return_error: R,
) -> ValidatedCall<F>
where
    F: Fn(&ValidatedRecord) -> Value,
    C: Fn(&ValidationReport) + Send + Sync + 'static,
    R: Fn(&ValidationReport) + Send + Sync + 'static,
{
    ValidatedCall {
        func,
        params,
        returns,
        on_call_error: Arc::new(on_call_error),
        on_return_error: Arc::new(on_return_error),
    }
}

/// Wraps `func` with argument validation and logging hooks.
///
/// ```rust
/// use tyck_core::{fields, integer, SchemaConfig, Value};
/// use tyck_validator::{compile, validate_call};
///
/// let params = compile(&fields! { "a" => integer(), "b" => integer() }, &SchemaConfig::default())
///     .unwrap();
/// let add = validate_call(
///     |args: &tyck_validator::ValidatedRecord| {
///         let a = args.get("a").and_then(Value::as_int).unwrap_or_default();
///         let b = args.get("b").and_then(Value::as_int).unwrap_or_default();
///         Value::Int(a + b)
///     },
///     params,
/// );
///
/// assert_eq!(add.call_with([("a", Value::from(1)), ("b", Value::from("2"))]).unwrap(), Value::Int(3));
/// assert!(add.call_with([("a", Value::from("x"))]).is_err());
/// ```
pub fn validate_call<F>(func: F, params: RecordDescriptor) -> ValidatedCall<F>
where
    F: Fn(&ValidatedRecord) -> Value,
{
    wrap_call(func, params, None, warn_arguments, warn_return)
}

/// Wraps `func` with argument and return validation and logging hooks.
pub fn validate_call_with_return<F>(
    func: F,
    params: RecordDescriptor,
    returns: ValueDescriptor,
) -> ValidatedCall<F>
where
    F: Fn(&ValidatedRecord) -> Value,
{
    wrap_call(func, params, Some(returns), warn_arguments, warn_return)
}

impl<F> ValidatedCall<F>
where
    F: Fn(&ValidatedRecord) -> Value,
{
    /// Validates a mapping of arguments, invokes the callable and validates
    /// its return value.
    pub fn call(&self, args: &Value) -> Result<Value, CallError> {
        let record = match validate(&self.params, args) {
            Ok(record) => record,
            Err(report) => {
                (self.on_call_error)(&report);
                return Err(CallError::ArgumentValidation(report));
            }
        };
        self.invoke(&record)
    }

    /// Calls with named arguments.
    pub fn call_with<K, I>(&self, args: I) -> Result<Value, CallError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.call(&Value::map(args))
    }

    /// Calls with positional arguments, bound to parameters in declaration
    /// order.
    pub fn call_positional(&self, args: Vec<Value>) -> Result<Value, CallError> {
        let fields = self.params.fields();
        if args.len() > fields.len() {
            let report = ValidationReport::single(
                self.params.name(),
                ValidationError::new(
                    Vec::new(),
                    ErrorKind::ArityMismatch,
                    format!(
                        "expected at most {} arguments, got {}",
                        fields.len(),
                        args.len()
                    ),
                    Some(Value::List(args)),
                ),
            );
            (self.on_call_error)(&report);
            return Err(CallError::ArgumentValidation(report));
        }

        let named = fields
            .iter()
            .zip(args)
            .map(|(field, value)| (field.name().to_string(), value));
        self.call(&Value::map(named))
    }

    /// Parameter record.
    pub fn params(&self) -> &RecordDescriptor {
        &self.params
    }

    /// Return value descriptor, if any.
    pub fn returns(&self) -> Option<&ValueDescriptor> {
        self.returns.as_ref()
    }

    fn invoke(&self, record: &ValidatedRecord) -> Result<Value, CallError> {
        let output = (self.func)(record);
        let Some(returns) = &self.returns else {
            return Ok(output);
        };
        validate_value(returns, &output).map_err(|report| {
            (self.on_return_error)(&report);
            CallError::ReturnValidation {
                report,
                value: output,
            }
        })
    }
}

impl<F> fmt::Debug for ValidatedCall<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCall")
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// A single value slot that validates on every assignment.
///
/// Unset fields read as their default, if one is declared.
#[derive(Debug, Clone)]
pub struct ValidatedField {
    descriptor: ValueDescriptor,
    value: Option<Value>,
}

impl ValidatedField {
    /// Creates an unset field.
    pub fn new(spec: impl Into<ConstraintSpec>) -> Result<Self, SchemaConfigurationError> {
        Self::with_config(spec, &SchemaConfig::default())
    }

    /// Creates an unset field compiled under `config`.
    pub fn with_config(
        spec: impl Into<ConstraintSpec>,
        config: &SchemaConfig,
    ) -> Result<Self, SchemaConfigurationError> {
        Ok(Self {
            descriptor: compile_value(spec, config)?,
            value: None,
        })
    }

    /// Validates and stores `raw`. On failure the previous value is kept.
    pub fn set(&mut self, raw: impl Into<Value>) -> Result<&Value, ValidationReport> {
        let value = validate_value(&self.descriptor, &raw.into())?;
        Ok(self.value.insert(value))
    }

    /// Current value, falling back to the declared default.
    pub fn get(&self) -> Option<&Value> {
        self.value
            .as_ref()
            .or(self.descriptor.spec().default.as_ref())
    }

    /// Clears the stored value.
    pub fn reset(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tyck_core::{SpecBuilder, fields, integer, string};

    fn params() -> RecordDescriptor {
        compile(
            &fields! { "a" => integer(), "b" => integer().default_value(10) },
            &SchemaConfig::default().with_title("add"),
        )
        .unwrap()
    }

    fn add(args: &ValidatedRecord) -> Value {
        let a = args.get("a").and_then(Value::as_int).unwrap_or_default();
        let b = args.get("b").and_then(Value::as_int).unwrap_or_default();
        Value::Int(a + b)
    }

    #[test]
    fn test_arguments_are_coerced() {
        let call = validate_call(add, params());
        assert_eq!(call.call_with([("a", Value::from("1"))]).unwrap(), Value::Int(11));
        assert_eq!(
            call.call_positional(vec![Value::from(1), Value::from(2)]).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn test_invalid_arguments_skip_the_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let hooked = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let hook_counter = Arc::clone(&hooked);

        let call = wrap_call(
            move |args: &ValidatedRecord| {
                counter.fetch_add(1, Ordering::SeqCst);
                add(args)
            },
            params(),
            None,
            move |_| {
                hook_counter.fetch_add(1, Ordering::SeqCst);
            },
            |_| {},
        );

        let error = call.call_with([("a", Value::from("x"))]).unwrap_err();
        assert!(matches!(error, CallError::ArgumentValidation(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(hooked.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_too_many_positional_arguments() {
        let call = validate_call(add, params());
        let error = call
            .call_positional(vec![Value::from(1), Value::from(2), Value::from(3)])
            .unwrap_err();
        assert_eq!(error.report().errors()[0].kind, ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_return_validation_keeps_untrusted_value() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let returns = compile_value(integer().max(5).unwrap(), &SchemaConfig::default()).unwrap();

        let call = wrap_call(
            add,
            params(),
            Some(returns),
            |_| {},
            move |report: &ValidationReport| {
                if let Ok(mut seen) = sink.lock() {
                    seen.push(report.len());
                }
            },
        );

        match call.call_with([("a", Value::from(1))]) {
            Err(CallError::ReturnValidation { value, report }) => {
                assert_eq!(value, Value::Int(11));
                assert_eq!(report.errors()[0].kind, ErrorKind::constraint("le"));
            }
            other => panic!("Expected return validation error, got {:?}", other),
        }
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_validated_field() {
        let mut field = ValidatedField::new(string().min_length(2).unwrap().default_value("zz"))
            .unwrap();
        assert_eq!(field.get(), Some(&Value::from("zz")));

        assert!(field.set("abc").is_ok());
        assert!(field.set("a").is_err());
        assert_eq!(field.get(), Some(&Value::from("abc")));

        field.reset();
        assert_eq!(field.get(), Some(&Value::from("zz")));
    }
}
