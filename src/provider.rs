use std::sync::Arc;

use crate::context_builder::build_context;
use crate::convert::{to_attribute_value, to_flag_value};
use crate::data_source::{DataSourceStatusProvider, FlagChangeNotifier};
use crate::details::{ErrorCode, ResolutionDetails};
use crate::engine::{EvaluationDetail, EvaluationEngine};
use crate::events::EventSink;
use crate::lifecycle::{Lifecycle, ProviderState};
use crate::{AttributeValue, Attributes, FlagValue, Result};

/// Static information about the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Name the provider registers under.
    pub name: String,
}

/// Configuration for [`Provider`].
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    name: String,
}

impl ProviderConfig {
    /// Default provider name.
    pub const DEFAULT_NAME: &'static str = "FlagBridge.Provider";

    /// Create a new `ProviderConfig` using default configuration.
    pub fn new() -> ProviderConfig {
        ProviderConfig::default()
    }

    /// Override the name the provider registers under.
    pub fn with_name(mut self, name: impl Into<String>) -> ProviderConfig {
        self.name = name.into();
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> ProviderConfig {
        ProviderConfig {
            name: ProviderConfig::DEFAULT_NAME.to_owned(),
        }
    }
}

/// A feature-flag provider backed by an external evaluation engine.
///
/// The provider translates the caller's evaluation attributes into the
/// engine's native context model, forwards evaluations to the engine, and
/// translates the results back. Its lifecycle mirrors the engine's data
/// source: call [`Provider::initialize`] before evaluating, and observe
/// state changes through the event sink supplied at construction.
///
/// Evaluations are synchronous and lock-free; independent requests may run
/// concurrently.
pub struct Provider {
    engine: Arc<dyn EvaluationEngine>,
    data_source: Arc<dyn DataSourceStatusProvider>,
    flag_tracker: Arc<dyn FlagChangeNotifier>,
    lifecycle: Lifecycle,
    metadata: ProviderMetadata,
}

impl Provider {
    /// Create a provider with default configuration.
    pub fn new(
        engine: Arc<dyn EvaluationEngine>,
        data_source: Arc<dyn DataSourceStatusProvider>,
        flag_tracker: Arc<dyn FlagChangeNotifier>,
        events: Arc<dyn EventSink>,
    ) -> Provider {
        Provider::with_config(
            engine,
            data_source,
            flag_tracker,
            events,
            ProviderConfig::default(),
        )
    }

    /// Create a provider with the given configuration.
    pub fn with_config(
        engine: Arc<dyn EvaluationEngine>,
        data_source: Arc<dyn DataSourceStatusProvider>,
        flag_tracker: Arc<dyn FlagChangeNotifier>,
        events: Arc<dyn EventSink>,
        config: ProviderConfig,
    ) -> Provider {
        Provider {
            engine,
            data_source,
            flag_tracker,
            lifecycle: Lifecycle::new(events),
            metadata: ProviderMetadata { name: config.name },
        }
    }

    /// Static information about this provider.
    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    /// The current provider state.
    pub fn state(&self) -> ProviderState {
        self.lifecycle.state()
    }

    /// Initialize the provider, blocking until it is ready or has failed.
    ///
    /// See [`Lifecycle::initialize`] for the exact semantics. The wait has no
    /// timeout; imposing one is the caller's responsibility.
    pub fn initialize(&self) -> Result<()> {
        self.lifecycle
            .initialize(&*self.data_source, &*self.flag_tracker)
    }

    /// Evaluate a boolean flag.
    pub fn bool_value_detail(
        &self,
        flag_key: &str,
        default: bool,
        attributes: &Attributes,
        targeting_key: &str,
    ) -> ResolutionDetails<bool> {
        let detail = self.evaluate(flag_key, attributes, targeting_key, FlagValue::Bool(default));
        match detail.value.as_bool() {
            Some(value) => ResolutionDetails::from_detail(value, &detail),
            None => self.type_mismatch(flag_key, default, &detail),
        }
    }

    /// Evaluate a string flag.
    pub fn string_value_detail(
        &self,
        flag_key: &str,
        default: &str,
        attributes: &Attributes,
        targeting_key: &str,
    ) -> ResolutionDetails<String> {
        let detail = self.evaluate(
            flag_key,
            attributes,
            targeting_key,
            FlagValue::String(default.to_owned()),
        );
        match detail.value.as_str() {
            Some(value) => ResolutionDetails::from_detail(value.to_owned(), &detail),
            None => self.type_mismatch(flag_key, default.to_owned(), &detail),
        }
    }

    /// Evaluate an integer flag.
    ///
    /// The engine's value model stores numbers as doubles; the result is
    /// truncated toward zero.
    pub fn integer_value_detail(
        &self,
        flag_key: &str,
        default: i64,
        attributes: &Attributes,
        targeting_key: &str,
    ) -> ResolutionDetails<i64> {
        let detail = self.evaluate(
            flag_key,
            attributes,
            targeting_key,
            FlagValue::Number(default as f64),
        );
        match detail.value.as_f64() {
            Some(value) => ResolutionDetails::from_detail(value as i64, &detail),
            None => self.type_mismatch(flag_key, default, &detail),
        }
    }

    /// Evaluate a floating-point flag.
    pub fn float_value_detail(
        &self,
        flag_key: &str,
        default: f64,
        attributes: &Attributes,
        targeting_key: &str,
    ) -> ResolutionDetails<f64> {
        let detail = self.evaluate(
            flag_key,
            attributes,
            targeting_key,
            FlagValue::Number(default),
        );
        match detail.value.as_f64() {
            Some(value) => ResolutionDetails::from_detail(value, &detail),
            None => self.type_mismatch(flag_key, default, &detail),
        }
    }

    /// Evaluate an object/array flag.
    ///
    /// The default passes through the value translator on the way in, and
    /// the engine's result passes back through it on the way out.
    pub fn object_value_detail(
        &self,
        flag_key: &str,
        default: &AttributeValue,
        attributes: &Attributes,
        targeting_key: &str,
    ) -> ResolutionDetails<AttributeValue> {
        let detail = self.evaluate(flag_key, attributes, targeting_key, to_flag_value(default));
        ResolutionDetails::from_detail(to_attribute_value(&detail.value), &detail)
    }

    fn evaluate(
        &self,
        flag_key: &str,
        attributes: &Attributes,
        targeting_key: &str,
        default: FlagValue,
    ) -> EvaluationDetail {
        let context = build_context(attributes, targeting_key);
        let detail = self.engine.variation_detail(flag_key, &context, default);
        log::trace!(target: "flagbridge",
            flag_key,
            result:serde = &detail.value;
            "evaluated a flag");
        detail
    }

    fn type_mismatch<T>(
        &self,
        flag_key: &str,
        default: T,
        detail: &EvaluationDetail,
    ) -> ResolutionDetails<T> {
        log::warn!(target: "flagbridge",
            flag_key;
            "engine returned a value of an unexpected type: {:?}", detail.value);
        ResolutionDetails::error(default, ErrorCode::TypeMismatch)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{Provider, ProviderConfig};
    use crate::context::Context;
    use crate::data_source::{
        DataSourceState, DataSourceStatus, DataSourceStatusProvider, FlagChangeListener,
        FlagChangeNotifier, StatusListener,
    };
    use crate::details::{ErrorCode, Reason};
    use crate::engine::{EvaluationDetail, EvaluationEngine, EvaluationReason};
    use crate::events::{EventSink, ProviderEvent};
    use crate::lifecycle::ProviderState;
    use crate::{AttributeValue, Attributes, FlagValue};

    struct MockEngine {
        detail: EvaluationDetail,
        calls: Mutex<Vec<(String, Context, FlagValue)>>,
    }

    impl MockEngine {
        fn returning(detail: EvaluationDetail) -> Arc<MockEngine> {
            Arc::new(MockEngine {
                detail,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn last_call(&self) -> (String, Context, FlagValue) {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl EvaluationEngine for MockEngine {
        fn variation_detail(
            &self,
            flag_key: &str,
            context: &Context,
            default_value: FlagValue,
        ) -> EvaluationDetail {
            self.calls
                .lock()
                .unwrap()
                .push((flag_key.to_owned(), context.clone(), default_value));
            self.detail.clone()
        }
    }

    struct StubDataSource {
        initialized: bool,
    }

    impl DataSourceStatusProvider for StubDataSource {
        fn is_initialized(&self) -> bool {
            self.initialized
        }

        fn status(&self) -> DataSourceStatus {
            DataSourceStatus::new(if self.initialized {
                DataSourceState::Valid
            } else {
                DataSourceState::Initializing
            })
        }

        fn add_status_listener(&self, _listener: StatusListener) {}
    }

    struct StubFlagTracker;

    impl FlagChangeNotifier for StubFlagTracker {
        fn add_flag_change_listener(&self, _listener: FlagChangeListener) {}
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<ProviderEvent>>);

    impl EventSink for RecordingSink {
        fn emit(&self, event: ProviderEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    fn provider_with(engine: Arc<MockEngine>) -> Provider {
        Provider::new(
            engine,
            Arc::new(StubDataSource { initialized: true }),
            Arc::new(StubFlagTracker),
            Arc::new(RecordingSink::default()),
        )
    }

    fn key_attributes() -> Attributes {
        [("key".to_owned(), "user-key".into())].into_iter().collect()
    }

    #[test]
    fn it_can_provide_metadata() {
        let engine = MockEngine::returning(EvaluationDetail {
            value: FlagValue::Null,
            variation_index: None,
            reason: EvaluationReason::Off,
        });

        let provider = provider_with(engine);
        assert_eq!(provider.metadata().name, "FlagBridge.Provider");

        let named = Provider::with_config(
            MockEngine::returning(EvaluationDetail {
                value: FlagValue::Null,
                variation_index: None,
                reason: EvaluationReason::Off,
            }),
            Arc::new(StubDataSource { initialized: true }),
            Arc::new(StubFlagTracker),
            Arc::new(RecordingSink::default()),
            ProviderConfig::new().with_name("custom"),
        );
        assert_eq!(named.metadata().name, "custom");
    }

    #[test]
    fn it_can_do_a_boolean_evaluation() {
        let engine = MockEngine::returning(EvaluationDetail {
            value: FlagValue::Bool(true),
            variation_index: Some(12),
            reason: EvaluationReason::Fallthrough,
        });
        let provider = provider_with(engine.clone());

        let details = provider.bool_value_detail("the-key", false, &key_attributes(), "");

        assert!(details.value);
        assert_eq!(details.variant.as_deref(), Some("12"));
        assert_eq!(details.reason, Reason::Fallthrough);
        assert_eq!(details.error_code, None);

        let (flag_key, context, default) = engine.last_call();
        assert_eq!(flag_key, "the-key");
        assert_eq!(default, FlagValue::Bool(false));
        let user = context.for_kind("user").expect("user context");
        assert_eq!(user.key, "user-key");
    }

    #[test]
    fn it_can_do_a_string_evaluation() {
        let engine = MockEngine::returning(EvaluationDetail {
            value: FlagValue::String("evaluated".to_owned()),
            variation_index: Some(17),
            reason: EvaluationReason::Off,
        });
        let provider = provider_with(engine);

        let details = provider.string_value_detail("the-key", "default", &key_attributes(), "");

        assert_eq!(details.value, "evaluated");
        assert_eq!(details.variant.as_deref(), Some("17"));
        assert_eq!(details.reason, Reason::Disabled);
    }

    #[test]
    fn it_can_do_numeric_evaluations() {
        let engine = MockEngine::returning(EvaluationDetail {
            value: FlagValue::Number(42.9),
            variation_index: Some(3),
            reason: EvaluationReason::TargetMatch,
        });
        let provider = provider_with(engine);

        let as_integer = provider.integer_value_detail("the-key", 0, &key_attributes(), "");
        assert_eq!(as_integer.value, 42);
        assert_eq!(as_integer.reason, Reason::TargetingMatch);

        let as_float = provider.float_value_detail("the-key", 0.0, &key_attributes(), "");
        assert_eq!(as_float.value, 42.9);
    }

    #[test]
    fn it_can_do_an_object_evaluation() {
        let engine = MockEngine::returning(EvaluationDetail {
            value: FlagValue::Object(
                [("aKey".to_owned(), FlagValue::String("aValue".to_owned()))]
                    .into_iter()
                    .collect(),
            ),
            variation_index: Some(84),
            reason: EvaluationReason::TargetMatch,
        });
        let provider = provider_with(engine.clone());

        let details =
            provider.object_value_detail("the-key", &AttributeValue::Null, &key_attributes(), "");

        assert_eq!(
            details.value,
            AttributeValue::Structure(
                [("aKey".to_owned(), AttributeValue::String("aValue".to_owned()))]
                    .into_iter()
                    .collect()
            )
        );
        assert_eq!(details.variant.as_deref(), Some("84"));

        // The default passed through the translator on the way in.
        let (_, _, default) = engine.last_call();
        assert_eq!(default, FlagValue::Null);
    }

    #[test]
    fn a_wrong_typed_result_falls_back_to_the_default() {
        let engine = MockEngine::returning(EvaluationDetail {
            value: FlagValue::String("not-a-bool".to_owned()),
            variation_index: Some(2),
            reason: EvaluationReason::Fallthrough,
        });
        let provider = provider_with(engine);

        let details = provider.bool_value_detail("the-key", true, &key_attributes(), "");

        assert!(details.value);
        assert_eq!(details.variant, None);
        assert_eq!(details.reason, Reason::Error);
        assert_eq!(details.error_code, Some(ErrorCode::TypeMismatch));
    }

    #[test]
    fn evaluations_use_the_targeting_key() {
        let engine = MockEngine::returning(EvaluationDetail {
            value: FlagValue::Bool(true),
            variation_index: Some(0),
            reason: EvaluationReason::Fallthrough,
        });
        let provider = provider_with(engine.clone());

        provider.bool_value_detail("the-key", false, &Attributes::new(), "targeted");

        let (_, context, _) = engine.last_call();
        assert_eq!(context.for_kind("user").unwrap().key, "targeted");
    }

    #[test]
    fn initialize_readies_the_provider_for_an_initialized_data_source() {
        let engine = MockEngine::returning(EvaluationDetail {
            value: FlagValue::Null,
            variation_index: None,
            reason: EvaluationReason::Off,
        });
        let provider = provider_with(engine);

        assert_eq!(provider.state(), ProviderState::NotReady);
        provider.initialize().unwrap();
        assert_eq!(provider.state(), ProviderState::Ready);
    }
}
