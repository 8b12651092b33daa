use std::collections::HashSet;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::attribute::{Property, Versionable};
use crate::version::ScopeDefinition;

/// Store name used when neither the type nor the registry defaults name one.
pub const DEFAULT_STORE: &str = "Version";

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A version-creation condition evaluated against the saved entity.
pub type Predicate<T> = Arc<dyn Fn(&T) -> Result<bool, BoxError> + Send + Sync>;

/// Resolves the current user when a save carries no explicit attribution.
pub type UserResolver = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Reads the scope target's id off a versioned entity.
pub type ScopeExtractor<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// A to-one association whose id is mirrored onto every version record.
pub struct Scope<T> {
    definition: ScopeDefinition,
    extractor: ScopeExtractor<T>,
}

impl<T> Scope<T> {
    pub fn new<F>(association: impl Into<String>, target_type: impl Into<String>, extractor: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        Scope {
            definition: ScopeDefinition::new(association, target_type),
            extractor: Arc::new(extractor),
        }
    }

    pub fn definition(&self) -> &ScopeDefinition {
        &self.definition
    }

    pub fn extract(&self, record: &T) -> Option<String> {
        (self.extractor)(record)
    }
}

/// Process-wide defaults applied to every type enabled afterwards.
#[derive(Clone)]
pub struct Defaults {
    pub store_name: String,
    pub user_model: Option<String>,
    pub current_user: Option<UserResolver>,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            store_name: DEFAULT_STORE.to_string(),
            user_model: None,
            current_user: None,
        }
    }
}

impl fmt::Debug for Defaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Defaults")
            .field("store_name", &self.store_name)
            .field("user_model", &self.user_model)
            .field("current_user", &self.current_user.is_some())
            .finish()
    }
}

impl Defaults {
    pub fn store(mut self, name: impl Into<String>) -> Self {
        self.store_name = name.into();
        self
    }

    pub fn user_model(mut self, name: impl Into<String>) -> Self {
        self.user_model = Some(name.into());
        self
    }

    pub fn current_user<F>(mut self, resolver: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.current_user = Some(Arc::new(resolver));
        self
    }
}

/// Per-type versioning options.
///
/// ```ignore
/// let config = VersioningConfig::<Pig>::new()
///     .store("Version")
///     .except(["name"])
///     .when(|pig| pig.name.contains("success"));
/// ```
pub struct VersioningConfig<T> {
    store_name: Option<String>,
    user_model: Option<String>,
    current_user: Option<UserResolver>,
    only: Option<Vec<String>>,
    except: Option<Vec<String>>,
    if_condition: Option<Predicate<T>>,
    unless_condition: Option<Predicate<T>>,
    scope: Option<Scope<T>>,
}

impl<T> Default for VersioningConfig<T> {
    fn default() -> Self {
        VersioningConfig {
            store_name: None,
            user_model: None,
            current_user: None,
            only: None,
            except: None,
            if_condition: None,
            unless_condition: None,
            scope: None,
        }
    }
}

impl<T> fmt::Debug for VersioningConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersioningConfig")
            .field("store_name", &self.store_name)
            .field("user_model", &self.user_model)
            .field("current_user", &self.current_user.is_some())
            .field("only", &self.only)
            .field("except", &self.except)
            .field("if", &self.if_condition.is_some())
            .field("unless", &self.unless_condition.is_some())
            .field("scope", &self.scope.as_ref().map(|s| s.definition()))
            .finish()
    }
}

impl<T> VersioningConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the version store this type writes to.
    pub fn store(mut self, name: impl Into<String>) -> Self {
        self.store_name = Some(name.into());
        self
    }

    /// Entity type that `user_reference` points at. Must be registered.
    pub fn user_model(mut self, name: impl Into<String>) -> Self {
        self.user_model = Some(name.into());
        self
    }

    pub fn current_user<F>(mut self, resolver: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.current_user = Some(Arc::new(resolver));
        self
    }

    /// Version only these attributes. Takes precedence over `except`.
    pub fn only<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Version every attribute except these.
    pub fn except<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Create versions only when the predicate holds. Takes precedence over `unless`.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.try_when(move |record: &T| Ok(predicate(record)))
    }

    pub fn try_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        self.if_condition = Some(Arc::new(predicate));
        self
    }

    /// Skip versions when the predicate holds.
    pub fn unless<F>(self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.try_unless(move |record: &T| Ok(predicate(record)))
    }

    pub fn try_unless<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        self.unless_condition = Some(Arc::new(predicate));
        self
    }

    pub fn scope(mut self, scope: Scope<T>) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn store_name(&self) -> &str {
        self.store_name.as_deref().unwrap_or(DEFAULT_STORE)
    }

    pub fn user_model_name(&self) -> Option<&str> {
        self.user_model.as_deref()
    }

    pub fn user_resolver(&self) -> Option<&UserResolver> {
        self.current_user.as_ref()
    }

    pub fn if_condition(&self) -> Option<&Predicate<T>> {
        self.if_condition.as_ref()
    }

    pub fn unless_condition(&self) -> Option<&Predicate<T>> {
        self.unless_condition.as_ref()
    }

    pub fn scope_config(&self) -> Option<&Scope<T>> {
        self.scope.as_ref()
    }

    pub fn only_attributes(&self) -> Option<&[String]> {
        self.only.as_deref()
    }

    pub fn except_attributes(&self) -> Option<&[String]> {
        self.except.as_deref()
    }

    /// Fill unset options from the registry defaults.
    pub(crate) fn with_defaults(mut self, defaults: &Defaults) -> Self {
        if self.store_name.is_none() {
            self.store_name = Some(defaults.store_name.clone());
        }
        if self.user_model.is_none() {
            self.user_model = defaults.user_model.clone();
        }
        if self.current_user.is_none() {
            self.current_user = defaults.current_user.clone();
        }
        self
    }
}

impl<T: Versionable> VersioningConfig<T> {
    /// Attributes whose changes are recorded: every property except
    /// timestamps, narrowed by `only` or else `except`.
    pub fn versioned_properties(&self) -> Vec<Property> {
        let props = T::properties().iter().copied().filter(|p| !p.is_timestamp());

        match (&self.only, &self.except) {
            (Some(only), _) => {
                let only: HashSet<&str> = only.iter().map(String::as_str).collect();
                props.filter(|p| only.contains(p.name)).collect()
            }
            (None, Some(except)) => {
                let except: HashSet<&str> = except.iter().map(String::as_str).collect();
                props.filter(|p| !except.contains(p.name)).collect()
            }
            (None, None) => props.collect(),
        }
    }

    /// `only`/`except` entries that name no property of `T`.
    pub fn unknown_filter_attributes(&self) -> Vec<String> {
        self.only
            .iter()
            .chain(self.except.iter())
            .flatten()
            .filter(|name| T::property(name).is_none())
            .cloned()
            .collect()
    }
}
