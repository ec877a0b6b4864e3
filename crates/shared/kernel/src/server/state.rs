use crate::upstream::Upstreams;
use axum::extract::FromRef;
use fxhash::FxHashMap;
use pdl_domain::config::ApiConfig;
use pdl_domain::registry::{FeatureSlice, InitializedSlice};
use std::any::{TypeId, type_name};
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[pdl_derive::pdl_error]
pub enum ApiStateError {
    #[error("Incomplete API state{}: {message}", format_context(.context))]
    Incomplete { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Feature slice not registered{}: {slice}", format_context(.context))]
    MissingSlice { slice: &'static str, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub upstreams: Upstreams,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Router state: configuration, upstream clients and the slices keyed by type.
#[derive(Debug, Clone)]
pub struct ApiState(Arc<ApiStateInner>);

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &ApiStateInner {
        &self.0
    }
}

/// Lets extractors such as [`super::RequestContext`] read the config.
impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.config.clone()
    }
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }

    #[must_use]
    pub fn get_slice<T: FeatureSlice>(&self) -> Option<&T> {
        let slice = self.0.slices.get(&TypeId::of::<T>())?;
        slice.state.as_any().downcast_ref::<T>()
    }

    /// Handlers call this with their own slice type.
    ///
    /// # Errors
    /// [`ApiStateError::MissingSlice`] when the server was assembled without `T`.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, ApiStateError> {
        self.get_slice::<T>()
            .ok_or(ApiStateError::MissingSlice { slice: type_name::<T>(), context: None })
    }

    pub fn slice_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.slices.values().map(InitializedSlice::name)
    }
}

#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    upstreams: Option<Upstreams>,
    slices: Vec<InitializedSlice>,
}

impl ApiStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn upstreams(mut self, upstreams: Upstreams) -> Self {
        self.upstreams = Some(upstreams);
        self
    }

    #[must_use]
    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.slices.push(slice);
        self
    }

    #[must_use]
    pub fn register_slices(mut self, slices: impl IntoIterator<Item = InitializedSlice>) -> Self {
        self.slices.extend(slices);
        self
    }

    /// A slice registered twice keeps its last registration.
    ///
    /// # Errors
    /// [`ApiStateError::Incomplete`] without a config or upstream clients.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let Some(config) = self.config else {
            return Err(incomplete("ApiConfig not provided"));
        };
        let Some(upstreams) = self.upstreams else {
            return Err(incomplete("Upstream clients not provided"));
        };
        let slices = self.slices.into_iter().map(|slice| (slice.id, slice)).collect();

        Ok(ApiState(Arc::new(ApiStateInner { config, upstreams, slices })))
    }
}

const fn incomplete(message: &'static str) -> ApiStateError {
    ApiStateError::Incomplete { message: Cow::Borrowed(message), context: None }
}
