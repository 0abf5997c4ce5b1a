//! Variables backed by a field of a shared resource
//!
//! [`ObjectVariable`] exposes the leaf a [`KeyPath`] addresses inside the
//! serialized form of a resource. [`UpdatableObjectVariable`] additionally
//! writes through that path and hands the whole resource to a
//! [`ResourceSink`]. All variables of one resource share it through a
//! [`SharedResource`], so a write through one is seen by the others.
//!
//! ```rust,ignore
//! let resource = Arc::new(RwLock::new(light));
//! let brightness = UpdatableObjectVariable::new(
//!     "Brightness",
//!     &light.unique_id,
//!     KeyPath::parse("state.brightness")?,
//!     Arc::clone(&resource),
//!     sink,
//! );
//!
//! brightness.update_value(json!(100)).await?;   // saves the full light
//! let value = brightness.retrieve_value().await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use hue_api::ApiError;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::event::{ChangeEvent, ChangeListener, ChangeListeners, ListenerId};
use crate::host::{UpdatableVariable, Variable};
use crate::path::KeyPath;
use crate::AddonError;

/// A resource shared by all variables built on it
pub type SharedResource<R> = Arc<RwLock<R>>;

/// Destination for resources after a variable wrote to them
#[async_trait]
pub trait ResourceSink<R>: Send + Sync {
    /// Refuse an update before it is applied locally
    fn validate(&self, _current: &R, _updated: &R) -> Result<(), ApiError> {
        Ok(())
    }

    /// Persist `updated`, which replaced `previous`
    async fn save(&self, previous: &R, updated: &R) -> Result<(), ApiError>;
}

/// Read-only variable over one field of a resource
pub struct ObjectVariable<R> {
    name: String,
    resource_id: String,
    key_path: KeyPath,
    resource: SharedResource<R>,
    previous: Mutex<Option<Value>>,
    listeners: ChangeListeners,
}

impl<R> ObjectVariable<R>
where
    R: Serialize + Send + Sync + 'static,
{
    pub fn new(
        name: impl Into<String>,
        resource_id: impl Into<String>,
        key_path: KeyPath,
        resource: SharedResource<R>,
    ) -> Self {
        Self {
            name: name.into(),
            resource_id: resource_id.into(),
            key_path,
            resource,
            previous: Mutex::new(None),
            listeners: ChangeListeners::new(),
        }
    }

    pub fn key_path(&self) -> &KeyPath {
        &self.key_path
    }

    /// Current leaf value without recording an observation
    pub fn peek(&self) -> Result<Value, AddonError> {
        let tree = serde_json::to_value(&*self.resource.read())?;
        Ok(self.key_path.get(&tree)?.clone())
    }

    fn observe(&self, value: &Value) {
        let previous = self.previous.lock().replace(value.clone());

        if let Some(previous) = previous {
            if previous != *value {
                tracing::debug!("{} changed from {} to {}", self.unique_id(), previous, value);
                self.listeners
                    .emit(&ChangeEvent::new(self.unique_id(), previous, value.clone()));
            }
        }
    }
}

#[async_trait]
impl<R> Variable for ObjectVariable<R>
where
    R: Serialize + Send + Sync + 'static,
{
    fn unique_id(&self) -> String {
        format!("{}-{}", self.resource_id, self.name)
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn retrieve_value(&self) -> Result<Value, AddonError> {
        let value = self.peek()?;
        self.observe(&value);
        Ok(value)
    }

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

/// Writable variable over one field of a resource
pub struct UpdatableObjectVariable<R> {
    inner: ObjectVariable<R>,
    sink: Arc<dyn ResourceSink<R>>,
}

impl<R> UpdatableObjectVariable<R>
where
    R: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(
        name: impl Into<String>,
        resource_id: impl Into<String>,
        key_path: KeyPath,
        resource: SharedResource<R>,
        sink: Arc<dyn ResourceSink<R>>,
    ) -> Self {
        Self {
            inner: ObjectVariable::new(name, resource_id, key_path, resource),
            sink,
        }
    }

    pub fn key_path(&self) -> &KeyPath {
        self.inner.key_path()
    }

    /// Write `value` into the shared resource, returning the resource before
    /// and after the write
    ///
    /// The resource is rebuilt from its modified tree, so a value the typed
    /// model cannot hold is rejected and the resource stays untouched. The
    /// sink gets to refuse the update before it is committed.
    fn apply(&self, value: Value) -> Result<(R, R), AddonError> {
        let mut resource = self.inner.resource.write();

        let mut tree = serde_json::to_value(&*resource)?;
        self.inner.key_path.set(&mut tree, value)?;

        let invalid = |reason: String| AddonError::InvalidValue {
            variable: self.inner.unique_id(),
            reason,
        };
        let updated: R = serde_json::from_value(tree).map_err(|e| invalid(e.to_string()))?;
        self.sink
            .validate(&resource, &updated)
            .map_err(|e| invalid(e.to_string()))?;

        let previous = std::mem::replace(&mut *resource, updated.clone());
        Ok((previous, updated))
    }

    /// Undo a write the sink failed to persist
    ///
    /// Skipped when another write replaced the resource in the meantime.
    fn roll_back(&self, previous: R, written: &R) {
        let mut resource = self.inner.resource.write();
        if *resource == *written {
            *resource = previous;
        }
    }
}

#[async_trait]
impl<R> Variable for UpdatableObjectVariable<R>
where
    R: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
{
    fn unique_id(&self) -> String {
        self.inner.unique_id()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn retrieve_value(&self) -> Result<Value, AddonError> {
        self.inner.retrieve_value().await
    }

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId {
        self.inner.add_change_listener(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.inner.remove_change_listener(id)
    }

    fn as_updatable(&self) -> Option<&dyn UpdatableVariable> {
        Some(self)
    }
}

#[async_trait]
impl<R> UpdatableVariable for UpdatableObjectVariable<R>
where
    R: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
{
    async fn update_value(&self, value: Value) -> Result<(), AddonError> {
        let (previous, updated) = self.apply(value)?;

        if let Err(e) = self.sink.save(&previous, &updated).await {
            tracing::warn!("Failed to save {}: {}", self.unique_id(), e);
            self.roll_back(previous, &updated);
            return Err(e.into());
        }
        Ok(())
    }
}
