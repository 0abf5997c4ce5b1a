//! Contract between the home-automation host and its addons
//!
//! The host discovers addons through an [`AddonInitialiser`], prompts the
//! user for the inputs the initialiser declares, and creates one [`Addon`]
//! per configured instance. Each addon exposes [`VariableCollection`]s of
//! observable, optionally writable [`Variable`]s.
//!
//! ```text
//! AddonInitialiser ──create_instance──▶ Addon
//!                                        └── variables() ──▶ [VariableCollection]
//!                                                               └── [Variable]
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::event::{ChangeListener, ListenerId};
use crate::AddonError;

/// Kind of value a user input accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInputKind {
    Boolean = 0,
    Number = 1,
    String = 2,
}

/// An input the host prompts the user for before creating an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub unique_id: String,
    pub name: String,
    pub required: bool,
    pub allows_multiple: bool,
    pub kind: UserInputKind,
}

/// Static description of an addon type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialiserMetadata {
    pub name: String,
    pub description: String,
    pub supports_multiple_instances: bool,
    pub inputs: Vec<UserInput>,
}

/// A value the user supplied for one of the declared inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ProvidedInput {
    pub unique_id: String,
    pub value: Value,
}

impl ProvidedInput {
    pub fn new(unique_id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            unique_id: unique_id.into(),
            value: value.into(),
        }
    }
}

/// Per-instance metadata handed to [`AddonInitialiser::create_instance`]
#[derive(Debug, Clone, PartialEq)]
pub struct AddonMetadata {
    pub instance_id: String,
    pub user_provided_inputs: Vec<ProvidedInput>,
}

impl AddonMetadata {
    pub fn new(instance_id: impl Into<String>, user_provided_inputs: Vec<ProvidedInput>) -> Self {
        Self {
            instance_id: instance_id.into(),
            user_provided_inputs,
        }
    }

    /// The value supplied for input `unique_id`, if any
    pub fn input(&self, unique_id: &str) -> Option<&Value> {
        self.user_provided_inputs
            .iter()
            .find(|input| input.unique_id == unique_id)
            .map(|input| &input.value)
    }
}

/// Persistence callback: the host stores the value and passes it back as
/// `saved_data` the next time the instance is created
pub type SaveData = Arc<dyn Fn(Value) + Send + Sync>;

/// Entry point the host uses to create addon instances
#[async_trait]
pub trait AddonInitialiser: Send + Sync {
    fn metadata(&self) -> &InitialiserMetadata;

    async fn create_instance(
        &self,
        metadata: AddonMetadata,
        save_data: SaveData,
        saved_data: Option<Value>,
    ) -> Result<Box<dyn Addon>, AddonError>;
}

/// A configured addon instance
#[async_trait]
pub trait Addon: Send + Sync {
    fn metadata(&self) -> &AddonMetadata;

    async fn variables(&self) -> Result<Vec<Arc<dyn VariableCollection>>, AddonError>;
}

/// A named group of variables, typically one device
pub trait VariableCollection: Send + Sync {
    fn unique_id(&self) -> &str;

    fn name(&self) -> &str;

    fn variables(&self) -> &[Arc<dyn Variable>];
}

/// An observable value exposed to the host
#[async_trait]
pub trait Variable: Send + Sync {
    fn unique_id(&self) -> String;

    fn name(&self) -> &str;

    /// Read the current value, notifying listeners if it changed since the last read
    async fn retrieve_value(&self) -> Result<Value, AddonError>;

    fn add_change_listener(&self, listener: ChangeListener) -> ListenerId;

    fn remove_change_listener(&self, id: ListenerId) -> bool;

    /// Write access, for variables that support it
    fn as_updatable(&self) -> Option<&dyn UpdatableVariable> {
        None
    }
}

/// A variable the host can write to
#[async_trait]
pub trait UpdatableVariable: Variable {
    async fn update_value(&self, value: Value) -> Result<(), AddonError>;
}
