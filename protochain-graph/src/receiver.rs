use crate::{GraphError, GraphResult, PrototypeGraph, Value};
use protochain_types::EntityId;

/// The entity a method runs on behalf of, with access to the graph.
///
/// Reads resolve through the receiver's own chain. Writes land on the
/// receiver's own properties. Nested calls through [`Receiver::invoke`] keep
/// the same receiver, which is how a method found high on a chain can call
/// back into behaviour the leaf defines.
pub struct Receiver<'g> {
    graph: &'g mut PrototypeGraph,
    id: EntityId,
    method: &'g str,
}

impl<'g> Receiver<'g> {
    pub(crate) fn new(graph: &'g mut PrototypeGraph, id: EntityId, method: &'g str) -> Self {
        Self { graph, id, method }
    }

    /// The bound entity.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Name of the running method.
    #[must_use]
    pub fn method(&self) -> &str {
        self.method
    }

    #[must_use]
    pub fn graph(&self) -> &PrototypeGraph {
        &*self.graph
    }

    pub fn get(&self, name: &str) -> GraphResult<Option<&Value>> {
        self.graph.get(self.id, name)
    }

    /// Reads a property that must resolve to a number.
    pub fn get_number(&self, name: &str) -> GraphResult<f64> {
        match self.get(name)? {
            Some(Value::Number(n)) => Ok(*n),
            Some(other) => Err(GraphError::TypeMismatch {
                name: name.to_string(),
                expected: "number",
                found: other.type_name(),
            }),
            None => Err(GraphError::PropertyNotFound(name.to_string())),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> GraphResult<()> {
        self.graph.set_own_property(self.id, name, value)
    }

    pub fn delete(&mut self, name: &str) -> GraphResult<bool> {
        self.graph.delete_own_property(self.id, name)
    }

    /// Calls another method resolved from the receiver, keeping the binding.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> GraphResult<Value> {
        self.graph.invoke_with_receiver(self.id, name, self.id, args)
    }

    /// Calls a method resolved from `holder` with this receiver bound.
    pub fn call(&mut self, holder: EntityId, name: &str, args: &[Value]) -> GraphResult<Value> {
        self.graph.invoke_with_receiver(holder, name, self.id, args)
    }

    /// Reads positional argument `index` as a number.
    pub fn number_arg(&self, args: &[Value], index: usize) -> GraphResult<f64> {
        match args.get(index) {
            Some(Value::Number(n)) => Ok(*n),
            Some(other) => Err(self.invalid_argument(format!(
                "expected number at position {index}, found {}",
                other.type_name()
            ))),
            None => Err(self.invalid_argument(format!("missing argument at position {index}"))),
        }
    }

    /// Builds a [`GraphError::InvalidArgument`] naming the running method.
    #[must_use]
    pub fn invalid_argument(&self, reason: impl Into<String>) -> GraphError {
        GraphError::InvalidArgument {
            method: self.method.to_string(),
            reason: reason.into(),
        }
    }
}
