//! Prototype delegation graph for protochain.
//!
//! Objects here have no classes. Each [`Entity`] owns a property mapping and
//! may delegate to one parent entity; reading a property it lacks falls
//! through to the parent, then the parent's parent, and so on.
//!
//! - [`PrototypeGraph`]: the entity table, delegation links, lookup, and invocation
//! - [`Value`] / [`Method`]: property values, including callables
//! - [`Receiver`]: the entity a method runs against, wherever it was found
//! - [`SharedGraph`]: the graph behind a single lock for cross-thread use
//! - [`GraphSnapshot`]: serializable copies for inspection and output
//!
//! ```
//! use protochain_graph::{props, Method, PrototypeGraph, Value};
//!
//! let mut graph = PrototypeGraph::new();
//! let animal = graph.create_entity(props! {
//!     "sleep" => Method::new("sleep", |this, _| {
//!         this.set("isSleeping", true)?;
//!         Ok(Value::Null)
//!     }),
//! });
//! let rabbit = graph.create_with_parent(animal, props! { "name" => "White Rabbit" }).unwrap();
//!
//! graph.invoke(rabbit, "sleep", &[]).unwrap();
//! assert_eq!(graph.get(rabbit, "isSleeping").unwrap(), Some(&Value::Bool(true)));
//! assert_eq!(graph.get(animal, "isSleeping").unwrap(), None);
//! ```

mod entity;
mod error;
mod graph;
mod receiver;
mod shared;
mod snapshot;
mod value;

pub use entity::Entity;
pub use error::{GraphError, GraphResult};
pub use graph::PrototypeGraph;
pub use protochain_types::EntityId;
pub use receiver::Receiver;
pub use shared::SharedGraph;
pub use snapshot::{EntitySnapshot, GraphSnapshot};
pub use value::{properties_from_json, Method, Properties, Value};
