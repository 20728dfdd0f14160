//! Scenarios for the protochain demo driver.
//!
//! Each scenario builds a small prototype graph, exercises lookups and
//! delegated calls, and returns the lines it would print along with the
//! finished graph so callers can inspect or snapshot it.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use protochain_graph::{props, properties_from_json, EntityId, Method, PrototypeGraph, Value};
use serde_json::json;
use std::f64::consts::FRAC_PI_2;
use tracing::info;

/// Which scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// `rabbit` delegates `walk` and `sleep` to `animal`.
    Animal,
    /// A factory links every new point to one shared `toString`.
    Point,
    /// `ControlPoint` composes `Coordinates` and `Canvas` through its receiver.
    ControlPoint,
    /// Run all of the above.
    All,
}

impl Scenario {
    /// The concrete scenarios `self` expands to.
    #[must_use]
    pub fn expand(self) -> Vec<Scenario> {
        match self {
            Scenario::All => vec![Scenario::Animal, Scenario::Point, Scenario::ControlPoint],
            one => vec![one],
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Scenario::Animal => "animal / rabbit",
            Scenario::Point => "point factory",
            Scenario::ControlPoint => "control point",
            Scenario::All => "all",
        }
    }
}

/// Output of one scenario run.
#[derive(Debug)]
pub struct Report {
    pub title: &'static str,
    pub lines: Vec<String>,
    pub graph: PrototypeGraph,
}

/// Runs `scenario`, or every scenario for `Scenario::All`, in order.
pub fn run(scenario: Scenario) -> Result<Vec<Report>> {
    scenario.expand().into_iter().map(run_one).collect()
}

fn run_one(scenario: Scenario) -> Result<Report> {
    info!(scenario = scenario.title(), "running scenario");
    let mut graph = PrototypeGraph::new();
    let lines = match scenario {
        Scenario::Animal => animal(&mut graph),
        Scenario::Point => point(&mut graph),
        Scenario::ControlPoint => control_point(&mut graph),
        Scenario::All => bail!("`all` expands to several scenarios"),
    }
    .with_context(|| format!("scenario {} failed", scenario.title()))?;

    Ok(Report {
        title: scenario.title(),
        lines,
        graph,
    })
}

/// Renders a lookup result the way the demo prints it.
fn show(value: Option<&Value>) -> String {
    value.map_or_else(|| "<not found>".to_string(), ToString::to_string)
}

fn describe_chain(
    graph: &PrototypeGraph,
    id: EntityId,
    names: &[(EntityId, &str)],
) -> Result<String> {
    let chain = graph.chain(id)?;
    let labels: Vec<&str> = chain
        .iter()
        .map(|link| {
            names
                .iter()
                .find(|(known, _)| known == link)
                .map_or("?", |(_, name)| *name)
        })
        .collect();
    Ok(labels.join(" -> "))
}

// ── Animal ───────────────────────────────────────────────────────

fn animal(graph: &mut PrototypeGraph) -> Result<Vec<String>> {
    let animal = graph.create_entity(props! {
        "eats" => true,
        "walk" => Method::new("walk", |this, _| {
            let name = this
                .get("name")?
                .map_or_else(|| "animal".to_string(), ToString::to_string);
            Ok(Value::from(format!("{name} walks")))
        }),
        "sleep" => Method::new("sleep", |this, _| {
            this.set("isSleeping", true)?;
            Ok(Value::Null)
        }),
    });
    let rabbit_props = properties_from_json(json!({ "name": "White Rabbit" }))?;
    let rabbit = graph.create_with_parent(animal, rabbit_props)?;
    let names = [(animal, "animal"), (rabbit, "rabbit")];

    let mut lines = vec![format!("chain: {}", describe_chain(graph, rabbit, &names)?)];
    lines.push(format!("rabbit.eats = {}", show(graph.get(rabbit, "eats")?)));
    lines.push(format!("rabbit.walk() = {}", graph.invoke(rabbit, "walk", &[])?));

    graph.invoke(rabbit, "sleep", &[])?;
    lines.push(format!("rabbit.isSleeping = {}", show(graph.get(rabbit, "isSleeping")?)));
    lines.push(format!("animal.isSleeping = {}", show(graph.get(animal, "isSleeping")?)));
    Ok(lines)
}

// ── Point factory ────────────────────────────────────────────────

/// Builds a point that delegates to `proto`, like a factory function that
/// links each instance to a shared prototype object.
fn point2d(graph: &mut PrototypeGraph, proto: EntityId, x: f64, y: f64) -> Result<EntityId> {
    Ok(graph.create_with_parent(proto, props! { "x" => x, "y" => y })?)
}

fn point(graph: &mut PrototypeGraph) -> Result<Vec<String>> {
    let proto = graph.create_entity(props! {
        "toString" => Method::new("toString", |this, _| {
            let x = this.get_number("x")?;
            let y = this.get_number("y")?;
            Ok(Value::from(format!("({}, {})", Value::from(x), Value::from(y))))
        }),
    });

    let mut lines = Vec::new();
    for (x, y) in [(3.0, 5.0), (1.0, 3.0)] {
        let p = point2d(graph, proto, x, y)?;
        lines.push(format!("point.toString() = {}", graph.invoke(p, "toString", &[])?));
        lines.push(format!("own keys: {}", graph.own_keys(p)?.join(", ")));
    }
    lines.push(format!("prototype shared by {} points", graph.children_of(proto)?.len()));
    Ok(lines)
}

// ── Control point ────────────────────────────────────────────────

fn canvas_methods() -> protochain_graph::Properties {
    props! {
        "setOrigin" => Method::new("setOrigin", |this, args| {
            let x = this.number_arg(args, 0)?;
            let y = this.number_arg(args, 1)?;
            this.set("origin", props! { "x" => x, "y" => y })?;
            Ok(Value::Null)
        }),
        "pixel" => Method::new("pixel", |this, args| {
            let x = this.number_arg(args, 0)?;
            let y = this.number_arg(args, 1)?;
            this.set("lastPixel", format!("({}, {})", Value::from(x), Value::from(y)))?;
            Ok(Value::Null)
        }),
        "renderScene" => Method::new("renderScene", |this, _| {
            let frames = this.get("frames")?.and_then(Value::as_number).unwrap_or(0.0);
            this.set("frames", frames + 1.0)?;
            this.invoke("draw", &[])
        }),
    }
}

fn coordinates_methods() -> protochain_graph::Properties {
    props! {
        "setX" => Method::new("setX", |this, args| {
            let x = this.number_arg(args, 0)?;
            this.set("x", x.round())?;
            Ok(Value::Null)
        }),
        "setY" => Method::new("setY", |this, args| {
            let y = this.number_arg(args, 0)?;
            this.set("y", y.round())?;
            Ok(Value::Null)
        }),
        "setXY" => Method::new("setXY", |this, args| {
            let x = args.first().cloned().unwrap_or_default();
            let y = args.get(1).cloned().unwrap_or_default();
            this.invoke("setX", &[x])?;
            this.invoke("setY", &[y])?;
            this.invoke("render", &[])
        }),
    }
}

fn control_point_methods(canvas: EntityId) -> protochain_graph::Properties {
    props! {
        "rotate" => Method::new("rotate", |this, args| {
            let angle = this.number_arg(args, 0)?;
            let x = this.get_number("x")?;
            let y = this.get_number("y")?;
            let rotated_x = x * angle.cos() - y * angle.sin();
            let rotated_y = x * angle.sin() + y * angle.cos();
            this.invoke("setXY", &[Value::from(rotated_x), Value::from(rotated_y)])
        }),
        "draw" => Method::new("draw", move |this, _| {
            let x = this.get_number("x")?;
            let y = this.get_number("y")?;
            this.call(canvas, "pixel", &[Value::from(x), Value::from(y)])
        }),
        "render" => Method::new("render", move |this, _| {
            this.call(canvas, "renderScene", &[])
        }),
    }
}

fn control_point(graph: &mut PrototypeGraph) -> Result<Vec<String>> {
    let canvas = graph.create_entity(canvas_methods());
    let coordinates = graph.create_entity(coordinates_methods());
    let control = graph.create_with_parent(coordinates, control_point_methods(canvas))?;
    let names = [
        (canvas, "Canvas"),
        (coordinates, "Coordinates"),
        (control, "ControlPoint"),
    ];

    let mut lines = vec![format!("chain: {}", describe_chain(graph, control, &names)?)];

    let origin = [Value::from(100), Value::from(100)];
    graph.invoke_with_receiver(canvas, "setOrigin", control, &origin)?;
    lines.push(format!("origin = {}", show(graph.get(control, "origin")?)));

    graph.invoke(control, "setXY", &[Value::from(30), Value::from(40)])?;
    lines.push(format!("setXY(30, 40) drew {}", show(graph.get(control, "lastPixel")?)));

    graph.invoke(control, "rotate", &[Value::from(FRAC_PI_2)])?;
    lines.push(format!("rotate(pi/2) drew {}", show(graph.get(control, "lastPixel")?)));

    lines.push(format!("frames rendered = {}", show(graph.get(control, "frames")?)));
    let (owner, _) = graph
        .lookup(control, "setXY")?
        .context("setXY should resolve through Coordinates")?;
    let owner_name = names
        .iter()
        .find(|(id, _)| *id == owner)
        .map_or("?", |(_, name)| *name);
    lines.push(format!("setXY found on {owner_name}"));
    Ok(lines)
}
