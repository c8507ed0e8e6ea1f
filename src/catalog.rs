//! Catalog of calculations exposed as uniform tools.
//!
//! A few tools carry hand-written metadata; every other registered
//! calculation gets metadata generated from its registry entry. The catalog is
//! built once per process.

use crate::dispatch::compute;
use crate::invoke::ExtraArgs;
use crate::outcome::ComputationOutcome;
use log::info;
use std::sync::OnceLock;
use wxcalc_core::Record;
use wxcalc_thermo::{lookup, CalcFunction, CALC_REGISTRY};

/// Category given to tools without hand-written metadata.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A named calculation with descriptive metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub required_params: Vec<String>,
    pub example: String,
    pub category: String,
    /// Parameter list as `a, b, c=None`
    pub signature: String,
    /// Why the tool cannot run, if it cannot
    unavailable: Option<String>,
}

impl Tool {
    fn generated(function: &CalcFunction) -> Self {
        Self {
            name: function.name.to_string(),
            description: function.summary.to_string(),
            required_params: function.required_params().map(str::to_string).collect(),
            example: format!("{}()", function.name),
            category: UNCATEGORIZED.to_string(),
            signature: function.signature(),
            unavailable: None,
        }
    }

    fn curated(meta: &Curated) -> Self {
        let required_params = meta.required_params.iter().map(|p| p.to_string()).collect();
        match lookup(meta.name) {
            Some(function) => Self {
                name: meta.name.to_string(),
                description: meta.description.to_string(),
                required_params,
                example: meta.example.to_string(),
                category: meta.group.to_string(),
                signature: function.signature(),
                unavailable: None,
            },
            None => Self {
                name: meta.name.to_string(),
                description: meta.description.to_string(),
                required_params,
                example: meta.example.to_string(),
                category: meta.group.to_string(),
                signature: String::new(),
                unavailable: Some(format!("no calculation named '{}' is available", meta.name)),
            },
        }
    }

    pub fn is_available(&self) -> bool {
        self.unavailable.is_none()
    }

    /// Runs the tool over `records`.
    pub fn call(&self, records: &[Record], extra: Option<&ExtraArgs>) -> ComputationOutcome {
        match &self.unavailable {
            Some(reason) => ComputationOutcome::fail(reason.clone()),
            None => compute(records, &self.name, extra),
        }
    }
}

/// Hand-written metadata for a tool.
struct Curated {
    name: &'static str,
    description: &'static str,
    required_params: &'static [&'static str],
    example: &'static str,
    group: &'static str,
}

const CURATED: &[Curated] = &[
    Curated {
        name: "dewpoint",
        description: "Dewpoint temperature",
        required_params: &["temperature", "relative_humidity"],
        example: "dewpoint(temperature=25, relative_humidity=70)",
        group: "thermodynamics",
    },
    Curated {
        name: "wet_bulb_temperature",
        description: "Wet-bulb temperature",
        required_params: &["temperature", "pressure", "relative_humidity"],
        example: "wet_bulb_temperature(temperature=25, pressure=1013, relative_humidity=70)",
        group: "thermodynamics",
    },
    Curated {
        name: "wind_speed",
        description: "Wind speed",
        required_params: &["u", "v"],
        example: "wind_speed(u=10, v=20)",
        group: "wind",
    },
    Curated {
        name: "wind_direction",
        description: "Wind direction",
        required_params: &["u", "v"],
        example: "wind_direction(u=10, v=20)",
        group: "wind",
    },
    Curated {
        name: "advection",
        description: "Temperature advection",
        required_params: &["temperature", "u", "v", "dx", "dy", "nx"],
        example: "advection(temperature=25, u=10, v=20, dx=1000, dy=1000, nx=10)",
        group: "dynamics",
    },
    Curated {
        name: "vorticity",
        description: "Vertical vorticity",
        required_params: &["u", "v", "dx", "dy", "nx"],
        example: "vorticity(u=10, v=20, dx=1000, dy=1000, nx=10)",
        group: "dynamics",
    },
    Curated {
        name: "divergence",
        description: "Horizontal divergence",
        required_params: &["u", "v", "dx", "dy", "nx"],
        example: "divergence(u=10, v=20, dx=1000, dy=1000, nx=10)",
        group: "dynamics",
    },
];

/// Tools in catalog order: curated first, then the rest of the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tools: Vec<Tool>,
}

impl Catalog {
    fn build(curated: &[Curated], registry: &[CalcFunction]) -> Self {
        let mut tools: Vec<Tool> = curated.iter().map(Tool::curated).collect();
        for function in registry {
            if !tools.iter().any(|tool| tool.name == function.name) {
                tools.push(Tool::generated(function));
            }
        }
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|tool| tool.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Removes a tool from this copy of the catalog.
    pub fn remove(&mut self, name: &str) -> Option<Tool> {
        let index = self.tools.iter().position(|tool| tool.name == name)?;
        Some(self.tools.remove(index))
    }
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// All available tools.
///
/// The catalog is built on first use; each call returns an independent copy.
pub fn generate_all_tools() -> Catalog {
    CATALOG
        .get_or_init(|| {
            let catalog = Catalog::build(CURATED, CALC_REGISTRY);
            info!("built tool catalog with {} tools", catalog.len());
            catalog
        })
        .clone()
}

/// One line per tool, `- name(signature): description`, for prompts.
pub fn tools_description() -> String {
    generate_all_tools()
        .iter()
        .map(|tool| format!("- {}({}): {}", tool.name, tool.signature, tool.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Status;
    use serde_json::json;

    #[test]
    fn test_curated_tools_come_first() {
        let catalog = generate_all_tools();
        let names: Vec<&str> = catalog.names().take(7).collect();
        assert_eq!(
            names,
            [
                "dewpoint",
                "wet_bulb_temperature",
                "wind_speed",
                "wind_direction",
                "advection",
                "vorticity",
                "divergence"
            ]
        );
        assert_eq!(catalog.len(), CALC_REGISTRY.len());
        assert_eq!(catalog.get("wind_speed").unwrap().category, "wind");
    }

    #[test]
    fn test_generated_metadata() {
        let catalog = generate_all_tools();
        let tool = catalog.get("dry_lapse").unwrap();
        assert_eq!(tool.category, UNCATEGORIZED);
        assert_eq!(tool.example, "dry_lapse()");
        assert_eq!(tool.required_params, ["pressure", "temperature"]);
        assert!(tool.is_available());
    }

    #[test]
    fn test_copies_are_independent() {
        let mut first = generate_all_tools();
        assert!(first.remove("dewpoint").is_some());
        assert!(generate_all_tools().contains("dewpoint"));
    }

    #[test]
    fn test_missing_curated_tool_is_a_failing_stub() {
        let curated = [Curated {
            name: "storm_motion",
            description: "Bunkers storm motion",
            required_params: &["u", "v"],
            example: "storm_motion(u=10, v=20)",
            group: "wind",
        }];
        let catalog = Catalog::build(&curated, CALC_REGISTRY);
        let tool = catalog.get("storm_motion").unwrap();
        assert!(!tool.is_available());
        let record = json!({"u": 1, "v": 2}).as_object().unwrap().clone();
        let outcome = tool.call(&[record], None);
        assert_eq!(outcome.status, Status::Fail);
        assert!(outcome.message.contains("storm_motion"));
    }

    #[test]
    fn test_tool_call_dispatches() {
        let record = json!({"u": 3, "v": 4}).as_object().unwrap().clone();
        let outcome = generate_all_tools()
            .get("wind_speed")
            .unwrap()
            .call(&[record], None);
        assert_eq!(outcome.status, Status::Success);
        assert_eq!(outcome.processed[0]["wind_speed_result"], json!(5.0));
    }

    #[test]
    fn test_description_lines() {
        let description = tools_description();
        assert!(description.starts_with("- dewpoint(temperature, relative_humidity): "));
        assert!(description
            .lines()
            .any(|line| line.starts_with("- moist_lapse(pressure, temperature, reference_pressure=None)")));
    }
}
