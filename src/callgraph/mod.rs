//! Name-based call graph.
//!
//! Calls are resolved by the callee's bare name only, so two functions that
//! share a name share their callers. Fan-in computed here is an upper bound
//! and is reported as approximate.

use std::collections::{BTreeSet, HashMap};

use crate::model::FileMetrics;

type FunctionKey = (String, String);

/// Callers indexed by the name they call.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    callers: HashMap<String, BTreeSet<FunctionKey>>,
    functions: usize,
}

impl CallGraph {
    /// Callers are matched by name, never by resolved symbol.
    pub const APPROXIMATE: bool = true;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` in `file_path` calls each of `callees`.
    pub fn add_function<'a, I>(&mut self, file_path: &str, name: &str, callees: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.functions += 1;
        for callee in callees {
            self.callers
                .entry(callee.clone())
                .or_default()
                .insert((file_path.to_string(), name.to_string()));
        }
    }

    /// Distinct other functions calling `name`. Recursive calls do not count.
    pub fn fan_in(&self, file_path: &str, name: &str) -> u32 {
        let Some(callers) = self.callers.get(name) else {
            return 0;
        };
        let own = (file_path.to_string(), name.to_string());
        let count = callers.len() - usize::from(callers.contains(&own));
        count as u32
    }

    pub fn function_count(&self) -> usize {
        self.functions
    }
}

/// Fill in `fan_in` for every function.
pub fn assign_fan_in(files: &mut [FileMetrics], graph: &CallGraph) {
    for file in files.iter_mut() {
        for function in file.functions.iter_mut() {
            function.fan_in = graph.fan_in(&function.file_path, &function.name);
        }
    }
    tracing::debug!(
        "Resolved fan-in for {} functions across {} call targets",
        graph.function_count(),
        graph.callers.len()
    );
}
