use alias_core::Operation;

use super::assertions::Assertion;

/// All possible actions in a test scenario
#[derive(Debug)]
pub enum ScenarioStep {
    // Workspace mutations
    Apply { operation: Operation },

    // Mutations the workspace must refuse, leaving tree and index untouched
    ExpectRejected { operation: Operation },

    // Assertions (can be interspersed)
    Assert { assertion: Assertion },
}
