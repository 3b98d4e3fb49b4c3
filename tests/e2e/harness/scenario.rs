use super::assertions::Assertion;
use super::runner::ScenarioRunner;
use super::steps::ScenarioStep;
use alias_core::{Location, Operation, ResourceKind, ResourcePath};

/// Builder for alias scenarios: setup, mutations and assertions in order
pub struct Scenario {
    name: String,
    fixture: Option<String>,
    config: Option<String>,
    check_confluence: bool,
    steps: Vec<ScenarioStep>,
}

fn path(s: &str) -> ResourcePath {
    ResourcePath::parse(s).unwrap_or_else(|e| panic!("bad resource path {:?} in scenario: {}", s, e))
}

fn location(s: &str) -> Location {
    Location::parse(s).unwrap_or_else(|e| panic!("bad location {:?} in scenario: {}", s, e))
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fixture: None,
            config: None,
            check_confluence: false,
            steps: Vec::new(),
        }
    }

    /// Load the initial workspace from fixtures
    pub fn from_fixture(mut self, fixture_name: &str) -> Self {
        self.fixture = Some(fixture_name.to_string());
        self
    }

    /// Write aliases.toml before the workspace is opened
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config = Some(toml.to_string());
        self
    }

    /// After every mutation, compare the live index with a full rebuild
    pub fn checking_confluence(mut self) -> Self {
        self.check_confluence = true;
        self
    }

    // ===== Projects =====

    fn apply(mut self, operation: Operation) -> Self {
        self.steps.push(ScenarioStep::Apply { operation });
        self
    }

    /// Create a project at its default location
    pub fn create_project(self, name: &str) -> Self {
        self.apply(Operation::CreateProject {
            name: name.to_string(),
            location: None,
        })
    }

    /// Create a project at an explicit location
    pub fn create_project_at(self, name: &str, at: &str) -> Self {
        self.apply(Operation::CreateProject {
            name: name.to_string(),
            location: Some(location(at)),
        })
    }

    /// Open a project
    pub fn open_project(self, name: &str) -> Self {
        self.apply(Operation::OpenProject {
            name: name.to_string(),
        })
    }

    /// Close a project
    pub fn close_project(self, name: &str) -> Self {
        self.apply(Operation::CloseProject {
            name: name.to_string(),
        })
    }

    /// Delete a project
    pub fn delete_project(self, name: &str) -> Self {
        self.apply(Operation::DeleteProject {
            name: name.to_string(),
        })
    }

    /// Move a project to a new location
    pub fn relocate_project(self, name: &str, to: &str) -> Self {
        self.apply(Operation::RelocateProject {
            name: name.to_string(),
            location: Some(location(to)),
        })
    }

    /// Move a project back to its default location
    pub fn reset_project_location(self, name: &str) -> Self {
        self.apply(Operation::RelocateProject {
            name: name.to_string(),
            location: None,
        })
    }

    // ===== Resources =====

    /// Create a plain folder
    pub fn create_folder(self, at: &str) -> Self {
        self.apply(Operation::CreateFolder { path: path(at) })
    }

    /// Create a plain file
    pub fn create_file(self, at: &str) -> Self {
        self.apply(Operation::CreateFile { path: path(at) })
    }

    /// Create a linked folder
    pub fn link_folder(self, at: &str, target: &str) -> Self {
        self.apply(Operation::Link {
            path: path(at),
            kind: ResourceKind::Folder,
            target: location(target),
        })
    }

    /// Create a linked file
    pub fn link_file(self, at: &str, target: &str) -> Self {
        self.apply(Operation::Link {
            path: path(at),
            kind: ResourceKind::File,
            target: location(target),
        })
    }

    /// Delete a resource
    pub fn delete(self, at: &str) -> Self {
        self.apply(Operation::Delete { path: path(at) })
    }

    /// Change file content
    pub fn touch(self, at: &str) -> Self {
        self.apply(Operation::Touch { path: path(at) })
    }

    /// Move a resource
    pub fn move_resource(self, from: &str, to: &str) -> Self {
        self.apply(Operation::Move {
            from: path(from),
            to: path(to),
        })
    }

    /// Copy a resource
    pub fn copy_resource(self, from: &str, to: &str) -> Self {
        self.apply(Operation::Copy {
            from: path(from),
            to: path(to),
        })
    }

    // ===== Lifecycle =====

    /// Rebuild the alias index from scratch (simulates a shutdown/startup)
    pub fn restart(self) -> Self {
        self.apply(Operation::Restart)
    }

    // ===== Refused mutations =====

    /// The copy must fail
    pub fn copy_rejected(mut self, from: &str, to: &str) -> Self {
        self.steps.push(ScenarioStep::ExpectRejected {
            operation: Operation::Copy {
                from: path(from),
                to: path(to),
            },
        });
        self
    }

    /// The move must fail
    pub fn move_rejected(mut self, from: &str, to: &str) -> Self {
        self.steps.push(ScenarioStep::ExpectRejected {
            operation: Operation::Move {
                from: path(from),
                to: path(to),
            },
        });
        self
    }

    /// The folder creation must fail
    pub fn create_folder_rejected(mut self, at: &str) -> Self {
        self.steps.push(ScenarioStep::ExpectRejected {
            operation: Operation::CreateFolder { path: path(at) },
        });
        self
    }

    /// The file creation must fail
    pub fn create_file_rejected(mut self, at: &str) -> Self {
        self.steps.push(ScenarioStep::ExpectRejected {
            operation: Operation::CreateFile { path: path(at) },
        });
        self
    }

    /// The folder link must fail
    pub fn link_folder_rejected(mut self, at: &str, target: &str) -> Self {
        self.steps.push(ScenarioStep::ExpectRejected {
            operation: Operation::Link {
                path: path(at),
                kind: ResourceKind::Folder,
                target: location(target),
            },
        });
        self
    }

    // ===== Assertions =====

    /// Check any [`Assertion`]
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.steps.push(ScenarioStep::Assert { assertion });
        self
    }

    /// Assert the exact alias set of a resource
    pub fn assert_aliases(self, at: &str, expected: &[&str]) -> Self {
        self.assert(Assertion::AliasesOf {
            path: at.to_string(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Assert a resource has no aliases
    pub fn assert_no_aliases(self, at: &str) -> Self {
        self.assert(Assertion::NoAliases {
            path: at.to_string(),
        })
    }

    /// Assert a resource exists in the tree
    pub fn assert_exists(self, at: &str) -> Self {
        self.assert(Assertion::Exists {
            path: at.to_string(),
        })
    }

    /// Assert a resource does not exist in the tree
    pub fn assert_missing(self, at: &str) -> Self {
        self.assert(Assertion::Missing {
            path: at.to_string(),
        })
    }

    /// Assert the resolved location of a resource
    pub fn assert_location(self, at: &str, expected: &str) -> Self {
        self.assert(Assertion::LocationOf {
            path: at.to_string(),
            location: expected.to_string(),
        })
    }

    /// Assert the index holds a claim for the path
    pub fn assert_claimed(self, at: &str) -> Self {
        self.assert(Assertion::Claimed {
            path: at.to_string(),
        })
    }

    /// Assert the index holds no claim for the path
    pub fn assert_not_claimed(self, at: &str) -> Self {
        self.assert(Assertion::NotClaimed {
            path: at.to_string(),
        })
    }

    /// Assert the number of claims in the index
    pub fn assert_claim_count(self, expected: usize) -> Self {
        self.assert(Assertion::ClaimCount(expected))
    }

    /// Assert the index equals a full rebuild
    pub fn assert_consistent(self) -> Self {
        self.assert(Assertion::Consistent)
    }

    // ===== Execution =====

    /// Run every step against a fresh workspace
    pub fn run(self) -> ScenarioResult {
        let failure = ScenarioRunner::new(
            self.fixture.as_deref(),
            self.config.as_deref(),
            self.check_confluence,
        )
        .map_err(|e| (None, format!("setup failed: {:?}", e)))
        .and_then(|mut runner| {
            runner
                .execute(&self.steps)
                .map_err(|e| (Some(runner.current_step()), format!("{:?}", e)))
        })
        .err();

        ScenarioResult {
            name: self.name,
            total_steps: self.steps.len(),
            failure,
        }
    }
}

/// Outcome of a scenario run
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub total_steps: usize,
    /// Failing step (`None` when setup failed) and the error chain
    pub failure: Option<(Option<usize>, String)>,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    fn describe_failure(&self) -> Option<String> {
        let (step, error) = self.failure.as_ref()?;
        let at = match step {
            Some(step) => format!("step {}/{}", step + 1, self.total_steps),
            None => "setup".to_string(),
        };
        Some(format!("scenario '{}' failed at {}: {}", self.name, at, error))
    }

    /// Panic with the failing step and its error
    pub fn unwrap(self) {
        if let Some(message) = self.describe_failure() {
            panic!("{}", message);
        }
    }

    /// Like `unwrap`, prefixed with `msg`
    pub fn expect(self, msg: &str) {
        if let Some(message) = self.describe_failure() {
            panic!("{}: {}", msg, message);
        }
    }
}
