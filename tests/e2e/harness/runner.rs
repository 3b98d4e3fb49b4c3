use super::assertions::Assertion;
use super::steps::ScenarioStep;
use super::workspace::TestWorkspace;
use alias_core::{Location, Operation, ResourcePath, Workspace};
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeSet;

/// Executes scenarios against a real alias-tracked workspace
pub struct ScenarioRunner {
    env: TestWorkspace,
    ws: Workspace,
    check_confluence: bool,
    current_step: usize,
}

impl ScenarioRunner {
    /// Create a new runner from an optional fixture, optionally replacing
    /// its aliases.toml
    pub fn new(fixture: Option<&str>, config: Option<&str>, check_confluence: bool) -> Result<Self> {
        let env = match fixture {
            Some(name) => TestWorkspace::from_fixture(name)?,
            None => TestWorkspace::empty()?,
        };
        if let Some(toml) = config {
            env.write_config(toml)?;
        }
        let config = env.config().context("Failed to load aliases.toml")?;
        let ws = env.open(config).context("Failed to open workspace")?;

        Ok(Self {
            env,
            ws,
            check_confluence,
            current_step: 0,
        })
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// The workspace under test
    pub fn workspace(&self) -> &Workspace {
        &self.ws
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step)
                .with_context(|| format!("Step {}: {:?}", i, step))?;
        }
        Ok(())
    }

    /// Execute a single step
    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::Apply { operation } => self.handle_apply(operation),
            ScenarioStep::ExpectRejected { operation } => self.handle_rejected(operation),
            ScenarioStep::Assert { assertion } => self.handle_assertion(assertion),
        }
    }

    // ===== Mutation handlers =====

    fn handle_apply(&mut self, operation: &Operation) -> Result<()> {
        self.ws.apply(operation)?;
        if self.check_confluence {
            self.assert_consistent()?;
        }
        Ok(())
    }

    fn handle_rejected(&mut self, operation: &Operation) -> Result<()> {
        let before = self.ws.aliases().index().clone();
        match self.ws.apply(operation) {
            Ok(()) => Err(anyhow!("Expected {:?} to be rejected, but it succeeded", operation)),
            Err(_) => {
                if *self.ws.aliases().index() != before {
                    return Err(anyhow!("Rejected operation changed the alias index"));
                }
                self.assert_consistent()
            }
        }
    }

    // ===== Assertion handlers =====

    fn handle_assertion(&self, assertion: &Assertion) -> Result<()> {
        match assertion {
            Assertion::AliasesOf { path, expected } => self.assert_aliases_of(path, expected),
            Assertion::NoAliases { path } => self.assert_no_aliases(path),
            Assertion::Exists { path } => self.assert_exists(path, true),
            Assertion::Missing { path } => self.assert_exists(path, false),
            Assertion::LocationOf { path, location } => self.assert_location_of(path, location),
            Assertion::Claimed { path } => self.assert_claimed(path, true),
            Assertion::NotClaimed { path } => self.assert_claimed(path, false),
            Assertion::ClaimCount(n) => self.assert_claim_count(*n),
            Assertion::Consistent => self.assert_consistent(),
            Assertion::Custom(f) => f(&self.ws),
        }
    }

    fn parse_path(&self, path: &str) -> Result<ResourcePath> {
        ResourcePath::parse(path).with_context(|| format!("Invalid resource path: {}", path))
    }

    fn assert_aliases_of(&self, path: &str, expected: &[String]) -> Result<()> {
        let resource = self.parse_path(path)?;
        let expected: BTreeSet<ResourcePath> = expected
            .iter()
            .map(|p| self.parse_path(p))
            .collect::<Result<_>>()?;

        match self.ws.aliases_of(&resource) {
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(anyhow!(
                "Aliases of {} are {:?}, expected {:?}",
                path,
                actual,
                expected
            )),
            None => Err(anyhow!("{} has no aliases, expected {:?}", path, expected)),
        }
    }

    fn assert_no_aliases(&self, path: &str) -> Result<()> {
        let resource = self.parse_path(path)?;
        match self.ws.aliases_of(&resource) {
            None => Ok(()),
            Some(actual) => Err(anyhow!("Expected no aliases for {}, got {:?}", path, actual)),
        }
    }

    fn assert_exists(&self, path: &str, expected: bool) -> Result<()> {
        let resource = self.parse_path(path)?;
        let exists = self.ws.tree().exists(&resource);
        if exists != expected {
            return Err(anyhow!(
                "Expected {} to {}exist",
                path,
                if expected { "" } else { "not " }
            ));
        }
        Ok(())
    }

    fn assert_location_of(&self, path: &str, location: &str) -> Result<()> {
        let resource = self.parse_path(path)?;
        let expected = Location::parse(location)?;
        match self.ws.location_of(&resource) {
            Some(actual) if actual == expected => Ok(()),
            other => Err(anyhow!(
                "Location of {} is {:?}, expected {}",
                path,
                other,
                expected
            )),
        }
    }

    fn assert_claimed(&self, path: &str, expected: bool) -> Result<()> {
        let resource = self.parse_path(path)?;
        let claimed = self.ws.aliases().index().claim(&resource).is_some();
        if claimed != expected {
            return Err(anyhow!(
                "Expected {} to be {}claimed in the alias index",
                path,
                if expected { "" } else { "un" }
            ));
        }
        Ok(())
    }

    fn assert_claim_count(&self, expected: usize) -> Result<()> {
        let actual = self.ws.aliases().index().len();
        if actual != expected {
            return Err(anyhow!("Expected {} claims, found {}", expected, actual));
        }
        Ok(())
    }

    fn assert_consistent(&self) -> Result<()> {
        let report = self.ws.verify()?;
        if !report.consistent {
            return Err(anyhow!(
                "{} (missing {:?}, unexpected {:?})",
                report.summary(),
                report.missing,
                report.unexpected
            ));
        }
        Ok(())
    }
}
