use alias_core::Workspace;
use anyhow::Result;

/// Declarative assertions on workspace and alias state
pub enum Assertion {
    // Alias queries
    AliasesOf {
        path: String,
        expected: Vec<String>,
    },
    NoAliases {
        path: String,
    },

    // Tree
    Exists {
        path: String,
    },
    Missing {
        path: String,
    },
    LocationOf {
        path: String,
        location: String,
    },

    // Index
    Claimed {
        path: String,
    },
    NotClaimed {
        path: String,
    },
    ClaimCount(usize),
    Consistent,

    // Custom
    Custom(Box<dyn Fn(&Workspace) -> Result<()> + Send + Sync>),
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AliasesOf { path, expected } => {
                write!(f, "AliasesOf {{ path: {:?}, expected: {:?} }}", path, expected)
            }
            Self::NoAliases { path } => write!(f, "NoAliases {{ path: {:?} }}", path),
            Self::Exists { path } => write!(f, "Exists {{ path: {:?} }}", path),
            Self::Missing { path } => write!(f, "Missing {{ path: {:?} }}", path),
            Self::LocationOf { path, location } => {
                write!(f, "LocationOf {{ path: {:?}, location: {:?} }}", path, location)
            }
            Self::Claimed { path } => write!(f, "Claimed {{ path: {:?} }}", path),
            Self::NotClaimed { path } => write!(f, "NotClaimed {{ path: {:?} }}", path),
            Self::ClaimCount(n) => write!(f, "ClaimCount({})", n),
            Self::Consistent => write!(f, "Consistent"),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}
