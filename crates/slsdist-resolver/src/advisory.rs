//! Non-fatal findings from resolution that the caller should surface.

use std::fmt;

use slsdist_core::product::{ProductDependency, ProductId};

/// A declared dependency that a discovered recommendation makes (partly)
/// unnecessary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Merging the declaration into the discovered record changed nothing.
    RedundantDeclaration {
        declared: ProductDependency,
        discovered: ProductDependency,
    },
    /// The declaration tightens the discovered window but repeats the
    /// discovered recommended version.
    DuplicatedRecommendation {
        declared: ProductDependency,
        discovered: ProductDependency,
    },
}

impl Advisory {
    pub fn product(&self) -> ProductId {
        match self {
            Advisory::RedundantDeclaration { declared, .. }
            | Advisory::DuplicatedRecommendation { declared, .. } => declared.id(),
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (headline, declared, discovered) = match self {
            Advisory::RedundantDeclaration {
                declared,
                discovered,
            } => (
                format!(
                    "Please remove your declared product dependency on '{}' because it is already provided by a discovered dependency:",
                    declared.id()
                ),
                declared,
                discovered,
            ),
            Advisory::DuplicatedRecommendation {
                declared,
                discovered,
            } => (
                format!(
                    "Please remove the recommended version from your declared product dependency on '{}' because the discovered dependency already recommends it:",
                    declared.id()
                ),
                declared,
                discovered,
            ),
        };
        write!(
            f,
            "{headline}\n\n\tProvided:     {discovered}\n\tYou declared: {declared}"
        )
    }
}

/// All advisories from one resolution pass, in product id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvisoryReport {
    pub advisories: Vec<Advisory>,
}

impl AdvisoryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, advisory: Advisory) {
        self.advisories.push(advisory);
    }

    pub fn is_empty(&self) -> bool {
        self.advisories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.advisories.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Advisory> {
        self.advisories.iter()
    }
}

impl fmt::Display for AdvisoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.advisories.is_empty() {
            return write!(f, "No advisories.");
        }
        writeln!(f, "Advisories ({}):", self.advisories.len())?;
        for advisory in &self.advisories {
            writeln!(f, "  {advisory}")?;
        }
        Ok(())
    }
}
