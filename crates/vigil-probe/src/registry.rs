//! Ordered collection of named probes.

use thiserror::Error;

use crate::probe::Probe;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("probe name already registered: {0}")]
    DuplicateName(String),
}

/// Probes in registration order. Names are unique; the final run result
/// lists outcomes in the same order.
#[derive(Default)]
pub struct ProbeRegistry {
    probes: Vec<Box<dyn Probe>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, probe: Box<dyn Probe>) -> Result<(), RegistryError> {
        if self.probes.iter().any(|p| p.name() == probe.name()) {
            return Err(RegistryError::DuplicateName(probe.name().to_string()));
        }
        self.probes.push(probe);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Registered names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    pub(crate) fn into_probes(self) -> Vec<Box<dyn Probe>> {
        self.probes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::UnconfiguredProbe;

    #[test]
    fn register_preserves_order() {
        let mut registry = ProbeRegistry::new();
        registry
            .register(Box::new(UnconfiguredProbe::new("zeta")))
            .unwrap();
        registry
            .register(Box::new(UnconfiguredProbe::new("alpha")))
            .unwrap();

        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = ProbeRegistry::new();
        registry
            .register(Box::new(UnconfiguredProbe::new("api_health")))
            .unwrap();

        let err = registry
            .register(Box::new(UnconfiguredProbe::new("api_health")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "api_health"));
        assert_eq!(registry.len(), 1);
    }
}
