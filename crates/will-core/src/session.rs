use tracing::info;

/// Transient state owned by one wizard session. Never part of [`will_domain::FormState`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionContext {
    complexity_acknowledged: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_acknowledgement(acknowledged: bool) -> Self {
        Self {
            complexity_acknowledged: acknowledged,
        }
    }

    /// Records "continue anyway" on the complexity interstitial.
    pub fn acknowledge_complexity(&mut self) {
        if !self.complexity_acknowledged {
            info!("complex estate acknowledged for this session");
        }
        self.complexity_acknowledged = true;
    }

    pub fn reset_complexity_acknowledgement(&mut self) {
        self.complexity_acknowledged = false;
    }

    pub fn has_acknowledged_complexity(&self) -> bool {
        self.complexity_acknowledged
    }
}
