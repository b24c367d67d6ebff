// Indicator output that logs level edges instead of driving a pin
use crate::application::node_service::IndicatorOutput;

#[derive(Debug, Default)]
pub struct LogIndicator {
    level: Option<bool>,
    edges: u64,
}

impl LogIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn edges(&self) -> u64 {
        self.edges
    }
}

impl IndicatorOutput for LogIndicator {
    fn set_level(&mut self, high: bool) {
        if self.level != Some(high) {
            self.level = Some(high);
            self.edges += 1;
            tracing::trace!("Indicator {}", if high { "on" } else { "off" });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_only_edges() {
        let mut indicator = LogIndicator::new();
        for high in [true, true, false, false, false, true] {
            indicator.set_level(high);
        }
        assert_eq!(indicator.edges(), 3);
    }
}
