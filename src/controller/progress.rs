//! Progress indicator whose changes carry their origin.
//!
//! Both the refresh tick and the user move the indicator. Only changes made
//! by the user may turn into a seek, otherwise every tick would seek.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    User,
    Program,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProgressChange {
    pub value_millis: u64,
    pub origin: Origin,
}

impl ProgressChange {
    pub fn user(value_millis: u64) -> Self {
        Self {
            value_millis,
            origin: Origin::User,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    value: u64,
    max: u64,
}

impl Progress {
    #[cfg(test)]
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn set_max(&mut self, max: u64) {
        self.max = max;
        self.value = self.value.min(max);
    }

    /// Move the indicator and report the change to whoever listens.
    pub fn set_value(&mut self, value: u64, origin: Origin) -> ProgressChange {
        self.value = value.min(self.max);
        ProgressChange {
            value_millis: self.value,
            origin,
        }
    }

    /// Filled fraction in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            self.value as f64 / self.max as f64
        }
    }

    /// Value that corresponds to a fraction of the bar.
    pub fn value_at_ratio(&self, ratio: f64) -> u64 {
        (self.max as f64 * ratio.clamp(0.0, 1.0)).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_clamps_to_max_and_tags_origin() {
        let mut p = Progress::default();
        p.set_max(1_000);
        let change = p.set_value(5_000, Origin::Program);
        assert_eq!(change.value_millis, 1_000);
        assert_eq!(change.origin, Origin::Program);
        assert_eq!(p.ratio(), 1.0);
    }

    #[test]
    fn ratio_helpers_handle_empty_bar() {
        let p = Progress::default();
        assert_eq!(p.ratio(), 0.0);
        assert_eq!(p.value_at_ratio(0.5), 0);

        let mut p = Progress::default();
        p.set_max(200_000);
        assert_eq!(p.value_at_ratio(0.25), 50_000);
        assert_eq!(p.value_at_ratio(7.0), 200_000);
    }
}
