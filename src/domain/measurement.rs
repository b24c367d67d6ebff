// Measurement - a reading that is either valid or explicitly absent

/// A semantic value from one sensor read.
///
/// An invalid measurement carries no number at all, so a glitched read can
/// never leak downstream as a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement<T> {
    Valid(T),
    Invalid,
}

impl<T: Copy> Measurement<T> {
    #[cfg(test)]
    pub fn is_valid(&self) -> bool {
        matches!(self, Measurement::Valid(_))
    }

    pub fn get(&self) -> Option<T> {
        match self {
            Measurement::Valid(value) => Some(*value),
            Measurement::Invalid => None,
        }
    }
}

impl<T> From<Option<T>> for Measurement<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Measurement::Valid(value),
            None => Measurement::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::units::Celsius;

    #[test]
    fn test_invalid_has_no_value() {
        let m: Measurement<Celsius> = Measurement::Invalid;
        assert!(!m.is_valid());
        assert_eq!(m.get(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Measurement::from(Some(Celsius(21.0))).get(), Some(Celsius(21.0)));
        assert!(!Measurement::<Celsius>::from(None).is_valid());
    }
}
