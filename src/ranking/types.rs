//! Top-N selection.

/// How many ranked recommendations to return.
///
/// # Examples
///
/// ```
/// use u_planfit::ranking::TopN;
///
/// assert_eq!(TopN::from_signed(-3), TopN::First(0));
/// assert_eq!(TopN::from_signed(5).limit(3), 3);
/// assert_eq!(TopN::All.limit(7), 7);
/// assert_eq!(TopN::from(None), TopN::All);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TopN {
    /// Every plan.
    #[default]
    All,
    /// At most this many plans; `First(0)` returns nothing.
    First(usize),
}

impl TopN {
    /// Maps a signed count: anything `<= 0` selects nothing.
    pub fn from_signed(n: i64) -> Self {
        match usize::try_from(n) {
            Ok(n) => Self::First(n),
            Err(_) if n < 0 => Self::First(0),
            Err(_) => Self::All,
        }
    }

    /// Number of entries to keep out of `len`.
    pub fn limit(self, len: usize) -> usize {
        match self {
            Self::All => len,
            Self::First(n) => n.min(len),
        }
    }
}

impl From<Option<usize>> for TopN {
    fn from(n: Option<usize>) -> Self {
        n.map_or(Self::All, Self::First)
    }
}

impl From<usize> for TopN {
    fn from(n: usize) -> Self {
        Self::First(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signed() {
        assert_eq!(TopN::from_signed(0), TopN::First(0));
        assert_eq!(TopN::from_signed(-1), TopN::First(0));
        assert_eq!(TopN::from_signed(i64::MIN), TopN::First(0));
        assert_eq!(TopN::from_signed(4), TopN::First(4));
    }

    #[test]
    fn test_limit() {
        assert_eq!(TopN::First(0).limit(5), 0);
        assert_eq!(TopN::First(2).limit(5), 2);
        assert_eq!(TopN::First(9).limit(5), 5);
        assert_eq!(TopN::All.limit(5), 5);
        assert_eq!(TopN::All.limit(0), 0);
    }
}
