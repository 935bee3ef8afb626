//! Static address derivation from a grade and laptop number.
//!
//! The last octet is `20 + 80 * (grade == 1) + number`:
//!
//! | grade | number | octet range |
//! |-------|--------|-------------|
//! | 2     | 1..=80 | 21..=100    |
//! | 1     | 1..=80 | 101..=180   |
//!
//! Grade 1 carries the offset. Do not swap the direction without confirming
//! with the network owners.

use std::fmt;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

use thiserror::Error;

/// Accepted grades.
pub const GRADES: RangeInclusive<u8> = 1..=2;

/// Accepted laptop numbers.
pub const NUMBERS: RangeInclusive<u8> = 1..=80;

/// Base added to every derived octet.
const OCTET_BASE: u8 = 20;

/// Extra offset for grade 1.
const FIRST_GRADE_OFFSET: u8 = 80;

/// Default network the derived octet is placed into.
pub const DEFAULT_NETWORK: Ipv4Addr = Ipv4Addr::new(10, 156, 145, 0);

/// Error type for out-of-domain derivation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Grade outside `1..=2`.
    #[error("grade must be 1 or 2, got {grade}")]
    GradeOutOfRange {
        /// The rejected grade.
        grade: u32,
    },

    /// Number outside `1..=80`.
    #[error("number must be between 1 and 80, got {number}")]
    NumberOutOfRange {
        /// The rejected number.
        number: u32,
    },
}

/// Derives the last IPv4 octet for a grade and laptop number.
///
/// # Errors
///
/// Returns [`IdentityError`] if either input is outside its domain.
/// Inputs are never clamped.
///
/// # Examples
///
/// ```
/// use ip_configurator::identity::derive_last_octet;
///
/// assert_eq!(derive_last_octet(2, 5), Ok(25));
/// assert_eq!(derive_last_octet(1, 1), Ok(101));
/// assert!(derive_last_octet(3, 1).is_err());
/// ```
pub fn derive_last_octet(grade: u32, number: u32) -> Result<u8, IdentityError> {
    Identity::new(grade, number).map(|identity| identity.last_octet())
}

/// A validated grade and laptop number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    grade: u8,
    number: u8,
}

impl Identity {
    /// Validates a grade and number.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] if either input is outside its domain.
    pub fn new(grade: u32, number: u32) -> Result<Self, IdentityError> {
        let grade = u8::try_from(grade)
            .ok()
            .filter(|g| GRADES.contains(g))
            .ok_or(IdentityError::GradeOutOfRange { grade })?;
        let number = u8::try_from(number)
            .ok()
            .filter(|n| NUMBERS.contains(n))
            .ok_or(IdentityError::NumberOutOfRange { number })?;

        Ok(Self { grade, number })
    }

    /// The grade (1 or 2).
    #[must_use]
    pub const fn grade(self) -> u8 {
        self.grade
    }

    /// The laptop number (1 to 80).
    #[must_use]
    pub const fn number(self) -> u8 {
        self.number
    }

    /// The derived last octet, in `21..=180`.
    #[must_use]
    pub const fn last_octet(self) -> u8 {
        let offset = if self.grade == 1 {
            FIRST_GRADE_OFFSET
        } else {
            0
        };
        OCTET_BASE + offset + self.number
    }

    /// Places the derived octet into `network` (whose last octet is replaced).
    #[must_use]
    pub const fn address_in(self, network: Ipv4Addr) -> Ipv4Addr {
        let [a, b, c, _] = network.octets();
        Ipv4Addr::new(a, b, c, self.last_octet())
    }

    /// The address inside [`DEFAULT_NETWORK`].
    #[must_use]
    pub const fn address(self) -> Ipv4Addr {
        self.address_in(DEFAULT_NETWORK)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grade {} / number {}", self.grade, self.number)
    }
}
