//! OIB (osobni identifikacijski broj) checksum rules.
//!
//! An OIB is 11 decimal digits. The last digit is an ISO 7064 MOD 11-10
//! control digit computed over the first ten.

use thiserror::Error;

/// Total number of digits in an OIB.
pub const OIB_LENGTH: usize = 11;

/// Number of digits the control digit is computed over.
const BODY_LENGTH: usize = OIB_LENGTH - 1;

/// OIB validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OibError {
    #[error("Provided number must be exactly 10 digits long.")]
    InvalidLength,

    #[error("Provided number must contain only decimal digits.")]
    NonDigit,

    #[error("OIB must be a numeric value and exactly 11 digits long.")]
    InvalidFormat,

    #[error("Provided OIB is not valid!")]
    InvalidChecksum,
}

/// Calculate the control digit for the first ten digits of an OIB.
pub fn calculate_control_digit(first_ten: &str) -> Result<u8, OibError> {
    if first_ten.len() != BODY_LENGTH {
        return Err(OibError::InvalidLength);
    }

    let mut x: u8 = 10;
    for b in first_ten.bytes() {
        if !b.is_ascii_digit() {
            return Err(OibError::NonDigit);
        }
        x = (x + (b - b'0')) % 10;
        if x == 0 {
            x = 10;
        }
        x = (x * 2) % 11;
    }

    Ok(match 11 - x {
        10 => 0,
        11 => 1,
        digit => digit,
    })
}

/// Validate a full 11-digit OIB, including its control digit.
pub fn validate_oib(oib: &str) -> Result<(), OibError> {
    if oib.len() != OIB_LENGTH || !oib.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OibError::InvalidFormat);
    }

    let (body, check) = oib.split_at(BODY_LENGTH);
    let expected = calculate_control_digit(body)?;
    let actual = check.as_bytes()[0] - b'0';

    if actual != expected {
        return Err(OibError::InvalidChecksum);
    }
    Ok(())
}
