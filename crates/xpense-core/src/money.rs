//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Splitting a dinner bill:                                               │
//! │    ₹100.00 / 3 = ₹33.33 (×3 = ₹99.99)  → Lost ₹0.01!                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    10000 paise / 3 = 3334 + 3333 + 3333                                 │
//! │    The leftover paisa is handed out explicitly, nothing is lost        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use xpense_core::money::Money;
//!
//! // Create from paise (preferred)
//! let dinner = Money::from_paise(10_000); // ₹100.00
//!
//! // Parse user input (decoration is stripped)
//! let typed = Money::parse("₹1,250.50").unwrap();
//! assert_eq!(typed.paise(), 125_050);
//!
//! // Split losslessly
//! let shares = dinner.divide_evenly(3).unwrap();
//! assert_eq!(shares.iter().copied().sum::<Money>(), dinner);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::AmountError;

/// Paise in one rupee.
pub const PAISE_PER_RUPEE: i64 = 100;

/// Symbol used by `Display`.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Currency markers dropped from text input, longest first so `Rs.` wins
/// over `Rs`.
const CURRENCY_MARKERS: [&str; 4] = ["rs.", "inr", "rs", CURRENCY_SYMBOL];

// =============================================================================
// Digit Grouping
// =============================================================================

/// How the integer part of an amount is grouped when formatted.
///
/// ```text
/// Indian   12,34,567.89   (last three digits, then pairs)
/// Western   1,234,567.89  (groups of three)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DigitGrouping {
    /// Lakh/crore grouping, as `en-IN` renders rupees.
    #[default]
    Indian,
    /// Thousands grouping.
    Western,
}

impl DigitGrouping {
    fn group_size(self) -> usize {
        match self {
            DigitGrouping::Indian => 2,
            DigitGrouping::Western => 3,
        }
    }
}

impl FromStr for DigitGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indian" | "en-in" | "lakh" => Ok(DigitGrouping::Indian),
            "western" | "en-us" | "thousands" => Ok(DigitGrouping::Western),
            other => Err(format!(
                "Unknown digit grouping: '{}'. Valid options: indian, western",
                other
            )),
        }
    }
}

// =============================================================================
// Amount Input
// =============================================================================

/// Raw amount as it arrives from a form field or a JSON number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountInput<'a> {
    /// Free text, possibly decorated (`"₹1,200.50"`).
    Text(&'a str),
    /// A numeric value.
    Number(f64),
}

impl<'a> From<&'a str> for AmountInput<'a> {
    fn from(s: &'a str) -> Self {
        AmountInput::Text(s)
    }
}

impl<'a> From<&'a String> for AmountInput<'a> {
    fn from(s: &'a String) -> Self {
        AmountInput::Text(s.as_str())
    }
}

impl From<f64> for AmountInput<'_> {
    fn from(n: f64) -> Self {
        AmountInput::Number(n)
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a rupee amount in paise (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Negative values carry debt direction in balances
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support; serializes as a plain paise integer
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Expense.amount ──► divide_evenly(n) ──► Transfer.amount (per share)   │
/// │                                                                         │
/// │  Settlement.amount ──────────────────► Transfer.amount                 │
/// │                                                                         │
/// │  Transfers ──► Balances[friend] (signed) ──► total_owed / total_owe    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use xpense_core::money::Money;
    ///
    /// let chai = Money::from_paise(1550); // ₹15.50
    /// assert_eq!(chai.paise(), 1550);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * PAISE_PER_RUPEE)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Note
    /// For negative amounts, only the rupee part should be negative.
    /// `from_rupees_paise(-5, 50)` = -₹5.50, not -₹4.50
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * PAISE_PER_RUPEE - paise)
        } else {
            Money(rupees * PAISE_PER_RUPEE + paise)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / PAISE_PER_RUPEE
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % PAISE_PER_RUPEE).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the value with its sign flipped.
    #[inline]
    pub const fn negate(&self) -> Self {
        Money(-self.0)
    }

    /// Subtracts `other` from this amount.
    #[inline]
    pub const fn subtract(&self, other: Money) -> Self {
        Money(self.0 - other.0)
    }

    /// Adds `other`, or `None` if the sum leaves the i64 paise range.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(paise) => Some(Money(paise)),
            None => None,
        }
    }

    /// Splits this amount into `n` shares that sum back to it exactly.
    ///
    /// ## Remainder Policy
    /// ```text
    /// 10000 paise / 3
    ///   base      = 10000 div 3 = 3333
    ///   remainder = 10000 mod 3 = 1
    ///   shares    = [3334, 3333, 3333]
    ///               ▲ first `remainder` shares get one extra paisa
    /// ```
    /// Euclidean division keeps the remainder in `0..n`, so negative amounts
    /// split losslessly too.
    ///
    /// Returns `None` when `n` is zero.
    ///
    /// ## Example
    /// ```rust
    /// use xpense_core::money::Money;
    ///
    /// let shares = Money::from_paise(10_000).divide_evenly(3).unwrap();
    /// let paise: Vec<i64> = shares.iter().map(|m| m.paise()).collect();
    /// assert_eq!(paise, vec![3334, 3333, 3333]);
    /// ```
    pub fn divide_evenly(&self, n: usize) -> Option<Vec<Money>> {
        if n == 0 {
            return None;
        }

        let divisor = i64::try_from(n).ok()?;
        let base = self.0.div_euclid(divisor);
        let remainder = self.0.rem_euclid(divisor) as usize;

        Some(
            (0..n)
                .map(|idx| {
                    if idx < remainder {
                        Money(base + 1)
                    } else {
                        Money(base)
                    }
                })
                .collect(),
        )
    }

    /// Parses a user-entered amount.
    ///
    /// ## Rules
    /// - Text: currency markers (`₹`, `Rs.`, `Rs`, `INR`, any case) are
    ///   removed first, then everything except ASCII digits and `.` is
    ///   stripped (commas, spaces).
    /// - More than one decimal separator, any minus sign, or nothing numeric
    ///   is rejected.
    /// - Extra fractional digits round half-up to the nearest paisa.
    /// - Numbers must be finite and go through their shortest decimal form.
    /// - The result must be strictly positive.
    ///
    /// ## Example
    /// ```rust
    /// use xpense_core::money::Money;
    ///
    /// assert_eq!(Money::parse("₹1,00,000.00").unwrap(), Money::from_rupees(100_000));
    /// assert_eq!(Money::parse(12.345).unwrap().paise(), 1235);
    /// assert!(Money::parse("0").is_err());
    /// assert!(Money::parse("-50").is_err());
    /// ```
    pub fn parse<'a>(input: impl Into<AmountInput<'a>>) -> Result<Money, AmountError> {
        match input.into() {
            AmountInput::Text(text) => parse_text(text),
            AmountInput::Number(n) => {
                if !n.is_finite() {
                    return Err(AmountError::NotFinite(n.to_string()));
                }
                if n < 0.0 {
                    return Err(AmountError::Negative(n.to_string()));
                }
                if n == 0.0 {
                    return Err(AmountError::NotPositive(Money::zero()));
                }
                // f64 Display never uses exponent notation
                parse_text(&n.to_string())
            }
        }
    }

    /// Formats with exactly two fractional digits and Indian digit grouping.
    ///
    /// No currency symbol; locale decoration is the caller's concern.
    /// `Money::parse(&m.format()) == Ok(m)` for every positive `m`.
    ///
    /// ## Example
    /// ```rust
    /// use xpense_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(123_456_789).format(), "12,34,567.89");
    /// assert_eq!(Money::from_paise(-500).format(), "-5.00");
    /// ```
    pub fn format(&self) -> String {
        self.format_grouped(DigitGrouping::Indian)
    }

    /// Formats with exactly two fractional digits and the given grouping.
    pub fn format_grouped(&self, grouping: DigitGrouping) -> String {
        self.format_with_symbol("", grouping)
    }

    /// Formats with a currency symbol placed after the sign (`-₹5.50`).
    pub fn format_with_symbol(&self, symbol: &str, grouping: DigitGrouping) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let rupees = magnitude / PAISE_PER_RUPEE as u64;
        let paise = magnitude % PAISE_PER_RUPEE as u64;

        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            group_digits(&rupees.to_string(), grouping),
            paise
        )
    }
}

fn parse_text(raw: &str) -> Result<Money, AmountError> {
    if raw.contains('-') {
        return Err(AmountError::Negative(raw.to_string()));
    }

    let cleaned: String = strip_currency_markers(raw)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.matches('.').count() > 1 {
        return Err(AmountError::MultipleSeparators(raw.to_string()));
    }
    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return Err(AmountError::NoDigits(raw.to_string()));
    }

    let (whole, fraction) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
    let overflow = || AmountError::Overflow(raw.to_string());

    let mut rupees: i64 = 0;
    for digit in whole.bytes().map(|b| i64::from(b - b'0')) {
        rupees = rupees
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(overflow)?;
    }

    let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tens = fraction_digits.next().unwrap_or(0);
    let ones = fraction_digits.next().unwrap_or(0);
    // Round half-up on the first discarded digit
    let round_up = fraction_digits.next().is_some_and(|d| d >= 5);

    let paise = rupees
        .checked_mul(PAISE_PER_RUPEE)
        .and_then(|v| v.checked_add(tens * 10 + ones + i64::from(round_up)))
        .ok_or_else(overflow)?;

    if paise <= 0 {
        return Err(AmountError::NotPositive(Money(paise)));
    }

    Ok(Money(paise))
}

/// Removes every currency marker, ignoring ASCII case.
fn strip_currency_markers(raw: &str) -> String {
    let mut stripped = String::with_capacity(raw.len());
    let mut rest = raw;

    'scan: while let Some(c) = rest.chars().next() {
        for marker in CURRENCY_MARKERS {
            let matches = rest
                .get(..marker.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(marker));
            if matches {
                rest = &rest[marker.len()..];
                continue 'scan;
            }
        }
        stripped.push(c);
        rest = &rest[c.len_utf8()..];
    }

    stripped
}

fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    let (mut rest, last) = digits.split_at(digits.len().saturating_sub(3));
    let mut groups = vec![last];
    let size = grouping.group_size();

    while !rest.is_empty() {
        let (head, tail) = rest.split_at(rest.len().saturating_sub(size));
        groups.push(tail);
        rest = head;
    }

    groups.reverse();
    groups.join(",")
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders the amount with the rupee symbol and Indian grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(CURRENCY_SYMBOL, DigitGrouping::Indian))
    }
}

impl FromStr for Money {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_rupees_paise() {
        assert_eq!(Money::from_rupees_paise(10, 99).paise(), 1099);
        assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
        assert_eq!(Money::from_rupees(900).paise(), 90_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
        assert_eq!(Money::from_rupees(100_000).to_string(), "₹1,00,000.00");
    }

    #[test]
    fn test_format_grouping() {
        let m = Money::from_paise(123_456_789);
        assert_eq!(m.format(), "12,34,567.89");
        assert_eq!(m.format_grouped(DigitGrouping::Western), "1,234,567.89");
        assert_eq!(Money::from_paise(99_999).format(), "999.99");
        assert_eq!(Money::from_paise(100_000).format(), "1,000.00");
        assert_eq!(Money::from_paise(5).format(), "0.05");
    }

    #[test]
    fn test_format_extremes() {
        assert_eq!(
            Money::from_paise(i64::MIN).format_grouped(DigitGrouping::Western),
            "-92,233,720,368,547,758.08"
        );
    }

    #[test]
    fn test_parse_decorated_text() {
        assert_eq!(Money::parse("₹1,250.50").unwrap().paise(), 125_050);
        assert_eq!(Money::parse("Rs 300").unwrap().paise(), 30_000);
        assert_eq!(Money::parse("Rs. 300").unwrap().paise(), 30_000);
        assert_eq!(Money::parse("  42.5 ").unwrap().paise(), 4250);
        assert_eq!(Money::parse(".75").unwrap().paise(), 75);
        assert_eq!(Money::parse("100.").unwrap().paise(), 10_000);
    }

    #[test]
    fn test_parse_currency_markers() {
        assert_eq!(Money::parse("Rs.500").unwrap().paise(), 50_000);
        assert_eq!(Money::parse("Rs. 500").unwrap().paise(), 50_000);
        assert_eq!(Money::parse("rs.12.5").unwrap().paise(), 1250);
        assert_eq!(Money::parse("INR 1,000").unwrap().paise(), 100_000);
        assert_eq!(Money::parse("1. 5").unwrap().paise(), 150);
        assert!(matches!(Money::parse("Rs."), Err(AmountError::NoDigits(_))));
    }

    #[test]
    fn test_parse_rounds_half_up() {
        assert_eq!(Money::parse("10.005").unwrap().paise(), 1001);
        assert_eq!(Money::parse("10.0049").unwrap().paise(), 1000);
        assert_eq!(Money::parse("0.999").unwrap().paise(), 100);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(Money::parse(900.0).unwrap().paise(), 90_000);
        assert_eq!(Money::parse(0.1 + 0.2).unwrap().paise(), 30);
        assert_eq!(Money::parse(12.345).unwrap().paise(), 1235);
    }

    #[test]
    fn test_parse_rejections() {
        assert!(matches!(Money::parse("abc"), Err(AmountError::NoDigits(_))));
        assert!(matches!(Money::parse(""), Err(AmountError::NoDigits(_))));
        assert!(matches!(
            Money::parse("1.2.3"),
            Err(AmountError::MultipleSeparators(_))
        ));
        assert!(matches!(Money::parse("-50"), Err(AmountError::Negative(_))));
        assert!(matches!(Money::parse("0.00"), Err(AmountError::NotPositive(_))));
        assert!(matches!(Money::parse("0.004"), Err(AmountError::NotPositive(_))));
        assert!(matches!(
            Money::parse("99999999999999999999"),
            Err(AmountError::Overflow(_))
        ));
        assert!(matches!(Money::parse(f64::NAN), Err(AmountError::NotFinite(_))));
        assert!(matches!(Money::parse(f64::INFINITY), Err(AmountError::NotFinite(_))));
        assert!(matches!(Money::parse(-3.0), Err(AmountError::Negative(_))));
        assert!(matches!(Money::parse(0.0), Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_from_str() {
        let m: Money = "₹15.50".parse().unwrap();
        assert_eq!(m.paise(), 1550);
    }

    #[test]
    fn test_parse_format_round_trip() {
        for paise in [1, 5, 99, 100, 12_345, 10_000_000, 123_456_789_012] {
            let m = Money::from_paise(paise);
            assert_eq!(Money::parse(&m.format()).unwrap(), m);
            assert_eq!(Money::parse(&m.to_string()).unwrap(), m);
        }
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((-a).paise(), -1000);
        assert_eq!(a.checked_add(b), Some(Money::from_paise(1500)));
        assert_eq!(Money::from_paise(i64::MAX).checked_add(Money::from_paise(1)), None);
        assert_eq!(a.subtract(b), a - b);
        assert_eq!(a.negate(), -a);
        assert_eq!([a, b, b].iter().sum::<Money>().paise(), 2000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_paise(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().paise(), 100);
    }

    #[test]
    fn test_divide_evenly_exact() {
        let shares = Money::from_rupees(900).divide_evenly(3).unwrap();
        assert_eq!(shares, vec![Money::from_rupees(300); 3]);
    }

    #[test]
    fn test_divide_evenly_remainder_goes_first() {
        let shares = Money::from_rupees(100).divide_evenly(3).unwrap();
        let paise: Vec<i64> = shares.iter().map(Money::paise).collect();
        assert_eq!(paise, vec![3334, 3333, 3333]);

        let shares = Money::from_paise(10).divide_evenly(4).unwrap();
        let paise: Vec<i64> = shares.iter().map(Money::paise).collect();
        assert_eq!(paise, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_divide_evenly_negative_is_lossless() {
        let amount = Money::from_paise(-10);
        let shares = amount.divide_evenly(3).unwrap();
        assert_eq!(shares.iter().sum::<Money>(), amount);
    }

    #[test]
    fn test_divide_by_zero_participants() {
        assert!(Money::from_paise(100).divide_evenly(0).is_none());
    }

    #[test]
    fn test_digit_grouping_from_str() {
        assert_eq!("indian".parse::<DigitGrouping>(), Ok(DigitGrouping::Indian));
        assert_eq!("Western".parse::<DigitGrouping>(), Ok(DigitGrouping::Western));
        assert!("roman".parse::<DigitGrouping>().is_err());
    }
}
