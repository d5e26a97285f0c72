//! Tenor ladder construction and switch-strike normalization.
//!
//! The ladder is the row axis of every stripped grid: one row per
//! optionlet fixing, derived purely from the index period and the
//! longest quoted surface tenor. Optionlet tenors advance one index
//! period at a time; the cap/floor quoted against row `i` spans one
//! period more than the row's optionlet tenor, so the shortest
//! instrument (`2 × index period`) contains exactly one optionlet and
//! each subsequent instrument adds exactly one.

use num_traits::Float;

use stripper_core::types::time::Tenor;

use crate::error::ConfigurationError;

/// Row axis of the bootstrap: paired optionlet tenors and cumulative
/// cap/floor lengths.
///
/// Row `i` holds the optionlet fixing `(i + 1)` index periods from the
/// reference date and the cap/floor of length `(i + 2)` periods whose
/// final optionlet it is.
///
/// # Examples
///
/// ```
/// use stripper_core::types::time::Tenor;
/// use stripper_engine::TenorLadder;
///
/// let ladder = TenorLadder::build(Tenor::months(3), Tenor::years(2)).unwrap();
/// assert_eq!(ladder.len(), 7);
/// assert_eq!(ladder.capfloor_lengths()[0], Tenor::months(6));
/// assert_eq!(ladder.capfloor_lengths()[6], Tenor::years(2));
/// assert_eq!(ladder.optionlet_tenors()[6], Tenor::months(21));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenorLadder {
    index_tenor: Tenor,
    optionlet_tenors: Vec<Tenor>,
    capfloor_lengths: Vec<Tenor>,
}

impl TenorLadder {
    /// Builds the ladder for an index period and the longest quoted
    /// surface tenor.
    ///
    /// Rows are appended while the next cumulative length still fits
    /// inside the quoted range; a surface shorter than two index periods
    /// cannot hold even the first instrument and fails with
    /// [`ConfigurationError::SurfaceTooShort`].
    pub fn build(
        index_tenor: Tenor,
        max_surface_tenor: Tenor,
    ) -> Result<Self, ConfigurationError> {
        let required = index_tenor + index_tenor;
        if max_surface_tenor < required {
            return Err(ConfigurationError::SurfaceTooShort {
                required,
                max_tenor: max_surface_tenor,
            });
        }

        let rows = max_surface_tenor.div(index_tenor) - 1;
        let period = index_tenor.as_months();
        let mut optionlet_tenors = Vec::with_capacity(rows as usize);
        let mut capfloor_lengths = Vec::with_capacity(rows as usize);
        for k in 1..=rows {
            optionlet_tenors.push(Tenor::months(k * period));
            capfloor_lengths.push(Tenor::months((k + 1) * period));
        }

        Ok(Self {
            index_tenor,
            optionlet_tenors,
            capfloor_lengths,
        })
    }

    /// The index compounding period the ladder was built from.
    pub fn index_tenor(&self) -> Tenor {
        self.index_tenor
    }

    /// Optionlet fixing tenors, one per row, advancing by one index
    /// period.
    pub fn optionlet_tenors(&self) -> &[Tenor] {
        &self.optionlet_tenors
    }

    /// Cumulative cap/floor lengths, one per row; row `i`'s instrument
    /// ends one index period past its optionlet tenor.
    pub fn capfloor_lengths(&self) -> &[Tenor] {
        &self.capfloor_lengths
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.optionlet_tenors.len()
    }

    /// Always `false`: construction guarantees at least one row.
    pub fn is_empty(&self) -> bool {
        self.optionlet_tenors.is_empty()
    }
}

/// Normalizes a user-supplied switch-strike vector to one entry per
/// ladder row.
///
/// Empty input broadcasts `default`, a singleton broadcasts its value,
/// a vector of exactly `rows` entries passes through, and anything else
/// is a [`ConfigurationError::SwitchStrikeCount`].
pub fn normalize_switch_strikes<T: Float>(
    input: &[T],
    rows: usize,
    default: T,
) -> Result<Vec<T>, ConfigurationError> {
    match input.len() {
        0 => Ok(vec![default; rows]),
        1 => Ok(vec![input[0]; rows]),
        got if got == rows => Ok(input.to_vec()),
        got => Err(ConfigurationError::SwitchStrikeCount {
            got,
            expected: rows,
        }),
    }
}
