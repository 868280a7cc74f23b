//! Calendar months as stored on dues payments.
//!
//! A month is the only piece of user input that selects a *column* rather than a
//! value: each month owns one rate column in the `dues_schedules` table. The
//! mapping lives in [`Month::schedule_column`], a closed match over the twelve
//! variants, so no query is ever assembled from a month name.

use super::dues_schedule;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Month of the year, stored by name
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Month {
    /// January
    #[sea_orm(string_value = "january")]
    January,
    /// February
    #[sea_orm(string_value = "february")]
    February,
    /// March
    #[sea_orm(string_value = "march")]
    March,
    /// April
    #[sea_orm(string_value = "april")]
    April,
    /// May
    #[sea_orm(string_value = "may")]
    May,
    /// June
    #[sea_orm(string_value = "june")]
    June,
    /// July
    #[sea_orm(string_value = "july")]
    July,
    /// August
    #[sea_orm(string_value = "august")]
    August,
    /// September
    #[sea_orm(string_value = "september")]
    September,
    /// October
    #[sea_orm(string_value = "october")]
    October,
    /// November
    #[sea_orm(string_value = "november")]
    November,
    /// December
    #[sea_orm(string_value = "december")]
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Maps a 1-based month number to a month. Anything outside 1..=12 is `None`.
    #[must_use]
    pub fn from_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    /// 1-based month number.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::January => 1,
            Self::February => 2,
            Self::March => 3,
            Self::April => 4,
            Self::May => 5,
            Self::June => 6,
            Self::July => 7,
            Self::August => 8,
            Self::September => 9,
            Self::October => 10,
            Self::November => 11,
            Self::December => 12,
        }
    }

    /// Zero-based position, for indexing a twelve element rate array.
    #[must_use]
    pub const fn index(self) -> usize {
        self.number() as usize - 1
    }

    /// The `dues_schedules` column holding this month's per-unit rate.
    #[must_use]
    pub const fn schedule_column(self) -> dues_schedule::Column {
        match self {
            Self::January => dues_schedule::Column::January,
            Self::February => dues_schedule::Column::February,
            Self::March => dues_schedule::Column::March,
            Self::April => dues_schedule::Column::April,
            Self::May => dues_schedule::Column::May,
            Self::June => dues_schedule::Column::June,
            Self::July => dues_schedule::Column::July,
            Self::August => dues_schedule::Column::August,
            Self::September => dues_schedule::Column::September,
            Self::October => dues_schedule::Column::October,
            Self::November => dues_schedule::Column::November,
            Self::December => dues_schedule::Column::December,
        }
    }
}
