//! Dues schedule entity - The per-unit monthly rate for each month of a year.
//!
//! One row per year (UNIQUE). `total` caches the sum of the twelve monthly rates
//! and is recomputed on every write.

use super::month::Month;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Annual dues schedule database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dues_schedules")]
pub struct Model {
    /// Unique identifier for the schedule
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Calendar year this schedule applies to
    #[sea_orm(unique)]
    pub year: i32,
    /// Per-unit rate for January
    pub january: i64,
    /// Per-unit rate for February
    pub february: i64,
    /// Per-unit rate for March
    pub march: i64,
    /// Per-unit rate for April
    pub april: i64,
    /// Per-unit rate for May
    pub may: i64,
    /// Per-unit rate for June
    pub june: i64,
    /// Per-unit rate for July
    pub july: i64,
    /// Per-unit rate for August
    pub august: i64,
    /// Per-unit rate for September
    pub september: i64,
    /// Per-unit rate for October
    pub october: i64,
    /// Per-unit rate for November
    pub november: i64,
    /// Per-unit rate for December
    pub december: i64,
    /// Sum of all monthly rates
    pub total: i64,
}

impl Model {
    /// Per-unit rate for `month`.
    #[must_use]
    pub const fn rate_for(&self, month: Month) -> i64 {
        match month {
            Month::January => self.january,
            Month::February => self.february,
            Month::March => self.march,
            Month::April => self.april,
            Month::May => self.may,
            Month::June => self.june,
            Month::July => self.july,
            Month::August => self.august,
            Month::September => self.september,
            Month::October => self.october,
            Month::November => self.november,
            Month::December => self.december,
        }
    }

    /// The twelve rates in calendar order.
    #[must_use]
    pub fn rates(&self) -> [i64; 12] {
        Month::ALL.map(|m| self.rate_for(m))
    }
}

/// `DuesSchedule` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
