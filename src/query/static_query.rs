//! Fixed upstream query for the food facility dataset.
//!
//! The inbound request's parameters are ignored; only the current date moves
//! the approval cutoff.

use chrono::{Days, NaiveDate};

use crate::config::FoodFacilityConfig;
use crate::query::builder::{QueryParams, LIMIT_PARAM};

/// Builds the `$where`/`$order`/`$limit` query for recently approved permits.
#[derive(Debug, Clone)]
pub struct FoodFacilityQuery {
    window_days: u32,
    limit: u64,
}

impl FoodFacilityQuery {
    pub fn new(config: &FoodFacilityConfig) -> Self {
        Self {
            window_days: config.window_days,
            limit: config.limit,
        }
    }

    /// First day whose approvals are still requested.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.window_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn params(&self, today: NaiveDate) -> QueryParams {
        let filter = format!(
            "approved >= '{}T00:00:00' AND fooditems IS NOT NULL AND latitude IS NOT NULL AND longitude IS NOT NULL",
            self.cutoff(today).format("%Y-%m-%d")
        );

        let mut params = QueryParams::new();
        params.insert("$where", filter);
        params.insert("$order", "approved DESC");
        params.insert(LIMIT_PARAM, self.limit.to_string());
        params
    }
}
