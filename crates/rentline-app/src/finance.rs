//! Financial summary: date-range bucketing of income and expenses.
//!
//! Income is derived from properties — each contributes its monthly rent
//! from its creation month on.  Expenses are maintenance records, counted
//! at their creation date.  Taxes are estimated as a flat 10% of income.
//! All three metrics are bucketed over this month, last month, and year
//! to date.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rentline_shared::PartyId;
use rentline_store::{Database, MaintenanceRecord, Property, StoreError};

/// Flat tax estimate applied to income.
const TAX_RATE: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    ThisMonth,
    LastMonth,
    YearToDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Income,
    Expenses,
    Taxes,
}

/// One metric's value across the three timeframes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Buckets {
    pub this_month: f64,
    pub last_month: f64,
    pub year_to_date: f64,
}

impl Buckets {
    fn get(&self, timeframe: Timeframe) -> f64 {
        match timeframe {
            Timeframe::ThisMonth => self.this_month,
            Timeframe::LastMonth => self.last_month,
            Timeframe::YearToDate => self.year_to_date,
        }
    }

    fn scale(&self, factor: f64) -> Self {
        Self {
            this_month: self.this_month * factor,
            last_month: self.last_month * factor,
            year_to_date: self.year_to_date * factor,
        }
    }
}

/// The computed dashboard numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialSummary {
    pub income: Buckets,
    pub expenses: Buckets,
    pub taxes: Buckets,
}

impl FinancialSummary {
    /// Compute the summary from in-memory rows, relative to `now`.
    pub fn compute(
        properties: &[Property],
        maintenance: &[MaintenanceRecord],
        now: DateTime<Utc>,
    ) -> Self {
        let this_month_start = month_start(now.year(), now.month());
        let (last_year, last_month) = prev_month(now.year(), now.month());
        let last_month_start = month_start(last_year, last_month);
        let (next_year, next_month) = next_month_of(now.year(), now.month());
        let next_month_start = month_start(next_year, next_month);
        let year_start = month_start(now.year(), 1);

        // A property earns its rent in a month when it existed before that
        // month ended.
        let monthly_income = |month_end_exclusive: DateTime<Utc>| -> f64 {
            properties
                .iter()
                .filter(|p| p.created_at < month_end_exclusive)
                .map(|p| p.rent)
                .sum()
        };

        // Year to date: one month of rent per month the property was
        // active this year, including the current partial month.
        let income_ytd: f64 = properties
            .iter()
            .filter(|p| p.created_at <= now)
            .map(|p| {
                let active_from = p.created_at.max(year_start);
                let months_active = (months_between(active_from, now) + 1).max(0);
                months_active as f64 * p.rent
            })
            .sum();

        let income = Buckets {
            this_month: monthly_income(next_month_start),
            last_month: monthly_income(this_month_start),
            year_to_date: income_ytd,
        };

        let expenses = Buckets {
            this_month: expenses_between(maintenance, this_month_start, now),
            last_month: expenses_between(maintenance, last_month_start, this_month_start),
            year_to_date: expenses_between(maintenance, year_start, now),
        };

        Self {
            income,
            expenses,
            taxes: income.scale(TAX_RATE),
        }
    }

    /// Compute the summary for a landlord straight from the store.
    pub fn for_landlord(
        db: &Database,
        landlord_id: PartyId,
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        let properties = db.list_properties(landlord_id)?;
        let maintenance = db.list_maintenance()?;
        Ok(Self::compute(&properties, &maintenance, now))
    }

    /// The figure shown for one metric/timeframe toggle combination.
    pub fn value(&self, metric: Metric, timeframe: Timeframe) -> f64 {
        match metric {
            Metric::Income => self.income.get(timeframe),
            Metric::Expenses => self.expenses.get(timeframe),
            Metric::Taxes => self.taxes.get(timeframe),
        }
    }

    pub fn gross_revenue(&self) -> f64 {
        self.income.year_to_date
    }

    pub fn expense_cost(&self) -> f64 {
        self.expenses.year_to_date
    }

    pub fn net_revenue(&self) -> f64 {
        self.income.year_to_date - self.expenses.year_to_date - self.taxes.year_to_date
    }
}

/// Sum of maintenance costs with `start <= created_at < end`.  Half-open
/// ranges keep month boundaries exact: an expense late on a month's final
/// day still lands in that month.
fn expenses_between(records: &[MaintenanceRecord], start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    records
        .iter()
        .filter(|r| r.created_at >= start && r.created_at < end)
        .map(|r| r.cost)
        .sum()
}

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    // month is always 1..=12 here.
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("first of month is a valid UTC timestamp")
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn next_month_of(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Whole calendar months from `from` to `to` (day-of-month ignored).
fn months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to.year() as i64 * 12 + to.month() as i64) - (from.year() as i64 * 12 + from.month() as i64)
}
