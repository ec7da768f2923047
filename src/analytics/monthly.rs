use serde::Serialize;
use time::Month;

use crate::{
    analytics::{expenses, round2},
    transaction::Transaction,
};

/// The expense total for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    /// The three-letter month name, e.g. "Jan".
    pub month: &'static str,
    /// The sum of expenses in the month, rounded to cents.
    pub amount: f64,
}

/// Expense totals for each month of a year, January first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    /// The calendar year of the series.
    pub year: i32,
    /// Exactly twelve buckets.
    pub months: Vec<MonthlyBucket>,
    /// The sum of the rounded bucket amounts.
    pub total: f64,
}

/// Sum the expenses dated in `year` into one bucket per month.
pub fn monthly_series(transactions: &[Transaction], year: i32) -> MonthlySeries {
    let mut sums = [0.0; 12];

    for transaction in expenses(transactions).filter(|transaction| transaction.date.year() == year)
    {
        sums[transaction.date.month() as usize - 1] += transaction.amount;
    }

    let months: Vec<MonthlyBucket> = sums
        .iter()
        .enumerate()
        .map(|(index, amount)| MonthlyBucket {
            month: month_abbreviation(index),
            amount: round2(*amount),
        })
        .collect();
    let total = months.iter().map(|bucket| bucket.amount).sum();

    MonthlySeries {
        year,
        months,
        total,
    }
}

fn month_abbreviation(index: usize) -> &'static str {
    let month = Month::January.nth_next(index as u8);

    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        analytics::test_fixtures::{expense, income},
        category::Category,
    };

    use super::monthly_series;

    #[test]
    fn has_twelve_labelled_buckets() {
        let series = monthly_series(&[], 2024);

        let labels: Vec<_> = series.months.iter().map(|bucket| bucket.month).collect();
        assert_eq!(
            labels,
            [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"
            ]
        );
        assert!(series.months.iter().all(|bucket| bucket.amount == 0.0));
        assert_eq!(series.total, 0.0);
    }

    #[test]
    fn sums_expenses_for_the_year_only() {
        let transactions = [
            expense(10.0, date!(2024 - 01 - 15), Category::FoodAndDining),
            expense(5.25, date!(2024 - 01 - 31), Category::Transportation),
            expense(99.0, date!(2024 - 12 - 01), Category::Travel),
            expense(1000.0, date!(2023 - 12 - 31), Category::Travel),
            income(5000.0, date!(2024 - 01 - 01)),
        ];

        let series = monthly_series(&transactions, 2024);

        assert_eq!(series.months[0].amount, 15.25);
        assert_eq!(series.months[11].amount, 99.0);
        assert_eq!(series.months[5].amount, 0.0);
        assert_eq!(series.total, 114.25);
    }

    #[test]
    fn total_is_sum_of_rounded_buckets() {
        let transactions = [
            expense(0.005, date!(2024 - 02 - 01), Category::Other),
            expense(0.005, date!(2024 - 03 - 01), Category::Other),
        ];

        let series = monthly_series(&transactions, 2024);

        let bucket_sum: f64 = series.months.iter().map(|bucket| bucket.amount).sum();
        assert_eq!(series.total, bucket_sum);
    }
}
