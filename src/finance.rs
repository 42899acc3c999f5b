use crate::model::{Transaction, TransactionKind, TransactionStatus, TypeFilter};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// Saturates at the edge of the `Decimal` range instead of panicking. Lists
/// that reach the edge are rejected before they get here (see
/// `dataset::validate_transactions`).
fn sum_where<F>(transactions: &[Transaction], pred: F) -> Decimal
where
    F: Fn(&Transaction) -> bool,
{
    transactions
        .iter()
        .filter(|t| pred(t))
        .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
}

fn count_where<F>(transactions: &[Transaction], pred: F) -> usize
where
    F: Fn(&Transaction) -> bool,
{
    transactions.iter().filter(|t| pred(t)).count()
}

pub fn total_income(transactions: &[Transaction]) -> Decimal {
    sum_where(transactions, |t| {
        t.is(TransactionKind::Fee, TransactionStatus::Paid)
    })
}

pub fn total_expenses(transactions: &[Transaction]) -> Decimal {
    sum_where(transactions, |t| {
        t.status == TransactionStatus::Paid
            && matches!(t.kind, TransactionKind::Salary | TransactionKind::Expense)
    })
}

pub fn pending_income(transactions: &[Transaction]) -> Decimal {
    sum_where(transactions, |t| {
        t.is(TransactionKind::Fee, TransactionStatus::Pending)
    })
}

/// Paid income minus paid outgoings. Negative when the school spent more than
/// it collected.
pub fn net_balance(transactions: &[Transaction]) -> Decimal {
    total_income(transactions).saturating_sub(total_expenses(transactions))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCounts {
    pub paid_fees: usize,
    pub paid_salaries: usize,
    pub paid_expenses: usize,
    pub pending_fees: usize,
}

/// Four independent scans. The buckets do not partition the list: cancelled
/// rows and pending salaries/expenses land in none of them.
pub fn counts_by_type_and_status(transactions: &[Transaction]) -> TransactionCounts {
    TransactionCounts {
        paid_fees: count_where(transactions, |t| {
            t.is(TransactionKind::Fee, TransactionStatus::Paid)
        }),
        paid_salaries: count_where(transactions, |t| {
            t.is(TransactionKind::Salary, TransactionStatus::Paid)
        }),
        paid_expenses: count_where(transactions, |t| {
            t.is(TransactionKind::Expense, TransactionStatus::Paid)
        }),
        pending_fees: count_where(transactions, |t| {
            t.is(TransactionKind::Fee, TransactionStatus::Pending)
        }),
    }
}

pub fn month_start(now: NaiveDate) -> NaiveDate {
    now.with_day(1).unwrap_or(now)
}

/// Transactions dated on or after the first day of `now`'s month. Later
/// dates are kept as well (post-dated rows show up in "this month").
pub fn current_month_transactions(
    transactions: &[Transaction],
    now: NaiveDate,
) -> Vec<&Transaction> {
    let start = month_start(now);
    transactions.iter().filter(|t| t.date >= start).collect()
}

pub fn filter_payments<'a>(
    transactions: &'a [Transaction],
    type_filter: TypeFilter,
    search_term: &str,
) -> Vec<&'a Transaction> {
    let needle = search_term.to_lowercase();
    transactions
        .iter()
        .filter(|t| type_filter.matches(t.kind))
        .filter(|t| needle.is_empty() || t.description.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthFigures {
    pub month_start: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
    pub pending_income: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub pending_income: Decimal,
    pub net_balance: Decimal,
    pub counts: TransactionCounts,
    pub current_month: MonthFigures,
}

pub fn finance_summary(transactions: &[Transaction], now: NaiveDate) -> FinanceSummary {
    let month: Vec<Transaction> = current_month_transactions(transactions, now)
        .into_iter()
        .cloned()
        .collect();
    FinanceSummary {
        total_income: total_income(transactions),
        total_expenses: total_expenses(transactions),
        pending_income: pending_income(transactions),
        net_balance: net_balance(transactions),
        counts: counts_by_type_and_status(transactions),
        current_month: MonthFigures {
            month_start: month_start(now),
            income: total_income(&month),
            expenses: total_expenses(&month),
            pending_income: pending_income(&month),
            transaction_count: month.len(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerBalance {
    pub payer_id: Option<String>,
    pub pending: Decimal,
    pub count: usize,
}

/// Outstanding fees per payer, in order of first appearance. Fees recorded
/// without a payer are grouped together under `payer_id: None`.
pub fn pending_fees_by_payer(transactions: &[Transaction]) -> Vec<PayerBalance> {
    let mut out: Vec<PayerBalance> = Vec::new();
    for t in transactions {
        if !t.is(TransactionKind::Fee, TransactionStatus::Pending) {
            continue;
        }
        match out.iter_mut().find(|b| b.payer_id == t.payer_id) {
            Some(b) => {
                b.pending = b.pending.saturating_add(t.amount);
                b.count += 1;
            }
            None => out.push(PayerBalance {
                payer_id: t.payer_id.clone(),
                pending: t.amount,
                count: 1,
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn tx(
        id: &str,
        kind: TransactionKind,
        amount: &str,
        date: &str,
        status: TransactionStatus,
        description: &str,
    ) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind,
            amount: Decimal::from_str(amount).expect("amount"),
            date: NaiveDate::from_str(date).expect("date"),
            description: description.to_string(),
            status,
            payer_id: None,
            payee_id: None,
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("decimal")
    }

    fn sample() -> Vec<Transaction> {
        use TransactionKind::*;
        use TransactionStatus::*;
        vec![
            tx("1", Fee, "100", "2024-03-02", Paid, "Piano lessons term 1"),
            tx("2", Fee, "50", "2024-02-20", Pending, "Lab fee"),
            tx("3", Salary, "200", "2024-03-01", Paid, "March salary"),
            tx("4", Expense, "30", "2024-02-10", Paid, "PIANO tuning"),
            tx("5", Fee, "75", "2024-03-05", Cancelled, "Trip deposit"),
            tx("6", Expense, "12", "2024-03-09", Pending, "Chalk"),
        ]
    }

    #[test]
    fn totals_follow_kind_and_status() {
        use TransactionKind::*;
        use TransactionStatus::*;
        let txs = vec![
            tx("a", Fee, "100", "2024-03-01", Paid, ""),
            tx("b", Fee, "50", "2024-03-01", Pending, ""),
            tx("c", Salary, "200", "2024-03-01", Paid, ""),
        ];
        assert_eq!(total_income(&txs), dec("100"));
        assert_eq!(pending_income(&txs), dec("50"));
        assert_eq!(total_expenses(&txs), dec("200"));
        assert_eq!(net_balance(&txs), dec("-100"));
    }

    #[test]
    fn sums_are_exact_over_many_small_amounts() {
        let txs: Vec<Transaction> = (0..1000)
            .map(|i| {
                tx(
                    &i.to_string(),
                    TransactionKind::Fee,
                    "0.10",
                    "2024-01-01",
                    TransactionStatus::Paid,
                    "",
                )
            })
            .collect();
        assert_eq!(total_income(&txs), dec("100.00"));
    }

    #[test]
    fn sums_at_the_decimal_limit_do_not_panic() {
        let max = "79228162514264337593543950335";
        let txs = vec![
            tx("x", TransactionKind::Fee, max, "2024-03-01", TransactionStatus::Pending, ""),
            tx("y", TransactionKind::Fee, max, "2024-03-01", TransactionStatus::Pending, ""),
        ];
        assert_eq!(pending_income(&txs), Decimal::MAX);
        assert_eq!(pending_fees_by_payer(&txs)[0].pending, Decimal::MAX);
        assert_eq!(net_balance(&txs), Decimal::ZERO);
    }

    #[test]
    fn counts_are_independent_scans() {
        let counts = counts_by_type_and_status(&sample());
        assert_eq!(
            counts,
            TransactionCounts {
                paid_fees: 1,
                paid_salaries: 1,
                paid_expenses: 1,
                pending_fees: 1,
            }
        );
    }

    #[test]
    fn current_month_starts_on_the_first() {
        let txs = sample();
        let now = NaiveDate::from_ymd_opt(2024, 3, 15).expect("date");
        let ids: Vec<&str> = current_month_transactions(&txs, now)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3", "5", "6"]);
    }

    #[test]
    fn filter_by_type_ignores_description() {
        let txs = sample();
        let fees = filter_payments(&txs, TypeFilter::Kind(TransactionKind::Fee), "");
        assert_eq!(fees.len(), 3);
        assert!(fees.iter().all(|t| t.kind == TransactionKind::Fee));
    }

    #[test]
    fn filter_by_search_is_case_insensitive_across_kinds() {
        let txs = sample();
        let ids: Vec<&str> = filter_payments(&txs, TypeFilter::All, "piano")
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "4"]);
        let both = filter_payments(&txs, TypeFilter::Kind(TransactionKind::Expense), "Piano");
        assert_eq!(both.len(), 1);
        assert!(filter_payments(&txs, TypeFilter::Unknown, "").is_empty());
        assert!(filter_payments(&txs, TypeFilter::All, "violin").is_empty());
    }

    #[test]
    fn empty_list_yields_zeroes() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 15).expect("date");
        assert_eq!(total_income(&[]), Decimal::ZERO);
        assert_eq!(total_expenses(&[]), Decimal::ZERO);
        assert_eq!(pending_income(&[]), Decimal::ZERO);
        assert_eq!(counts_by_type_and_status(&[]), TransactionCounts::default());
        assert!(current_month_transactions(&[], now).is_empty());
        assert!(filter_payments(&[], TypeFilter::All, "").is_empty());
        assert!(pending_fees_by_payer(&[]).is_empty());
        assert_eq!(finance_summary(&[], now).current_month.transaction_count, 0);
    }

    #[test]
    fn summary_splits_current_month() {
        let txs = sample();
        let now = NaiveDate::from_ymd_opt(2024, 3, 15).expect("date");
        let s = finance_summary(&txs, now);
        assert_eq!(s.total_income, dec("100"));
        assert_eq!(s.total_expenses, dec("230"));
        assert_eq!(s.pending_income, dec("50"));
        assert_eq!(s.net_balance, dec("-130"));
        assert_eq!(s.current_month.month_start, NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"));
        assert_eq!(s.current_month.income, dec("100"));
        assert_eq!(s.current_month.expenses, dec("200"));
        assert_eq!(s.current_month.pending_income, Decimal::ZERO);
        assert_eq!(s.current_month.transaction_count, 4);
    }

    #[test]
    fn pending_fees_group_by_payer_including_missing() {
        use TransactionKind::*;
        use TransactionStatus::*;
        let mut txs = vec![
            tx("1", Fee, "40", "2024-03-01", Pending, ""),
            tx("2", Fee, "10", "2024-03-01", Pending, ""),
            tx("3", Fee, "5", "2024-03-01", Pending, ""),
            tx("4", Fee, "99", "2024-03-01", Paid, ""),
        ];
        txs[0].payer_id = Some("S2".to_string());
        txs[1].payer_id = Some("S2".to_string());
        txs[3].payer_id = Some("S1".to_string());
        let out = pending_fees_by_payer(&txs);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].payer_id.as_deref(), Some("S2"));
        assert_eq!(out[0].pending, dec("50"));
        assert_eq!(out[0].count, 2);
        assert_eq!(out[1].payer_id, None);
        assert_eq!(out[1].pending, dec("5"));
    }

    #[test]
    fn operations_do_not_mutate_and_are_repeatable() {
        let txs = sample();
        let before = txs.clone();
        let now = NaiveDate::from_ymd_opt(2024, 3, 15).expect("date");
        assert_eq!(finance_summary(&txs, now), finance_summary(&txs, now));
        assert_eq!(
            filter_payments(&txs, TypeFilter::All, "fee"),
            filter_payments(&txs, TypeFilter::All, "fee")
        );
        assert_eq!(pending_fees_by_payer(&txs), pending_fees_by_payer(&txs));
        assert_eq!(txs, before);
    }
}
