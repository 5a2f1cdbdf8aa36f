//! Works out who needs to pay whom so that everyone's net balance ends up at zero.
//!
//! The settlement is computed in two steps:
//! - [net_balances] turns what each participant paid and should pay into a
//!   net balance (`paid - should_pay`),
//! - [compute_settlement] pairs off debtors with creditors using a greedy
//!   two-pointer walk over both lists in registration order.
//!
//! The greedy walk does not try to minimise the number of payments, but it
//! never emits more than `debtors + creditors - 1` of them.

use super::session::Participant;

/// Balances and remaining amounts within this many dollars of zero are treated as settled.
pub const TOLERANCE: f64 = 0.01;

/// How much a participant is up or down after paying for and sharing a bill.
#[derive(Debug, Clone, PartialEq)]
pub struct NetBalance {
    /// The participant's display name.
    pub name: String,
    /// The amount paid minus the amount owed. Positive means the participant
    /// is owed money, negative means they owe money.
    pub balance: f64,
}

/// A single transfer of money from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    /// The name of the participant sending the money.
    pub from: String,
    /// The name of the participant receiving the money.
    pub to: String,
    /// The amount of money to transfer, always greater than zero.
    pub amount: f64,
}

/// A participant who either needs to pay or should receive money.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementParty {
    /// The participant's display name.
    pub name: String,
    /// The absolute amount the participant needs to pay or should receive.
    pub amount: f64,
}

/// The full result of settling a bill.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// The participants who paid more than their share.
    pub creditors: Vec<SettlementParty>,
    /// The participants who paid less than their share.
    pub debtors: Vec<SettlementParty>,
    /// The payments that bring every balance back to zero.
    pub payments: Vec<Payment>,
}

impl Settlement {
    /// Settle the bill between `participants` based on their paid and should
    /// pay amounts.
    pub fn new(participants: &[Participant]) -> Self {
        let balances = net_balances(participants);

        let creditors = balances
            .iter()
            .filter(|net| net.balance > TOLERANCE)
            .map(|net| SettlementParty {
                name: net.name.clone(),
                amount: net.balance,
            })
            .collect();

        let debtors = balances
            .iter()
            .filter(|net| net.balance < -TOLERANCE)
            .map(|net| SettlementParty {
                name: net.name.clone(),
                amount: -net.balance,
            })
            .collect();

        Self {
            creditors,
            debtors,
            payments: compute_settlement(&balances),
        }
    }

    /// Whether nobody is owed money and nobody owes money.
    pub fn is_settled(&self) -> bool {
        self.creditors.is_empty() && self.debtors.is_empty()
    }
}

/// Get the net balance (`paid - should_pay`) for each participant in registration order.
pub fn net_balances(participants: &[Participant]) -> Vec<NetBalance> {
    participants
        .iter()
        .map(|participant| NetBalance {
            name: participant.name.clone(),
            balance: participant.paid - participant.should_pay,
        })
        .collect()
}

struct Outstanding<'a> {
    name: &'a str,
    remaining: f64,
}

/// Compute the payments that bring every balance in `balances` to zero.
///
/// Balances within [TOLERANCE] of zero are ignored. Debtors and creditors are
/// matched in the order they appear in `balances`; each step transfers the
/// smaller of the front debtor's and front creditor's remaining amount.
pub fn compute_settlement(balances: &[NetBalance]) -> Vec<Payment> {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for net in balances {
        if net.balance < -TOLERANCE {
            debtors.push(Outstanding {
                name: &net.name,
                remaining: -net.balance,
            });
        } else if net.balance > TOLERANCE {
            creditors.push(Outstanding {
                name: &net.name,
                remaining: net.balance,
            });
        }
    }

    let mut payments = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
    let mut debtor_index = 0;
    let mut creditor_index = 0;

    while debtor_index < debtors.len() && creditor_index < creditors.len() {
        let debtor = &debtors[debtor_index];
        let creditor = &creditors[creditor_index];
        let amount = debtor.remaining.min(creditor.remaining);

        payments.push(Payment {
            from: debtor.name.to_owned(),
            to: creditor.name.to_owned(),
            amount,
        });

        debtors[debtor_index].remaining -= amount;
        creditors[creditor_index].remaining -= amount;

        if debtors[debtor_index].remaining < TOLERANCE {
            debtor_index += 1;
        }

        if creditors[creditor_index].remaining < TOLERANCE {
            creditor_index += 1;
        }
    }

    payments
}

#[cfg(test)]
mod tests {
    use crate::split::session::{Participant, ParticipantId};

    use super::{NetBalance, Payment, Settlement, TOLERANCE, compute_settlement, net_balances};

    fn balance(name: &str, balance: f64) -> NetBalance {
        NetBalance {
            name: name.to_owned(),
            balance,
        }
    }

    fn participant(id: u64, name: &str, paid: f64, should_pay: f64) -> Participant {
        Participant {
            id: ParticipantId::new(id),
            name: name.to_owned(),
            paid,
            should_pay,
        }
    }

    #[track_caller]
    fn assert_payment(payment: &Payment, from: &str, to: &str, amount: f64) {
        assert_eq!(payment.from, from);
        assert_eq!(payment.to, to);
        assert!(
            (payment.amount - amount).abs() < TOLERANCE,
            "want payment of {amount} from {from} to {to}, got {}",
            payment.amount
        );
    }

    #[test]
    fn one_debtor_pays_two_creditors() {
        let balances = [
            balance("Alice", 10.0),
            balance("Bob", -20.0),
            balance("Carol", 10.0),
        ];

        let payments = compute_settlement(&balances);

        assert_eq!(payments.len(), 2);
        assert_payment(&payments[0], "Bob", "Alice", 10.0);
        assert_payment(&payments[1], "Bob", "Carol", 10.0);
    }

    #[test]
    fn bill_split_three_ways_with_two_payers() {
        let share = 50.0 / 3.0;
        let participants = [
            participant(1, "Alice", 30.0, share),
            participant(2, "Bob", 0.0, share),
            participant(3, "Carol", 20.0, share),
        ];

        let settlement = Settlement::new(&participants);

        assert_eq!(settlement.payments.len(), 2);
        assert_payment(&settlement.payments[0], "Bob", "Alice", 13.33);
        assert_payment(&settlement.payments[1], "Bob", "Carol", 3.33);
        assert_eq!(settlement.creditors.len(), 2);
        assert_eq!(settlement.debtors.len(), 1);
        assert!((settlement.debtors[0].amount - 16.67).abs() < TOLERANCE);
    }

    #[test]
    fn debtors_and_creditors_are_matched_in_registration_order() {
        let balances = [
            balance("A", -5.0),
            balance("B", 15.0),
            balance("C", -10.0),
        ];

        let payments = compute_settlement(&balances);

        assert_eq!(payments.len(), 2);
        assert_payment(&payments[0], "A", "B", 5.0);
        assert_payment(&payments[1], "C", "B", 10.0);
    }

    #[test]
    fn balances_within_tolerance_need_no_payments() {
        let balances = [
            balance("A", 0.004),
            balance("B", -0.009),
            balance("C", 0.0),
        ];

        assert!(compute_settlement(&balances).is_empty());
        assert!(compute_settlement(&[]).is_empty());
    }

    #[test]
    fn everyone_paid_their_share() {
        let participants = [
            participant(1, "A", 25.0, 25.0),
            participant(2, "B", 25.0, 25.0),
        ];

        let settlement = Settlement::new(&participants);

        assert!(settlement.is_settled());
        assert!(settlement.creditors.is_empty());
        assert!(settlement.debtors.is_empty());
    }

    #[test]
    fn creditor_without_debtors_is_not_settled() {
        let participants = [
            participant(1, "A", 0.04, 0.01),
            participant(2, "B", 0.0, 0.01),
            participant(3, "C", 0.0, 0.01),
            participant(4, "D", 0.0, 0.01),
        ];

        let settlement = Settlement::new(&participants);

        assert_eq!(settlement.creditors.len(), 1);
        assert!(settlement.debtors.is_empty());
        assert!(settlement.payments.is_empty());
        assert!(!settlement.is_settled());
    }

    #[test]
    fn payments_cover_all_debts_and_credits() {
        let cases: [&[f64]; 4] = [
            &[30.0, -10.0, -20.0],
            &[-12.5, 7.25, -3.0, 8.25],
            &[100.0 / 3.0, -100.0 / 3.0, 50.0 / 3.0, -50.0 / 3.0],
            &[-1.0, -1.0, -1.0, -1.0, 4.0],
        ];

        for amounts in cases {
            let balances = amounts
                .iter()
                .enumerate()
                .map(|(i, &amount)| balance(&format!("P{i}"), amount))
                .collect::<Vec<_>>();

            let payments = compute_settlement(&balances);

            let paid: f64 = payments.iter().map(|payment| payment.amount).sum();
            let owed_to_creditors: f64 = amounts.iter().filter(|&&a| a > 0.0).sum();
            let owed_by_debtors: f64 = -amounts.iter().filter(|&&a| a < 0.0).sum::<f64>();
            assert!((paid - owed_to_creditors).abs() < TOLERANCE, "{amounts:?}");
            assert!((paid - owed_by_debtors).abs() < TOLERANCE, "{amounts:?}");

            assert!(payments.iter().all(|payment| payment.amount > 0.0));
            assert!(payments.len() < amounts.len(), "{amounts:?}");
        }
    }

    #[test]
    fn settlement_is_deterministic() {
        let balances = [
            balance("A", -7.5),
            balance("B", 2.5),
            balance("C", -2.5),
            balance("D", 7.5),
        ];

        assert_eq!(compute_settlement(&balances), compute_settlement(&balances));
    }

    #[test]
    fn net_balance_is_paid_minus_share() {
        let participants = [
            participant(1, "A", 40.0, 25.0),
            participant(2, "B", 0.0, 25.0),
            participant(3, "C", 10.0, 0.0),
        ];

        let balances = net_balances(&participants);

        assert_eq!(
            balances,
            vec![
                balance("A", 15.0),
                balance("B", -25.0),
                balance("C", 10.0),
            ]
        );
    }
}
