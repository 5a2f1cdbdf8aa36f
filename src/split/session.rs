//! The in-memory state of the bill splitter.

use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

use serde::Deserialize;

use crate::Error;

use super::settlement::{Settlement, TOLERANCE};

/// Identifies a participant within a bill splitting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

impl ParticipantId {
    /// Wrap a raw ID.
    #[cfg(test)]
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Someone sharing or paying for the bill.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    /// The participant's ID, unique within the session.
    pub id: ParticipantId,
    /// The participant's display name.
    pub name: String,
    /// How much the participant paid towards the bill.
    ///
    /// Only set once the bill has been calculated.
    pub paid: f64,
    /// The participant's share of the bill.
    ///
    /// Only set once the bill has been calculated.
    pub should_pay: f64,
}

/// An unordered set of participant IDs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet(HashSet<ParticipantId>);

impl SelectionSet {
    /// Add `id` to the set, returns `false` if it was already selected.
    pub fn insert(&mut self, id: ParticipantId) -> bool {
        self.0.insert(id)
    }

    /// Remove `id` from the set, returns `false` if it was not selected.
    pub fn remove(&mut self, id: ParticipantId) -> bool {
        self.0.remove(&id)
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A bill being split between a group of people.
///
/// Every change to the session clears any previously calculated results so
/// that stale results are never shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitSession {
    participants: Vec<Participant>,
    next_id: u64,
    total_bill: Option<f64>,
    payers: SelectionSet,
    paid_amounts: HashMap<ParticipantId, f64>,
    splitters: SelectionSet,
    results_computed: bool,
}

impl SplitSession {
    /// The participants in the order they were added.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn total_bill(&self) -> Option<f64> {
        self.total_bill
    }

    pub fn is_payer(&self, id: ParticipantId) -> bool {
        self.payers.contains(id)
    }

    pub fn is_splitter(&self, id: ParticipantId) -> bool {
        self.splitters.contains(id)
    }

    /// The amount entered for a payer, if any.
    pub fn paid_amount(&self, id: ParticipantId) -> Option<f64> {
        self.paid_amounts.get(&id).copied()
    }

    /// The settlement for the last calculation, or `None` if the bill has not
    /// been calculated since the last change.
    pub fn settlement(&self) -> Option<Settlement> {
        self.results_computed
            .then(|| Settlement::new(&self.participants))
    }

    /// Add a new participant called `name`.
    ///
    /// # Errors
    /// Returns [Error::EmptyParticipantName] if `name` is empty or only whitespace.
    pub fn add_participant(&mut self, name: &str) -> Result<Participant, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyParticipantName);
        }

        self.next_id += 1;
        let participant = Participant {
            id: ParticipantId(self.next_id),
            name: name.to_owned(),
            paid: 0.0,
            should_pay: 0.0,
        };
        self.participants.push(participant.clone());
        self.results_computed = false;

        Ok(participant)
    }

    /// Remove a participant along with their payer and splitter selections.
    ///
    /// # Errors
    /// Returns [Error::UnknownParticipant] if there is no participant with the ID `id`.
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Participant, Error> {
        let index = self.index_of(id)?;
        let participant = self.participants.remove(index);

        self.payers.remove(id);
        self.paid_amounts.remove(&id);
        self.splitters.remove(id);
        self.results_computed = false;

        Ok(participant)
    }

    /// Set the total amount of the bill, `None` clears it.
    ///
    /// # Errors
    /// Returns [Error::InvalidBillAmount] if `total_bill` is negative or not a finite number.
    pub fn set_total_bill(&mut self, total_bill: Option<f64>) -> Result<(), Error> {
        if matches!(total_bill, Some(amount) if !amount.is_finite() || amount < 0.0) {
            return Err(Error::InvalidBillAmount);
        }

        self.total_bill = total_bill;
        self.results_computed = false;

        Ok(())
    }

    /// Mark whether a participant paid towards the bill.
    ///
    /// Unselecting a payer clears the amount they paid.
    ///
    /// # Errors
    /// Returns [Error::UnknownParticipant] if there is no participant with the ID `id`.
    pub fn set_payer(&mut self, id: ParticipantId, selected: bool) -> Result<(), Error> {
        self.index_of(id)?;

        if selected {
            self.payers.insert(id);
        } else {
            self.payers.remove(id);
            self.paid_amounts.remove(&id);
        }
        self.results_computed = false;

        Ok(())
    }

    /// Set how much a payer paid, `None` clears the amount.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UnknownParticipant] if there is no participant with the ID `id`,
    /// - [Error::PayerNotSelected] if the participant is not marked as a payer,
    /// - or [Error::InvalidPaidAmount] if `amount` is negative or not a finite number.
    pub fn set_paid_amount(&mut self, id: ParticipantId, amount: Option<f64>) -> Result<(), Error> {
        self.index_of(id)?;

        if !self.payers.contains(id) {
            return Err(Error::PayerNotSelected(id));
        }

        match amount {
            Some(amount) if !amount.is_finite() || amount < 0.0 => {
                return Err(Error::InvalidPaidAmount(amount));
            }
            Some(amount) => {
                self.paid_amounts.insert(id, amount);
            }
            None => {
                self.paid_amounts.remove(&id);
            }
        }
        self.results_computed = false;

        Ok(())
    }

    /// Mark whether a participant shares the bill.
    ///
    /// # Errors
    /// Returns [Error::UnknownParticipant] if there is no participant with the ID `id`.
    pub fn set_splitter(&mut self, id: ParticipantId, selected: bool) -> Result<(), Error> {
        self.index_of(id)?;

        if selected {
            self.splitters.insert(id);
        } else {
            self.splitters.remove(id);
        }
        self.results_computed = false;

        Ok(())
    }

    /// Work out what each participant paid and should pay, then return the
    /// payments needed to settle up.
    ///
    /// The bill is shared equally between the splitters. Nothing is changed if
    /// the session fails validation.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidBillAmount] if the total bill is not set or not greater than zero,
    /// - [Error::NoSplitters] if no one has been selected to split the bill,
    /// - or [Error::PaidTotalMismatch] if the paid amounts do not add up to the total bill.
    pub fn calculate(&mut self) -> Result<Settlement, Error> {
        let total_bill = match self.total_bill {
            Some(amount) if amount.is_finite() && amount > 0.0 => amount,
            _ => return Err(Error::InvalidBillAmount),
        };

        if self.splitters.is_empty() {
            return Err(Error::NoSplitters);
        }

        let total_paid: f64 = self
            .participants
            .iter()
            .filter(|participant| self.payers.contains(participant.id))
            .filter_map(|participant| self.paid_amounts.get(&participant.id))
            .sum();

        if (total_paid - total_bill).abs() > TOLERANCE {
            return Err(Error::PaidTotalMismatch {
                paid: total_paid,
                bill: total_bill,
            });
        }

        let share = total_bill / self.splitters.len() as f64;

        for participant in &mut self.participants {
            participant.paid = if self.payers.contains(participant.id) {
                self.paid_amounts
                    .get(&participant.id)
                    .copied()
                    .unwrap_or(0.0)
            } else {
                0.0
            };
            participant.should_pay = if self.splitters.contains(participant.id) {
                share
            } else {
                0.0
            };
        }
        self.results_computed = true;

        Ok(Settlement::new(&self.participants))
    }

    /// Clear all participants, amounts and selections.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn index_of(&self, id: ParticipantId) -> Result<usize, Error> {
        self.participants
            .iter()
            .position(|participant| participant.id == id)
            .ok_or(Error::UnknownParticipant(id))
    }
}
