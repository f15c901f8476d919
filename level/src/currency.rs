//! Currency balance owned by the level coordinator.

/// Spendable balance accumulated during a level session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Currency {
    balance: u32,
}

impl Currency {
    /// Creates a balance seeded with the level's starting currency.
    #[must_use]
    pub const fn new(initial: u32) -> Self {
        Self { balance: initial }
    }

    /// Current balance.
    #[must_use]
    pub const fn balance(&self) -> u32 {
        self.balance
    }

    /// Reports whether a purchase of `cost` would succeed.
    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.balance >= cost
    }

    /// Credits `amount`, saturating at `u32::MAX`.
    pub fn add(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }

    /// Debits `cost` when the balance covers it.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    #[must_use]
    pub fn try_purchase(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.balance -= cost;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::Currency;

    #[test]
    fn purchase_beyond_balance_is_refused() {
        let mut currency = Currency::new(30);

        assert!(!currency.try_purchase(31));
        assert_eq!(currency.balance(), 30);
        assert!(currency.try_purchase(30));
        assert_eq!(currency.balance(), 0);
    }

    #[test]
    fn credit_saturates() {
        let mut currency = Currency::new(u32::MAX - 1);
        currency.add(5);
        assert_eq!(currency.balance(), u32::MAX);
    }
}
