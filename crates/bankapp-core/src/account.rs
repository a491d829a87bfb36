use crate::error::AccountError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Storage-assigned account identity.
pub type AccountId = i64;

/// One bank account.
///
/// The balance only changes through [`Account::deposit`] and [`Account::withdraw`], both of
/// which validate before mutating, so a rejected call leaves the balance untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// `None` until the account has been saved once.
    #[serde(default)]
    pub id: Option<AccountId>,
    pub holder_name: String,
    pub account_number: String,
    balance: Decimal,
}

impl Account {
    pub fn new(
        holder_name: impl Into<String>,
        account_number: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            id: None,
            holder_name: holder_name.into(),
            account_number: account_number.into(),
            balance,
        }
    }

    /// Rebuild an account read back from storage.
    pub fn from_parts(
        id: AccountId,
        holder_name: impl Into<String>,
        account_number: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(holder_name, account_number, balance)
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Checks the opening balance. Must run before the account is first persisted.
    pub fn initialize(&self) -> Result<(), AccountError> {
        if self.balance < Decimal::ZERO {
            return Err(AccountError::InvalidAmount(self.balance));
        }
        Ok(())
    }

    /// A deposit that would push the balance past what `Decimal` can hold is rejected.
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        ensure_positive(amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(AccountError::InvalidAmount(amount))?;
        Ok(())
    }

    /// Withdrawing the whole balance is allowed; anything above it is not.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), AccountError> {
        ensure_positive(amount)?;
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                balance: self.balance,
                amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), AccountError> {
    if amount <= Decimal::ZERO {
        return Err(AccountError::InvalidAmount(amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn amount(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn account_with(balance: &str) -> Account {
        Account::from_parts(1, "John Doe", "12345", amount(balance))
    }

    #[test]
    fn initialize_accepts_zero_and_positive_balances() {
        assert!(account_with("0").initialize().is_ok());
        assert!(account_with("100.0").initialize().is_ok());
    }

    #[test]
    fn initialize_rejects_negative_balance() {
        let err = account_with("-10.0").initialize().unwrap_err();
        assert!(matches!(err, AccountError::InvalidAmount(v) if v == amount("-10.0")));
    }

    #[test]
    fn deposit_adds_amount() {
        let mut account = account_with("100.0");
        account.deposit(amount("50.0")).unwrap();
        assert_eq!(account.balance(), amount("150.0"));
    }

    #[test]
    fn deposit_of_zero_is_rejected() {
        let mut account = account_with("100.0");
        let err = account.deposit(Decimal::ZERO).unwrap_err();
        assert!(matches!(err, AccountError::InvalidAmount(_)));
        assert_eq!(account.balance(), amount("100.0"));
    }

    #[test]
    fn deposit_past_decimal_range_is_rejected() {
        let mut account = Account::from_parts(1, "John Doe", "12345", Decimal::MAX);
        let err = account.deposit(Decimal::ONE).unwrap_err();
        assert!(matches!(err, AccountError::InvalidAmount(v) if v == Decimal::ONE));
        assert_eq!(account.balance(), Decimal::MAX);
    }

    #[test]
    fn withdraw_full_balance_leaves_zero() {
        let mut account = account_with("100.0");
        account.withdraw(amount("100.0")).unwrap();
        assert!(account.balance().is_zero());
    }

    #[test]
    fn withdraw_above_balance_by_a_cent_is_rejected() {
        let mut account = account_with("100.00");
        let err = account.withdraw(amount("100.01")).unwrap_err();
        match err {
            AccountError::InsufficientFunds { balance, amount: attempted } => {
                assert_eq!(balance, amount("100.00"));
                assert_eq!(attempted, amount("100.01"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(account.balance(), amount("100.00"));
    }

    #[test]
    fn withdraw_checks_amount_before_funds() {
        let mut account = account_with("0");
        let err = account.withdraw(amount("-5")).unwrap_err();
        assert!(matches!(err, AccountError::InvalidAmount(_)));
    }

    #[test]
    fn json_uses_camel_case_and_numeric_balance() {
        let value = serde_json::to_value(account_with("100.0")).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["holderName"], "John Doe");
        assert_eq!(value["accountNumber"], "12345");
        assert_eq!(value["balance"].as_f64(), Some(100.0));

        let parsed: Account = serde_json::from_value(serde_json::json!({
            "holderName": "Alice",
            "accountNumber": "54321",
            "balance": 50.0
        }))
        .unwrap();
        assert_eq!(parsed.id, None);
        assert_eq!(parsed.balance(), amount("50"));
    }

    fn cents(max: i64) -> impl Strategy<Value = Decimal> {
        (0..=max).prop_map(|c| Decimal::new(c, 2))
    }

    proptest! {
        #[test]
        fn non_positive_amounts_never_change_balance(
            balance in cents(10_000_000),
            raw in -10_000_000i64..=0,
        ) {
            let rejected = Decimal::new(raw, 2);
            let mut account = Account::new("Prop", "p-1", balance);

            let deposit = account.deposit(rejected);
            prop_assert!(matches!(deposit, Err(AccountError::InvalidAmount(_))));
            let withdraw = account.withdraw(rejected);
            prop_assert!(matches!(withdraw, Err(AccountError::InvalidAmount(_))));
            prop_assert_eq!(account.balance(), balance);
        }

        #[test]
        fn overdraft_is_rejected_and_balance_kept(
            balance in cents(10_000_000),
            excess in 1i64..10_000_000,
        ) {
            let mut account = Account::new("Prop", "p-2", balance);
            let request = balance + Decimal::new(excess, 2);

            let result = account.withdraw(request);
            prop_assert!(
                matches!(result, Err(AccountError::InsufficientFunds { .. })),
                "expected insufficient funds, got {:?}",
                result
            );
            prop_assert_eq!(account.balance(), balance);
        }

        #[test]
        fn full_withdrawal_empties_account(balance in 1i64..10_000_000) {
            let balance = Decimal::new(balance, 2);
            let mut account = Account::new("Prop", "p-3", balance);
            prop_assert!(account.withdraw(balance).is_ok());
            prop_assert!(account.balance().is_zero());
        }

        #[test]
        fn deposit_then_withdraw_restores_balance(
            balance in cents(10_000_000),
            raw in 1i64..10_000_000,
        ) {
            let d = Decimal::new(raw, 2);
            let mut account = Account::new("Prop", "p-4", balance);
            account.deposit(d).unwrap();
            account.withdraw(d).unwrap();
            prop_assert_eq!(account.balance(), balance);
        }
    }
}
