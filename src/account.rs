use rust_decimal::Decimal;

pub type AccountId = u32;

/// A named account holding a currency balance.
///
/// Accounts are created out of band (seed data) and are only ever mutated
/// through the transfer operation's balance updates. The balance is
/// non-negative between operations; overdraft is not modeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub balance: Decimal,
}

impl Account {
    pub fn new(id: AccountId, name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
        }
    }
}
