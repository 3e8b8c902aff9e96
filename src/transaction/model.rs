use serde::{Deserialize, Serialize};
use serde_json::Number;

/// An unauthenticated value transfer recorded in a block.
///
/// `amount` keeps the JSON number exactly as submitted (`5` stays an integer,
/// `1.5` stays a float) so the block encoding hashes the same on every node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: Number,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: Number) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transaction;
    use serde_json::{Number, json};

    #[test]
    fn amount_keeps_integer_and_float_forms() {
        let int_tx: Transaction =
            serde_json::from_value(json!({"sender": "a", "recipient": "b", "amount": 5})).unwrap();
        let float_tx: Transaction =
            serde_json::from_value(json!({"sender": "a", "recipient": "b", "amount": 5.0}))
                .unwrap();

        assert_eq!(serde_json::to_string(&int_tx.amount).unwrap(), "5");
        assert_eq!(serde_json::to_string(&float_tx.amount).unwrap(), "5.0");
        assert_ne!(int_tx, float_tx);
    }

    #[test]
    fn negative_amounts_are_accepted() {
        let tx = Transaction::new("a", "b", Number::from(-3));
        assert_eq!(tx.amount.as_i64(), Some(-3));
    }
}
