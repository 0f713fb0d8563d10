use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub i64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub description: String,
}

impl Product {
    /// Price rounded to two fraction digits with trailing zeros dropped (`289`, `45.5`, `19.99`).
    pub fn display_price(&self) -> String {
        self.price
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Product, ProductId};

    fn product(price: Decimal) -> Product {
        Product {
            id: ProductId(1),
            name: "Kong Classic Large".to_string(),
            category: "Zabawki dla psów".to_string(),
            price,
            description: "Wytrzymała zabawka".to_string(),
        }
    }

    #[test]
    fn display_price_drops_trailing_zeros() {
        assert_eq!(product(Decimal::new(28900, 2)).display_price(), "289");
        assert_eq!(product(Decimal::new(4550, 2)).display_price(), "45.5");
        assert_eq!(product(Decimal::new(1999, 2)).display_price(), "19.99");
    }

    #[test]
    fn display_price_rounds_to_two_fraction_digits() {
        assert_eq!(product(Decimal::new(12_346, 3)).display_price(), "12.35");
    }

    #[test]
    fn display_price_rounds_midpoints_away_from_zero() {
        assert_eq!(product(Decimal::new(12_345, 3)).display_price(), "12.35");
        assert_eq!(product(Decimal::new(12_355, 3)).display_price(), "12.36");
        assert_eq!(product(Decimal::new(45_005, 3)).display_price(), "45.01");
    }
}
