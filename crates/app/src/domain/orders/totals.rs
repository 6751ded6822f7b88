//! Order Totals
//!
//! Shipping, tax and grand total derived from a subtotal and a delivery
//! option. All amounts are minor units.

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::domain::{
    orders::data::DeliveryOption,
    pricing::{self, PricingError},
};

/// Default express delivery fee.
pub const DEFAULT_EXPRESS_FEE: u64 = 12_900;

/// Computed order totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: u64,
    pub shipping: u64,
    pub tax: u64,
    pub total: u64,
}

/// Store pricing policy for shipping and tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsPolicy {
    pub express_fee: u64,

    /// Fraction of the subtotal, e.g. `0.10`.
    pub tax_rate: Decimal,
}

impl Default for TotalsPolicy {
    fn default() -> Self {
        Self {
            express_fee: DEFAULT_EXPRESS_FEE,
            tax_rate: Decimal::new(10, 2),
        }
    }
}

impl TotalsPolicy {
    #[must_use]
    pub const fn shipping_for(&self, option: DeliveryOption) -> u64 {
        match option {
            DeliveryOption::Express => self.express_fee,
            DeliveryOption::Standard => 0,
        }
    }

    /// Totals for an order with the given subtotal.
    ///
    /// # Errors
    ///
    /// Returns an error when tax cannot be computed or the total overflows.
    pub fn compute(&self, subtotal: u64, option: DeliveryOption) -> Result<Totals, PricingError> {
        let shipping = self.shipping_for(option);
        let tax = pricing::apply_rate(self.tax_rate, subtotal)?;

        let total = subtotal
            .checked_add(shipping)
            .and_then(|sum| sum.checked_add(tax))
            .ok_or(PricingError::Overflow)?;

        Ok(Totals {
            subtotal,
            shipping,
            tax,
            total,
        })
    }
}

/// Totals as displayed by the client. Any field may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientTotals {
    pub subtotal: Option<u64>,
    pub shipping: Option<u64>,
    pub tax: Option<u64>,
    pub total: Option<u64>,
}

/// A client figure that disagrees with the server's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalsMismatch {
    pub field: &'static str,
    pub client: u64,
    pub server: u64,
}

/// Compare client totals with the authoritative server totals.
pub fn reconcile(server: &Totals, client: &ClientTotals) -> SmallVec<[TotalsMismatch; 4]> {
    [
        ("subtotal", client.subtotal, server.subtotal),
        ("shipping", client.shipping, server.shipping),
        ("tax", client.tax, server.tax),
        ("total", client.total, server.total),
    ]
    .into_iter()
    .filter_map(|(field, client, server)| {
        client
            .filter(|client| *client != server)
            .map(|client| TotalsMismatch {
                field,
                client,
                server,
            })
    })
    .collect()
}
