//! Cart aggregate: the buyer's in-progress selection before checkout.

use common::{Money, ProductId};
use order_store::{NewOrderLine, ProductRecord};
use serde::{Deserialize, Serialize};

/// Session-local identifier for a cart line. Stable across quantity edits,
/// never reused within one cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(u64);

impl LineId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One product in the cart, with the price captured at the moment it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub line_id: LineId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub image_url: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// The cart aggregate. Lines keep insertion order; adding a product that is
/// already present bumps its quantity instead of appending a duplicate line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    next_line_id: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product`. Returns the id of the line that now holds it.
    pub fn add(&mut self, product: &ProductRecord) -> LineId {
        self.add_line(
            product.id,
            &product.name,
            product.price,
            product.image_url.clone(),
            1,
        )
    }

    /// Adds `quantity` units of a product, merging into an existing line for the
    /// same product when there is one. Quantities below one are treated as one.
    pub fn add_line(
        &mut self,
        product_id: ProductId,
        name: &str,
        unit_price: Money,
        image_url: Option<String>,
        quantity: u32,
    ) -> LineId {
        let quantity = quantity.max(1);
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity += quantity;
            return line.line_id;
        }
        let line_id = LineId(self.next_line_id);
        self.next_line_id += 1;
        self.lines.push(CartLine {
            line_id,
            product_id,
            name: name.to_string(),
            unit_price,
            image_url,
            quantity,
        });
        line_id
    }

    /// Rebuilds a cart from client-held lines, such as the ones shipped in a
    /// checkout request. Quantities are clamped and duplicate products merge,
    /// same as interactive adds.
    pub fn restore<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (ProductId, String, Money, Option<String>, u32)>,
    {
        let mut cart = Self::new();
        for (product_id, name, unit_price, image_url, quantity) in lines {
            cart.add_line(product_id, &name, unit_price, image_url, quantity);
        }
        cart
    }

    /// Sets the quantity of a line, clamping to a minimum of one. Unknown line
    /// ids are ignored.
    pub fn update_quantity(&mut self, line_id: LineId, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.line_id == line_id) {
            line.quantity = quantity.max(1);
        }
    }

    /// Removes a line. Removing an id that is not in the cart is a no-op.
    pub fn remove(&mut self, line_id: LineId) {
        self.lines.retain(|l| l.line_id != line_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line totals.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Converts the cart into the lines submitted for persistence.
    pub fn to_order_lines(&self) -> Vec<NewOrderLine> {
        self.lines
            .iter()
            .map(|l| NewOrderLine {
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
                product_name: l.name.clone(),
            })
            .collect()
    }
}
